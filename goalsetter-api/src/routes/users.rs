/// User endpoints
///
/// # Endpoints
///
/// - `POST /api/users` - Register new user
/// - `POST /api/users/login` - Login and get a session token
/// - `GET /api/users/me` - Current user (authenticated)
///
/// Password hashing and verification run on the blocking pool so Argon2 does
/// not stall the async workers.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use goalsetter_shared::{
    auth::password,
    models::user::{CreateUser, PublicUser, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Please add all fields"))]
    pub name: String,

    /// Email address
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Plaintext password, hashed before storage
    #[serde(default)]
    #[validate(length(min = 1, message = "Please add all fields"))]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Please add all fields"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Please add all fields"))]
    pub password: String,
}

/// Register and login response
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    pub email: String,

    /// Session token
    pub token: String,
}

impl AuthResponse {
    fn new(user: User, token: String) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            token,
        }
    }
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/users
/// Content-Type: application/json
///
/// {
///   "name": "Ada",
///   "email": "ada@example.com",
///   "password": "correct horse"
/// }
/// ```
///
/// # Response (201)
///
/// ```json
/// {
///   "_id": "lx3k9a0b2000001k2j4h5g6",
///   "name": "Ada",
///   "email": "ada@example.com",
///   "token": "eyJ..."
/// }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Email already registered
/// - `422 Unprocessable Entity`: Validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    let params = state.hash_params;
    let plaintext = req.password;
    let password_hash = tokio::task::spawn_blocking(move || params.hash(&plaintext))
        .await
        .map_err(|e| ApiError::InternalError(format!("Hashing task failed: {}", e)))??;

    let user = state.store.create_user(CreateUser {
        name: req.name,
        email: req.email,
        password_hash,
    })?;

    tracing::info!(user_id = %user.id, "Registered user");

    let token = state.issue_token(&user.id)?;

    Ok((StatusCode::CREATED, Json(AuthResponse::new(user, token))))
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /api/users/login
/// Content-Type: application/json
///
/// {
///   "email": "ada@example.com",
///   "password": "correct horse"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Unknown email or wrong password
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let user = state
        .store
        .authenticate_by_email(&req.email)
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let stored_hash = user.password_hash.clone();
    let plaintext = req.password;
    let valid = tokio::task::spawn_blocking(move || password::verify_password(&plaintext, &stored_hash))
        .await
        .map_err(|e| ApiError::InternalError(format!("Verification task failed: {}", e)))??;

    if !valid {
        tracing::debug!(user_id = %user.id, "Rejected login with wrong password");
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    tracing::info!(user_id = %user.id, "User logged in");

    let token = state.issue_token(&user.id)?;

    Ok(Json(AuthResponse::new(user, token)))
}

/// Current user
///
/// Returns the identity resolved by the session middleware.
pub async fn me(Extension(user): Extension<PublicUser>) -> Json<PublicUser> {
    Json(user)
}
