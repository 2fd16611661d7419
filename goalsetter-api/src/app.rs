/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use goalsetter_api::{app::{build_router, AppState}, config::Config};
/// use goalsetter_shared::store::DataStore;
/// use std::sync::Arc;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(DataStore::new()), config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post},
    Router,
};
use chrono::Duration;
use goalsetter_shared::{
    auth::{
        jwt::{create_token, Claims, JwtError, JwtVerifier},
        password::HashParams,
        session::SessionResolver,
    },
    store::DataStore,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// User and goal collections
    pub store: Arc<DataStore>,

    /// Bearer token → user resolution
    pub sessions: SessionResolver,

    /// Application configuration
    pub config: Arc<Config>,

    /// Argon2id cost for new password hashes
    pub hash_params: HashParams,
}

impl AppState {
    /// Creates new application state with a JWT-backed session resolver
    pub fn new(store: Arc<DataStore>, config: Config) -> Self {
        let verifier = JwtVerifier::new(config.jwt.secret.clone());

        Self {
            store,
            sessions: SessionResolver::new(Arc::new(verifier)),
            config: Arc::new(config),
            hash_params: HashParams::default(),
        }
    }

    /// Replaces the password hashing cost
    pub fn with_hash_params(mut self, hash_params: HashParams) -> Self {
        self.hash_params = hash_params;
        self
    }

    /// Issues a session token for `user_id`
    pub fn issue_token(&self, user_id: &str) -> Result<String, JwtError> {
        let lifetime = Duration::try_days(self.config.jwt.expires_in_days).ok_or_else(|| {
            JwtError::CreateError(format!(
                "Token lifetime of {} days is out of range",
                self.config.jwt.expires_in_days
            ))
        })?;
        let claims = Claims::with_expiration(user_id, lifetime)?;
        create_token(&claims, &self.config.jwt.secret)
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET /health                  # Health check (public)
/// └── /api/
///     ├── /users/
///     │   ├── POST /               # Register (public)
///     │   ├── POST /login          # Login (public)
///     │   └── GET  /me             # Current user (authenticated)
///     └── /goals/                  # All authenticated
///         ├── GET    /             # List own goals
///         ├── POST   /             # Create goal
///         ├── PUT    /:id          # Update goal
///         └── DELETE /:id          # Delete goal
/// ```
///
/// Other methods on the goal routes get `405` without authentication.
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers (tower-http SetResponseHeaderLayer)
/// 4. Session resolution (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let session_layer = || axum::middleware::from_fn_with_state(state.clone(), require_session);

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let user_routes = Router::new()
        .route("/", post(routes::users::register))
        .route("/login", post(routes::users::login))
        .route("/me", get(routes::users::me).route_layer(session_layer()));

    let goal_routes = Router::new()
        .route(
            "/",
            get(routes::goals::list_goals)
                .post(routes::goals::create_goal)
                .route_layer(session_layer())
                .fallback(routes::goals::method_not_allowed),
        )
        .route(
            "/:id",
            delete(routes::goals::delete_goal)
                .put(routes::goals::update_goal)
                .route_layer(session_layer())
                .fallback(routes::goals::method_not_allowed),
        );

    let api_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/goals", goal_routes);

    // Configure CORS based on environment
    let cors = if state.config.allows_any_origin() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    let production = state.config.api.production;

    let router = Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .with_state(state)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));

    let router = if production {
        router.layer(SetResponseHeaderLayer::if_not_present(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=31536000; includeSubDomains"),
        ))
    } else {
        router
    };

    router.layer(cors).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
}

/// Session middleware
///
/// Resolves the bearer token from the Authorization header, then injects
/// the caller's `PublicUser` into request extensions.
async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let user = state.sessions.resolve_header(state.store.users(), auth_header)?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
