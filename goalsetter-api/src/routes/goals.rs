/// Goal endpoints
///
/// Every handler except [`method_not_allowed`] runs behind the session
/// middleware and receives the caller as `Extension<PublicUser>`.
///
/// # Endpoints
///
/// - `GET /api/goals` - List the caller's goals, oldest first
/// - `POST /api/goals` - Create a goal
/// - `PUT /api/goals/:id` - Update a goal the caller owns
/// - `DELETE /api/goals/:id` - Delete a goal the caller owns

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use goalsetter_shared::models::{
    goal::{CreateGoal, Goal, UpdateGoal},
    user::PublicUser,
};
use serde::{Deserialize, Serialize};

const MISSING_TEXT: &str = "Please add a text field";

/// Create goal request
#[derive(Debug, Deserialize)]
pub struct CreateGoalRequest {
    pub text: Option<String>,
}

/// Update goal request
#[derive(Debug, Deserialize)]
pub struct UpdateGoalRequest {
    pub text: Option<String>,
}

/// Update response
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateGoalResponse {
    pub message: String,

    /// The goal after the update
    pub goal: Goal,
}

/// Delete response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteGoalResponse {
    pub message: String,

    pub id: String,
}

/// List the caller's goals
pub async fn list_goals(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
) -> Json<Vec<Goal>> {
    Json(state.store.list_goals(&user.id))
}

/// Create a goal
///
/// # Errors
///
/// - `400 Bad Request`: `text` missing or empty
pub async fn create_goal(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Json(req): Json<CreateGoalRequest>,
) -> ApiResult<(StatusCode, Json<Goal>)> {
    let text = req
        .text
        .filter(|text| !text.is_empty())
        .ok_or_else(|| ApiError::BadRequest(MISSING_TEXT.to_string()))?;

    let goal = state.store.create_goal(CreateGoal {
        text,
        user: user.id,
    })?;

    tracing::debug!(goal_id = %goal.id, user_id = %goal.user, "Created goal");

    Ok((StatusCode::CREATED, Json(goal)))
}

/// Update a goal
///
/// A request without a JSON body is an empty patch: nothing changes except
/// `updatedAt`.
///
/// # Errors
///
/// - `404 Not Found`: No such goal
/// - `403 Forbidden`: Goal belongs to another user
pub async fn update_goal(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Path(id): Path<String>,
    req: Option<Json<UpdateGoalRequest>>,
) -> ApiResult<Json<UpdateGoalResponse>> {
    let patch = req
        .map(|Json(req)| UpdateGoal { text: req.text })
        .unwrap_or_default();
    let goal = state.store.update_goal(&id, Some(&user), patch)?;

    tracing::debug!(goal_id = %goal.id, "Updated goal");

    Ok(Json(UpdateGoalResponse {
        message: "Goal updated successfully".to_string(),
        goal,
    }))
}

/// Delete a goal
///
/// # Errors
///
/// Same as [`update_goal`].
pub async fn delete_goal(
    State(state): State<AppState>,
    Extension(user): Extension<PublicUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteGoalResponse>> {
    state.store.delete_goal(&id, Some(&user))?;

    tracing::debug!(goal_id = %id, "Deleted goal");

    Ok(Json(DeleteGoalResponse {
        message: "Goal deleted successfully".to_string(),
        id,
    }))
}

/// Fallback for unsupported methods on the goal routes
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
