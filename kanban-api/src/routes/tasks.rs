/// Task endpoints
///
/// # Endpoints
///
/// - `POST /add` - Create a task (`title`, `description`, `category`)
/// - `GET /updater/:task_id` - Move a task one lane right
/// - `GET /updatel/:task_id` - Move a task one lane left
/// - `GET /delete/:task_id` - Delete a task
///
/// Adding requires a session (401 otherwise). The move and delete routes act
/// only on the caller's own tasks; an anonymous caller, an unknown ID or a
/// task owned by someone else is logged and answered with a redirect home,
/// with nothing changed.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    middleware::session::SessionContext,
    routes::redirect_home,
};
use axum::{
    extract::{Path, State},
    response::Response,
    Extension, Form,
};
use kanban_shared::models::{Category, TaskId};
use serde::Deserialize;

/// New task form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TaskForm {
    /// Short title
    pub title: String,

    /// Free text
    pub description: String,

    /// Target lane, e.g. `to_do`, `In Progress`, `done`
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum TaskAction {
    MoveRight,
    MoveLeft,
    Delete,
}

/// Create a task for the current user
///
/// # Endpoint
///
/// ```text
/// POST /add
/// Content-Type: application/x-www-form-urlencoded
///
/// title=Write+docs&description=README&category=to_do
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: No session
/// - `400 Bad Request`: Missing or unrecognised category
pub async fn add_task(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Form(form): Form<TaskForm>,
) -> ApiResult<Response> {
    let owner = session
        .user_id
        .ok_or_else(|| ApiError::Unauthorized("Log in to add tasks".to_string()))?;

    let category = form
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing category".to_string()))?
        .parse::<Category>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    state
        .board
        .create(&form.title, &form.description, category, owner)
        .await?;

    Ok(redirect_home())
}

/// Move a task one lane to the right
pub async fn move_right(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(task_id): Path<TaskId>,
) -> ApiResult<Response> {
    apply(&state, &session, task_id, TaskAction::MoveRight).await
}

/// Move a task one lane to the left
pub async fn move_left(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(task_id): Path<TaskId>,
) -> ApiResult<Response> {
    apply(&state, &session, task_id, TaskAction::MoveLeft).await
}

/// Delete a task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    Path(task_id): Path<TaskId>,
) -> ApiResult<Response> {
    apply(&state, &session, task_id, TaskAction::Delete).await
}

async fn apply(
    state: &AppState,
    session: &SessionContext,
    task_id: TaskId,
    action: TaskAction,
) -> ApiResult<Response> {
    let Some(user_id) = session.user_id else {
        tracing::warn!(task_id, ?action, "Task request without a session ignored");
        return Ok(redirect_home());
    };

    let board = &state.board;
    let outcome = match board.find_owned(user_id, task_id).await {
        Ok(_) => match action {
            TaskAction::MoveRight => board.move_forward(task_id).await.map(drop),
            TaskAction::MoveLeft => board.move_backward(task_id).await.map(drop),
            TaskAction::Delete => board.delete(task_id).await,
        },
        Err(e) => Err(e),
    };

    match outcome {
        Ok(()) => Ok(redirect_home()),
        Err(e) if e.is_business_outcome() => {
            tracing::warn!(user_id, task_id, ?action, error = %e, "Task request ignored");
            Ok(redirect_home())
        }
        Err(e) => Err(e.into()),
    }
}
