/// Board page
///
/// # Endpoint
///
/// ```text
/// GET /
/// ```
///
/// Signed-in users see their own tasks in three lanes. Anonymous visitors see
/// three empty lanes and the login/registration forms; no storage is touched
/// for them.

use crate::{
    app::AppState,
    error::ApiResult,
    middleware::session::SessionContext,
    view::{self, Viewer},
};
use axum::{extract::State, response::Html, Extension};
use kanban_shared::board::Board;

/// Renders the board for the current session
pub async fn home(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
) -> ApiResult<Html<String>> {
    let Some(user_id) = session.user_id else {
        return Ok(Html(view::render_board(Viewer::Anonymous, &Board::empty())));
    };

    let Some(user) = state.credentials.find_user(user_id).await? else {
        tracing::warn!(user_id, "Session refers to a missing user; rendering anonymous board");
        return Ok(Html(view::render_board(Viewer::Anonymous, &Board::empty())));
    };

    let board = state.board.board_for(user_id).await?;
    tracing::debug!(user_id, tasks = board.len(), "Rendering board");

    Ok(Html(view::render_board(Viewer::User(&user.name), &board)))
}
