/// Route handlers
///
/// - `board`: The board page
/// - `auth`: Register, login and logout
/// - `tasks`: Add, move and delete tasks
/// - `health`: Health check endpoint
///
/// Every form route answers with `302 Found` back to `/`.

pub mod auth;
pub mod board;
pub mod health;
pub mod tasks;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

/// `302 Found` to the board page
pub fn redirect_home() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}
