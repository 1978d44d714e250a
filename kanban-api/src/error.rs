/// Error handling for the board server
///
/// This module provides a unified error type that maps to HTTP responses.
/// Handlers return `Result<T, ApiError>`; faults become short plain-text
/// bodies with the matching status code, like the rest of this HTML-only
/// server.
///
/// Expected outcomes of the board operations (missing field, duplicate
/// username, bad credentials, unknown task) are not errors at this level:
/// the handlers log them and redirect home. Only what reaches `?` ends up
/// here.
///
/// # Example
///
/// ```
/// use kanban_api::error::{ApiError, ApiResult};
///
/// fn parse_id(raw: &str) -> ApiResult<i64> {
///     raw.parse()
///         .map_err(|_| ApiError::BadRequest(format!("Invalid task ID: {}", raw)))
/// }
///
/// assert!(parse_id("42").is_ok());
/// assert!(parse_id("abc").is_err());
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kanban_shared::{
    auth::{credentials::CredentialError, session::SessionError},
    board::TaskError,
    store::StoreError,
};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400)
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized(String),

    /// Not found (404)
    NotFound(String),

    /// Internal server error (500)
    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}

/// Convert storage errors to API errors
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::InternalError(format!("Storage error: {}", err))
    }
}

/// Convert credential errors to API errors
impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::MissingField(fields) => {
                ApiError::BadRequest(format!("Missing required field(s): {}", fields))
            }
            CredentialError::DuplicateUsername(_) => {
                ApiError::BadRequest("Username already registered".to_string())
            }
            CredentialError::InvalidCredentials => {
                ApiError::Unauthorized("Invalid username or password".to_string())
            }
            CredentialError::Password(e) => {
                ApiError::InternalError(format!("Password operation failed: {}", e))
            }
            CredentialError::Store(e) => e.into(),
        }
    }
}

/// Convert session errors to API errors
impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Credentials(e) => e.into(),
            SessionError::Token(e) => {
                ApiError::InternalError(format!("Session token error: {}", e))
            }
        }
    }
}

/// Convert task errors to API errors
impl From<TaskError> for ApiError {
    fn from(err: TaskError) -> Self {
        match err {
            TaskError::NotFound(id) => ApiError::NotFound(format!("Task {} not found", id)),
            TaskError::Store(e) => e.into(),
        }
    }
}
