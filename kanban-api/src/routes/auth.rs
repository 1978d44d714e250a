/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /register` - Create an account (`name`, `username`, `password`)
/// - `POST /login` - Open a session (`username`, `password`)
/// - `GET /logout` - Close the session
///
/// All three redirect to `/`. Failed registrations and logins are logged and
/// leave the caller's state untouched; only storage or hashing faults
/// produce an error response.

use crate::{
    app::AppState,
    error::ApiResult,
    middleware::session::{expired_cookie, session_cookie, SessionContext},
    routes::redirect_home,
};
use axum::{extract::State, response::Response, Extension, Form};
use axum_extra::extract::cookie::CookieJar;
use kanban_shared::auth::credentials::Registration;
use serde::Deserialize;

/// Login form
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    /// Username
    pub username: String,

    /// Password
    pub password: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /register
/// Content-Type: application/x-www-form-urlencoded
///
/// name=John+Doe&username=johndoe&password=secret123
/// ```
///
/// Registration does not sign the user in.
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<Registration>,
) -> ApiResult<Response> {
    match state.credentials.register(form).await {
        Ok(user) => {
            tracing::info!(user_id = user.user_id, username = %user.username, "Registration succeeded");
        }
        Err(e) if e.is_business_outcome() => {
            tracing::warn!(error = %e, "Registration rejected");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(redirect_home())
}

/// Log in and open a session
///
/// # Endpoint
///
/// ```text
/// POST /login
/// Content-Type: application/x-www-form-urlencoded
///
/// username=johndoe&password=secret123
/// ```
///
/// On success the response sets the session cookie and any session the
/// caller already held is revoked.
pub async fn login(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> ApiResult<(CookieJar, Response)> {
    match state
        .sessions
        .login(session.token(), &form.username, &form.password)
        .await
    {
        Ok(token) => Ok((
            jar.add(session_cookie(&state.config, token)),
            redirect_home(),
        )),
        Err(e) if e.is_business_outcome() => {
            tracing::warn!(username = %form.username, error = %e, "Login rejected");
            Ok((jar, redirect_home()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Log out
///
/// # Endpoint
///
/// ```text
/// GET /logout
/// ```
///
/// Always succeeds and always expires the session cookie.
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<SessionContext>,
    jar: CookieJar,
) -> (CookieJar, Response) {
    state.sessions.logout(session.token()).await;

    (jar.add(expired_cookie(&state.config)), redirect_home())
}
