/// Session resolution middleware
///
/// Every request passes through [`session_layer`], which reads the session
/// token from the session cookie (or an `Authorization: Bearer` header),
/// resolves it through the [`SessionAuthority`], and stores the outcome as a
/// [`SessionContext`] request extension. It never rejects a request: an
/// anonymous visitor simply gets a context without a user.
///
/// Handlers take the context with `Extension<SessionContext>` and decide for
/// themselves what an anonymous caller may do.
///
/// [`SessionAuthority`]: kanban_shared::auth::session::SessionAuthority
///
/// # Example
///
/// ```no_run
/// use axum::{Extension, response::IntoResponse};
/// use kanban_api::middleware::session::SessionContext;
///
/// async fn whoami(Extension(session): Extension<SessionContext>) -> impl IntoResponse {
///     match session.user_id {
///         Some(id) => format!("user {}", id),
///         None => "anonymous".to_string(),
///     }
/// }
/// ```

use crate::{app::AppState, config::Config};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use kanban_shared::models::UserId;

/// Per-request session state
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    /// Raw token the client presented, valid or not
    pub token: Option<String>,

    /// User the token resolved to
    pub user_id: Option<UserId>,
}

impl SessionContext {
    /// Raw token as a string slice
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

/// Resolves the session token into a [`SessionContext`] extension
pub async fn session_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let token = extract_token(req.headers(), &state.config.session.cookie_name);
    let user_id = state.sessions.current_user(token.as_deref()).await;

    if token.is_some() && user_id.is_none() {
        tracing::debug!("Session token present but not live; treating as anonymous");
    }

    req.extensions_mut().insert(SessionContext { token, user_id });

    next.run(req).await
}

/// Reads the session token from the cookie, falling back to a Bearer header
pub fn extract_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let from_cookie = CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|cookie| cookie.value_trimmed().to_string())
        .filter(|value| !value.is_empty());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    })
}

/// Session cookie carrying a fresh token
pub fn session_cookie(config: &Config, token: String) -> Cookie<'static> {
    let max_age = time::Duration::seconds(config.session_ttl().num_seconds());
    build_cookie(config, token, max_age)
}

/// Cookie that overwrites and expires the session cookie
pub fn expired_cookie(config: &Config) -> Cookie<'static> {
    build_cookie(config, String::new(), time::Duration::ZERO)
}

fn build_cookie(config: &Config, value: String, max_age: time::Duration) -> Cookie<'static> {
    Cookie::build((config.session.cookie_name.clone(), value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.api.production)
        .max_age(max_age)
        .build()
}
