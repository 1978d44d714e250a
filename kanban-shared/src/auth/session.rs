/// Session authority: maps session tokens to logged-in users
///
/// Sessions live only in this process. A token resolves to a user when
///
/// 1. its signature, issuer and expiry check out ([`super::jwt`]), and
/// 2. its session ID is still in the live registry.
///
/// Logging out drops the registry entry, so a token that was copied before
/// logout stops working immediately even though its signature is still valid.
/// A restart forgets every session.
///
/// The authority is an explicit collaborator: handlers receive the resolved
/// user ID per request instead of reading ambient state.
///
/// # Example
///
/// ```
/// use kanban_shared::auth::credentials::{CredentialService, Registration};
/// use kanban_shared::auth::session::SessionAuthority;
/// use kanban_shared::store::MemoryStore;
/// use chrono::Duration;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Arc::new(CredentialService::new(Arc::new(MemoryStore::new())));
/// credentials.register(Registration::new("John Doe", "johndoe", "secret123")).await?;
///
/// let sessions = SessionAuthority::new(
///     credentials,
///     "a-secret-key-that-is-at-least-32-bytes".to_string(),
///     Duration::hours(24),
/// );
///
/// let token = sessions.login(None, "johndoe", "secret123").await?;
/// assert!(sessions.current_user(Some(&token)).await.is_some());
///
/// sessions.logout(Some(&token)).await;
/// assert!(sessions.current_user(Some(&token)).await.is_none());
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use super::credentials::{CredentialError, CredentialService};
use super::jwt::{self, JwtError, SessionClaims};
use crate::models::UserId;

/// Opaque client-held session token
pub type SessionToken = String;

/// Error type for session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Credential check failed or faulted
    #[error(transparent)]
    Credentials(#[from] CredentialError),

    /// Token could not be issued
    #[error(transparent)]
    Token(#[from] JwtError),
}

impl SessionError {
    /// True for expected outcomes that are answered without a server error
    pub fn is_business_outcome(&self) -> bool {
        matches!(self, SessionError::Credentials(e) if e.is_business_outcome())
    }
}

#[derive(Debug, Clone, Copy)]
struct LiveSession {
    user_id: UserId,
    expires_at: i64,
}

/// Issues, resolves and revokes sessions
pub struct SessionAuthority {
    credentials: Arc<CredentialService>,
    secret: String,
    ttl: Duration,
    live: RwLock<HashMap<Uuid, LiveSession>>,
}

impl SessionAuthority {
    /// Creates an authority with an empty registry
    pub fn new(credentials: Arc<CredentialService>, secret: String, ttl: Duration) -> Self {
        Self {
            credentials,
            secret,
            ttl,
            live: RwLock::new(HashMap::new()),
        }
    }

    /// Session lifetime
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Verifies credentials and opens a new session
    ///
    /// Any session the caller already held (`prior`) is revoked first. On
    /// failure nothing changes, including the prior session.
    pub async fn login(
        &self,
        prior: Option<&str>,
        username: &str,
        password: &str,
    ) -> Result<SessionToken, SessionError> {
        let user = self.credentials.verify(username, password).await?;

        let session_id = Uuid::new_v4();
        let claims = SessionClaims::new(user.user_id, session_id, self.ttl)?;
        let token = jwt::create_token(&claims, &self.secret)?;

        let mut live = self.live.write().await;

        if let Some(prior_id) = prior.and_then(|t| self.session_id(t)) {
            live.remove(&prior_id);
        }

        let now = Utc::now().timestamp();
        live.retain(|_, session| session.expires_at > now);

        live.insert(
            session_id,
            LiveSession {
                user_id: user.user_id,
                expires_at: claims.exp,
            },
        );

        info!(user_id = user.user_id, session_id = %session_id, "Session opened");
        Ok(token)
    }

    /// Resolves a token to its user
    ///
    /// Absent, malformed, expired or revoked tokens all yield `None`; an
    /// anonymous visitor is a valid state, not an error.
    pub async fn current_user(&self, token: Option<&str>) -> Option<UserId> {
        let claims = match jwt::validate_token(token?, &self.secret) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(error = %e, "Ignoring invalid session token");
                return None;
            }
        };

        let live = self.live.read().await;
        live.get(&claims.sid)
            .filter(|session| session.user_id == claims.sub)
            .map(|session| session.user_id)
    }

    /// Ends the session behind `token`, if any
    ///
    /// Idempotent: unknown, expired or absent tokens are ignored.
    pub async fn logout(&self, token: Option<&str>) {
        let Some(session_id) = token.and_then(|t| self.session_id(t)) else {
            return;
        };

        if let Some(session) = self.live.write().await.remove(&session_id) {
            info!(user_id = session.user_id, session_id = %session_id, "Session closed");
        }
    }

    /// Number of sessions in the registry
    pub async fn live_sessions(&self) -> usize {
        self.live.read().await.len()
    }

    fn session_id(&self, token: &str) -> Option<Uuid> {
        jwt::validate_token(token, &self.secret)
            .ok()
            .map(|claims| claims.sid)
    }
}
