/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use kanban_api::{app::{build_router, AppState}, config::Config};
/// use kanban_shared::store::MemoryStore;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(MemoryStore::new()), config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::{security::SecurityHeadersLayer, session::session_layer},
    routes,
};
use axum::{
    routing::{get, post},
    Router,
};
use kanban_shared::{
    auth::{credentials::CredentialService, session::SessionAuthority},
    board::TaskBoard,
    store::{Storage, TaskStore, UserStore},
};
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Every field is behind an `Arc`, so clones are cheap.
#[derive(Clone)]
pub struct AppState {
    /// Registration and credential checks
    pub credentials: Arc<CredentialService>,

    /// Task operations
    pub board: TaskBoard,

    /// Live sessions
    pub sessions: Arc<SessionAuthority>,

    /// Storage engine, for health checks
    pub storage: Arc<dyn Storage>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates application state over one storage engine
    ///
    /// The session registry starts empty.
    pub fn new<S>(store: Arc<S>, config: Config) -> Self
    where
        S: Storage + 'static,
    {
        let users: Arc<dyn UserStore> = store.clone();
        let tasks: Arc<dyn TaskStore> = store.clone();

        let credentials = Arc::new(CredentialService::new(users));
        let sessions = Arc::new(SessionAuthority::new(
            credentials.clone(),
            config.session.secret.clone(),
            config.session_ttl(),
        ));

        Self {
            credentials,
            board: TaskBoard::new(tasks),
            sessions,
            storage: store,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// GET  /                   # Board page
/// POST /register           # Create account
/// POST /login              # Open session
/// GET  /logout             # Close session
/// POST /add                # Create task
/// GET  /updater/:task_id   # Move task right
/// GET  /updatel/:task_id   # Move task left
/// GET  /delete/:task_id    # Delete task
/// GET  /health             # Health check (JSON)
/// ```
///
/// # Middleware Stack
///
/// Outermost first:
/// 1. Security headers
/// 2. Request tracing (tower-http TraceLayer)
/// 3. Session resolution ([`session_layer`])
pub fn build_router(state: AppState) -> Router {
    let board_routes = Router::new()
        .route("/", get(routes::board::home))
        .route("/add", post(routes::tasks::add_task))
        .route("/updater/:task_id", get(routes::tasks::move_right))
        .route("/updatel/:task_id", get(routes::tasks::move_left))
        .route("/delete/:task_id", get(routes::tasks::delete_task));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", get(routes::auth::logout));

    Router::new()
        .merge(board_routes)
        .merge(auth_routes)
        .route("/health", get(routes::health::health_check))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_layer,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}
