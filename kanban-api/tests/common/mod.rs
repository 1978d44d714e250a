/// Common test utilities for router tests
///
/// Builds the full router over the in-memory store, so these tests need no
/// database. Requests go through `tower::ServiceExt::oneshot`.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use kanban_api::app::{build_router, AppState};
use kanban_api::config::Config;
use kanban_shared::models::{Category, CreateTask, CreateUser, Task, TaskId, User, UserId};
use kanban_shared::store::{MemoryStore, Storage, StoreError, TaskStore, UserStore};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Test context containing the router and its state
pub struct TestContext {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
}

impl TestContext {
    /// Creates a context with an empty store and no sessions
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// Creates a context over the given store
    pub fn with_store<S: Storage + 'static>(store: Arc<S>) -> Self {
        let config = Config::from_lookup(|key| match key {
            "SESSION_SECRET" => Some(TEST_SECRET.to_string()),
            _ => None,
        })
        .expect("test config");

        let state = AppState::new(store, config.clone());
        let app = build_router(state.clone());

        Self { app, state, config }
    }

    /// Sends a GET request, with an optional `Cookie` header
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut request = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }

        self.send(request.body(Body::empty()).unwrap()).await
    }

    /// Sends a urlencoded form POST, with an optional `Cookie` header
    pub async fn post_form(&self, uri: &str, form: &str, cookie: Option<&str>) -> Response {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }

        self.send(request.body(Body::from(form.to_string())).unwrap())
            .await
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Registers an account
    pub async fn register(&self, name: &str, username: &str, password: &str) {
        let form = format!(
            "name={}&username={}&password={}",
            encode(name),
            encode(username),
            encode(password)
        );
        let response = self.post_form("/register", &form, None).await;
        assert_redirect_home(&response);
    }

    /// Logs in and returns the `Cookie` header value for the new session
    pub async fn login(&self, username: &str, password: &str) -> String {
        let form = format!("username={}&password={}", encode(username), encode(password));
        let response = self.post_form("/login", &form, None).await;
        assert_redirect_home(&response);

        session_cookie(&response).expect("login should set a session cookie")
    }

    /// Registers an account and logs it in
    pub async fn sign_up(&self, name: &str, username: &str, password: &str) -> String {
        self.register(name, username, password).await;
        self.login(username, password).await
    }

    /// Adds a task through the form route
    pub async fn add_task(&self, cookie: &str, title: &str, category: &str) -> Response {
        let form = format!(
            "title={}&description=desc&category={}",
            encode(title),
            encode(category)
        );
        self.post_form("/add", &form, Some(cookie)).await
    }

    /// Renders the board page
    pub async fn board_page(&self, cookie: Option<&str>) -> String {
        let response = self.get("/", cookie).await;
        assert_eq!(response.status(), StatusCode::OK);
        body_string(response).await
    }
}

/// Minimal form encoding for test values
pub fn encode(value: &str) -> String {
    value.replace('%', "%25").replace('&', "%26").replace(' ', "+")
}

/// `name=value` pair from a `Set-Cookie` header, if it carries a token
pub fn session_cookie(response: &Response) -> Option<String> {
    let header = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    let pair = header.split(';').next()?.trim();

    match pair.split_once('=') {
        Some((_, value)) if !value.is_empty() => Some(pair.to_string()),
        _ => None,
    }
}

pub fn assert_redirect_home(response: &Response) {
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
}

pub async fn body_string(response: Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

/// Task IDs shown in one lane of a rendered board page
pub fn lane_task_ids(page: &str, category: &str) -> Vec<i64> {
    let marker = format!("data-category=\"{}\"", category);
    let Some(start) = page.find(&marker) else {
        return Vec::new();
    };
    let lane = &page[start..];
    let lane = &lane[..lane.find("</section>").unwrap_or(lane.len())];

    lane.split("data-task-id=\"")
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .filter_map(|id| id.parse().ok())
        .collect()
}

/// In-memory store that can be switched into a failing state
///
/// Lets a test set up users, sessions and tasks while healthy, then observe
/// how the routes answer once every storage call errors.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    failing: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Database("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for FlakyStore {
    async fn insert_user(&self, data: CreateUser) -> Result<User, StoreError> {
        self.check()?;
        self.inner.insert_user(data).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        self.check()?;
        self.inner.find_user_by_username(username).await
    }

    async fn find_user_by_id(&self, user_id: UserId) -> Result<Option<User>, StoreError> {
        self.check()?;
        self.inner.find_user_by_id(user_id).await
    }
}

#[async_trait]
impl TaskStore for FlakyStore {
    async fn insert_task(&self, data: CreateTask) -> Result<Task, StoreError> {
        self.check()?;
        self.inner.insert_task(data).await
    }

    async fn find_task(&self, id: TaskId) -> Result<Option<Task>, StoreError> {
        self.check()?;
        self.inner.find_task(id).await
    }

    async fn update_category(
        &self,
        id: TaskId,
        category: Category,
    ) -> Result<Option<Task>, StoreError> {
        self.check()?;
        self.inner.update_category(id, category).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<bool, StoreError> {
        self.check()?;
        self.inner.delete_task(id).await
    }

    async fn list_tasks(&self, owner: UserId, category: Category) -> Result<Vec<Task>, StoreError> {
        self.check()?;
        self.inner.list_tasks(owner, category).await
    }
}

#[async_trait]
impl Storage for FlakyStore {
    fn engine(&self) -> &'static str {
        "flaky"
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }
}
