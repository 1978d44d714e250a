/// Router tests for the board server
///
/// These drive the complete router (session middleware, handlers, view)
/// over the in-memory store:
/// - Anonymous board page
/// - Registration and login, including rejected attempts
/// - Task creation, lane moves and deletion
/// - Ownership isolation between users
/// - Logout and session revocation
/// - Error responses when the store fails

mod common;

use axum::http::{header, StatusCode};
use common::{
    assert_redirect_home, body_string, lane_task_ids, session_cookie, FlakyStore, TestContext,
};
use kanban_shared::models::Category;
use std::sync::Arc;

#[tokio::test]
async fn test_anonymous_home_renders_empty_board() {
    let ctx = TestContext::new();

    let response = ctx.get("/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    assert!(response.headers().get("Content-Security-Policy").is_some());

    let page = body_string(response).await;
    assert_eq!(page.matches("data-count=\"0\"").count(), 3);
    assert!(page.contains("<span class=\"display-name\"></span>"));
}

#[tokio::test]
async fn test_register_then_login_shows_name() {
    let ctx = TestContext::new();

    let cookie = ctx.sign_up("John Doe", "johndoe", "secret123").await;
    assert!(cookie.starts_with("kanban_session="));

    let page = ctx.board_page(Some(&cookie)).await;
    assert!(page.contains("<span class=\"display-name\">John Doe</span>"));
    assert!(page.contains("action=\"/add\""));
}

#[tokio::test]
async fn test_wrong_password_redirects_without_session() {
    let ctx = TestContext::new();
    ctx.register("John Doe", "johndoe", "secret123").await;

    let response = ctx
        .post_form("/login", "username=johndoe&password=wrong", None)
        .await;

    assert_redirect_home(&response);
    assert!(session_cookie(&response).is_none());
}

#[tokio::test]
async fn test_unknown_user_login_redirects_without_session() {
    let ctx = TestContext::new();

    let response = ctx
        .post_form("/login", "username=nobody&password=secret123", None)
        .await;

    assert_redirect_home(&response);
    assert!(session_cookie(&response).is_none());
}

#[tokio::test]
async fn test_failed_login_keeps_existing_session() {
    let ctx = TestContext::new();
    let cookie = ctx.sign_up("John Doe", "johndoe", "secret123").await;

    let response = ctx
        .post_form("/login", "username=johndoe&password=wrong", Some(&cookie))
        .await;
    assert_redirect_home(&response);

    let page = ctx.board_page(Some(&cookie)).await;
    assert!(page.contains(">John Doe</span>"));
}

#[tokio::test]
async fn test_register_with_missing_field_creates_nothing() {
    let ctx = TestContext::new();

    let response = ctx
        .post_form("/register", "name=John+Doe&username=johndoe", None)
        .await;
    assert_redirect_home(&response);

    let response = ctx
        .post_form("/login", "username=johndoe&password=", None)
        .await;
    assert!(session_cookie(&response).is_none());
}

#[tokio::test]
async fn test_duplicate_registration_keeps_first_account() {
    let ctx = TestContext::new();
    ctx.register("John Doe", "johndoe", "secret123").await;
    ctx.register("Impostor", "johndoe", "other").await;

    let cookie = ctx.login("johndoe", "secret123").await;
    let page = ctx.board_page(Some(&cookie)).await;
    assert!(page.contains(">John Doe</span>"));

    let response = ctx
        .post_form("/login", "username=johndoe&password=other", None)
        .await;
    assert!(session_cookie(&response).is_none());
}

#[tokio::test]
async fn test_add_task_into_any_lane() {
    let ctx = TestContext::new();
    let cookie = ctx.sign_up("John Doe", "johndoe", "secret123").await;

    assert_redirect_home(&ctx.add_task(&cookie, "first", "to_do").await);
    assert_redirect_home(&ctx.add_task(&cookie, "second", "In Progress").await);
    assert_redirect_home(&ctx.add_task(&cookie, "third", "done").await);

    let page = ctx.board_page(Some(&cookie)).await;
    assert!(page.contains("data-category=\"to_do\" data-count=\"1\""));
    assert!(page.contains("data-category=\"in_progress\" data-count=\"1\""));
    assert!(page.contains("data-category=\"done\" data-count=\"1\""));
    assert!(page.contains("<h3>second</h3>"));
}

#[tokio::test]
async fn test_add_task_requires_session() {
    let ctx = TestContext::new();

    let response = ctx
        .post_form("/add", "title=t&description=d&category=to_do", None)
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(body_string(response).await, "Log in to add tasks");
}

#[tokio::test]
async fn test_add_task_rejects_bad_category() {
    let ctx = TestContext::new();
    let cookie = ctx.sign_up("John Doe", "johndoe", "secret123").await;

    let response = ctx.add_task(&cookie, "t", "someday").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ctx
        .post_form("/add", "title=t&description=d", Some(&cookie))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let page = ctx.board_page(Some(&cookie)).await;
    assert_eq!(page.matches("data-count=\"0\"").count(), 3);
}

#[tokio::test]
async fn test_move_right_cycles_through_lanes() {
    let ctx = TestContext::new();
    let cookie = ctx.sign_up("John Doe", "johndoe", "secret123").await;
    ctx.add_task(&cookie, "t", "to_do").await;

    let page = ctx.board_page(Some(&cookie)).await;
    let id = lane_task_ids(&page, Category::ToDo.as_str())[0];

    for expected in [Category::InProgress, Category::Done, Category::ToDo] {
        let response = ctx.get(&format!("/updater/{}", id), Some(&cookie)).await;
        assert_redirect_home(&response);

        let page = ctx.board_page(Some(&cookie)).await;
        assert_eq!(lane_task_ids(&page, expected.as_str()), vec![id]);
    }
}

#[tokio::test]
async fn test_move_left_then_right_is_noop() {
    let ctx = TestContext::new();
    let cookie = ctx.sign_up("John Doe", "johndoe", "secret123").await;
    ctx.add_task(&cookie, "t", "in_progress").await;

    let page = ctx.board_page(Some(&cookie)).await;
    let id = lane_task_ids(&page, "in_progress")[0];

    ctx.get(&format!("/updatel/{}", id), Some(&cookie)).await;
    let page = ctx.board_page(Some(&cookie)).await;
    assert_eq!(lane_task_ids(&page, "to_do"), vec![id]);

    ctx.get(&format!("/updater/{}", id), Some(&cookie)).await;
    let page = ctx.board_page(Some(&cookie)).await;
    assert_eq!(lane_task_ids(&page, "in_progress"), vec![id]);
}

#[tokio::test]
async fn test_delete_removes_task() {
    let ctx = TestContext::new();
    let cookie = ctx.sign_up("John Doe", "johndoe", "secret123").await;
    ctx.add_task(&cookie, "t", "to_do").await;

    let page = ctx.board_page(Some(&cookie)).await;
    let id = lane_task_ids(&page, "to_do")[0];

    let response = ctx.get(&format!("/delete/{}", id), Some(&cookie)).await;
    assert_redirect_home(&response);

    let page = ctx.board_page(Some(&cookie)).await;
    assert_eq!(page.matches("data-count=\"0\"").count(), 3);

    // Acting on the deleted task again is a quiet no-op
    let response = ctx.get(&format!("/updater/{}", id), Some(&cookie)).await;
    assert_redirect_home(&response);
}

#[tokio::test]
async fn test_unknown_task_id_redirects_without_change() {
    let ctx = TestContext::new();
    let cookie = ctx.sign_up("John Doe", "johndoe", "secret123").await;
    ctx.add_task(&cookie, "t", "to_do").await;
    let before = ctx.board_page(Some(&cookie)).await;

    for uri in ["/updater/9999", "/updatel/9999", "/delete/9999"] {
        assert_redirect_home(&ctx.get(uri, Some(&cookie)).await);
    }

    assert_eq!(ctx.board_page(Some(&cookie)).await, before);
}

#[tokio::test]
async fn test_other_users_tasks_are_untouchable() {
    let ctx = TestContext::new();
    let alice = ctx.sign_up("Alice", "alice", "secret123").await;
    let bob = ctx.sign_up("Bob", "bob", "hunter22").await;

    ctx.add_task(&alice, "alice's task", "to_do").await;
    let alice_page = ctx.board_page(Some(&alice)).await;
    let id = lane_task_ids(&alice_page, "to_do")[0];

    // Bob sees none of Alice's tasks
    let bob_page = ctx.board_page(Some(&bob)).await;
    assert_eq!(bob_page.matches("data-count=\"0\"").count(), 3);

    for uri in [
        format!("/updater/{}", id),
        format!("/updatel/{}", id),
        format!("/delete/{}", id),
    ] {
        assert_redirect_home(&ctx.get(&uri, Some(&bob)).await);
    }

    assert_eq!(ctx.board_page(Some(&alice)).await, alice_page);
}

#[tokio::test]
async fn test_anonymous_task_requests_change_nothing() {
    let ctx = TestContext::new();
    let cookie = ctx.sign_up("John Doe", "johndoe", "secret123").await;
    ctx.add_task(&cookie, "t", "to_do").await;
    let before = ctx.board_page(Some(&cookie)).await;
    let id = lane_task_ids(&before, "to_do")[0];

    assert_redirect_home(&ctx.get(&format!("/updater/{}", id), None).await);
    assert_redirect_home(&ctx.get(&format!("/delete/{}", id), None).await);

    assert_eq!(ctx.board_page(Some(&cookie)).await, before);
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let ctx = TestContext::new();
    let cookie = ctx.sign_up("John Doe", "johndoe", "secret123").await;

    let response = ctx.get("/logout", Some(&cookie)).await;
    assert_redirect_home(&response);
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(set_cookie.contains("Max-Age=0"));

    // The old token no longer resolves, even though the client kept it
    let page = ctx.board_page(Some(&cookie)).await;
    assert!(page.contains("<span class=\"display-name\"></span>"));
    assert_eq!(ctx.state.sessions.live_sessions().await, 0);

    // Logging out again is harmless
    assert_redirect_home(&ctx.get("/logout", Some(&cookie)).await);
    assert_redirect_home(&ctx.get("/logout", None).await);
}

#[tokio::test]
async fn test_relogin_replaces_prior_session() {
    let ctx = TestContext::new();
    let first = ctx.sign_up("John Doe", "johndoe", "secret123").await;

    let response = ctx
        .post_form("/login", "username=johndoe&password=secret123", Some(&first))
        .await;
    let second = session_cookie(&response).unwrap();

    assert!(ctx.board_page(Some(&first)).await.contains("display-name\"></span>"));
    assert!(ctx.board_page(Some(&second)).await.contains(">John Doe</span>"));
}

#[tokio::test]
async fn test_bearer_token_is_accepted() {
    let ctx = TestContext::new();
    let cookie = ctx.sign_up("John Doe", "johndoe", "secret123").await;
    let token = cookie.trim_start_matches("kanban_session=");

    let request = axum::http::Request::builder()
        .uri("/")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(ctx.app.clone(), request)
        .await
        .unwrap();

    let page = body_string(response).await;
    assert!(page.contains(">John Doe</span>"));
}

#[tokio::test]
async fn test_quoted_session_cookie_is_accepted() {
    let ctx = TestContext::new();
    let cookie = ctx.sign_up("John Doe", "johndoe", "secret123").await;
    let token = cookie.trim_start_matches("kanban_session=");

    let quoted = format!("theme=dark; kanban_session=\"{}\"", token);
    let page = ctx.board_page(Some(&quoted)).await;

    assert!(page.contains(">John Doe</span>"));
}

#[tokio::test]
async fn test_storage_faults_answer_internal_error() {
    let store = Arc::new(FlakyStore::new());
    let ctx = TestContext::with_store(store.clone());
    let cookie = ctx.sign_up("John Doe", "johndoe", "secret123").await;
    assert_redirect_home(&ctx.add_task(&cookie, "t", "to_do").await);
    let task_id = lane_task_ids(&ctx.board_page(Some(&cookie)).await, "to_do")[0];

    store.fail();

    let response = ctx
        .post_form("/register", "name=Jane&username=jane&password=pw", None)
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_string(response).await, "An internal error occurred");

    let response = ctx.add_task(&cookie, "t2", "done").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = ctx.get(&format!("/updater/{}", task_id), Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = ctx.get(&format!("/delete/{}", task_id), Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = ctx
        .post_form("/login", "username=johndoe&password=secret123", None)
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let response = ctx.get("/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = ctx.get("/health", None).await;
    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["storage"], "disconnected");
}

#[tokio::test]
async fn test_health_reports_memory_engine() {
    let ctx = TestContext::new();

    let response = ctx.get("/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["engine"], "memory");
    assert_eq!(body["storage"], "connected");
    assert_eq!(ctx.config.session.cookie_name, "kanban_session");
}
