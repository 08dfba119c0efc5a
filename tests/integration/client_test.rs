//! Integration tests for the REST backend client against a local server.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use axum::Json;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use serde_json::{Value, json};

use campus_client::ApiClient;
use campus_core::config::AppConfig;
use campus_core::error::ErrorKind;
use campus_core::types::UserKey;
use campus_store::keys;

use super::helpers::TestApp;

const TOKEN: &str = "secret-token";
const SUSPENDED: &str = "suspended-token";

#[derive(Clone, Default)]
struct Backend {
    event_calls: Arc<AtomicU32>,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["password"] == "correct" {
        (StatusCode::OK, Json(json!({"token": TOKEN})))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"message": "Invalid credentials"})))
    }
}

async fn me(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let suspended = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {SUSPENDED}"));
    if suspended {
        return (StatusCode::FORBIDDEN, Json(json!({"message": "Account suspended"})));
    }
    if authorized(&headers) {
        (StatusCode::OK, Json(json!({"id": 42, "email": "a@b.c", "firstName": "Ada"})))
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({"message": "Expired JWT Token"})))
    }
}

async fn user_events(
    State(backend): State<Backend>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    let call = backend.event_calls.fetch_add(1, Ordering::SeqCst);
    if call < 2 {
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({})));
    }
    let user = params.get("userId").cloned().unwrap_or_default();
    (
        StatusCode::OK,
        Json(json!([
            {"id": 1, "title": format!("Lecture for {user}"), "start": "2025-01-06T09:00:00"},
            "not an event",
        ])),
    )
}

async fn formations() -> Json<Value> {
    Json(json!({"hydra:member": [{"id": 1, "title": "Computer Science"}]}))
}

async fn specializations() -> Json<Value> {
    Json(json!({"unexpected": true}))
}

async fn users() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn spawn_backend(backend: Backend) -> SocketAddr {
    let router = Router::new()
        .route("/api/login_check", post(login))
        .route("/api/me", get(me))
        .route("/api/get-user-events", get(user_events))
        .route("/api/formations", get(formations))
        .route("/api/specializations", get(specializations))
        .route("/api/users", get(users))
        .with_state(backend);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    addr
}

async fn setup() -> (TestApp, ApiClient, Backend) {
    let backend = Backend::default();
    let addr = spawn_backend(backend.clone()).await;

    let mut config = AppConfig::default();
    config.client.base_url = format!("http://{addr}/api");
    config.client.retry_base_delay_ms = 10;
    config.client.timeout_seconds = 5;
    let app = TestApp::with_config(config);
    let client = ApiClient::new(app.ctx.clone()).expect("client");
    (app, client, backend)
}

#[tokio::test]
async fn test_login_then_profile_sets_identity() {
    let (app, client, _) = setup().await;

    client.login("a@b.c", "correct").await.expect("login");
    assert_eq!(
        app.ctx.local().get(keys::TOKEN).await.expect("local read"),
        Some(TOKEN.to_string())
    );

    let user = client.me().await.expect("profile");
    assert_eq!(user.id, json!(42));
    assert_eq!(user.email.as_deref(), Some("a@b.c"));

    let key = app.ctx.identity().resolve().await.expect("identity");
    assert_eq!(key.as_str(), "42");
    assert_eq!(
        app.ctx.local().get(keys::USER_ID).await.expect("local read"),
        Some("42".to_string())
    );
}

#[tokio::test]
async fn test_bad_credentials_are_an_auth_error() {
    let (_, client, _) = setup().await;
    let err = client.login("a@b.c", "wrong").await.expect_err("login should fail");
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert!(client.token().await.is_none());
}

#[tokio::test]
async fn test_rejected_token_is_cleared() {
    let (app, client, _) = setup().await;
    app.ctx.local().set(keys::TOKEN, "stale").await.expect("local write");

    let err = client.me().await.expect_err("profile should fail");
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert!(client.token().await.is_none());
    assert_eq!(app.ctx.local().get(keys::TOKEN).await.expect("local read"), None);
}

#[tokio::test]
async fn test_forbidden_profile_keeps_token() {
    let (app, client, _) = setup().await;
    app.ctx.local().set(keys::TOKEN, SUSPENDED).await.expect("local write");

    let err = client.me().await.expect_err("profile should fail");
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert_eq!(client.token().await.as_deref(), Some(SUSPENDED));
    assert_eq!(
        app.ctx.local().get(keys::TOKEN).await.expect("local read"),
        Some(SUSPENDED.to_string())
    );
}

#[tokio::test]
async fn test_user_events_retry_server_errors() {
    let (_, client, backend) = setup().await;
    client.login("a@b.c", "correct").await.expect("login");

    let user = UserKey::parse("42").expect("valid user key");
    let events = client.user_events(&user).await.expect("events");

    assert_eq!(backend.event_calls.load(Ordering::SeqCst), 3);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].title, "Lecture for 42");
}

#[tokio::test]
async fn test_list_endpoints_degrade_to_empty() {
    let (_, client, _) = setup().await;

    let formations = client.formations().await;
    assert_eq!(formations.len(), 1);
    assert_eq!(formations[0].name, "Computer Science");

    assert!(client.specializations().await.is_empty());
    assert!(client.users().await.is_empty());
}
