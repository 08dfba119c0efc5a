//! Integration tests for identity resolution across ingress formats.

use serde_json::json;

use campus_core::traits::local_store::write_json;
use campus_entity::notification::NotificationType;
use campus_realtime::FeedSubscriber;
use campus_service::SessionUser;
use campus_service::identity::resolver::IdentitySource;
use campus_store::keys;

use super::helpers::TestApp;

#[tokio::test]
async fn test_bare_user_id_resolves_as_string() {
    let app = TestApp::new();
    app.ctx.local().set(keys::USER_ID, "42").await.expect("local write");

    let (key, source) = app
        .ctx
        .identity()
        .resolve_with_source()
        .await
        .expect("identity");
    assert_eq!(key.as_str(), "42");
    assert_eq!(source, IdentitySource::StoredUserId);
}

#[tokio::test]
async fn test_numeric_stored_user_is_normalized_and_remembered() {
    let app = TestApp::new();
    write_json(app.ctx.local().as_ref(), keys::USER, &json!({"id": 42, "email": "a@b.c"}))
        .await
        .expect("local write");

    let key = app.ctx.identity().resolve().await.expect("identity");
    assert_eq!(key.as_str(), "42");
    assert_eq!(
        app.ctx.local().get(keys::USER_ID).await.expect("local read"),
        Some("42".to_string())
    );
    assert_eq!(app.ctx.identity().email().await.as_deref(), Some("a@b.c"));
}

#[tokio::test]
async fn test_session_user_wins_over_stored_values() {
    let app = TestApp::new();
    app.ctx.local().set(keys::USER_ID, "7").await.expect("local write");
    app.ctx.sign_in(SessionUser::new(42, Some("a@b.c")));

    let (key, source) = app
        .ctx
        .identity()
        .resolve_with_source()
        .await
        .expect("identity");
    assert_eq!(key.as_str(), "42");
    assert_eq!(source, IdentitySource::Session);

    app.ctx.sign_out();
    // The session id was written back, so it survives sign-out.
    assert_eq!(
        app.ctx.identity().resolve().await.map(|k| k.to_string()),
        Some("42".to_string())
    );
}

#[tokio::test]
async fn test_no_identity_disables_feed() {
    let app = TestApp::new();
    assert!(app.ctx.identity().resolve().await.is_none());

    let mut feed = FeedSubscriber::new(app.ctx.clone());
    assert!(feed.follow_identity().await.is_none());
    assert!(feed.current().is_none());
}

#[tokio::test]
async fn test_number_and_string_ingress_reach_the_same_feed() {
    let app = TestApp::new();

    // The sender learned the recipient id as a JSON number.
    let sender = app.other_installation();
    sender.sign_in(SessionUser::new(42, None));
    let recipient = sender.identity().resolve().await.expect("identity");
    sender
        .emitter()
        .emit(&recipient, "Hello", "Welcome", NotificationType::Info)
        .await
        .expect("emit");

    // The recipient's installation only has the bare string.
    app.ctx.local().set(keys::USER_ID, "42").await.expect("local write");
    let me = app.ctx.identity().resolve().await.expect("identity");
    let snapshot = FeedSubscriber::snapshot(&app.ctx, &me).await.expect("snapshot");
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.unread_count, 1);
    assert_eq!(snapshot.items[0].notification.title, "Hello");
}
