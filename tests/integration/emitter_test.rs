//! Integration tests for notification emission.

use chrono::Duration;
use serde_json::json;

use campus_core::config::AppConfig;
use campus_core::types::UserKey;
use campus_entity::notification::{Notification, NotificationType};
use campus_service::EmitOutcome;
use campus_store::keys;

use super::helpers::TestApp;

fn recipient() -> UserKey {
    UserKey::parse("42").expect("valid user key")
}

#[tokio::test]
async fn test_duplicate_inside_window_is_suppressed() {
    let app = TestApp::new();
    let emitter = app.ctx.emitter();

    let first = emitter
        .emit(&recipient(), "Role changed", "You are now an admin", NotificationType::RoleUpdate)
        .await
        .expect("emit");
    let EmitOutcome::Created(first_id) = first else {
        panic!("first emit should create, got {first:?}");
    };

    app.clock.advance(Duration::minutes(4));
    let second = emitter
        .emit(&recipient(), "Role changed", "You are now an admin", NotificationType::RoleUpdate)
        .await
        .expect("emit");
    assert_eq!(second, EmitOutcome::Duplicate(first_id));
    assert_eq!(app.notifications().await.len(), 1);
}

#[tokio::test]
async fn test_duplicate_after_window_is_created() {
    let app = TestApp::new();
    let emitter = app.ctx.emitter();

    emitter
        .emit(&recipient(), "Role changed", "You are now an admin", NotificationType::RoleUpdate)
        .await
        .expect("emit");
    app.clock.advance(Duration::minutes(5));
    let again = emitter
        .emit(&recipient(), "Role changed", "You are now an admin", NotificationType::RoleUpdate)
        .await
        .expect("emit");

    assert!(again.is_created());
    assert_eq!(app.notifications().await.len(), 2);
}

#[tokio::test]
async fn test_different_message_is_not_a_duplicate() {
    let app = TestApp::new();
    let emitter = app.ctx.emitter();

    for message in ["report.pdf was uploaded", "notes.pdf was uploaded"] {
        let outcome = emitter
            .emit(&recipient(), "New document", message, NotificationType::DocumentUploaded)
            .await
            .expect("emit");
        assert!(outcome.is_created());
    }
    assert_eq!(app.notifications().await.len(), 2);
}

#[tokio::test]
async fn test_critical_type_bypasses_disabled_preferences() {
    let app = TestApp::new();
    let mut disabled = json!({"userId": "42"});
    for kind in NotificationType::TOGGLEABLE {
        disabled[kind.as_str()] = json!(false);
    }
    app.put(keys::NOTIFICATION_PREFERENCES, "42", disabled).await;
    let emitter = app.ctx.emitter();

    let blocked = emitter
        .emit(&recipient(), "Hi", "Info message", NotificationType::Info)
        .await
        .expect("emit");
    assert_eq!(blocked, EmitOutcome::DisabledByPreference);

    let system = emitter
        .emit(&recipient(), "Maintenance", "Downtime tonight", NotificationType::System)
        .await
        .expect("emit");
    assert!(system.is_created());
    assert_eq!(app.notifications().await.len(), 1);
}

#[tokio::test]
async fn test_configured_critical_type_bypasses_disabled_preference() {
    let mut config = AppConfig::default();
    config.notifications.critical_categories = vec!["SYSTEM".into(), "ROLE_UPDATE".into()];
    let app = TestApp::with_config(config);
    app.put(
        keys::NOTIFICATION_PREFERENCES,
        "42",
        json!({"userId": "42", "ROLE_UPDATE": false, "CHAT_MESSAGE": false}),
    )
    .await;
    let emitter = app.ctx.emitter();

    let role = emitter
        .emit(&recipient(), "Role changed", "You are now an admin", NotificationType::RoleUpdate)
        .await
        .expect("emit");
    assert!(role.is_created());

    let chat = emitter
        .emit(&recipient(), "Chat", "New message", NotificationType::ChatMessage)
        .await
        .expect("emit");
    assert_eq!(chat, EmitOutcome::DisabledByPreference);
    assert_eq!(app.notifications().await.len(), 1);
}

#[tokio::test]
async fn test_emit_initializes_missing_preferences() {
    let app = TestApp::new();
    app.ctx
        .emitter()
        .emit(&recipient(), "Hello", "Welcome", NotificationType::ChatMessage)
        .await
        .expect("emit");

    let docs = app.preference_documents().await;
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].key, "42");
}

#[tokio::test]
async fn test_stored_record_shape() {
    let app = TestApp::new();
    let outcome = app
        .ctx
        .emitter()
        .emit(&recipient(), "Mention", "You were mentioned", NotificationType::ChatMention)
        .await
        .expect("emit");
    assert!(outcome.is_created());

    let stored = app.notifications().await;
    let doc = &stored[0];
    assert_eq!(doc.data.get("recipientId"), Some(&json!("42")));
    assert_eq!(doc.data.get("read"), Some(&json!(false)));
    assert_eq!(
        doc.data.get("timestamp"),
        Some(&json!(app.now().timestamp_millis()))
    );

    let notification = Notification::from_stored(doc).expect("decode");
    assert_eq!(notification.kind, NotificationType::ChatMention);
    assert_eq!(notification.recipient_id, recipient());
}
