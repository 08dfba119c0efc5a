//! Integration tests for notification preferences.

use serde_json::{Value, json};

use campus_core::traits::DocumentStore;
use campus_core::types::UserKey;
use campus_entity::notification::NotificationType;
use campus_entity::notification::preference::fields;
use campus_service::EmitOutcome;
use campus_store::keys;

use super::helpers::TestApp;

fn user(raw: &str) -> UserKey {
    UserKey::parse(raw).expect("valid user key")
}

#[tokio::test]
async fn test_toggle_is_visible_immediately() {
    let app = TestApp::new();
    let prefs = app.ctx.preferences();
    let me = user("42");

    prefs
        .set(Some(&me), NotificationType::DocumentUploaded, false)
        .await
        .expect("set preference");
    assert!(!prefs.get(&me, NotificationType::DocumentUploaded).await);

    // Another installation sees the same remote value.
    let other = app.other_installation();
    assert!(!other.preferences().get(&me, NotificationType::DocumentUploaded).await);

    prefs
        .set(Some(&me), NotificationType::DocumentUploaded, true)
        .await
        .expect("set preference");
    assert!(prefs.get(&me, NotificationType::DocumentUploaded).await);
}

#[tokio::test]
async fn test_disabled_category_blocks_and_missing_category_allows() {
    let app = TestApp::new();
    app.put(
        keys::NOTIFICATION_PREFERENCES,
        "42",
        json!({"userId": "42", "DOCUMENT_UPLOADED": false}),
    )
    .await;
    let me = user("42");
    let emitter = app.ctx.emitter();

    let blocked = emitter
        .emit(&me, "Upload", "A file was uploaded", NotificationType::DocumentUploaded)
        .await
        .expect("emit");
    assert_eq!(blocked, EmitOutcome::DisabledByPreference);

    assert!(app.ctx.preferences().get(&me, NotificationType::DocumentDeleted).await);
    let created = emitter
        .emit(&me, "Deleted", "A file was deleted", NotificationType::DocumentDeleted)
        .await
        .expect("emit");
    assert!(created.is_created());

    let stored = app.notifications().await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].data.get("type"), Some(&json!("DOCUMENT_DELETED")));
}

#[tokio::test]
async fn test_numeric_owner_under_canonical_key_is_reused() {
    let app = TestApp::new();
    app.put(
        keys::NOTIFICATION_PREFERENCES,
        "42",
        json!({"userId": 42, "CHAT_MESSAGE": false}),
    )
    .await;

    let prefs = app
        .ctx
        .preferences()
        .initialize(&user("42"), Some("a@b.c"))
        .await
        .expect("initialize");

    assert_eq!(prefs.category(NotificationType::ChatMessage), Some(false));
    let docs = app.preference_documents().await;
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].data.get(fields::USER_ID), Some(&json!("42")));
    assert_eq!(docs[0].data.get(fields::EMAIL), Some(&json!("a@b.c")));
}

#[tokio::test]
async fn test_legacy_document_is_copied_to_canonical_key() {
    let app = TestApp::new();
    app.put(
        keys::NOTIFICATION_PREFERENCES,
        "legacy-doc",
        json!({"userId": 42, "ROLE_UPDATE": false}),
    )
    .await;
    let store = app.ctx.preferences();

    let prefs = store.initialize(&user("42"), None).await.expect("initialize");
    assert_eq!(prefs.category(NotificationType::RoleUpdate), Some(false));

    let canonical = store.load(&user("42")).await.expect("load").expect("canonical doc");
    assert_eq!(
        canonical.as_document().get(fields::MIGRATED_FROM),
        Some(&Value::String("legacy-doc".into()))
    );

    // The old document stays, and a second initialization adds nothing.
    store.initialize(&user("42"), None).await.expect("initialize");
    assert_eq!(app.preference_documents().await.len(), 2);
}

#[tokio::test]
async fn test_email_matches_legacy_document() {
    let app = TestApp::new();
    app.put(
        keys::NOTIFICATION_PREFERENCES,
        "by-email",
        json!({"email": "Someone@Campus.edu", "CHAT_MENTION": false}),
    )
    .await;

    let prefs = app
        .ctx
        .preferences()
        .initialize(&user("7"), Some("someone@campus.edu"))
        .await
        .expect("initialize");
    assert_eq!(prefs.category(NotificationType::ChatMention), Some(false));
}

#[tokio::test]
async fn test_local_cache_restores_missing_remote_document() {
    let app = TestApp::new();
    app.ctx
        .preferences()
        .set(Some(&user("9")), NotificationType::ChatGroupInvite, false)
        .await
        .expect("set");

    // The remote document disappears; the local mirror brings it back.
    let store = app.ctx.store().clone();
    store
        .delete(keys::NOTIFICATION_PREFERENCES, "9")
        .await
        .expect("delete");

    let prefs = app
        .ctx
        .preferences()
        .initialize(&user("9"), None)
        .await
        .expect("initialize");
    assert_eq!(prefs.category(NotificationType::ChatGroupInvite), Some(false));
    assert_eq!(
        prefs.as_document().get(fields::RESTORED_FROM_CACHE),
        Some(&Value::Bool(true))
    );
}

#[tokio::test]
async fn test_fresh_user_gets_all_enabled_defaults() {
    let app = TestApp::new();
    let prefs = app
        .ctx
        .preferences()
        .initialize(&user("100"), None)
        .await
        .expect("initialize");

    for kind in NotificationType::TOGGLEABLE {
        assert_eq!(prefs.category(kind), Some(true), "{kind} should default on");
    }
    let cached = app
        .ctx
        .local()
        .get(keys::NOTIFICATION_PREFERENCES_CACHE)
        .await
        .expect("local read");
    assert!(cached.is_some());
}

#[tokio::test]
async fn test_set_without_identity_fails() {
    let app = TestApp::new();
    let result = app
        .ctx
        .preferences()
        .set(None, NotificationType::Info, false)
        .await;
    assert!(matches!(
        result,
        Err(campus_service::PreferenceError::MissingIdentity)
    ));
}
