//! Integration tests for the live notification feed.

use std::time::Duration;

use serde_json::json;

use campus_core::types::UserKey;
use campus_entity::notification::{NotificationState, NotificationType};
use campus_realtime::{FeedHandle, FeedSnapshot, FeedSubscriber};
use campus_service::EmitOutcome;
use campus_store::keys;

use super::helpers::TestApp;

fn recipient() -> UserKey {
    UserKey::parse("42").expect("valid user key")
}

async fn next(handle: &mut FeedHandle) -> FeedSnapshot {
    tokio::time::timeout(Duration::from_secs(5), handle.changed())
        .await
        .expect("feed update in time")
        .expect("feed still open")
}

async fn emit(app: &TestApp, title: &str) -> String {
    match app
        .ctx
        .emitter()
        .emit(&recipient(), title, "body", NotificationType::Info)
        .await
        .expect("emit")
    {
        EmitOutcome::Created(id) => id,
        other => panic!("expected a created notification, got {other:?}"),
    }
}

#[tokio::test]
async fn test_feed_delivers_new_notifications_newest_first() {
    let app = TestApp::new();
    let mut feed = FeedSubscriber::new(app.ctx.clone());
    let handle = feed.ensure(Some(recipient())).expect("feed");

    let initial = handle.settled().await;
    assert!(initial.items.is_empty());
    assert!(!initial.loading);

    emit(&app, "First").await;
    let snapshot = next(handle).await;
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.unread_count, 1);

    app.clock.advance(chrono::Duration::seconds(1));
    emit(&app, "Second").await;
    let snapshot = next(handle).await;
    let titles: Vec<_> = snapshot
        .items
        .iter()
        .map(|i| i.notification.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Second", "First"]);
    assert_eq!(snapshot.unread_count, 2);
    assert_eq!(
        app.ctx
            .local()
            .get(keys::UNREAD_NOTIFICATION_COUNT)
            .await
            .expect("local read"),
        Some("2".to_string())
    );
}

#[tokio::test]
async fn test_feed_ignores_other_recipients() {
    let app = TestApp::new();
    let mut handle = FeedSubscriber::open(&app.ctx, recipient());
    handle.settled().await;

    let stranger = UserKey::parse("7").expect("valid user key");
    app.ctx
        .emitter()
        .emit(&stranger, "Not yours", "body", NotificationType::Info)
        .await
        .expect("emit");
    emit(&app, "Yours").await;

    let snapshot = next(&mut handle).await;
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.items[0].notification.title, "Yours");
}

#[tokio::test]
async fn test_mark_read_reaches_the_feed() {
    let app = TestApp::new();
    let id = emit(&app, "Read me").await;
    let mut handle = FeedSubscriber::open(&app.ctx, recipient());
    assert_eq!(handle.settled().await.unread_count, 1);

    let state = app
        .ctx
        .inbox()
        .mark_read(&recipient(), &id)
        .await
        .expect("mark read");
    assert_eq!(state, NotificationState::AcknowledgedRemote);

    let snapshot = next(&mut handle).await;
    assert_eq!(snapshot.unread_count, 0);
    assert!(snapshot.items[0].is_read());
}

#[tokio::test]
async fn test_seen_set_overrides_stale_remote_flag_after_resubscribe() {
    let app = TestApp::new();
    let id = emit(&app, "Seen").await;
    app.ctx
        .inbox()
        .mark_read(&recipient(), &id)
        .await
        .expect("mark read");

    // A lagging replica resurrects the unread flag.
    app.store_merge(&id, json!({"read": false})).await;

    let mut feed = FeedSubscriber::new(app.ctx.clone());
    feed.ensure(Some(recipient()));
    feed.close();
    let handle = feed.ensure(Some(recipient())).expect("feed");
    let snapshot = handle.settled().await;

    assert_eq!(snapshot.items.len(), 1);
    assert!(snapshot.items[0].is_read());
    assert_eq!(snapshot.items[0].state, NotificationState::AcknowledgedLocal);
    assert_eq!(snapshot.unread_count, 0);
}

#[tokio::test]
async fn test_mark_read_rejects_foreign_notification() {
    let app = TestApp::new();
    let id = emit(&app, "Private").await;
    let stranger = UserKey::parse("7").expect("valid user key");

    let result = app.ctx.inbox().mark_read(&stranger, &id).await;
    assert!(result.is_err());
    assert!(app.ctx.inbox().mark_read(&recipient(), "missing").await.is_err());
}

#[tokio::test]
async fn test_mark_all_read_clears_unread_count() {
    let app = TestApp::new();
    emit(&app, "One").await;
    emit(&app, "Two").await;

    let flipped = app
        .ctx
        .inbox()
        .mark_all_read(&recipient())
        .await
        .expect("mark all read");
    assert_eq!(flipped, 2);

    let snapshot = FeedSubscriber::snapshot(&app.ctx, &recipient())
        .await
        .expect("snapshot");
    assert_eq!(snapshot.unread_count, 0);
    assert!(snapshot.items.iter().all(|i| i.is_read()));
}

#[tokio::test]
async fn test_identity_change_replaces_feed() {
    let app = TestApp::new();
    let mut feed = FeedSubscriber::new(app.ctx.clone());

    feed.ensure(Some(recipient()));
    let other = UserKey::parse("7").expect("valid user key");
    let handle = feed.ensure(Some(other.clone())).expect("feed");
    assert_eq!(handle.recipient(), &other);

    assert!(feed.ensure(None).is_none());
    assert!(feed.current().is_none());
}
