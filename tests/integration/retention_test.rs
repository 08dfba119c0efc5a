//! Integration tests for the retention sweep.

use chrono::Duration;

use campus_core::config::AppConfig;
use campus_core::types::UserKey;
use campus_worker::{RetentionSweeper, SweepStatus};

use super::helpers::TestApp;

fn recipient() -> UserKey {
    UserKey::parse("42").expect("valid user key")
}

/// 25 read notifications past retention, 3 unread ones just as old, one
/// read at exactly the limit and one read yesterday.
async fn seed(app: &TestApp) {
    let now = app.now();
    for i in 0..25 {
        let at = now - Duration::days(31) - Duration::minutes(i);
        app.put_notification(&format!("old-read-{i:02}"), "42", true, at).await;
    }
    for i in 0..3 {
        let at = now - Duration::days(90) - Duration::minutes(i);
        app.put_notification(&format!("old-unread-{i}"), "42", false, at).await;
    }
    app.put_notification("limit-read", "42", true, now - Duration::days(30)).await;
    app.put_notification("fresh-read", "42", true, now - Duration::days(1)).await;
}

fn remaining(keys: &[String], prefix: &str) -> usize {
    keys.iter().filter(|k| k.starts_with(prefix)).count()
}

#[tokio::test]
async fn test_sweep_deletes_at_most_one_batch_of_old_read_notifications() {
    let app = TestApp::new();
    seed(&app).await;

    let report = RetentionSweeper::new(app.ctx.clone())
        .run_if_due(Some(&recipient()))
        .await
        .expect("sweep");

    assert_eq!(report.status, SweepStatus::Completed);
    assert_eq!(report.eligible, 25);
    assert_eq!(report.deleted.len(), 20);
    // Newest first: the five oldest survive this run.
    assert_eq!(report.deleted.first().map(String::as_str), Some("old-read-00"));
    assert_eq!(report.deleted.last().map(String::as_str), Some("old-read-19"));

    let keys: Vec<String> = app.notifications().await.into_iter().map(|d| d.key).collect();
    assert_eq!(remaining(&keys, "old-read-"), 5);
    assert_eq!(remaining(&keys, "old-unread-"), 3);
    assert!(keys.contains(&"limit-read".to_string()));
    assert!(keys.contains(&"fresh-read".to_string()));
}

#[tokio::test]
async fn test_sweep_is_throttled_until_interval_passes() {
    let app = TestApp::new();
    seed(&app).await;
    let sweeper = RetentionSweeper::new(app.ctx.clone());

    sweeper.run_if_due(Some(&recipient())).await.expect("sweep");
    let ran_at = app.now();
    assert_eq!(
        sweeper.last_run(Some(&recipient())).await.expect("ledger"),
        Some(ran_at)
    );

    app.clock.advance(Duration::hours(23));
    let throttled = sweeper.run_if_due(Some(&recipient())).await.expect("sweep");
    assert_eq!(throttled.status, SweepStatus::Throttled);
    assert!(throttled.deleted.is_empty());
    assert_eq!(throttled.last_run, Some(ran_at));

    app.clock.advance(Duration::hours(1));
    let second = sweeper.run_if_due(Some(&recipient())).await.expect("sweep");
    assert_eq!(second.status, SweepStatus::Completed);
    // The former limit item is now a day past retention.
    assert_eq!(second.deleted.len(), 6);

    let keys: Vec<String> = app.notifications().await.into_iter().map(|d| d.key).collect();
    assert_eq!(remaining(&keys, "old-read-"), 0);
    assert_eq!(remaining(&keys, "old-unread-"), 3);
    assert_eq!(keys.len(), 4);
}

#[tokio::test]
async fn test_scoped_sweep_leaves_other_recipients_alone() {
    let app = TestApp::new();
    let old = app.now() - Duration::days(40);
    app.put_notification("mine", "42", true, old).await;
    app.put_notification("theirs", "7", true, old).await;

    let report = RetentionSweeper::new(app.ctx.clone())
        .sweep(Some(&recipient()))
        .await
        .expect("sweep");
    assert_eq!(report.deleted, vec!["mine".to_string()]);

    let keys: Vec<String> = app.notifications().await.into_iter().map(|d| d.key).collect();
    assert_eq!(keys, vec!["theirs".to_string()]);
}

#[tokio::test]
async fn test_global_sweep_covers_every_recipient() {
    let app = TestApp::new();
    let old = app.now() - Duration::days(40);
    app.put_notification("a", "42", true, old).await;
    app.put_notification("b", "7", true, old).await;
    app.put_notification("c", "7", false, old).await;

    let report = RetentionSweeper::new(app.ctx.clone())
        .run_if_due(None)
        .await
        .expect("sweep");
    assert_eq!(report.deleted.len(), 2);

    let keys: Vec<String> = app.notifications().await.into_iter().map(|d| d.key).collect();
    assert_eq!(keys, vec!["c".to_string()]);
}

#[tokio::test]
async fn test_disabled_retention_does_nothing() {
    let mut config = AppConfig::default();
    config.retention.enabled = false;
    let app = TestApp::with_config(config);
    app.put_notification("old", "42", true, app.now() - Duration::days(40)).await;

    let report = RetentionSweeper::new(app.ctx.clone())
        .run_if_due(Some(&recipient()))
        .await
        .expect("sweep");
    assert_eq!(report.status, SweepStatus::Disabled);
    assert_eq!(app.notifications().await.len(), 1);
}
