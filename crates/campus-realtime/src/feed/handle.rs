//! Handle to a running feed subscription.

use tokio::sync::watch;
use tokio::task::JoinHandle;

use campus_core::types::UserKey;

use super::snapshot::FeedSnapshot;

/// A live feed for one recipient.
///
/// Dropping the handle tears the subscription down.
#[derive(Debug)]
pub struct FeedHandle {
    recipient: UserKey,
    rx: watch::Receiver<FeedSnapshot>,
    task: JoinHandle<()>,
}

impl FeedHandle {
    pub(crate) fn new(
        recipient: UserKey,
        rx: watch::Receiver<FeedSnapshot>,
        task: JoinHandle<()>,
    ) -> Self {
        Self {
            recipient,
            rx,
            task,
        }
    }

    /// The recipient this feed is keyed on.
    pub fn recipient(&self) -> &UserKey {
        &self.recipient
    }

    /// The latest snapshot.
    pub fn current(&self) -> FeedSnapshot {
        self.rx.borrow().clone()
    }

    /// A receiver for consumers that want to await changes themselves.
    pub fn watch(&self) -> watch::Receiver<FeedSnapshot> {
        self.rx.clone()
    }

    /// Wait for the next snapshot. `None` once the subscription has ended.
    pub async fn changed(&mut self) -> Option<FeedSnapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Wait until the first batch (or a failure) has settled the feed.
    pub async fn settled(&mut self) -> FeedSnapshot {
        let settled = self.rx.wait_for(|s| !s.loading).await.map(|s| s.clone());
        settled.unwrap_or_else(|_| self.rx.borrow().clone())
    }

    /// Whether the background subscription has stopped.
    pub fn is_closed(&self) -> bool {
        self.task.is_finished()
    }

    /// Tear the subscription down.
    pub fn close(self) {}
}

impl Drop for FeedHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
