//! Keeps one live feed open for the current identity.

use futures::StreamExt;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use campus_core::result::AppResult;
use campus_core::types::{Query, SortField, UserKey};
use campus_entity::notification::model::fields;
use campus_service::AppContext;
use campus_store::keys;

use super::handle::FeedHandle;
use super::projection;
use super::snapshot::FeedSnapshot;

/// Owns the feed of whoever is currently signed in.
///
/// The whole subscription is re-created whenever the identity changes, so a
/// batch for a previous identity can never land in the new feed.
#[derive(Debug)]
pub struct FeedSubscriber {
    ctx: AppContext,
    current: Option<FeedHandle>,
}

impl FeedSubscriber {
    /// Create a subscriber with no open feed.
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx, current: None }
    }

    /// The live query behind a recipient's feed.
    pub fn query(recipient: &UserKey) -> Query {
        Query::collection(keys::NOTIFICATIONS)
            .where_eq(fields::RECIPIENT_ID, recipient.to_value())
            .order_by(SortField::desc(fields::TIMESTAMP))
    }

    /// Make the open feed match `identity`: keep it if the recipient is
    /// unchanged, replace it otherwise, close it when there is no identity.
    pub fn ensure(&mut self, identity: Option<UserKey>) -> Option<&mut FeedHandle> {
        let Some(recipient) = identity else {
            if let Some(old) = self.current.take() {
                debug!(recipient = %old.recipient(), "Closing feed, no identity");
            }
            return None;
        };

        let stale = self
            .current
            .as_ref()
            .is_none_or(|handle| handle.recipient() != &recipient);
        if stale {
            self.current = Some(Self::open(&self.ctx, recipient));
        }
        self.current.as_mut()
    }

    /// Resolve the current identity and [`ensure`](Self::ensure) the feed.
    pub async fn follow_identity(&mut self) -> Option<&mut FeedHandle> {
        let identity = self.ctx.identity().resolve().await;
        self.ensure(identity)
    }

    /// The open feed, if any.
    pub fn current(&self) -> Option<&FeedHandle> {
        self.current.as_ref()
    }

    /// Close the open feed.
    pub fn close(&mut self) {
        self.current = None;
    }

    /// Start a feed for `recipient` on the current runtime.
    pub fn open(ctx: &AppContext, recipient: UserKey) -> FeedHandle {
        let (tx, rx) = watch::channel(FeedSnapshot::loading());
        info!(recipient = %recipient, "Opening notification feed");
        let task = tokio::spawn(run(ctx.clone(), recipient.clone(), tx));
        FeedHandle::new(recipient, rx, task)
    }

    /// One-shot read of a recipient's feed, with the same merge and local
    /// persistence as the live feed.
    pub async fn snapshot(ctx: &AppContext, recipient: &UserKey) -> AppResult<FeedSnapshot> {
        let batch = ctx.store().query(&Self::query(recipient)).await?;
        Ok(projection::apply(ctx, &batch).await)
    }
}

async fn run(ctx: AppContext, recipient: UserKey, tx: watch::Sender<FeedSnapshot>) {
    let mut stream = match ctx.store().subscribe(FeedSubscriber::query(&recipient)).await {
        Ok(stream) => stream,
        Err(e) => {
            warn!(recipient = %recipient, error = %e, "Feed subscription failed");
            tx.send_replace(FeedSnapshot::empty());
            return;
        }
    };

    while let Some(batch) = stream.next().await {
        match batch {
            Ok(docs) => {
                let snapshot = projection::apply(&ctx, &docs).await;
                debug!(
                    recipient = %recipient,
                    items = snapshot.items.len(),
                    unread = snapshot.unread_count,
                    "Feed updated"
                );
                if tx.send(snapshot).is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!(recipient = %recipient, error = %e, "Feed subscription error");
                tx.send_replace(FeedSnapshot::empty());
                break;
            }
        }
    }
    debug!(recipient = %recipient, "Feed closed");
}
