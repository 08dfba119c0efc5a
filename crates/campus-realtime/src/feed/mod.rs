//! Per-recipient notification feed.

pub mod handle;
pub mod projection;
pub mod snapshot;
pub mod subscriber;

pub use handle::FeedHandle;
pub use snapshot::{FeedItem, FeedSnapshot};
pub use subscriber::FeedSubscriber;
