//! # campus-realtime
//!
//! Live notification feed for Campus Notify. A [`FeedSubscriber`] keeps one
//! live query open for the current identity and publishes
//! [`FeedSnapshot`]s over a watch channel:
//!
//! - each batch is ordered by timestamp, newest first, as the store returns it
//! - ids in the local seen set always read as read
//! - the union of seen and remotely read ids is persisted back locally
//! - subscription errors degrade to an empty, non-loading feed

pub mod feed;

pub use feed::{FeedHandle, FeedItem, FeedSnapshot, FeedSubscriber};
