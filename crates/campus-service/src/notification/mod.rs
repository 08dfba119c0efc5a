//! Notification emission, the local seen projection, and acknowledgement.

pub mod dedup;
pub mod emitter;
pub mod inbox;
pub mod seen;

pub use emitter::{EmitOutcome, NotificationEmitter};
pub use inbox::Inbox;
pub use seen::SeenSet;
