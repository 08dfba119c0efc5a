//! # campus-service
//!
//! Business logic for Campus Notify. Every service is obtained from an
//! explicitly constructed [`AppContext`]; there is no global state.
//!
//! - [`identity`]: resolves the current user's canonical key
//! - [`preference`]: per-user category toggles with reconciliation
//! - [`notification`]: emission with dedup, seen projection, acknowledgement

pub mod context;
pub mod identity;
pub mod notification;
pub mod preference;

pub use context::{AppContext, SessionUser};
pub use identity::IdentityResolver;
pub use notification::{EmitOutcome, Inbox, NotificationEmitter, SeenSet};
pub use preference::{PreferenceError, PreferenceStore};
