//! Notification domain entities.

pub mod kind;
pub mod model;
pub mod preference;
pub mod state;

pub use kind::NotificationType;
pub use model::{NewNotification, Notification};
pub use preference::NotificationPreferences;
pub use state::NotificationState;
