//! # campus-core
//!
//! Core crate for Campus Notify. Contains the storage traits, configuration
//! schemas, the canonical user identifier, the clock abstraction, and the
//! unified error system.
//!
//! This crate has **no** internal dependencies on other Campus crates.

pub mod clock;
pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AppError, ErrorKind};
pub use result::AppResult;
pub use types::UserKey;
