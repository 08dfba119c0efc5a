//! Convenience result type alias for Campus Notify.

use crate::error::AppError;

/// A specialized `Result` type for Campus operations.
pub type AppResult<T> = Result<T, AppError>;
