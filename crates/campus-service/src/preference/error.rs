//! Preference write failures.

use thiserror::Error;

use campus_core::error::AppError;
use campus_entity::notification::NotificationType;

/// Why a preference write failed.
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// No user identity was available to key the write.
    #[error("no user identity available for preference update")]
    MissingIdentity,
    /// The write went through but reading it back returned another value.
    #[error("preference {category} reads back as {actual:?} after writing {expected}")]
    VerificationMismatch {
        /// Category that was written.
        category: NotificationType,
        /// Value that was written.
        expected: bool,
        /// Value read back (`None` if the field or document is missing).
        actual: Option<bool>,
    },
    /// The store could not be reached or rejected the call.
    #[error("preference store unavailable: {0}")]
    Transport(#[from] AppError),
}

impl From<PreferenceError> for AppError {
    fn from(err: PreferenceError) -> Self {
        let message = err.to_string();
        match err {
            PreferenceError::MissingIdentity => AppError::authentication(message),
            PreferenceError::VerificationMismatch { .. } => AppError::verification_mismatch(message),
            PreferenceError::Transport(inner) => inner,
        }
    }
}
