use thiserror::Error;

use crate::fs::vault::StoreError;

/// Application-wide result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// I/O errors from terminal or settings file access.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal initialization or rendering errors.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Invalid vault path provided by the user.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// The backing store rejected an operation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Settings could not be serialized.
    #[error("Settings error: {0}")]
    Settings(String),
}
