//! Error types for the kalsync ecosystem.

use thiserror::Error;

/// Errors that can occur in kalsync operations.
#[derive(Error, Debug)]
pub enum KalsyncError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Calendar parse error: {0}")]
    Parse(String),

    #[error("Server returned status {status}")]
    Server { status: u16 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl KalsyncError {
    /// Whether a failed push attempt is worth retrying.
    ///
    /// Transport failures and server-side statuses are transient; parse and
    /// validation failures will not get better on a second try.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Server { .. })
    }
}

impl From<reqwest::Error> for KalsyncError {
    fn from(err: reqwest::Error) -> Self {
        KalsyncError::Network(err.to_string())
    }
}

impl From<rusqlite::Error> for KalsyncError {
    fn from(err: rusqlite::Error) -> Self {
        KalsyncError::Store(err.to_string())
    }
}

impl From<serde_json::Error> for KalsyncError {
    fn from(err: serde_json::Error) -> Self {
        KalsyncError::Serialization(err.to_string())
    }
}

/// Result type alias for kalsync operations.
pub type KalsyncResult<T> = Result<T, KalsyncError>;
