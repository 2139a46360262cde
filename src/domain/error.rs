//! Error types for the notification feed engine.
//!
//! This module defines the centralized error type [`FeedError`] and a type alias
//! [`Result`] used throughout the crate. Most public feed operations swallow these
//! errors and log them instead of surfacing them, but the collaborator seams
//! (network service, key-value storage, configuration) return them explicitly.

use thiserror::Error;

/// The main error type for feed engine operations.
///
/// # Examples
///
/// ```
/// use notifeed::FeedError;
///
/// fn fetch() -> Result<(), FeedError> {
///     Err(FeedError::Network("connection reset".to_string()))
/// }
///
/// assert!(fetch().unwrap_err().is_network());
/// ```
#[derive(Debug, Error)]
pub enum FeedError {
    /// A call to the remote notification or booking service failed.
    ///
    /// Covers transport failures as well as non-success responses. Always
    /// treated as transient by the feed engine.
    #[error("Network error: {0}")]
    Network(String),

    /// Reading from or writing to the local key-value store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON payload could not be parsed or produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FeedError {
    /// Returns `true` for failures of the remote service.
    #[must_use]
    pub const fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// A specialized `Result` type for feed engine operations.
pub type Result<T> = std::result::Result<T, FeedError>;
