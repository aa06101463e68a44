//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur while reading or writing artifacts and mirrors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The artifact name cannot be used as a mirror object name.
    #[error("invalid artifact name: {name:?}")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// The mirror could not be reached or refused the request.
    #[error("mirror unavailable: {message}")]
    Unavailable {
        /// Description of the failure.
        message: String,
    },
}

impl StorageError {
    /// Creates an invalid name error.
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName { name: name.into() }
    }

    /// Creates a mirror unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}
