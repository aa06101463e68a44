//! Error types for HashKV core.

use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in HashKV core operations.
///
/// Logical outcomes (duplicate key, missing key) are not errors; they are
/// reported through [`crate::OperationResult`]. This type covers broken
/// storage, bad configuration and out-of-range requests.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] hashkv_storage::StorageError),

    /// Snapshot codec error.
    #[error("codec error: {0}")]
    Codec(#[from] hashkv_codec::CodecError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A bucket could not sync with its artifact or mirror.
    #[error("storage unavailable for bucket {bucket}: {message}")]
    StorageUnavailable {
        /// Index of the affected bucket.
        bucket: usize,
        /// Description of the failed step.
        message: String,
    },

    /// A bucket index outside the directory was requested.
    #[error("bucket {index} out of range (directory has {size} buckets)")]
    BucketOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of buckets in the directory.
        size: usize,
    },

    /// A range query spans more keys than the configured limit.
    #[error("range {low}..={high} spans more than {max_span} keys")]
    RangeTooWide {
        /// Lower bound after normalization.
        low: i64,
        /// Upper bound after normalization.
        high: i64,
        /// Configured maximum span.
        max_span: u64,
    },

    /// The configuration cannot be used.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },

    /// Another process holds the data directory.
    #[error("data directory locked: another process has exclusive access")]
    DataDirLocked,
}

impl CoreError {
    /// Creates a storage unavailable error for a bucket.
    pub fn storage_unavailable(bucket: usize, message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            bucket,
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Returns true if the error means the backing store is unreachable or
    /// inconsistent, as opposed to a bad request.
    #[must_use]
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            Self::Storage(_) | Self::Codec(_) | Self::Io(_) | Self::StorageUnavailable { .. }
        )
    }
}
