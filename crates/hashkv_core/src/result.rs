//! Operation outcomes reported to callers.

use std::fmt;

/// What an operation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// A new entry was stored.
    Stored,
    /// An entry was removed.
    Deleted,
    /// A lookup found its key.
    Found,
    /// Insert refused because the key exists.
    Duplicate,
    /// The key does not exist.
    NotFound,
    /// The bucket could not reach its storage.
    StorageUnavailable,
}

impl Outcome {
    /// Returns true for outcomes that count as success.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Stored | Self::Deleted | Self::Found)
    }
}

/// Result of a single manager operation: success flag, human-readable
/// message and the outcome that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationResult {
    /// Whether the operation succeeded.
    pub succeeded: bool,
    /// Human-readable description.
    pub message: String,
    /// Machine-readable outcome.
    pub outcome: Outcome,
}

impl OperationResult {
    /// Creates a result; `succeeded` follows from the outcome.
    pub fn new(outcome: Outcome, message: impl Into<String>) -> Self {
        Self {
            succeeded: outcome.is_success(),
            message: message.into(),
            outcome,
        }
    }

    /// Returns true if the failure came from broken storage rather than
    /// the request.
    #[must_use]
    pub fn is_storage_failure(&self) -> bool {
        self.outcome == Outcome::StorageUnavailable
    }
}

impl fmt::Display for OperationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}
