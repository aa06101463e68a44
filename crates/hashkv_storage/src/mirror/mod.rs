//! Remote mirror trait and implementations.
//!
//! A mirror is the durable, shared home of every bucket snapshot. Buckets
//! pull their artifact before each operation and push it back after each
//! mutation, addressing it by a name derived from the bucket index.

mod directory;
mod memory;

pub use directory::DirectoryMirror;
pub use memory::InMemoryMirror;

use crate::error::{StorageError, StorageResult};

/// A remote blob store keyed by artifact name.
///
/// Mirrors are **opaque**: they never look inside the bytes they hold.
///
/// # Invariants
///
/// - `pull` of a name that was never pushed returns `Ok(None)`, not an error
/// - `pull` after a successful `push` returns exactly the pushed bytes
/// - a `push` replaces any previous content stored under the same name
/// - implementations must be `Send + Sync`; buckets call them concurrently
///   for different names
pub trait RemoteMirror: Send + Sync {
    /// Stores `data` under `name`, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or the mirror rejects the write.
    fn push(&self, name: &str, data: &[u8]) -> StorageResult<()>;

    /// Fetches the content stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or the mirror cannot be read.
    fn pull(&self, name: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Lists the names currently stored in the mirror, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the mirror cannot be enumerated.
    fn list(&self) -> StorageResult<Vec<String>>;
}

/// Checks that `name` can be used as a mirror object name.
///
/// Names must be non-empty, must not be `.` or `..`, and must not contain
/// path separators or NUL bytes.
///
/// # Errors
///
/// Returns [`StorageError::InvalidName`] if the name is rejected.
pub fn validate_name(name: &str) -> StorageResult<()> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);

    if bad {
        return Err(StorageError::invalid_name(name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn valid_names() {
        assert!(validate_name("bucket0.txt").is_ok());
        assert!(validate_name("bucket-17").is_ok());
    }

    #[test]
    fn invalid_names() {
        for name in ["", ".", "..", "a/b", "a\\b", "nul\0"] {
            assert!(
                matches!(validate_name(name), Err(StorageError::InvalidName { .. })),
                "{name:?} should be rejected"
            );
        }
    }

    proptest! {
        #[test]
        fn separator_names_always_rejected(
            prefix in "[a-z0-9.]{0,8}",
            sep in prop::sample::select(vec!['/', '\\', '\0']),
            suffix in "[a-z0-9.]{0,8}",
        ) {
            let name = format!("{prefix}{sep}{suffix}");
            prop_assert!(validate_name(&name).is_err());
        }

        #[test]
        fn plain_names_accepted(name in "[a-zA-Z0-9_-][a-zA-Z0-9_.-]{0,31}") {
            prop_assert!(validate_name(&name).is_ok());
        }
    }
}
