//! Bucket backends.
//!
//! A bucket owns one partition of the keyspace. Two storage strategies share
//! the [`BucketStore`] trait:
//!
//! - [`Bucket`]: the whole partition as one snapshot, synced with a remote
//!   mirror on every operation
//! - [`KeyFileBucket`]: one local file per key, no mirror

mod key_file;
mod snapshot;

pub use key_file::KeyFileBucket;
pub use snapshot::Bucket;

use crate::error::CoreResult;
use crate::key::Key;
use crate::record::KeyValue;

/// How a bucket reacts when its local artifact or the mirror fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Abort the operation with `CoreError::StorageUnavailable`. A failed
    /// mutation leaves the snapshot as it was.
    #[default]
    Strict,
    /// Log a warning and carry on. A failed pull falls back to the local
    /// artifact; a failed push still reports the mutation as applied.
    Lenient,
}

/// Common interface of bucket backends.
pub trait BucketStore: Send + Sync {
    /// Returns the bucket's position in its directory.
    fn index(&self) -> usize;

    /// Stores a record. Returns `false` if the key is already present.
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket cannot reach its storage.
    fn add(&self, record: KeyValue) -> CoreResult<bool>;

    /// Removes a key. Returns `false` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket cannot reach its storage.
    fn delete(&self, key: &Key) -> CoreResult<bool>;

    /// Looks up a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket cannot reach its storage.
    fn get(&self, key: &Key) -> CoreResult<Option<KeyValue>>;

    /// Renders every entry as `"key : value"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket cannot reach its storage.
    fn entries(&self) -> CoreResult<Vec<String>>;
}

/// Name of a bucket's artifact, both locally and in the mirror.
#[must_use]
pub fn artifact_name(index: usize) -> String {
    format!("bucket{index}.txt")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_names() {
        assert_eq!(artifact_name(0), "bucket0.txt");
        assert_eq!(artifact_name(12), "bucket12.txt");
    }

    #[test]
    fn strict_is_default() {
        assert_eq!(SyncPolicy::default(), SyncPolicy::Strict);
    }
}
