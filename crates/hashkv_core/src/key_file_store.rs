//! Directory of key-file buckets with generated keys.

use crate::bucket::{BucketStore, KeyFileBucket};
use crate::directory::Directory;
use crate::error::{CoreError, CoreResult};
use crate::key::Key;
use crate::record::KeyValue;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::path::Path;
use tracing::debug;

/// Length of generated keys.
pub const GENERATED_KEY_LEN: usize = 64;

/// Upper bound on attempts to find a free generated key.
const MAX_KEY_ATTEMPTS: usize = 16;

/// A local key-value store where every value lives in its own file.
///
/// Keys route like any other text key. Ranges compare the keys' text form
/// lexicographically. There is no mirror.
///
/// # Example
///
/// ```no_run
/// use hashkv_core::KeyFileStore;
/// use std::path::Path;
///
/// let store = KeyFileStore::open(Path::new("/tmp/kv"), 4).unwrap();
/// let key = store.insert_generated("payload").unwrap();
/// assert_eq!(store.search(&key).unwrap().unwrap().value(), "payload");
/// ```
#[derive(Debug)]
pub struct KeyFileStore {
    directory: Directory<KeyFileBucket>,
}

impl KeyFileStore {
    /// Opens a store with `bucket_count` buckets under `root`.
    ///
    /// Bucket `i` keeps its files in `<root>/bucket<i>/`.
    ///
    /// # Errors
    ///
    /// Returns an error if `bucket_count` is zero or a bucket directory
    /// cannot be created.
    pub fn open(root: &Path, bucket_count: usize) -> CoreResult<Self> {
        let buckets = (0..bucket_count)
            .map(|i| KeyFileBucket::open(i, &root.join(format!("bucket{i}"))))
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(Self {
            directory: Directory::new(buckets)?,
        })
    }

    /// Returns the underlying directory.
    #[must_use]
    pub fn directory(&self) -> &Directory<KeyFileBucket> {
        &self.directory
    }

    /// Stores a value. Returns `false` if the key exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the value file cannot be written.
    pub fn insert(&self, key: impl Into<Key>, value: impl Into<String>) -> CoreResult<bool> {
        let record = KeyValue::new(key, value);
        self.directory.bucket_for(record.key()).add(record)
    }

    /// Stores a value under a fresh random 64-character alphanumeric key.
    ///
    /// # Errors
    ///
    /// Returns an error if the value file cannot be written, or if no free
    /// key turns up after repeated attempts.
    pub fn insert_generated(&self, value: impl Into<String>) -> CoreResult<Key> {
        let value = value.into();
        let mut last_bucket = 0;
        for _ in 0..MAX_KEY_ATTEMPTS {
            let key = Key::Text(generate_key());
            last_bucket = self.directory.route(&key);
            if self.insert(key.clone(), value.clone())? {
                return Ok(key);
            }
            debug!(bucket = last_bucket, key = %key, "generated key collided, retrying");
        }
        Err(CoreError::storage_unavailable(
            last_bucket,
            "could not allocate a free generated key",
        ))
    }

    /// Removes a key. Returns `false` if it was absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket cannot reach its storage.
    pub fn delete(&self, key: &Key) -> CoreResult<bool> {
        self.directory.bucket_for(key).delete(key)
    }

    /// Looks up a key.
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket cannot reach its storage.
    pub fn search(&self, key: &Key) -> CoreResult<Option<KeyValue>> {
        self.directory.bucket_for(key).get(key)
    }

    /// Returns all keys whose text form lies in `[low, high]`, across every
    /// bucket, in lexicographic order.
    #[must_use]
    pub fn range(&self, low: &str, high: &str) -> Vec<Key> {
        let mut keys: Vec<(String, Key)> = self
            .directory
            .buckets()
            .iter()
            .flat_map(|bucket| bucket.range(low, high))
            .map(|key| (key.to_string(), key))
            .collect();
        keys.sort();
        keys.into_iter().map(|(_, key)| key).collect()
    }
}

fn generate_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_KEY_LEN)
        .map(char::from)
        .collect()
}
