//! Store fixtures.
//!
//! Provides convenience functions for setting up test stores and common
//! test scenarios.

use hashkv_codec::{decode_snapshot, encode_snapshot};
use hashkv_core::{
    artifact_name, Config, DirectoryMirror, InMemoryMirror, Key, Manager, MirrorConfig,
    RemoteMirror, SyncPolicy,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// A test store with automatic cleanup.
pub struct TestStore {
    /// The manager instance.
    pub manager: Manager,
    /// The temporary directory (kept alive to prevent cleanup).
    _temp_dir: Option<TempDir>,
}

impl TestStore {
    /// Creates a store with in-memory artifacts and an in-memory mirror.
    pub fn memory(buckets: usize) -> Self {
        Self {
            manager: Manager::open(Config::new().bucket_count(buckets))
                .expect("Failed to open in-memory store"),
            _temp_dir: None,
        }
    }

    /// Creates a store with a data directory and a directory mirror, both in
    /// a fresh temporary directory.
    pub fn file(buckets: usize) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let config = Config::new()
            .bucket_count(buckets)
            .data_dir(temp_dir.path().join("data"))
            .mirror(MirrorConfig::Directory(temp_dir.path().join("mirror")));

        Self {
            manager: Manager::open(config).expect("Failed to open file store"),
            _temp_dir: Some(temp_dir),
        }
    }

    /// Creates a store over the given mirror with in-memory artifacts.
    pub fn with_mirror(buckets: usize, policy: SyncPolicy, mirror: Arc<dyn RemoteMirror>) -> Self {
        let config = Config::new().bucket_count(buckets).sync_policy(policy);
        Self {
            manager: Manager::open_with_mirror(config, mirror)
                .expect("Failed to open store over mirror"),
            _temp_dir: None,
        }
    }

    /// Returns the data directory if file-based.
    pub fn data_dir(&self) -> Option<PathBuf> {
        self._temp_dir.as_ref().map(|d| d.path().join("data"))
    }

    /// Returns the mirror directory if file-based.
    pub fn mirror_dir(&self) -> Option<PathBuf> {
        self._temp_dir.as_ref().map(|d| d.path().join("mirror"))
    }
}

impl std::ops::Deref for TestStore {
    type Target = Manager;

    fn deref(&self) -> &Self::Target {
        &self.manager
    }
}

/// Runs a test with a temporary four-bucket in-memory store.
pub fn with_temp_store<F, R>(f: F) -> R
where
    F: FnOnce(&Manager) -> R,
{
    let store = TestStore::memory(4);
    f(&store.manager)
}

/// Runs a test with a temporary file-based store.
pub fn with_file_store<F, R>(f: F) -> R
where
    F: FnOnce(&Manager, &Path) -> R,
{
    let store = TestStore::file(4);
    let mirror_dir = store.mirror_dir().expect("File store should have a mirror dir");
    f(&store.manager, &mirror_dir)
}

/// Opens a directory mirror under `root`, for tests that share one mirror
/// between several stores.
pub fn shared_directory_mirror(root: &Path) -> Arc<dyn RemoteMirror> {
    Arc::new(DirectoryMirror::open(root).expect("Failed to open directory mirror"))
}

/// Returns a fresh in-memory mirror for sharing between stores.
pub fn shared_memory_mirror() -> Arc<dyn RemoteMirror> {
    Arc::new(InMemoryMirror::new())
}

/// Writes a snapshot for bucket `index` straight into `mirror`, bypassing
/// any manager. Used to simulate another process having written the bucket.
pub fn seed_mirror(mirror: &dyn RemoteMirror, index: usize, entries: &[(Key, &str)]) {
    let snapshot: BTreeMap<Key, String> = entries
        .iter()
        .map(|(k, v)| (k.clone(), (*v).to_string()))
        .collect();
    let bytes = encode_snapshot(&snapshot).expect("Failed to encode snapshot");
    mirror
        .push(&artifact_name(index), &bytes)
        .expect("Failed to seed mirror");
}

/// Reads and decodes the mirrored snapshot of bucket `index`.
///
/// A bucket that was never pushed reads as empty.
pub fn read_mirror(mirror: &dyn RemoteMirror, index: usize) -> BTreeMap<Key, String> {
    match mirror
        .pull(&artifact_name(index))
        .expect("Failed to pull from mirror")
    {
        Some(bytes) => decode_snapshot::<Key, String>(&bytes)
            .expect("Failed to decode snapshot")
            .into_iter()
            .collect(),
        None => BTreeMap::new(),
    }
}

/// Test scenario helpers.
pub mod scenarios {
    use super::*;

    /// Creates a store holding integer keys `0..count`, each with value
    /// `"value-<key>"`.
    pub fn populated_store(buckets: usize, count: i64) -> TestStore {
        let store = TestStore::memory(buckets);
        for key in 0..count {
            let result = store.insert(key, format!("value-{key}"));
            assert!(result.succeeded, "populating key {key}: {}", result.message);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashkv_core::Outcome;

    #[test]
    fn memory_store() {
        let store = TestStore::memory(4);
        assert!(store.insert(1, "a").succeeded);
        assert!(store.data_dir().is_none());
    }

    #[test]
    fn file_store_writes_artifacts() {
        let store = TestStore::file(4);
        store.insert(5, "x");

        assert!(store.data_dir().unwrap().join("bucket1.txt").exists());
        assert!(store.mirror_dir().unwrap().join("bucket1.txt").exists());
    }

    #[test]
    fn populated() {
        let store = scenarios::populated_store(4, 20);
        assert_eq!(store.search(19).outcome, Outcome::Found);
        assert_eq!(store.range_query(0, 100).unwrap().len(), 20);
    }

    #[test]
    fn stores_share_directory_mirror() {
        let temp = TempDir::new().unwrap();
        let a = TestStore::with_mirror(4, SyncPolicy::Strict, shared_directory_mirror(temp.path()));
        let b = TestStore::with_mirror(4, SyncPolicy::Strict, shared_directory_mirror(temp.path()));

        a.insert(8, "eight");
        assert_eq!(b.search(8).outcome, Outcome::Found);
    }

    #[test]
    fn seeded_mirror_is_visible_to_store() {
        let mirror = shared_memory_mirror();
        seed_mirror(mirror.as_ref(), 1, &[(Key::Int(5), "from elsewhere")]);

        let store = TestStore::with_mirror(4, SyncPolicy::Strict, Arc::clone(&mirror));
        assert_eq!(store.search(5).outcome, Outcome::Found);

        store.insert(9, "nine");
        let snapshot = read_mirror(mirror.as_ref(), 1);
        assert_eq!(snapshot.get(&Key::Int(9)).map(String::as_str), Some("nine"));
        assert!(read_mirror(mirror.as_ref(), 2).is_empty());
    }
}
