//! Key-file bucket: one local file per key.

use super::BucketStore;
use crate::error::{CoreError, CoreResult};
use crate::key::Key;
use crate::record::KeyValue;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const VALUE_EXTENSION: &str = "val";

struct KeyFileState {
    files: BTreeMap<Key, PathBuf>,
    next_seq: u64,
}

/// A bucket that stores each value in its own file under a root directory.
///
/// The key index lives in memory. File names come from a per-bucket
/// sequence rather than the key itself, so client keys never reach the
/// filesystem. Value files left by an earlier process are unreachable once
/// the index is gone, and are removed when the bucket is opened.
///
/// This backend is local-only and has no mirror.
#[derive(Debug)]
pub struct KeyFileBucket {
    index: usize,
    root: PathBuf,
    state: Mutex<KeyFileState>,
}

impl std::fmt::Debug for KeyFileState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyFileState")
            .field("keys", &self.files.len())
            .field("next_seq", &self.next_seq)
            .finish()
    }
}

impl KeyFileBucket {
    /// Opens a bucket rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or scanned.
    pub fn open(index: usize, root: &Path) -> CoreResult<Self> {
        fs::create_dir_all(root)?;

        let prefix = file_prefix(index);
        for entry in fs::read_dir(root)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with(&prefix) && name.ends_with(VALUE_EXTENSION) {
                if let Err(err) = fs::remove_file(entry.path()) {
                    warn!(bucket = index, file = name, error = %err, "failed to remove orphaned value file");
                } else {
                    debug!(bucket = index, file = name, "removed orphaned value file");
                }
            }
        }

        Ok(Self {
            index,
            root: root.to_path_buf(),
            state: Mutex::new(KeyFileState {
                files: BTreeMap::new(),
                next_seq: 0,
            }),
        })
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().files.len()
    }

    /// Returns true if no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns keys whose text form lies in `[low, high]`, in lexicographic
    /// order. Bounds are swapped if reversed.
    #[must_use]
    pub fn range(&self, low: &str, high: &str) -> Vec<Key> {
        let (low, high) = if low > high { (high, low) } else { (low, high) };

        let state = self.state.lock();
        let mut keys: Vec<(String, Key)> = state
            .files
            .keys()
            .map(|key| (key.to_string(), key.clone()))
            .filter(|(text, _)| text.as_str() >= low && text.as_str() <= high)
            .collect();
        keys.sort();
        keys.into_iter().map(|(_, key)| key).collect()
    }

    fn read_value(&self, key: &Key, path: &Path) -> Option<String> {
        match fs::read_to_string(path) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(bucket = self.index, key = %key, error = %err, "value file unreadable");
                None
            }
        }
    }
}

impl BucketStore for KeyFileBucket {
    fn index(&self) -> usize {
        self.index
    }

    fn add(&self, record: KeyValue) -> CoreResult<bool> {
        let mut state = self.state.lock();
        let (key, value) = record.into_parts();
        if state.files.contains_key(&key) {
            debug!(bucket = self.index, key = %key, "duplicate key");
            return Ok(false);
        }

        let path = self.root.join(format!(
            "{}{:08}.{VALUE_EXTENSION}",
            file_prefix(self.index),
            state.next_seq
        ));
        fs::write(&path, value.as_bytes()).map_err(|err| {
            CoreError::storage_unavailable(self.index, format!("value file write failed: {err}"))
        })?;

        state.next_seq += 1;
        info!(bucket = self.index, key = %key, "entry stored");
        state.files.insert(key, path);
        Ok(true)
    }

    fn delete(&self, key: &Key) -> CoreResult<bool> {
        let mut state = self.state.lock();
        let Some(path) = state.files.remove(key) else {
            return Ok(false);
        };

        if let Err(err) = fs::remove_file(&path) {
            warn!(bucket = self.index, key = %key, error = %err, "failed to remove value file");
        }
        drop(state);
        info!(bucket = self.index, key = %key, "entry deleted");
        Ok(true)
    }

    fn get(&self, key: &Key) -> CoreResult<Option<KeyValue>> {
        let state = self.state.lock();
        Ok(state
            .files
            .get(key)
            .and_then(|path| self.read_value(key, path))
            .map(|value| KeyValue::new(key.clone(), value)))
    }

    fn entries(&self) -> CoreResult<Vec<String>> {
        let state = self.state.lock();
        Ok(state
            .files
            .iter()
            .filter_map(|(key, path)| {
                self.read_value(key, path)
                    .map(|value| format!("{key} : {value}"))
            })
            .collect())
    }
}

fn file_prefix(index: usize) -> String {
    format!("b{index}-")
}
