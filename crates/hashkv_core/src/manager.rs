//! Store facade.

use crate::bucket::{artifact_name, Bucket, BucketStore};
use crate::config::{Config, MirrorConfig};
use crate::dir::DataDir;
use crate::directory::Directory;
use crate::error::{CoreError, CoreResult};
use crate::key::Key;
use crate::record::KeyValue;
use crate::result::{OperationResult, Outcome};
use crate::stats::{BucketStats, StoreStats};
use hashkv_storage::{
    ArtifactBackend, DirectoryMirror, FileArtifact, InMemoryArtifact, InMemoryMirror,
    RemoteMirror,
};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The main store handle.
///
/// `Manager` routes each key to its bucket and turns bucket results into
/// [`OperationResult`]s for callers. It is `Send + Sync`; share it through
/// an `Arc`.
///
/// # Example
///
/// ```rust
/// use hashkv_core::{Config, Manager};
///
/// let manager = Manager::open(Config::default()).unwrap();
/// let result = manager.insert(5, "x");
/// assert!(result.succeeded);
/// assert_eq!(manager.search(5).message, "Data: x with key: 5 found in bucket 1");
/// ```
pub struct Manager {
    config: Config,
    /// Holds the data directory lock. None for memory-only artifacts.
    _data_dir: Option<DataDir>,
    mirror: Arc<dyn RemoteMirror>,
    directory: Directory<Bucket>,
}

impl Manager {
    /// Opens a store, building the mirror described by the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is invalid (`InvalidConfig`)
    /// - The data directory is held by another process (`DataDirLocked`)
    /// - The mirror directory or local artifacts cannot be created
    pub fn open(config: Config) -> CoreResult<Self> {
        config.validate()?;
        let mirror: Arc<dyn RemoteMirror> = match &config.mirror {
            MirrorConfig::InMemory => Arc::new(InMemoryMirror::new()),
            MirrorConfig::Directory(root) => Arc::new(DirectoryMirror::open(root)?),
        };
        Self::open_with_mirror(config, mirror)
    }

    /// Opens a store over an existing mirror. `config.mirror` is ignored.
    ///
    /// This is how tests inject fault-injecting mirrors, and how several
    /// managers share one in-memory mirror.
    ///
    /// # Errors
    ///
    /// Same as [`Manager::open`].
    pub fn open_with_mirror(config: Config, mirror: Arc<dyn RemoteMirror>) -> CoreResult<Self> {
        config.validate()?;

        let data_dir = config
            .data_dir
            .as_deref()
            .map(|path| DataDir::open(path, config.create_if_missing))
            .transpose()?;

        let buckets = (0..config.bucket_count)
            .map(|index| -> CoreResult<Bucket> {
                let artifact: Box<dyn ArtifactBackend> = match &data_dir {
                    Some(dir) => Box::new(FileArtifact::open(
                        &dir.artifact_path(&artifact_name(index)),
                    )?),
                    None => Box::new(InMemoryArtifact::new()),
                };
                Ok(Bucket::new(index, artifact, Arc::clone(&mirror), config.sync_policy))
            })
            .collect::<CoreResult<Vec<_>>>()?;
        let directory = Directory::new(buckets)?;

        info!(
            buckets = config.bucket_count,
            policy = ?config.sync_policy,
            data_dir = ?config.data_dir,
            "manager opened"
        );

        Ok(Self {
            config,
            _data_dir: data_dir,
            mirror,
            directory,
        })
    }

    /// Stores `value` under `key` unless the key exists.
    pub fn insert(&self, key: impl Into<Key>, value: impl Into<String>) -> OperationResult {
        let record = KeyValue::new(key, value);
        let index = self.directory.route(record.key());
        let message = format!(
            "Key: {} with value: {} will be stored in bucket {index}",
            record.key(),
            record.value()
        );

        match self.directory.bucket_for(record.key()).add(record) {
            Ok(true) => OperationResult::new(Outcome::Stored, message),
            Ok(false) => OperationResult::new(Outcome::Duplicate, "Key already exist."),
            Err(err) => unavailable(index, &err),
        }
    }

    /// Removes `key` if present.
    pub fn delete(&self, key: impl Into<Key>) -> OperationResult {
        let key = key.into();
        let index = self.directory.route(&key);

        match self.directory.bucket_for(&key).delete(&key) {
            Ok(true) => OperationResult::new(
                Outcome::Deleted,
                format!("Data with key: {key} deleted from bucket {index}"),
            ),
            Ok(false) => OperationResult::new(Outcome::NotFound, "Key not existing."),
            Err(err) => unavailable(index, &err),
        }
    }

    /// Looks up `key`.
    pub fn search(&self, key: impl Into<Key>) -> OperationResult {
        let key = key.into();
        let index = self.directory.route(&key);

        match self.directory.bucket_for(&key).get(&key) {
            Ok(Some(record)) => OperationResult::new(
                Outcome::Found,
                format!(
                    "Data: {} with key: {key} found in bucket {index}",
                    record.value()
                ),
            ),
            Ok(None) => OperationResult::new(
                Outcome::NotFound,
                format!("Data with key: {key} not found."),
            ),
            Err(err) => unavailable(index, &err),
        }
    }

    /// Returns `"key : value"` for every stored integer key in the inclusive
    /// range between `low` and `high`. Bounds are swapped if reversed.
    ///
    /// Every integer in the range is looked up individually, so the cost is
    /// linear in the width of the range, not in the number of hits. The width
    /// is capped by [`Config::max_range_span`].
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::RangeTooWide`] before touching any bucket if the
    /// range is too wide, or [`CoreError::StorageUnavailable`] if a lookup
    /// fails.
    pub fn range_query(&self, low: i64, high: i64) -> CoreResult<Vec<String>> {
        let (low, high) = if low > high { (high, low) } else { (low, high) };

        let span = i128::from(high) - i128::from(low) + 1;
        if span > i128::from(self.config.max_range_span) {
            debug!(low, high, "range rejected");
            return Err(CoreError::RangeTooWide {
                low,
                high,
                max_span: self.config.max_range_span,
            });
        }

        let mut found = Vec::new();
        for n in low..=high {
            let key = Key::Int(n);
            if let Some(record) = self.directory.bucket_for(&key).get(&key)? {
                found.push(record.to_string());
            }
        }
        debug!(low, high, hits = found.len(), "range query");
        Ok(found)
    }

    /// Returns the entries of one bucket.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::BucketOutOfRange`] for a bad index, or a storage
    /// error if the bucket cannot refresh.
    pub fn list_entries(&self, index: usize) -> CoreResult<Vec<String>> {
        self.directory.bucket(index)?.entries()
    }

    /// Returns every bucket's entries, each group preceded by a
    /// `"Bucket <i>"` header.
    ///
    /// # Errors
    ///
    /// Returns a storage error if any bucket cannot refresh.
    pub fn list_all_entries(&self) -> CoreResult<Vec<String>> {
        let mut lines = Vec::new();
        for bucket in self.directory.buckets() {
            lines.push(format!("Bucket {}", bucket.index()));
            lines.extend(bucket.entries()?);
        }
        Ok(lines)
    }

    /// Collects per-bucket statistics.
    ///
    /// # Errors
    ///
    /// Returns a storage error if a bucket or the mirror cannot be read.
    pub fn stats(&self) -> CoreResult<StoreStats> {
        let mirrored = self.mirror.list()?;
        let buckets = self
            .directory
            .buckets()
            .iter()
            .map(|bucket| -> CoreResult<BucketStats> {
                Ok(BucketStats {
                    index: bucket.index(),
                    mirror_name: bucket.mirror_name().to_string(),
                    keys: bucket.len()?,
                    mirrored: mirrored.iter().any(|name| name == bucket.mirror_name()),
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(StoreStats::from_buckets(buckets))
    }

    /// Returns the number of buckets.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.directory.size()
    }

    /// Returns the index of the bucket owning `key`.
    #[must_use]
    pub fn route(&self, key: &Key) -> usize {
        self.directory.route(key)
    }

    /// Returns the bucket directory.
    #[must_use]
    pub fn directory(&self) -> &Directory<Bucket> {
        &self.directory
    }

    /// Returns the mirror.
    #[must_use]
    pub fn mirror(&self) -> &Arc<dyn RemoteMirror> {
        &self.mirror
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("config", &self.config)
            .field("directory", &self.directory)
            .finish_non_exhaustive()
    }
}

fn unavailable(index: usize, err: &CoreError) -> OperationResult {
    warn!(bucket = index, error = %err, "operation failed on storage");
    let cause = match err {
        CoreError::StorageUnavailable { message, .. } => message.clone(),
        other => other.to_string(),
    };
    OperationResult::new(
        Outcome::StorageUnavailable,
        format!("Storage unavailable for bucket {index}: {cause}"),
    )
}

/// A once-only construction handle for a shared [`Manager`].
///
/// The first [`get_or_init`](Self::get_or_init) builds the manager; every
/// later call returns the same instance and ignores its configuration.
/// Concurrent first calls are serialized, so only one manager is built.
#[derive(Debug, Default)]
pub struct ManagerCell {
    inner: Mutex<Option<Arc<Manager>>>,
}

impl ManagerCell {
    /// Creates an empty cell.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the manager, opening it with `config` on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the first open fails. The cell stays empty and a
    /// later call may retry.
    pub fn get_or_init(&self, config: Config) -> CoreResult<Arc<Manager>> {
        let mut slot = self.inner.lock();
        if let Some(manager) = slot.as_ref() {
            debug!("manager already initialized, ignoring configuration");
            return Ok(Arc::clone(manager));
        }

        let manager = Arc::new(Manager::open(config)?);
        *slot = Some(Arc::clone(&manager));
        Ok(manager)
    }

    /// Returns the manager if it has been initialized.
    #[must_use]
    pub fn get(&self) -> Option<Arc<Manager>> {
        self.inner.lock().clone()
    }
}
