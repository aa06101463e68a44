//! Snapshot bucket: the whole partition is pulled, mutated and pushed back
//! as one artifact per operation.

use super::{artifact_name, BucketStore, SyncPolicy};
use crate::error::{CoreError, CoreResult};
use crate::key::Key;
use crate::record::KeyValue;
use hashkv_codec::{Decode, Encode};
use hashkv_storage::{ArtifactBackend, InMemoryArtifact, RemoteMirror};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

type Snapshot = BTreeMap<Key, String>;

/// State guarded by the bucket gate.
struct BucketState {
    snapshot: Snapshot,
    artifact: Box<dyn ArtifactBackend>,
}

/// A bucket that keeps its partition as a single snapshot.
///
/// Every operation runs as a small transaction under the bucket's gate:
///
/// 1. Pull the bucket artifact from the mirror and replace the snapshot
/// 2. Apply the read or mutation
/// 3. For mutations, write the local artifact and push it to the mirror
///
/// The mirror is the source of truth. The local artifact is a copy of the
/// last synced snapshot, used as a fallback under [`SyncPolicy::Lenient`].
///
/// Operations on the same bucket are totally ordered. Different buckets
/// never contend.
pub struct Bucket {
    index: usize,
    mirror_name: String,
    mirror: Arc<dyn RemoteMirror>,
    policy: SyncPolicy,
    state: Mutex<BucketState>,
}

impl Bucket {
    /// Creates a bucket over a local artifact and a mirror.
    pub fn new(
        index: usize,
        artifact: Box<dyn ArtifactBackend>,
        mirror: Arc<dyn RemoteMirror>,
        policy: SyncPolicy,
    ) -> Self {
        Self {
            index,
            mirror_name: artifact_name(index),
            mirror,
            policy,
            state: Mutex::new(BucketState {
                snapshot: Snapshot::new(),
                artifact,
            }),
        }
    }

    /// Creates a bucket whose local artifact lives in memory.
    pub fn in_memory(index: usize, mirror: Arc<dyn RemoteMirror>, policy: SyncPolicy) -> Self {
        Self::new(index, Box::new(InMemoryArtifact::new()), mirror, policy)
    }

    /// Returns the artifact name used in the mirror.
    #[must_use]
    pub fn mirror_name(&self) -> &str {
        &self.mirror_name
    }

    /// Returns the sync policy.
    #[must_use]
    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    /// Returns the number of keys after a refresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh fails under [`SyncPolicy::Strict`].
    pub fn len(&self) -> CoreResult<usize> {
        let mut state = self.state.lock();
        self.refresh(&mut state)?;
        Ok(state.snapshot.len())
    }

    /// Returns true if the bucket holds no keys after a refresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh fails under [`SyncPolicy::Strict`].
    pub fn is_empty(&self) -> CoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Returns the refreshed records in key order.
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh fails under [`SyncPolicy::Strict`].
    pub fn records(&self) -> CoreResult<Vec<KeyValue>> {
        let mut state = self.state.lock();
        self.refresh(&mut state)?;
        Ok(state
            .snapshot
            .iter()
            .map(|(k, v)| KeyValue::new(k.clone(), v.clone()))
            .collect())
    }

    /// Replaces the snapshot with the mirror's copy.
    ///
    /// A missing remote artifact means an empty bucket. Under
    /// [`SyncPolicy::Strict`] a failure leaves the snapshot untouched.
    fn refresh(&self, state: &mut BucketState) -> CoreResult<()> {
        let pulled = self
            .mirror
            .pull(&self.mirror_name)
            .map_err(CoreError::from)
            .and_then(|bytes| {
                let snapshot = match &bytes {
                    Some(data) => Snapshot::decode(data)?,
                    None => Snapshot::new(),
                };
                Ok((bytes, snapshot))
            });

        match pulled {
            Ok((bytes, snapshot)) => {
                let written = match &bytes {
                    Some(data) => state.artifact.replace(data),
                    None => state.artifact.clear(),
                };
                if let Err(err) = written {
                    self.absorb("local artifact write failed", err.into())?;
                }
                debug!(bucket = self.index, keys = snapshot.len(), "snapshot refreshed");
                state.snapshot = snapshot;
            }
            Err(err) => {
                self.absorb("mirror pull failed", err)?;
                state.snapshot = self.load_local(state.artifact.as_ref());
            }
        }
        Ok(())
    }

    /// Writes the snapshot to the local artifact, then pushes the same bytes.
    fn persist(&self, state: &mut BucketState) -> CoreResult<()> {
        let bytes = match state.snapshot.encode() {
            Ok(bytes) => bytes,
            Err(err) => return self.absorb("snapshot encoding failed", err.into()),
        };

        if let Err(err) = state.artifact.replace(&bytes) {
            self.absorb("local artifact write failed", err.into())?;
        }
        if let Err(err) = self.mirror.push(&self.mirror_name, &bytes) {
            self.absorb("mirror push failed", err.into())?;
        }

        debug!(bucket = self.index, size = bytes.len(), "snapshot persisted");
        Ok(())
    }

    /// Rewrites the local artifact from the current snapshot after a
    /// mutation was rolled back, so it never holds a rejected write.
    fn restore_artifact(&self, state: &mut BucketState) {
        let restored = state
            .snapshot
            .encode()
            .map_err(CoreError::from)
            .and_then(|bytes| state.artifact.replace(&bytes).map_err(CoreError::from));

        if let Err(err) = restored {
            warn!(bucket = self.index, error = %err, "local artifact restore failed");
        }
    }

    /// Stale fallback for lenient refreshes.
    fn load_local(&self, artifact: &dyn ArtifactBackend) -> Snapshot {
        let loaded = artifact
            .read_all()
            .map_err(CoreError::from)
            .and_then(|data| Snapshot::decode(&data).map_err(CoreError::from));

        match loaded {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(bucket = self.index, error = %err, "local artifact unreadable, using empty snapshot");
                Snapshot::new()
            }
        }
    }

    /// Applies the sync policy to a failed step.
    fn absorb(&self, step: &str, err: CoreError) -> CoreResult<()> {
        match self.policy {
            SyncPolicy::Strict => Err(CoreError::storage_unavailable(
                self.index,
                format!("{step}: {err}"),
            )),
            SyncPolicy::Lenient => {
                warn!(bucket = self.index, error = %err, "{step}, continuing");
                Ok(())
            }
        }
    }
}

impl BucketStore for Bucket {
    fn index(&self) -> usize {
        self.index
    }

    fn add(&self, record: KeyValue) -> CoreResult<bool> {
        let mut state = self.state.lock();
        self.refresh(&mut state)?;

        let (key, value) = record.into_parts();
        if state.snapshot.contains_key(&key) {
            debug!(bucket = self.index, key = %key, "duplicate key");
            return Ok(false);
        }

        state.snapshot.insert(key.clone(), value);
        if let Err(err) = self.persist(&mut state) {
            state.snapshot.remove(&key);
            self.restore_artifact(&mut state);
            return Err(err);
        }

        info!(bucket = self.index, key = %key, "entry stored");
        Ok(true)
    }

    fn delete(&self, key: &Key) -> CoreResult<bool> {
        let mut state = self.state.lock();
        self.refresh(&mut state)?;

        let Some(previous) = state.snapshot.remove(key) else {
            debug!(bucket = self.index, key = %key, "delete of missing key");
            return Ok(false);
        };

        if let Err(err) = self.persist(&mut state) {
            state.snapshot.insert(key.clone(), previous);
            self.restore_artifact(&mut state);
            return Err(err);
        }

        info!(bucket = self.index, key = %key, "entry deleted");
        Ok(true)
    }

    fn get(&self, key: &Key) -> CoreResult<Option<KeyValue>> {
        let mut state = self.state.lock();
        self.refresh(&mut state)?;

        let found = state
            .snapshot
            .get(key)
            .map(|value| KeyValue::new(key.clone(), value.clone()));
        debug!(bucket = self.index, key = %key, found = found.is_some(), "lookup");
        Ok(found)
    }

    fn entries(&self) -> CoreResult<Vec<String>> {
        let mut state = self.state.lock();
        self.refresh(&mut state)?;

        Ok(state
            .snapshot
            .iter()
            .map(|(k, v)| format!("{k} : {v}"))
            .collect())
    }
}

impl fmt::Debug for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bucket")
            .field("index", &self.index)
            .field("mirror_name", &self.mirror_name)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
