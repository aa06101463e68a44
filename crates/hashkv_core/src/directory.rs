//! Fixed-size bucket table and key routing.

use crate::bucket::{Bucket, BucketStore};
use crate::error::{CoreError, CoreResult};
use crate::key::Key;

/// An ordered table of buckets with deterministic key routing.
///
/// The bucket count is fixed at construction. Routing is a pure function of
/// the key and the bucket count, so a key always lands in the same bucket.
#[derive(Debug)]
pub struct Directory<B: BucketStore = Bucket> {
    buckets: Vec<B>,
}

impl<B: BucketStore> Directory<B> {
    /// Creates a directory over the given buckets.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if `buckets` is empty or a
    /// bucket's index does not match its position.
    pub fn new(buckets: Vec<B>) -> CoreResult<Self> {
        if buckets.is_empty() {
            return Err(CoreError::invalid_config("directory needs at least one bucket"));
        }
        if let Some((position, bucket)) = buckets
            .iter()
            .enumerate()
            .find(|(position, bucket)| bucket.index() != *position)
        {
            return Err(CoreError::invalid_config(format!(
                "bucket at position {position} reports index {}",
                bucket.index()
            )));
        }
        Ok(Self { buckets })
    }

    /// Returns the index of the bucket owning `key`.
    #[must_use]
    pub fn route(&self, key: &Key) -> usize {
        key.bucket_index(self.buckets.len())
    }

    /// Returns the number of buckets.
    #[must_use]
    pub fn size(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the bucket at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::BucketOutOfRange`] if there is no such bucket.
    pub fn bucket(&self, index: usize) -> CoreResult<&B> {
        self.buckets.get(index).ok_or(CoreError::BucketOutOfRange {
            index,
            size: self.buckets.len(),
        })
    }

    /// Returns the bucket owning `key`.
    #[must_use]
    pub fn bucket_for(&self, key: &Key) -> &B {
        &self.buckets[self.route(key)]
    }

    /// Returns all buckets in index order.
    #[must_use]
    pub fn buckets(&self) -> &[B] {
        &self.buckets
    }
}
