//! Per-bucket statistics.

use serde::Serialize;

/// Snapshot of one bucket's state, as reported by inspection tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketStats {
    /// Bucket index.
    pub index: usize,
    /// Artifact name in the mirror.
    pub mirror_name: String,
    /// Number of keys after a refresh.
    pub keys: usize,
    /// Whether the mirror currently holds the bucket's artifact.
    pub mirrored: bool,
}

/// Store-wide statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// Number of buckets.
    pub bucket_count: usize,
    /// Total number of keys.
    pub total_keys: usize,
    /// Per-bucket details in index order.
    pub buckets: Vec<BucketStats>,
}

impl StoreStats {
    /// Builds store statistics from per-bucket entries.
    #[must_use]
    pub fn from_buckets(buckets: Vec<BucketStats>) -> Self {
        Self {
            bucket_count: buckets.len(),
            total_keys: buckets.iter().map(|b| b.keys).sum(),
            buckets,
        }
    }
}
