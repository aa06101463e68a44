//! Store configuration.

use crate::bucket::SyncPolicy;
use crate::error::{CoreError, CoreResult};
use std::path::PathBuf;

/// Default number of buckets in a directory.
pub const DEFAULT_BUCKET_COUNT: usize = 4;

/// Default limit on the number of keys a range query may scan.
pub const DEFAULT_MAX_RANGE_SPAN: u64 = 100_000;

/// Where bucket snapshots are mirrored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MirrorConfig {
    /// Keep the mirror in process memory.
    #[default]
    InMemory,
    /// Mirror into a (possibly shared) directory.
    Directory(PathBuf),
}

/// Configuration for opening a store.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of buckets. Fixed for the lifetime of the store.
    pub bucket_count: usize,

    /// Directory for local artifacts. `None` keeps artifacts in memory.
    pub data_dir: Option<PathBuf>,

    /// Remote mirror backend.
    pub mirror: MirrorConfig,

    /// How buckets react to artifact and mirror failures.
    pub sync_policy: SyncPolicy,

    /// Maximum number of keys a single range query may scan.
    pub max_range_span: u64,

    /// Whether to create the data directory if it doesn't exist.
    pub create_if_missing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bucket_count: DEFAULT_BUCKET_COUNT,
            data_dir: None,
            mirror: MirrorConfig::InMemory,
            sync_policy: SyncPolicy::Strict,
            max_range_span: DEFAULT_MAX_RANGE_SPAN,
            create_if_missing: true,
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of buckets.
    #[must_use]
    pub const fn bucket_count(mut self, count: usize) -> Self {
        self.bucket_count = count;
        self
    }

    /// Sets the local artifact directory.
    #[must_use]
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    /// Sets the mirror backend.
    #[must_use]
    pub fn mirror(mut self, mirror: MirrorConfig) -> Self {
        self.mirror = mirror;
        self
    }

    /// Sets the sync policy.
    #[must_use]
    pub const fn sync_policy(mut self, policy: SyncPolicy) -> Self {
        self.sync_policy = policy;
        self
    }

    /// Sets the maximum range query span.
    #[must_use]
    pub const fn max_range_span(mut self, span: u64) -> Self {
        self.max_range_span = span;
        self
    }

    /// Sets whether to create the data directory if missing.
    #[must_use]
    pub const fn create_if_missing(mut self, value: bool) -> Self {
        self.create_if_missing = value;
        self
    }

    /// Checks the configuration for values the store cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if the bucket count or range
    /// span is zero, or if the mirror directory is the data directory.
    pub fn validate(&self) -> CoreResult<()> {
        if self.bucket_count == 0 {
            return Err(CoreError::invalid_config("bucket count must be positive"));
        }
        if self.max_range_span == 0 {
            return Err(CoreError::invalid_config("max range span must be positive"));
        }
        if let (Some(data), MirrorConfig::Directory(mirror)) = (&self.data_dir, &self.mirror) {
            if data == mirror {
                return Err(CoreError::invalid_config(format!(
                    "mirror directory must differ from data directory: {}",
                    data.display()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.bucket_count, 4);
        assert_eq!(config.mirror, MirrorConfig::InMemory);
        assert_eq!(config.sync_policy, SyncPolicy::Strict);
        assert!(config.data_dir.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_pattern() {
        let config = Config::new()
            .bucket_count(8)
            .sync_policy(SyncPolicy::Lenient)
            .max_range_span(10)
            .data_dir("/var/lib/hashkv");

        assert_eq!(config.bucket_count, 8);
        assert_eq!(config.sync_policy, SyncPolicy::Lenient);
        assert_eq!(config.max_range_span, 10);
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/hashkv")));
    }

    #[test]
    fn zero_buckets_rejected() {
        let result = Config::new().bucket_count(0).validate();
        assert!(matches!(result, Err(CoreError::InvalidConfig { .. })));
    }

    #[test]
    fn shared_data_and_mirror_dir_rejected() {
        let result = Config::new()
            .data_dir("/srv/kv")
            .mirror(MirrorConfig::Directory(PathBuf::from("/srv/kv")))
            .validate();
        assert!(matches!(result, Err(CoreError::InvalidConfig { .. })));
    }
}
