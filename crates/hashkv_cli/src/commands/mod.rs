//! CLI command implementations.

pub mod entry;
pub mod inspect;
pub mod list;
pub mod load;
pub mod range;

use hashkv_core::{Config, CoreError, Manager, MirrorConfig, SyncPolicy};
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Errors reported by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Store error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Failed to write output.
    #[error("output error: {0}")]
    Io(#[from] io::Error),

    /// Failed to render JSON.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to read an input file.
    #[error("cannot read {}: {source}", path.display())]
    Input {
        /// The file that could not be read.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// A bulk-load line is not `key:value`.
    #[error("line {line}: expected key:value, got {content:?}")]
    MalformedLine {
        /// One-based line number.
        line: usize,
        /// The offending line.
        content: String,
    },

    /// Unknown `--format` value.
    #[error("unknown output format: {0} (expected text or json)")]
    UnknownFormat(String),
}

/// Store options shared by every command.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Local artifact directory.
    pub data_dir: Option<PathBuf>,
    /// Mirror directory.
    pub mirror_dir: Option<PathBuf>,
    /// Number of buckets.
    pub buckets: usize,
    /// Use the lenient sync policy.
    pub lenient: bool,
}

impl StoreOptions {
    /// Builds the store configuration.
    pub fn config(&self) -> Config {
        let mut config = Config::new().bucket_count(self.buckets).sync_policy(if self.lenient {
            SyncPolicy::Lenient
        } else {
            SyncPolicy::Strict
        });
        if let Some(dir) = &self.data_dir {
            config = config.data_dir(dir);
        }
        if let Some(dir) = &self.mirror_dir {
            config = config.mirror(MirrorConfig::Directory(dir.clone()));
        }
        config
    }

    /// Opens the store.
    pub fn open(&self) -> Result<Manager, CliError> {
        if self.mirror_dir.is_none() {
            warn!("no --mirror-dir given, changes are lost when the command exits");
        }
        Ok(Manager::open(self.config())?)
    }
}

/// Prints version information.
pub fn version(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "HashKV CLI v{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(mirror: Option<PathBuf>) -> StoreOptions {
        StoreOptions {
            data_dir: None,
            mirror_dir: mirror,
            buckets: 4,
            lenient: false,
        }
    }

    #[test]
    fn config_from_options() {
        let mut opts = options(Some(PathBuf::from("/mnt/share")));
        opts.lenient = true;
        opts.buckets = 7;

        let config = opts.config();
        assert_eq!(config.bucket_count, 7);
        assert_eq!(config.sync_policy, SyncPolicy::Lenient);
        assert_eq!(
            config.mirror,
            MirrorConfig::Directory(PathBuf::from("/mnt/share"))
        );
    }

    #[test]
    fn version_line() {
        let mut out = Vec::new();
        version(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("HashKV CLI v"));
    }

    #[test]
    fn zero_buckets_fail_to_open() {
        let mut opts = options(None);
        opts.buckets = 0;
        assert!(matches!(opts.open(), Err(CliError::Core(_))));
    }
}
