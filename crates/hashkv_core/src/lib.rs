//! # HashKV Core
//!
//! Partitioning and persistence engine for HashKV.
//!
//! This crate provides:
//! - Key routing over a fixed table of buckets
//! - Snapshot buckets synced with a remote mirror on every operation
//! - Key-file buckets storing one local file per key
//! - The [`Manager`] facade producing [`OperationResult`]s
//!
//! ## Example
//!
//! ```rust
//! use hashkv_core::{Config, Manager};
//!
//! let manager = Manager::open(Config::default().bucket_count(4)).unwrap();
//! assert!(manager.insert(2, "a").succeeded);
//! assert!(manager.insert(6, "b").succeeded);
//! assert_eq!(manager.range_query(0, 10).unwrap(), vec!["2 : a", "6 : b"]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod bucket;
mod config;
mod dir;
mod directory;
mod error;
mod key;
mod key_file_store;
mod manager;
mod record;
mod result;
mod stats;

pub use bucket::{artifact_name, Bucket, BucketStore, KeyFileBucket, SyncPolicy};
pub use config::{Config, MirrorConfig, DEFAULT_BUCKET_COUNT, DEFAULT_MAX_RANGE_SPAN};
pub use dir::DataDir;
pub use directory::Directory;
pub use error::{CoreError, CoreResult};
pub use key::{text_hash, Key};
pub use key_file_store::{KeyFileStore, GENERATED_KEY_LEN};
pub use manager::{Manager, ManagerCell};
pub use record::KeyValue;
pub use result::{OperationResult, Outcome};
pub use stats::{BucketStats, StoreStats};

// Re-export the storage types callers need to build custom mirrors.
pub use hashkv_storage::{
    DirectoryMirror, InMemoryMirror, RemoteMirror, StorageError, StorageResult,
};
