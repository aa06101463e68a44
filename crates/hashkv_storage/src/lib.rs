//! # HashKV Storage
//!
//! Storage primitives for HashKV buckets.
//!
//! This crate provides the two byte-level stores a bucket synchronises
//! against. Neither interprets the bytes it holds:
//!
//! - **Artifacts** ([`ArtifactBackend`]): the bucket's local copy of its
//!   last synced snapshot, replaced as a whole on every write.
//! - **Mirrors** ([`RemoteMirror`]): the remote blob store holding the
//!   durable copy of every bucket, addressed by artifact name.
//!
//! ## Available Backends
//!
//! - [`FileArtifact`] / [`InMemoryArtifact`] - local artifacts
//! - [`DirectoryMirror`] - a mirror backed by a shared directory
//! - [`InMemoryMirror`] - a mirror for tests and ephemeral stores
//!
//! ## Example
//!
//! ```rust
//! use hashkv_storage::{InMemoryMirror, RemoteMirror};
//!
//! let mirror = InMemoryMirror::new();
//! assert_eq!(mirror.pull("bucket0.txt").unwrap(), None);
//!
//! mirror.push("bucket0.txt", b"snapshot").unwrap();
//! assert_eq!(mirror.pull("bucket0.txt").unwrap().as_deref(), Some(&b"snapshot"[..]));
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod artifact;
mod error;
mod file;
mod memory;
mod mirror;

pub use artifact::ArtifactBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileArtifact;
pub use memory::InMemoryArtifact;
pub use mirror::{validate_name, DirectoryMirror, InMemoryMirror, RemoteMirror};
