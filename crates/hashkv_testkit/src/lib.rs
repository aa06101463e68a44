//! # HashKV Testkit
//!
//! Test utilities for HashKV.
//!
//! This crate provides:
//! - Store fixtures backed by memory or temporary directories
//! - Fault-injecting and instrumented mirrors
//! - Property-based test generators using proptest
//! - Stress testing utilities for concurrent workloads
//!
//! ## Usage
//!
//! ```rust
//! use hashkv_testkit::prelude::*;
//!
//! with_temp_store(|store| {
//!     assert!(store.insert(5, "x").succeeded);
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod mirrors;
pub mod stress;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::mirrors::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use mirrors::*;
pub use stress::*;
