//! Benchmark utilities.

#![deny(unsafe_code)]
#![warn(missing_docs)]

use hashkv_core::{Config, Key, Manager};
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::collections::BTreeMap;

/// Generate a random alphanumeric value of the specified length.
pub fn random_value(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generate a snapshot of `count` integer keys with random values.
pub fn generate_snapshot(count: usize, value_len: usize) -> BTreeMap<Key, String> {
    (0..count as i64)
        .map(|k| (Key::Int(k), random_value(value_len)))
        .collect()
}

/// Opens an in-memory store holding integer keys `0..count`.
pub fn populated_manager(buckets: usize, count: i64, value_len: usize) -> Manager {
    let manager = Manager::open(Config::new().bucket_count(buckets))
        .expect("Failed to open benchmark store");
    for key in 0..count {
        manager.insert(key, random_value(value_len));
    }
    manager
}
