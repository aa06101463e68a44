//! Keys and bucket routing.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// A key stored in HashKV.
///
/// Integer keys are the primary keyspace: they route by their own value and
/// support numeric range queries. Text keys route by a 32-bit polynomial
/// string hash.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    /// An integer key.
    Int(i64),
    /// A text key.
    Text(String),
}

impl Key {
    /// Returns the index of the bucket owning this key in a directory of
    /// `buckets` buckets.
    ///
    /// Integer keys use their value modulo the bucket count (Euclidean, so
    /// negative keys still land in `0..buckets`). Text keys use the absolute
    /// value of [`text_hash`].
    ///
    /// # Panics
    ///
    /// Panics if `buckets` is zero. Directories reject that at construction.
    #[must_use]
    pub fn bucket_index(&self, buckets: usize) -> usize {
        assert!(buckets > 0, "bucket count must be positive");
        match self {
            Self::Int(n) => n.rem_euclid(buckets as i64) as usize,
            Self::Text(s) => (u64::from(text_hash(s).unsigned_abs()) % buckets as u64) as usize,
        }
    }

    /// Returns the integer value if this is an integer key.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Text(_) => None,
        }
    }
}

/// 32-bit polynomial hash over UTF-16 code units (`h = 31 * h + unit`).
///
/// Stable across processes and platforms, so a text key always routes to
/// the same bucket for a given directory size.
#[must_use]
pub fn text_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0_i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Self::Int(i64::from(n))
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Parses integers as [`Key::Int`] and everything else as [`Key::Text`].
impl FromStr for Key {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>().map_or_else(|_| Self::Text(s.to_string()), Self::Int))
    }
}
