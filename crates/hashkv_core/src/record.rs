//! Key/value records.

use crate::key::Key;
use std::fmt;

/// An immutable key/value pair.
///
/// Renders as `"<key> : <value>"`, the form used by listings and range
/// queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    key: Key,
    value: String,
}

impl KeyValue {
    /// Creates a new record.
    pub fn new(key: impl Into<Key>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Returns the key.
    #[must_use]
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Returns the value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Splits the record into key and value.
    #[must_use]
    pub fn into_parts(self) -> (Key, String) {
        (self.key, self.value)
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.key, self.value)
    }
}
