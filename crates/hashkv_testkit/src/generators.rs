//! Property-based test generators using proptest.
//!
//! Provides strategies for generating keys, values and operation sequences.

use hashkv_core::{Key, KeyValue};
use proptest::prelude::*;

/// Strategy for integer keys, biased towards small magnitudes so that
/// inserts collide often enough to exercise duplicate handling.
pub fn int_key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![
        3 => (-64i64..64).prop_map(Key::Int),
        1 => any::<i64>().prop_map(Key::Int),
    ]
}

/// Strategy for text keys, including non-ASCII text.
pub fn text_key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![
        prop::string::string_regex("[a-zA-Z][a-zA-Z0-9_]{0,15}")
            .expect("Invalid regex")
            .prop_map(Key::Text),
        "\\PC{1,8}".prop_map(Key::Text),
    ]
}

/// Strategy for any key.
pub fn key_strategy() -> impl Strategy<Value = Key> {
    prop_oneof![int_key_strategy(), text_key_strategy()]
}

/// Strategy for values: printable text, possibly empty.
pub fn value_strategy() -> impl Strategy<Value = String> {
    "\\PC{0,64}"
}

/// Strategy for records.
pub fn record_strategy() -> impl Strategy<Value = KeyValue> {
    (key_strategy(), value_strategy()).prop_map(|(key, value)| KeyValue::new(key, value))
}

/// A single manager operation.
#[derive(Debug, Clone)]
pub enum Operation {
    /// Insert a key.
    Insert(Key, String),
    /// Delete a key.
    Delete(Key),
    /// Search a key.
    Search(Key),
}

/// Strategy for operations over a small integer keyspace.
pub fn operation_strategy() -> impl Strategy<Value = Operation> {
    let key = (-16i64..16).prop_map(Key::Int);
    prop_oneof![
        2 => (key.clone(), value_strategy()).prop_map(|(k, v)| Operation::Insert(k, v)),
        1 => key.clone().prop_map(Operation::Delete),
        1 => key.prop_map(Operation::Search),
    ]
}

/// Strategy for operation sequences.
pub fn operation_sequence_strategy(max_len: usize) -> impl Strategy<Value = Vec<Operation>> {
    prop::collection::vec(operation_strategy(), 0..max_len)
}
