//! # HashKV Codec
//!
//! CBOR snapshot encoding/decoding for HashKV buckets.
//!
//! A bucket serializes its entire key/value mapping into one snapshot on
//! every write and decodes it again on every refresh. This crate owns that
//! byte format so the storage layer can stay opaque and the bucket logic
//! never touches CBOR directly.
//!
//! ## Usage
//!
//! ```
//! use hashkv_codec::{Decode, Encode};
//! use std::collections::BTreeMap;
//!
//! let mut snapshot = BTreeMap::new();
//! snapshot.insert(5_i64, "x".to_string());
//!
//! let bytes = snapshot.encode().unwrap();
//! let decoded = BTreeMap::<i64, String>::decode(&bytes).unwrap();
//! assert_eq!(snapshot, decoded);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod envelope;
mod error;

pub use envelope::{decode_snapshot, encode_snapshot, SNAPSHOT_VERSION};
pub use error::{CodecError, CodecResult};

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Trait for types that can be encoded to snapshot bytes.
pub trait Encode {
    /// Encode this value to snapshot bytes.
    fn encode(&self) -> CodecResult<Vec<u8>>;
}

/// Trait for types that can be decoded from snapshot bytes.
pub trait Decode: Sized {
    /// Decode this value from snapshot bytes.
    fn decode(bytes: &[u8]) -> CodecResult<Self>;
}

impl<K, V> Encode for BTreeMap<K, V>
where
    K: Serialize,
    V: Serialize,
{
    fn encode(&self) -> CodecResult<Vec<u8>> {
        encode_snapshot(self.iter())
    }
}

impl<K, V> Decode for BTreeMap<K, V>
where
    K: DeserializeOwned + Ord,
    V: DeserializeOwned,
{
    fn decode(bytes: &[u8]) -> CodecResult<Self> {
        Ok(decode_snapshot(bytes)?.into_iter().collect())
    }
}

impl<K, V> Encode for HashMap<K, V>
where
    K: Serialize,
    V: Serialize,
{
    fn encode(&self) -> CodecResult<Vec<u8>> {
        encode_snapshot(self.iter())
    }
}

impl<K, V> Decode for HashMap<K, V>
where
    K: DeserializeOwned + Eq + Hash,
    V: DeserializeOwned,
{
    fn decode(bytes: &[u8]) -> CodecResult<Self> {
        Ok(decode_snapshot(bytes)?.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn btree_snapshot_survives_encoding() {
        let mut snapshot = BTreeMap::new();
        snapshot.insert(-3_i64, "minus three".to_string());
        snapshot.insert(2, String::new());
        snapshot.insert(1 << 40, "large".to_string());

        let bytes = snapshot.encode().unwrap();
        assert_eq!(BTreeMap::<i64, String>::decode(&bytes).unwrap(), snapshot);
    }

    #[test]
    fn hashmap_and_btree_share_format() {
        let mut hashed = HashMap::new();
        hashed.insert("k".to_string(), "v".to_string());

        let bytes = hashed.encode().unwrap();
        let ordered = BTreeMap::<String, String>::decode(&bytes).unwrap();
        assert_eq!(ordered.get("k").map(String::as_str), Some("v"));
    }

    #[test]
    fn duplicate_keys_keep_last() {
        let pairs = vec![(1_i64, "old".to_string()), (1, "new".to_string())];
        let bytes = encode_snapshot(pairs.iter().map(|(k, v)| (k, v))).unwrap();

        let decoded = BTreeMap::<i64, String>::decode(&bytes).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[&1], "new");
    }

    proptest! {
        #[test]
        fn arbitrary_text_values_survive(
            entries in prop::collection::btree_map(any::<i64>(), ".*", 0..32)
        ) {
            let bytes = entries.encode().unwrap();
            let decoded = BTreeMap::<i64, String>::decode(&bytes).unwrap();
            prop_assert_eq!(decoded, entries);
        }
    }
}
