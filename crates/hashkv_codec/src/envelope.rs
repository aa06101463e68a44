//! Versioned snapshot envelope.
//!
//! A snapshot is stored as a CBOR map:
//!
//! ```text
//! { "version": 1, "entries": [[key, value], [key, value], ...] }
//! ```
//!
//! Entries are written in the iteration order of the source mapping. The
//! version is checked before the entries are interpreted, so a future
//! layout change fails loudly instead of decoding garbage.

use crate::error::{CodecError, CodecResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Snapshot format version written by this build.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, K, V> {
    version: u32,
    entries: Vec<(&'a K, &'a V)>,
}

#[derive(Deserialize)]
struct RawEnvelope {
    version: u32,
    entries: ciborium::value::Value,
}

/// Encode key/value pairs into snapshot bytes.
///
/// # Errors
///
/// Returns an error if a key or value cannot be serialized.
pub fn encode_snapshot<'a, K, V, I>(entries: I) -> CodecResult<Vec<u8>>
where
    K: Serialize + 'a,
    V: Serialize + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    let envelope = EnvelopeRef {
        version: SNAPSHOT_VERSION,
        entries: entries.into_iter().collect(),
    };

    let mut buffer = Vec::new();
    ciborium::ser::into_writer(&envelope, &mut buffer)
        .map_err(|e| CodecError::encoding_failed(e.to_string()))?;
    Ok(buffer)
}

/// Decode snapshot bytes into key/value pairs.
///
/// Empty input decodes to an empty list: an artifact that was created but
/// never written holds no entries.
///
/// # Errors
///
/// Returns an error if the bytes are not a snapshot envelope, if the
/// version is unsupported, or if an entry does not match `K`/`V`.
pub fn decode_snapshot<K, V>(bytes: &[u8]) -> CodecResult<Vec<(K, V)>>
where
    K: DeserializeOwned,
    V: DeserializeOwned,
{
    if bytes.is_empty() {
        return Ok(Vec::new());
    }

    let raw: RawEnvelope = ciborium::de::from_reader(bytes)
        .map_err(|e| CodecError::decoding_failed(e.to_string()))?;

    if raw.version != SNAPSHOT_VERSION {
        return Err(CodecError::UnsupportedVersion {
            found: raw.version,
            expected: SNAPSHOT_VERSION,
        });
    }

    raw.entries
        .deserialized()
        .map_err(|e| CodecError::decoding_failed(e.to_string()))
}
