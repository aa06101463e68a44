//! In-memory artifact for testing.

use crate::artifact::ArtifactBackend;
use crate::error::StorageResult;
use parking_lot::RwLock;

/// An in-memory artifact.
///
/// Used when a store runs without a data directory:
/// - Unit tests
/// - Integration tests
/// - Ephemeral stores whose only durable copy lives in the mirror
///
/// # Example
///
/// ```rust
/// use hashkv_storage::{ArtifactBackend, InMemoryArtifact};
///
/// let mut artifact = InMemoryArtifact::new();
/// artifact.replace(b"test data").unwrap();
/// assert_eq!(artifact.size().unwrap(), 9);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryArtifact {
    data: RwLock<Vec<u8>>,
}

impl InMemoryArtifact {
    /// Creates a new empty in-memory artifact.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an artifact holding pre-existing data.
    ///
    /// Useful for testing stale-fallback scenarios.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Returns a copy of the artifact content.
    #[must_use]
    pub fn data(&self) -> Vec<u8> {
        self.data.read().clone()
    }
}

impl ArtifactBackend for InMemoryArtifact {
    fn read_all(&self) -> StorageResult<Vec<u8>> {
        Ok(self.data.read().clone())
    }

    fn replace(&mut self, new_data: &[u8]) -> StorageResult<()> {
        let mut data = self.data.write();
        data.clear();
        data.extend_from_slice(new_data);
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(self.data.read().len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_new_is_empty() {
        let artifact = InMemoryArtifact::new();
        assert_eq!(artifact.size().unwrap(), 0);
        assert!(artifact.data().is_empty());
    }

    #[test]
    fn memory_replace_overwrites() {
        let mut artifact = InMemoryArtifact::new();
        artifact.replace(b"hello world").unwrap();
        artifact.replace(b"bye").unwrap();

        assert_eq!(artifact.read_all().unwrap(), b"bye");
        assert_eq!(artifact.size().unwrap(), 3);
    }

    #[test]
    fn memory_with_data() {
        let artifact = InMemoryArtifact::with_data(b"preloaded".to_vec());
        assert_eq!(artifact.read_all().unwrap(), b"preloaded");
    }

    #[test]
    fn memory_clear() {
        let mut artifact = InMemoryArtifact::with_data(b"some data".to_vec());
        artifact.clear().unwrap();
        assert_eq!(artifact.size().unwrap(), 0);
    }
}
