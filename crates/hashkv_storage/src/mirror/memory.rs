//! In-memory mirror.

use super::{validate_name, RemoteMirror};
use crate::error::StorageResult;
use parking_lot::RwLock;
use std::collections::HashMap;

/// A mirror that keeps every artifact in process memory.
///
/// Data does not survive the process. Useful for tests and for stores whose
/// durability comes from the local artifacts alone.
#[derive(Debug, Default)]
pub struct InMemoryMirror {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryMirror {
    /// Creates an empty mirror.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    /// Returns true if nothing has been pushed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    /// Removes an artifact, returning whether it existed.
    pub fn remove(&self, name: &str) -> bool {
        self.objects.write().remove(name).is_some()
    }
}

impl RemoteMirror for InMemoryMirror {
    fn push(&self, name: &str, data: &[u8]) -> StorageResult<()> {
        validate_name(name)?;
        self.objects.write().insert(name.to_string(), data.to_vec());
        Ok(())
    }

    fn pull(&self, name: &str) -> StorageResult<Option<Vec<u8>>> {
        validate_name(name)?;
        Ok(self.objects.read().get(name).cloned())
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        let mut names: Vec<String> = self.objects.read().keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;

    #[test]
    fn pull_missing_is_none() {
        let mirror = InMemoryMirror::new();
        assert_eq!(mirror.pull("bucket0.txt").unwrap(), None);
        assert!(mirror.is_empty());
    }

    #[test]
    fn push_then_pull() {
        let mirror = InMemoryMirror::new();
        mirror.push("bucket0.txt", b"one").unwrap();
        mirror.push("bucket0.txt", b"two").unwrap();

        assert_eq!(mirror.pull("bucket0.txt").unwrap(), Some(b"two".to_vec()));
        assert_eq!(mirror.len(), 1);
    }

    #[test]
    fn list_is_sorted() {
        let mirror = InMemoryMirror::new();
        mirror.push("bucket2.txt", b"").unwrap();
        mirror.push("bucket0.txt", b"").unwrap();
        mirror.push("bucket1.txt", b"").unwrap();

        assert_eq!(
            mirror.list().unwrap(),
            vec!["bucket0.txt", "bucket1.txt", "bucket2.txt"]
        );
    }

    #[test]
    fn remove_artifact() {
        let mirror = InMemoryMirror::new();
        mirror.push("bucket0.txt", b"x").unwrap();
        assert!(mirror.remove("bucket0.txt"));
        assert!(!mirror.remove("bucket0.txt"));
        assert_eq!(mirror.pull("bucket0.txt").unwrap(), None);
    }

    #[test]
    fn rejects_bad_names() {
        let mirror = InMemoryMirror::new();
        let result = mirror.push("../outside", b"x");
        assert!(matches!(result, Err(StorageError::InvalidName { .. })));
    }
}
