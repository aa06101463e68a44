//! Local artifact trait definition.

use crate::error::StorageResult;

/// The local copy of one bucket's serialized snapshot.
///
/// Artifacts are **whole-value stores**: every write replaces the previous
/// content entirely. A bucket never appends to or patches its artifact.
///
/// # Invariants
///
/// - `read_all` returns exactly the bytes of the last successful `replace`
/// - a missing or never-written artifact reads as empty, not as an error
/// - a failed `replace` leaves the previous content readable
///
/// # Implementors
///
/// - [`super::FileArtifact`] - For persistent storage
/// - [`super::InMemoryArtifact`] - For testing
pub trait ArtifactBackend: Send + Sync {
    /// Reads the complete artifact content.
    ///
    /// # Errors
    ///
    /// Returns an error if an I/O error occurs.
    fn read_all(&self) -> StorageResult<Vec<u8>>;

    /// Replaces the artifact content with `data`.
    ///
    /// # Errors
    ///
    /// Returns an error if the new content cannot be made durable.
    fn replace(&mut self, data: &[u8]) -> StorageResult<()>;

    /// Returns the current artifact size in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> StorageResult<u64>;

    /// Empties the artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact cannot be truncated.
    fn clear(&mut self) -> StorageResult<()> {
        self.replace(&[])
    }
}
