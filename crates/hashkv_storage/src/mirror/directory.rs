//! Directory-backed mirror.

use super::{validate_name, RemoteMirror};
use crate::error::StorageResult;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix of in-flight upload files. Never listed.
const PARTIAL_PREFIX: &str = ".partial-";

/// A mirror that stores each artifact as a file in one root directory.
///
/// This models a shared file share: every process pointed at the same root
/// sees the same artifacts. Uploads go through a temporary file and a rename
/// so readers never observe a half-written artifact.
///
/// # Example
///
/// ```no_run
/// use hashkv_storage::{DirectoryMirror, RemoteMirror};
/// use std::path::Path;
///
/// let mirror = DirectoryMirror::open(Path::new("/mnt/share/buckets")).unwrap();
/// mirror.push("bucket0.txt", b"snapshot").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct DirectoryMirror {
    root: PathBuf,
}

impl DirectoryMirror {
    /// Opens a mirror rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(root: &Path) -> StorageResult<Self> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl RemoteMirror for DirectoryMirror {
    fn push(&self, name: &str, data: &[u8]) -> StorageResult<()> {
        validate_name(name)?;

        let partial = self.root.join(format!("{PARTIAL_PREFIX}{name}"));
        let mut file = File::create(&partial)?;
        file.write_all(data)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&partial, self.object_path(name))?;
        debug!(name, size = data.len(), "artifact uploaded");
        Ok(())
    }

    fn pull(&self, name: &str) -> StorageResult<Option<Vec<u8>>> {
        validate_name(name)?;

        match fs::read(self.object_path(name)) {
            Ok(data) => {
                debug!(name, size = data.len(), "artifact downloaded");
                Ok(Some(data))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> StorageResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if !name.starts_with(PARTIAL_PREFIX) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn pull_missing_is_none() {
        let dir = tempdir().unwrap();
        let mirror = DirectoryMirror::open(dir.path()).unwrap();
        assert_eq!(mirror.pull("bucket0.txt").unwrap(), None);
    }

    #[test]
    fn push_then_pull() {
        let dir = tempdir().unwrap();
        let mirror = DirectoryMirror::open(dir.path()).unwrap();

        mirror.push("bucket0.txt", b"snapshot v1").unwrap();
        mirror.push("bucket0.txt", b"snapshot v2").unwrap();

        assert_eq!(
            mirror.pull("bucket0.txt").unwrap(),
            Some(b"snapshot v2".to_vec())
        );
    }

    #[test]
    fn shared_between_instances() {
        let dir = tempdir().unwrap();
        let writer = DirectoryMirror::open(dir.path()).unwrap();
        let reader = DirectoryMirror::open(dir.path()).unwrap();

        writer.push("bucket3.txt", b"shared").unwrap();
        assert_eq!(reader.pull("bucket3.txt").unwrap(), Some(b"shared".to_vec()));
    }

    #[test]
    fn list_skips_partial_uploads() {
        let dir = tempdir().unwrap();
        let mirror = DirectoryMirror::open(dir.path()).unwrap();

        mirror.push("bucket1.txt", b"a").unwrap();
        mirror.push("bucket0.txt", b"b").unwrap();
        std::fs::write(dir.path().join(".partial-bucket2.txt"), b"torn").unwrap();
        std::fs::create_dir(dir.path().join("subdir")).unwrap();

        assert_eq!(mirror.list().unwrap(), vec!["bucket0.txt", "bucket1.txt"]);
    }

    #[test]
    fn open_creates_root() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("share").join("buckets");

        let mirror = DirectoryMirror::open(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(mirror.root(), root);
    }

    #[test]
    fn rejects_traversal() {
        let dir = tempdir().unwrap();
        let mirror = DirectoryMirror::open(dir.path()).unwrap();
        assert!(mirror.push("../escape", b"x").is_err());
        assert!(mirror.pull("..").is_err());
    }
}
