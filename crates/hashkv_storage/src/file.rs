//! File-based artifact for persistent local snapshots.

use crate::artifact::ArtifactBackend;
use crate::error::StorageResult;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

/// Suffix of the temporary file used for atomic replacement.
const TEMP_SUFFIX: &str = ".tmp";

/// A file-based artifact.
///
/// The artifact is created empty when opened, mirroring the way a bucket
/// touches its file before the first sync.
///
/// # Durability
///
/// `replace()` writes to `<path>.tmp`, syncs it, and renames it over the
/// artifact, so a crash mid-write never leaves a torn snapshot behind.
///
/// # Example
///
/// ```no_run
/// use hashkv_storage::{ArtifactBackend, FileArtifact};
/// use std::path::Path;
///
/// let mut artifact = FileArtifact::open(Path::new("bucket0.txt")).unwrap();
/// artifact.replace(b"snapshot bytes").unwrap();
/// assert_eq!(artifact.read_all().unwrap(), b"snapshot bytes");
/// ```
#[derive(Debug)]
pub struct FileArtifact {
    path: PathBuf,
    temp_path: PathBuf,
}

impl FileArtifact {
    /// Opens or creates an artifact at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or created.
    pub fn open(path: &Path) -> StorageResult<Self> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        let mut temp = path.as_os_str().to_owned();
        temp.push(TEMP_SUFFIX);

        Ok(Self {
            path: path.to_path_buf(),
            temp_path: PathBuf::from(temp),
        })
    }

    /// Opens or creates an artifact, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or file cannot be opened.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Self::open(path)
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ArtifactBackend for FileArtifact {
    fn read_all(&self) -> StorageResult<Vec<u8>> {
        let mut file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    fn replace(&mut self, data: &[u8]) -> StorageResult<()> {
        let mut file = File::create(&self.temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&self.temp_path, &self.path)?;
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}
