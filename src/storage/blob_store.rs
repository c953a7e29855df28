//! Filesystem blob store.
//!
//! Blobs live under a single upload root, optionally nested one level deep
//! under a caller-chosen folder. A blob is addressed by `(folder,
//! storage_name)` only; metadata ids and user-supplied file names never touch
//! the filesystem.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BlobStoreError {
    #[error("blob not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Clone, Debug)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join `(folder, storage_name)` under the root. Storage names are
    /// server-generated, but they are still reduced to their base name so a
    /// stored name can never traverse out of the root.
    fn blob_path(&self, folder: &str, storage_name: &str) -> PathBuf {
        let base = Path::new(storage_name)
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        if folder.is_empty() {
            self.root.join(base)
        } else {
            self.root.join(folder).join(base)
        }
    }

    /// Write compressed bytes, creating the root and folder directories on
    /// demand. Disk and permission errors are surfaced verbatim.
    pub fn write(&self, folder: &str, storage_name: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.blob_path(folder, storage_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, bytes)
    }

    /// Open a blob for reading. A missing blob is its own condition; callers
    /// decide how to report it.
    pub fn open(&self, folder: &str, storage_name: &str) -> Result<File, BlobStoreError> {
        let path = self.blob_path(folder, storage_name);
        File::open(&path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => BlobStoreError::NotFound(path.display().to_string()),
            _ => BlobStoreError::Io(err),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;

    #[test]
    fn writes_and_reads_under_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::new(dir.path());

        store.write("", "a.ffs", b"payload").unwrap();

        let mut contents = Vec::new();
        store.open("", "a.ffs").unwrap().read_to_end(&mut contents).unwrap();
        assert_eq!(contents, b"payload");
        assert!(dir.path().join("a.ffs").exists());
    }

    #[test]
    fn creates_folder_directories_on_demand() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::new(dir.path());

        store.write("docs", "a.ffs", b"one").unwrap();
        // writing into an existing folder is not an error
        store.write("docs", "b.ffs", b"two").unwrap();

        assert!(dir.path().join("docs").join("a.ffs").exists());
        assert!(dir.path().join("docs").join("b.ffs").exists());
    }

    #[test]
    fn missing_blob_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::new(dir.path());

        let err = store.open("", "missing.ffs").unwrap_err();
        assert!(matches!(err, BlobStoreError::NotFound(_)));
    }

    #[test]
    fn storage_names_cannot_traverse_out_of_the_root() {
        let dir = tempfile::tempdir().unwrap();
        let store = BlobStore::new(dir.path().join("uploads"));

        store.write("", "../escape.ffs", b"contained").unwrap();

        assert!(dir.path().join("uploads").join("escape.ffs").exists());
        assert!(!dir.path().join("escape.ffs").exists());
    }
}
