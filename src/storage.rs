//! Storage collaborator: where finished snippet images live.
//!
//! The core only needs a content-addressable write/read interface; the
//! [`Storage`] trait is that seam. The shipped [`DiskStorage`] writes
//! beneath a root directory with atomic replace semantics: bytes land in
//! a temp file first and are renamed into place, so a crash mid-write
//! never leaves a half-written object behind a live reference.

use crate::raster::SnippetFormat;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Missing object: {0}")]
    Missing(String),
}

/// Trait for snippet image storage backends.
///
/// `put` must be atomic from the caller's perspective: a returned
/// reference always points at fully persisted bytes. Writing the same
/// slot key again replaces the previous object under the same reference.
pub trait Storage: Sync {
    /// Persist `bytes` under a slot key, returning the stable reference.
    fn put(
        &self,
        slot_key: &str,
        bytes: &[u8],
        format: SnippetFormat,
    ) -> Result<String, StorageError>;

    /// Read back a previously stored object.
    fn get(&self, reference: &str) -> Result<Vec<u8>, StorageError>;

    /// Remove a stored object. Missing objects are an error; callers
    /// delete explicitly, never speculatively.
    fn delete(&self, reference: &str) -> Result<(), StorageError>;
}

/// Local filesystem storage rooted at one directory.
pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Storage for DiskStorage {
    fn put(
        &self,
        slot_key: &str,
        bytes: &[u8],
        format: SnippetFormat,
    ) -> Result<String, StorageError> {
        fs::create_dir_all(&self.root)?;

        let reference = format!("{slot_key}.{}", format.extension());
        let final_path = self.root.join(&reference);
        let temp_path = self.root.join(format!("{slot_key}.tmp"));

        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &final_path)?;
        Ok(reference)
    }

    fn get(&self, reference: &str) -> Result<Vec<u8>, StorageError> {
        fs::read(self.root.join(reference)).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::Missing(reference.to_string())
            } else {
                StorageError::Io(e)
            }
        })
    }

    fn delete(&self, reference: &str) -> Result<(), StorageError> {
        fs::remove_file(self.root.join(reference)).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::Missing(reference.to_string())
            } else {
                StorageError::Io(e)
            }
        })
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory storage double. Records every put so tests can count
    /// writes; Mutex (not RefCell) so it is Sync for rayon fan-out.
    #[derive(Default)]
    pub struct MemoryStorage {
        pub objects: Mutex<HashMap<String, Vec<u8>>>,
        pub puts: Mutex<Vec<String>>,
    }

    impl MemoryStorage {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn put_count(&self) -> usize {
            self.puts.lock().unwrap().len()
        }
    }

    impl Storage for MemoryStorage {
        fn put(
            &self,
            slot_key: &str,
            bytes: &[u8],
            format: SnippetFormat,
        ) -> Result<String, StorageError> {
            let reference = format!("{slot_key}.{}", format.extension());
            self.objects
                .lock()
                .unwrap()
                .insert(reference.clone(), bytes.to_vec());
            self.puts.lock().unwrap().push(reference.clone());
            Ok(reference)
        }

        fn get(&self, reference: &str) -> Result<Vec<u8>, StorageError> {
            self.objects
                .lock()
                .unwrap()
                .get(reference)
                .cloned()
                .ok_or_else(|| StorageError::Missing(reference.to_string()))
        }

        fn delete(&self, reference: &str) -> Result<(), StorageError> {
            self.objects
                .lock()
                .unwrap()
                .remove(reference)
                .map(|_| ())
                .ok_or_else(|| StorageError::Missing(reference.to_string()))
        }
    }

    /// Storage double whose writes always fail, for rollback tests.
    pub struct FailingStorage;

    impl Storage for FailingStorage {
        fn put(&self, _: &str, _: &[u8], _: SnippetFormat) -> Result<String, StorageError> {
            Err(StorageError::Io(std::io::Error::other("disk full")))
        }

        fn get(&self, reference: &str) -> Result<Vec<u8>, StorageError> {
            Err(StorageError::Missing(reference.to_string()))
        }

        fn delete(&self, reference: &str) -> Result<(), StorageError> {
            Err(StorageError::Missing(reference.to_string()))
        }
    }

    // =========================================================================
    // DiskStorage
    // =========================================================================

    #[test]
    fn disk_put_get_roundtrip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let storage = DiskStorage::new(tmp.path());

        let reference = storage
            .put("abc123", b"snippet bytes", SnippetFormat::Jpeg)
            .unwrap();
        assert_eq!(reference, "abc123.jpg");
        assert_eq!(storage.get(&reference).unwrap(), b"snippet bytes");
    }

    #[test]
    fn disk_put_creates_root_directory() {
        let tmp = tempfile::TempDir::new().unwrap();
        let storage = DiskStorage::new(tmp.path().join("nested/snippets"));

        storage.put("k", b"data", SnippetFormat::Jpeg).unwrap();
        assert!(tmp.path().join("nested/snippets/k.jpg").exists());
    }

    #[test]
    fn disk_put_overwrites_same_slot() {
        let tmp = tempfile::TempDir::new().unwrap();
        let storage = DiskStorage::new(tmp.path());

        let first = storage.put("slot", b"v1", SnippetFormat::Jpeg).unwrap();
        let second = storage.put("slot", b"v2", SnippetFormat::Jpeg).unwrap();

        assert_eq!(first, second, "reference must be stable across rewrites");
        assert_eq!(storage.get(&second).unwrap(), b"v2");
    }

    #[test]
    fn disk_put_leaves_no_temp_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let storage = DiskStorage::new(tmp.path());
        storage.put("slot", b"v1", SnippetFormat::Jpeg).unwrap();

        let leftovers: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|x| x == "tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn disk_get_missing_is_missing_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let storage = DiskStorage::new(tmp.path());
        assert!(matches!(
            storage.get("nope.jpg"),
            Err(StorageError::Missing(_))
        ));
    }

    #[test]
    fn disk_delete_removes_object() {
        let tmp = tempfile::TempDir::new().unwrap();
        let storage = DiskStorage::new(tmp.path());
        let reference = storage.put("slot", b"v1", SnippetFormat::Jpeg).unwrap();

        storage.delete(&reference).unwrap();
        assert!(matches!(
            storage.get(&reference),
            Err(StorageError::Missing(_))
        ));
        assert!(matches!(
            storage.delete(&reference),
            Err(StorageError::Missing(_))
        ));
    }

    // =========================================================================
    // MemoryStorage double
    // =========================================================================

    #[test]
    fn memory_roundtrip_and_put_log() {
        let storage = MemoryStorage::new();
        let reference = storage.put("k", b"bytes", SnippetFormat::Jpeg).unwrap();

        assert_eq!(storage.get(&reference).unwrap(), b"bytes");
        assert_eq!(storage.put_count(), 1);

        storage.put("k", b"again", SnippetFormat::Jpeg).unwrap();
        assert_eq!(storage.put_count(), 2);
        assert_eq!(storage.objects.lock().unwrap().len(), 1);
    }
}
