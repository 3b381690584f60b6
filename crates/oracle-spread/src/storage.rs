//! Key-value blob storage behind the repository and the daily gate.
//!
//! Each key holds one JSON document. [`MemoryStore`] keeps everything in
//! process; [`FileStore`] writes one file per key and replaces it atomically
//! through a uniquely named temp file, so concurrent writers never share one.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use tempfile::NamedTempFile;

use crate::error::StorageError;

/// A minimal key-value store of string blobs.
pub trait BlobStore {
    /// Read the blob under `key`, or `None` if nothing is stored.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the blob under `key`.
    fn store(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the blob under `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: BlobStore + ?Sized> BlobStore for &S {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).load(key)
    }

    fn store(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).store(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-process store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: Mutex<HashMap<String, String>>,
    read_only: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with [`StorageError::Unavailable`].
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("store is read-only".to_string()));
        }
        Ok(())
    }
}

impl BlobStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(lock(&self.blobs).get(key).cloned())
    }

    fn store(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        lock(&self.blobs).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check_writable()?;
        lock(&self.blobs).remove(key);
        Ok(())
    }
}

/// Directory-backed store: key `k` lives in `<dir>/k.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The directory holding the blobs.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl BlobStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.persist(self.path_for(key)).map_err(|e| e.error)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Lock a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn memory_round_trip() {
        let s = MemoryStore::new();
        assert_eq!(s.load("k").unwrap(), None);
        s.store("k", "[1]").unwrap();
        assert_eq!(s.load("k").unwrap().as_deref(), Some("[1]"));
        s.remove("k").unwrap();
        s.remove("k").unwrap();
        assert_eq!(s.load("k").unwrap(), None);
    }

    #[test]
    fn memory_read_only_rejects_writes() {
        let s = MemoryStore::new();
        s.store("k", "a").unwrap();
        s.set_read_only(true);
        assert!(matches!(
            s.store("k", "b"),
            Err(StorageError::Unavailable(_))
        ));
        assert_eq!(s.load("k").unwrap().as_deref(), Some("a"));
    }

    #[test]
    fn file_round_trip() {
        let dir = TempDir::new().unwrap();
        let s = FileStore::open(dir.path().join("data")).unwrap();
        assert_eq!(s.load("spreads").unwrap(), None);
        s.store("spreads", "[]").unwrap();
        assert!(dir.path().join("data/spreads.json").exists());
        assert_eq!(s.load("spreads").unwrap().as_deref(), Some("[]"));
        s.store("spreads", "[1]").unwrap();
        assert_eq!(s.load("spreads").unwrap().as_deref(), Some("[1]"));
        s.remove("spreads").unwrap();
        s.remove("spreads").unwrap();
        assert_eq!(s.load("spreads").unwrap(), None);
    }

    #[test]
    fn file_store_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let s = FileStore::open(dir.path()).unwrap();
        s.store("k", "v").unwrap();
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["k.json".to_string()]);
    }

    #[test]
    fn concurrent_file_writers_do_not_collide() {
        let dir = TempDir::new().unwrap();
        let values: Vec<String> = (0..8).map(|i| format!("[{i}]")).collect();

        std::thread::scope(|scope| {
            for value in &values {
                // A separate store per writer, like separate processes.
                let s = FileStore::open(dir.path()).unwrap();
                scope.spawn(move || {
                    for _ in 0..25 {
                        s.store("spreads", value).unwrap();
                    }
                });
            }
        });

        let s = FileStore::open(dir.path()).unwrap();
        let last = s.load("spreads").unwrap().unwrap();
        assert!(values.contains(&last));
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["spreads.json".to_string()]);
    }
}
