//! File-backed string key/value store.
//!
//! The file holds a single JSON object mapping keys to string values. Writes
//! go to a sibling temp file that is then renamed over the original, so a
//! crash mid-write leaves the previous contents intact.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::StorefrontError;

#[derive(Debug)]
pub struct LocalStorage {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl LocalStorage {
    /// Opens the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Storage`] if the file exists but cannot be
    /// read, or [`StorefrontError::StorageFormat`] if it is not a JSON object
    /// of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorefrontError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| StorefrontError::StorageFormat {
                path: path.display().to_string(),
                source: e,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(StorefrontError::Storage {
                    path: path.display().to_string(),
                    source: e,
                })
            }
        };
        Ok(Self { path, entries })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Stores `value` under `key` and writes the file.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Storage`] if the file cannot be written.
    pub fn set(&mut self, key: &str, value: String) -> Result<(), StorefrontError> {
        self.entries.insert(key.to_owned(), value);
        self.flush()
    }

    /// Deletes `key` and writes the file. Returns the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Storage`] if the file cannot be written.
    pub fn remove(&mut self, key: &str) -> Result<Option<String>, StorefrontError> {
        let previous = self.entries.remove(key);
        if previous.is_some() {
            self.flush()?;
        }
        Ok(previous)
    }

    fn flush(&self) -> Result<(), StorefrontError> {
        let io_err = |source| StorefrontError::Storage {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }

        let raw = serde_json::to_string_pretty(&self.entries).map_err(|e| {
            StorefrontError::StorageFormat {
                path: self.path.display().to_string(),
                source: e,
            }
        })?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, raw).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = LocalStorage::open(dir.path().join("absent.json")).expect("open");
        assert_eq!(storage.get("cart"), None);
    }

    #[test]
    fn set_persists_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("storage.json");

        let mut storage = LocalStorage::open(&path).expect("open");
        storage.set("cart", "[]".to_owned()).expect("set");

        let reopened = LocalStorage::open(&path).expect("reopen");
        assert_eq!(reopened.get("cart"), Some("[]"));
    }

    #[test]
    fn remove_deletes_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("storage.json");

        let mut storage = LocalStorage::open(&path).expect("open");
        storage.set("a", "1".to_owned()).expect("set");
        assert_eq!(storage.remove("a").expect("remove").as_deref(), Some("1"));
        assert_eq!(storage.remove("a").expect("remove"), None);

        let reopened = LocalStorage::open(&path).expect("reopen");
        assert_eq!(reopened.get("a"), None);
    }

    #[test]
    fn non_object_file_is_format_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "[1, 2, 3]").expect("write");

        let err = LocalStorage::open(&path).unwrap_err();
        assert!(matches!(err, StorefrontError::StorageFormat { .. }));
    }

    #[test]
    fn no_temp_file_left_behind() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("storage.json");

        let mut storage = LocalStorage::open(&path).expect("open");
        storage.set("k", "v".to_owned()).expect("set");

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .expect("read_dir")
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["storage.json".to_owned()]);
    }
}
