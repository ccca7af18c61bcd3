// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Storecheck

//! JSON-file store primitives.
//!
//! One record per file, written atomically via temp-file rename. Creation
//! uses exclusive open (`create_new`), so a concurrent first-write for the
//! same key surfaces as [`StorageError::AlreadyExists`] instead of a silent
//! overwrite.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use super::StoragePaths;

/// Error type for store operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    Io(io::Error),
    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),
    /// Entity already exists (or was created by a concurrent request)
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    /// Store not initialized
    #[error("Store not initialized")]
    NotInitialized,
}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound(e.to_string()),
            io::ErrorKind::AlreadyExists => StorageError::AlreadyExists(e.to_string()),
            _ => StorageError::Io(e),
        }
    }
}

/// Result type for store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// JSON-file store rooted at the configured data directory.
#[derive(Debug, Clone)]
pub struct JsonStore {
    paths: StoragePaths,
    initialized: bool,
}

impl JsonStore {
    /// Create a new JsonStore instance.
    ///
    /// Does NOT initialize the directory structure. Call `initialize()` first.
    pub fn new(paths: StoragePaths) -> Self {
        Self {
            paths,
            initialized: false,
        }
    }

    /// Get the storage paths.
    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Initialize the store directory structure.
    ///
    /// Safe to call multiple times (idempotent).
    pub fn initialize(&mut self) -> StorageResult<()> {
        fs::create_dir_all(self.paths.users_dir())?;
        self.initialized = true;
        Ok(())
    }

    /// Check if the store is available and writable.
    ///
    /// Performs a write-read-delete round trip, used by the readiness probe.
    pub fn health_check(&self) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let test_file = self.paths.root().join(".health_check");
        let test_data = b"health_check_data";

        fs::write(&test_file, test_data)?;
        let read_data = fs::read(&test_file)?;
        fs::remove_file(&test_file)?;

        if read_data != test_data {
            return Err(StorageError::Io(io::Error::other(
                "health check data mismatch",
            )));
        }

        Ok(())
    }

    /// Read a JSON file and deserialize it.
    pub fn read_json<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> StorageResult<T> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let file = File::open(path.as_ref())?;
        let reader = BufReader::new(file);
        let value = serde_json::from_reader(reader)?;
        Ok(value)
    }

    /// Write a JSON file (atomic write via rename).
    pub fn write_json<T: Serialize>(&self, path: impl AsRef<Path>, value: &T) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = path.with_extension("tmp");
        {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, value)?;
            writer.flush()?;
        }

        fs::rename(&temp_path, path)?;
        Ok(())
    }

    /// Create a JSON file, failing if it already exists.
    ///
    /// The exclusive open is the uniqueness constraint: when two requests
    /// race to create the same key, exactly one wins and the other observes
    /// `AlreadyExists`.
    pub fn create_json_new<T: Serialize>(
        &self,
        path: impl AsRef<Path>,
        value: &T,
    ) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().write(true).create_new(true).open(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush().map_err(StorageError::Io)?;
        Ok(())
    }

    /// Check if a file exists.
    pub fn exists(&self, path: impl AsRef<Path>) -> bool {
        path.as_ref().is_file()
    }

    /// Delete a file.
    pub fn delete(&self, path: impl AsRef<Path>) -> StorageResult<()> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }
        fs::remove_file(path.as_ref())?;
        Ok(())
    }

    /// List all files in a directory with the given extension, returning
    /// their stems.
    pub fn list_files(&self, dir: impl AsRef<Path>, extension: &str) -> StorageResult<Vec<String>> {
        if !self.initialized {
            return Err(StorageError::NotInitialized);
        }

        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext == extension {
                        if let Some(stem) = path.file_stem() {
                            if let Some(id) = stem.to_str() {
                                ids.push(id.to_string());
                            }
                        }
                    }
                }
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    fn test_store() -> (JsonStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let paths = StoragePaths::new(temp_dir.path());
        let mut store = JsonStore::new(paths);
        store.initialize().expect("Failed to initialize test store");
        (store, temp_dir)
    }

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestData {
        id: String,
        value: i32,
    }

    #[test]
    fn initialize_creates_users_directory() {
        let (store, _dir) = test_store();
        assert!(store.paths().users_dir().exists());
    }

    #[test]
    fn write_and_read_json() {
        let (store, _dir) = test_store();
        let data = TestData {
            id: "test-1".to_string(),
            value: 42,
        };

        let path = store.paths().users_dir().join("test.json");
        store.write_json(&path, &data).unwrap();

        let read: TestData = store.read_json(&path).unwrap();
        assert_eq!(read, data);
    }

    #[test]
    fn create_json_new_rejects_existing_file() {
        let (store, _dir) = test_store();
        let path = store.paths().users_dir().join("once.json");
        let data = TestData {
            id: "once".to_string(),
            value: 1,
        };

        store.create_json_new(&path, &data).unwrap();
        let result = store.create_json_new(&path, &data);
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
    }

    #[test]
    fn read_missing_file_is_not_found() {
        let (store, _dir) = test_store();
        let path = store.paths().users_dir().join("missing.json");
        let result = store.read_json::<TestData>(&path);
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn delete_file_removes_it() {
        let (store, _dir) = test_store();
        let path = store.paths().users_dir().join("to-delete.json");
        store
            .write_json(
                &path,
                &TestData {
                    id: "del".to_string(),
                    value: 0,
                },
            )
            .unwrap();

        assert!(store.exists(&path));
        store.delete(&path).unwrap();
        assert!(!store.exists(&path));
    }

    #[test]
    fn list_files_returns_stems() {
        let (store, _dir) = test_store();
        for i in 1..=3 {
            let path = store.paths().users_dir().join(format!("u-{i}.json"));
            store
                .write_json(
                    &path,
                    &TestData {
                        id: format!("u-{i}"),
                        value: i,
                    },
                )
                .unwrap();
        }

        let ids = store.list_files(store.paths().users_dir(), "json").unwrap();
        assert_eq!(ids.len(), 3);
        assert!(ids.contains(&"u-1".to_string()));
    }

    #[test]
    fn health_check_round_trips() {
        let (store, _dir) = test_store();
        store.health_check().expect("health check should pass");
    }

    #[test]
    fn uninitialized_store_returns_error() {
        let paths = StoragePaths::new("/tmp/never-init");
        let store = JsonStore::new(paths);
        let result = store.read_json::<TestData>("/tmp/any.json");
        assert!(matches!(result, Err(StorageError::NotInitialized)));
    }
}
