// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Upload tree on the local filesystem.
//!
//! Every operation takes a path relative to the uploads root. Relative paths
//! are built by [`StoragePaths`] from server-generated identifiers; anything
//! that would escape the root is rejected before touching the disk.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use super::StoragePaths;

#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("path escapes the upload root: {0}")]
    InvalidPath(String),

    #[error("upload store not initialized")]
    NotInitialized,

    #[error("health check data mismatch")]
    IntegrityViolation,
}

pub type FileStoreResult<T> = Result<T, FileStoreError>;

#[derive(Debug, Clone)]
pub struct FileStore {
    paths: StoragePaths,
    initialized: bool,
}

impl FileStore {
    /// Does NOT create the upload root. Call `initialize()` first.
    pub fn new(paths: StoragePaths) -> Self {
        Self {
            paths,
            initialized: false,
        }
    }

    pub fn paths(&self) -> &StoragePaths {
        &self.paths
    }

    /// Create the upload root. Idempotent.
    pub fn initialize(&mut self) -> FileStoreResult<()> {
        fs::create_dir_all(self.paths.uploads_dir())?;
        self.initialized = true;
        Ok(())
    }

    /// Write-read-delete probe on the upload root.
    pub fn health_check(&self) -> FileStoreResult<()> {
        if !self.initialized {
            return Err(FileStoreError::NotInitialized);
        }

        let probe = self.paths.uploads_dir().join(".health_check");
        let data = b"health_check_data";
        fs::write(&probe, data)?;
        let read_back = fs::read(&probe)?;
        fs::remove_file(&probe)?;

        if read_back != data {
            return Err(FileStoreError::IntegrityViolation);
        }
        Ok(())
    }

    /// Write bytes to `relative`, creating parent directories.
    pub fn write(&self, relative: &Path, data: &[u8]) -> FileStoreResult<()> {
        let path = self.absolute(relative)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        file.write_all(data)?;
        file.flush()?;
        Ok(())
    }

    pub fn read(&self, relative: &Path) -> FileStoreResult<Vec<u8>> {
        Ok(fs::read(self.absolute(relative)?)?)
    }

    pub fn exists(&self, relative: &Path) -> bool {
        self.absolute(relative).map(|p| p.exists()).unwrap_or(false)
    }

    /// Remove a single file. A missing file is not an error.
    pub fn delete(&self, relative: &Path) -> FileStoreResult<()> {
        match fs::remove_file(self.absolute(relative)?) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    /// Remove a directory and everything under it. A missing tree is not an error.
    pub fn delete_tree(&self, relative: &Path) -> FileStoreResult<()> {
        match fs::remove_dir_all(self.absolute(relative)?) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }

    fn absolute(&self, relative: &Path) -> FileStoreResult<PathBuf> {
        if !self.initialized {
            return Err(FileStoreError::NotInitialized);
        }
        let normal = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !normal || relative.as_os_str().is_empty() {
            return Err(FileStoreError::InvalidPath(relative.display().to_string()));
        }
        Ok(self.paths.resolve_upload(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(StoragePaths::under(dir.path()));
        store.initialize().expect("Failed to initialize");
        (dir, store)
    }

    #[test]
    fn write_read_and_delete() {
        let (_dir, store) = test_store();
        let rel = Path::new("t1/c1/a1/file.txt");

        store.write(rel, b"hello").unwrap();
        assert!(store.exists(rel));
        assert_eq!(store.read(rel).unwrap(), b"hello");

        store.delete(rel).unwrap();
        assert!(!store.exists(rel));
        // deleting again is fine
        store.delete(rel).unwrap();
    }

    #[test]
    fn delete_tree_removes_recursively() {
        let (_dir, store) = test_store();
        store.write(Path::new("t1/c1/a1/one.bin"), b"1").unwrap();
        store.write(Path::new("t1/c1/showrooms/s1/a2/two.bin"), b"2").unwrap();

        store.delete_tree(Path::new("t1/c1")).unwrap();
        assert!(!store.exists(Path::new("t1/c1")));
        assert!(store.exists(Path::new("t1")));

        store.delete_tree(Path::new("t1/never-existed")).unwrap();
    }

    #[test]
    fn rejects_escaping_paths() {
        let (_dir, store) = test_store();
        for bad in ["../outside", "/etc/passwd", "t1/../../x", ""] {
            let result = store.write(Path::new(bad), b"x");
            assert!(
                matches!(result, Err(FileStoreError::InvalidPath(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn health_check_works() {
        let (_dir, store) = test_store();
        store.health_check().expect("Health check should pass");
    }

    #[test]
    fn uninitialized_store_returns_error() {
        let store = FileStore::new(StoragePaths::under("/tmp/never-init"));
        assert!(matches!(
            store.write(Path::new("a/b"), b"x"),
            Err(FileStoreError::NotInitialized)
        ));
    }
}
