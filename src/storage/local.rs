//! Local filesystem storage backend.

use std::fs;
use std::path::Path;

use crate::storage::{StorageBackend, StorageError};

/// Storage backend for local filesystem operations.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageBackend;

impl LocalStorageBackend {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl StorageBackend for LocalStorageBackend {
    fn list_files(&self, dir: &Path) -> Result<Vec<String>, StorageError> {
        let entries = fs::read_dir(dir)
            .map_err(|e| StorageError::DirectoryUnavailable(format!("{}: {e}", dir.display())))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                StorageError::DirectoryUnavailable(format!("{}: {e}", dir.display()))
            })?;

            // Subdirectories are not part of a flat collection
            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                continue;
            }

            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }

        names.sort();
        Ok(names)
    }

    fn read_document(&self, path: &Path) -> Result<String, StorageError> {
        fs::read_to_string(path)
            .map_err(|e| StorageError::ReadError(format!("{}: {e}", path.display())))
    }
}
