//! Storage backend trait and implementations.
//!
//! The vault only ever needs two things from storage: the file names directly
//! inside a directory, and the text of one file. Keeping that behind a trait
//! lets tests run the search core against an in-memory vault.

pub mod local;

use std::path::Path;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("Failed to read: {0}")]
    ReadError(String),
}

/// Trait for storage backends (local filesystem, in-memory, etc.).
pub trait StorageBackend: Send + Sync {
    /// List the names of regular files directly inside `dir`.
    ///
    /// Names are returned in lexicographic order so every caller sees the
    /// same listing order for an unchanged directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DirectoryUnavailable` if the directory is missing
    /// or cannot be read.
    fn list_files(&self, dir: &Path) -> Result<Vec<String>, StorageError>;

    /// Read a document's full text.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ReadError` if the file cannot be read as UTF-8.
    fn read_document(&self, path: &Path) -> Result<String, StorageError>;
}
