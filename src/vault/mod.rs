//! Vault layout: the two document collections and how their files are selected.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::storage::{StorageBackend, StorageError};
use crate::storage::local::LocalStorageBackend;

/// Which collection a document was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Crown jewels: hand-curated `.md` documents.
    Curated,
    /// Residual stream: `.yaml` and `.md` contributions, less curated.
    Stream,
}

impl Source {
    /// File extensions eligible for this collection.
    #[must_use]
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Source::Curated => &[".md"],
            Source::Stream => &[".yaml", ".md"],
        }
    }

    /// Score added for each query term found in a document's content.
    #[must_use]
    pub fn content_weight(self) -> f64 {
        match self {
            Source::Curated => 0.3,
            Source::Stream => 0.25,
        }
    }

    /// Score added for each query term found in a document's filename.
    #[must_use]
    pub fn filename_weight(self) -> f64 {
        match self {
            Source::Curated => 0.2,
            Source::Stream => 0.15,
        }
    }

    /// Returns true if `filename` belongs in this collection.
    #[must_use]
    pub fn accepts(self, filename: &str) -> bool {
        self.extensions().iter().any(|ext| filename.ends_with(ext))
    }
}

/// A document read from one of the collections.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub path: PathBuf,
    pub content: String,
    pub source: Source,
}

/// The two collection roots plus the storage they are read through.
///
/// Holds no document state; every operation lists and reads afresh.
#[derive(Debug, Clone)]
pub struct Vault<S = LocalStorageBackend> {
    curated_root: PathBuf,
    stream_root: PathBuf,
    storage: S,
}

impl Vault<LocalStorageBackend> {
    /// Create a vault over the local filesystem.
    #[must_use]
    pub fn new(curated_root: PathBuf, stream_root: PathBuf) -> Self {
        Self::with_storage(curated_root, stream_root, LocalStorageBackend::new())
    }
}

impl<S: StorageBackend> Vault<S> {
    #[must_use]
    pub fn with_storage(curated_root: PathBuf, stream_root: PathBuf, storage: S) -> Self {
        Self {
            curated_root,
            stream_root,
            storage,
        }
    }

    #[must_use]
    pub fn root(&self, source: Source) -> &Path {
        match source {
            Source::Curated => &self.curated_root,
            Source::Stream => &self.stream_root,
        }
    }

    /// List the eligible filenames of a collection in lexicographic order.
    ///
    /// An unavailable root yields an empty listing; the failure is logged.
    #[must_use]
    pub fn filenames(&self, source: Source) -> Vec<String> {
        let root = self.root(source);

        match self.storage.list_files(root) {
            Ok(names) => names.into_iter().filter(|n| source.accepts(n)).collect(),
            Err(e) => {
                tracing::warn!(?source, error = %e, "skipping unavailable collection");
                Vec::new()
            }
        }
    }

    /// Read one document of a collection.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ReadError` if the file cannot be read.
    pub fn read(&self, source: Source, filename: &str) -> Result<Document, StorageError> {
        let path = self.root(source).join(filename);
        let content = self.storage.read_document(&path)?;

        Ok(Document {
            filename: filename.to_string(),
            path,
            content,
            source,
        })
    }

    /// Read every eligible document of a collection.
    ///
    /// Files that fail to read are logged and skipped.
    #[must_use]
    pub fn documents(&self, source: Source) -> Vec<Document> {
        let names = self.filenames(source);
        tracing::debug!(?source, files = names.len(), "scanning collection");

        names
            .iter()
            .filter_map(|name| match self.read(source, name) {
                Ok(doc) => Some(doc),
                Err(e) => {
                    tracing::warn!(file = %name, error = %e, "skipping unreadable document");
                    None
                }
            })
            .collect()
    }
}
