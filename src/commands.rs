//! Command implementations shared by CLI and MCP server.

use std::path::PathBuf;

use serde::Serialize;

use crate::search::snippet::{TRUNCATION_MARKER, truncate_chars};
use crate::search::{SearchResult, query_terms, rank, score_document};
use crate::storage::StorageBackend;
use crate::vault::{Source, Vault};

/// Default number of search results to return.
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

/// Default number of crown jewels to list.
pub const DEFAULT_LIST_LIMIT: usize = 20;

/// Default number of residual stream entries to return.
pub const DEFAULT_STREAM_LIMIT: usize = 5;

/// Number of filenames suggested when a jewel lookup misses.
const NOT_FOUND_SAMPLE: usize = 10;

/// Characters of a stream entry shown in its preview.
const PREVIEW_CHARS: usize = 500;

/// Ranked results of a vault search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
    /// Number of matching documents before the limit was applied.
    pub total: usize,
}

/// A crown jewel with its full content.
#[derive(Debug, Clone, Serialize)]
pub struct Jewel {
    pub name: String,
    pub path: PathBuf,
    pub content: String,
    /// Content length in characters.
    pub size: usize,
}

/// Outcome of a jewel lookup. A miss is a value, not an error.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum JewelLookup {
    Found(Jewel),
    NotFound {
        error: String,
        available: Vec<String>,
    },
}

/// Newest-first crown jewel filenames.
#[derive(Debug, Clone, Serialize)]
pub struct JewelList {
    pub jewels: Vec<String>,
    pub total: usize,
    pub path: PathBuf,
}

/// A residual stream entry with a bounded preview.
#[derive(Debug, Clone, Serialize)]
pub struct StreamEntry {
    pub filename: String,
    pub path: PathBuf,
    pub preview: String,
}

/// Residual stream entries matching a pattern.
#[derive(Debug, Clone, Serialize)]
pub struct StreamListing {
    pub entries: Vec<StreamEntry>,
    /// Number of matching files before the limit was applied.
    pub total: usize,
}

/// Search both collections of the vault.
///
/// Documents are scored independently, ranked best-first across collections,
/// and cut to `limit`. A collection whose root cannot be listed contributes
/// nothing; an unreadable file is skipped.
pub fn search<S: StorageBackend>(vault: &Vault<S>, query: &str, limit: usize) -> SearchResponse {
    tracing::info!(query, limit, "searching vault");

    let query_lower = query.to_lowercase();
    let terms = query_terms(&query_lower);

    let mut results: Vec<SearchResult> = [Source::Curated, Source::Stream]
        .into_iter()
        .flat_map(|source| vault.documents(source))
        .filter_map(|doc| score_document(&doc, &terms, &query_lower))
        .collect();

    rank(&mut results);
    let total = results.len();
    results.truncate(limit);

    tracing::debug!(total, returned = results.len(), "search complete");

    SearchResponse {
        query: query.to_string(),
        results,
        total,
    }
}

/// Get a crown jewel by case-insensitive partial filename match.
///
/// The first match in filename order wins.
///
/// # Errors
///
/// Returns an error if the matched file cannot be read.
pub fn get_jewel<S: StorageBackend>(vault: &Vault<S>, name: &str) -> anyhow::Result<JewelLookup> {
    tracing::info!(name, "retrieving crown jewel");

    let files = vault.filenames(Source::Curated);
    let name_lower = name.to_lowercase();

    let matched = files
        .iter()
        .find(|f| f.to_lowercase().contains(&name_lower))
        .cloned();

    let Some(matched) = matched else {
        return Ok(JewelLookup::NotFound {
            error: format!("Crown Jewel not found: {name}"),
            available: files.into_iter().take(NOT_FOUND_SAMPLE).collect(),
        });
    };

    let doc = vault.read(Source::Curated, &matched)?;

    Ok(JewelLookup::Found(Jewel {
        size: doc.content.chars().count(),
        name: doc.filename,
        path: doc.path,
        content: doc.content,
    }))
}

/// List crown jewel filenames, newest first for date-prefixed names.
pub fn list_jewels<S: StorageBackend>(vault: &Vault<S>, limit: usize) -> JewelList {
    let mut jewels = vault.filenames(Source::Curated);
    jewels.sort_unstable_by(|a, b| b.cmp(a));

    let total = jewels.len();
    jewels.truncate(limit);

    JewelList {
        jewels,
        total,
        path: vault.root(Source::Curated).to_path_buf(),
    }
}

/// Get residual stream entries whose filename contains `pattern`.
///
/// Entries are ordered newest first for date-prefixed names. Files that cannot
/// be read are skipped.
pub fn get_stream<S: StorageBackend>(
    vault: &Vault<S>,
    pattern: Option<&str>,
    limit: usize,
) -> StreamListing {
    let mut files = vault.filenames(Source::Stream);

    if let Some(pattern) = pattern {
        let pattern_lower = pattern.to_lowercase();
        files.retain(|f| f.to_lowercase().contains(&pattern_lower));
    }

    files.sort_unstable_by(|a, b| b.cmp(a));
    let total = files.len();

    let entries = files
        .iter()
        .take(limit)
        .filter_map(|file| match vault.read(Source::Stream, file) {
            Ok(doc) => Some(StreamEntry {
                preview: preview(&doc.content),
                filename: doc.filename,
                path: doc.path,
            }),
            Err(e) => {
                tracing::warn!(file = %file, error = %e, "skipping unreadable stream entry");
                None
            }
        })
        .collect();

    StreamListing { entries, total }
}

fn preview(content: &str) -> String {
    match truncate_chars(content, PREVIEW_CHARS) {
        Some(head) => format!("{head}{TRUNCATION_MARKER}"),
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::BTreeMap;
    use std::path::Path;

    use crate::storage::StorageError;

    /// In-memory storage keyed by full path.
    #[derive(Default)]
    struct MemoryStorage {
        files: BTreeMap<PathBuf, String>,
        unreadable: Vec<PathBuf>,
    }

    impl MemoryStorage {
        fn with(mut self, path: &str, content: &str) -> Self {
            self.files.insert(PathBuf::from(path), content.to_string());
            self
        }

        fn broken(mut self, path: &str) -> Self {
            self.files.insert(PathBuf::from(path), String::new());
            self.unreadable.push(PathBuf::from(path));
            self
        }
    }

    impl StorageBackend for MemoryStorage {
        fn list_files(&self, dir: &Path) -> Result<Vec<String>, StorageError> {
            let names: Vec<String> = self
                .files
                .keys()
                .filter(|p| p.parent() == Some(dir))
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string())
                .collect();

            if names.is_empty() {
                return Err(StorageError::DirectoryUnavailable(dir.display().to_string()));
            }
            Ok(names)
        }

        fn read_document(&self, path: &Path) -> Result<String, StorageError> {
            if self.unreadable.iter().any(|p| p == path) {
                return Err(StorageError::ReadError(path.display().to_string()));
            }
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| StorageError::ReadError(path.display().to_string()))
        }
    }

    fn vault(storage: MemoryStorage) -> Vault<MemoryStorage> {
        Vault::with_storage(PathBuf::from("/jewels"), PathBuf::from("/stream"), storage)
    }

    mod search_tests {
        use super::*;

        #[test]
        fn ranks_across_collections() {
            let v = vault(
                MemoryStorage::default()
                    .with("/jewels/a.md", "dharma practice")
                    .with("/stream/dharma.yaml", "dharma notes")
                    .with("/stream/b.md", "dharma"),
            );

            let response = search(&v, "dharma", 10);
            let names: Vec<_> = response.results.iter().map(|r| r.filename.as_str()).collect();

            // stream filename hit 0.4 > curated content 0.3 > stream content 0.25
            assert_eq!(names, vec!["dharma.yaml", "a.md", "b.md"]);
            assert_eq!(response.total, 3);
        }

        #[test]
        fn limit_applies_after_ranking() {
            let v = vault(
                MemoryStorage::default()
                    .with("/jewels/a.md", "dharma")
                    .with("/jewels/b.md", "dharma")
                    .with("/jewels/c.md", "dharma"),
            );

            let response = search(&v, "dharma", 2);
            assert_eq!(response.results.len(), 2);
            assert_eq!(response.total, 3);
        }

        #[test]
        fn zero_limit_returns_no_results() {
            let v = vault(MemoryStorage::default().with("/jewels/a.md", "dharma"));

            let response = search(&v, "dharma", 0);
            assert!(response.results.is_empty());
            assert_eq!(response.total, 1);
        }

        #[test]
        fn missing_stream_still_searches_jewels() {
            let v = vault(MemoryStorage::default().with("/jewels/a.md", "dharma"));

            let response = search(&v, "dharma", 10);
            assert_eq!(response.results.len(), 1);
            assert_eq!(response.results[0].source, Source::Curated);
        }

        #[test]
        fn unreadable_file_skipped() {
            let v = vault(
                MemoryStorage::default()
                    .broken("/jewels/a.md")
                    .with("/jewels/b.md", "dharma"),
            );

            let response = search(&v, "dharma", 10);
            assert_eq!(response.results.len(), 1);
            assert_eq!(response.results[0].filename, "b.md");
        }

        #[test]
        fn ignores_ineligible_extensions() {
            let v = vault(
                MemoryStorage::default()
                    .with("/jewels/a.yaml", "dharma")
                    .with("/jewels/b.md", "other")
                    .with("/stream/c.txt", "dharma"),
            );

            assert_eq!(search(&v, "dharma", 10).total, 0);
        }

        #[test]
        fn echoes_query() {
            let v = vault(MemoryStorage::default().with("/jewels/a.md", "x"));
            assert_eq!(search(&v, "Witness Field", 10).query, "Witness Field");
        }
    }

    mod jewel_tests {
        use super::*;

        #[test]
        fn partial_case_insensitive_match() {
            let v = vault(
                MemoryStorage::default()
                    .with("/jewels/2024-01-01-Operational-Shift.md", "body text")
                    .with("/jewels/2024-02-01-other.md", "other"),
            );

            let JewelLookup::Found(jewel) = get_jewel(&v, "operational").unwrap() else {
                panic!("expected a match");
            };
            assert_eq!(jewel.name, "2024-01-01-Operational-Shift.md");
            assert_eq!(jewel.content, "body text");
            assert_eq!(jewel.size, 9);
        }

        #[test]
        fn first_match_in_filename_order() {
            let v = vault(
                MemoryStorage::default()
                    .with("/jewels/b-insight.md", "b")
                    .with("/jewels/a-insight.md", "a"),
            );

            let JewelLookup::Found(jewel) = get_jewel(&v, "insight").unwrap() else {
                panic!("expected a match");
            };
            assert_eq!(jewel.name, "a-insight.md");
        }

        #[test]
        fn size_counts_characters() {
            let v = vault(MemoryStorage::default().with("/jewels/om.md", "ॐ ॐ"));

            let JewelLookup::Found(jewel) = get_jewel(&v, "om").unwrap() else {
                panic!("expected a match");
            };
            assert_eq!(jewel.size, 3);
        }

        #[test]
        fn miss_samples_at_most_ten() {
            let mut storage = MemoryStorage::default();
            for i in 0..15 {
                storage = storage.with(&format!("/jewels/{i:02}.md"), "x");
            }
            let v = vault(storage);

            let JewelLookup::NotFound { error, available } = get_jewel(&v, "operational").unwrap()
            else {
                panic!("expected a miss");
            };
            assert!(error.contains("operational"));
            assert_eq!(available.len(), 10);
        }

        #[test]
        fn non_markdown_never_matches() {
            let v = vault(MemoryStorage::default().with("/jewels/operational.yaml", "x"));

            let lookup = get_jewel(&v, "operational").unwrap();
            assert!(matches!(lookup, JewelLookup::NotFound { available, .. } if available.is_empty()));
        }

        #[test]
        fn unreadable_match_is_error() {
            let v = vault(MemoryStorage::default().broken("/jewels/operational.md"));
            assert!(get_jewel(&v, "operational").is_err());
        }
    }

    mod list_tests {
        use super::*;

        #[test]
        fn newest_first_and_limited() {
            let v = vault(
                MemoryStorage::default()
                    .with("/jewels/2023-a.md", "")
                    .with("/jewels/2024-b.md", "")
                    .with("/jewels/2022-c.md", "")
                    .with("/jewels/2025-d.yaml", ""),
            );

            let list = list_jewels(&v, 2);
            assert_eq!(list.jewels, vec!["2024-b.md", "2023-a.md"]);
            assert_eq!(list.total, 3);
            assert_eq!(list.path, PathBuf::from("/jewels"));
        }

        #[test]
        fn missing_root_is_empty() {
            let v = vault(MemoryStorage::default());
            let list = list_jewels(&v, 20);

            assert!(list.jewels.is_empty());
            assert_eq!(list.total, 0);
        }
    }

    mod stream_tests {
        use super::*;

        #[test]
        fn pattern_filters_case_insensitively() {
            let v = vault(
                MemoryStorage::default()
                    .with("/stream/2024-V16-entry.yaml", "a")
                    .with("/stream/2024-v15-entry.yaml", "b")
                    .with("/stream/2025-v16-note.md", "c"),
            );

            let listing = get_stream(&v, Some("v16"), 5);
            let names: Vec<_> = listing.entries.iter().map(|e| e.filename.as_str()).collect();
            assert_eq!(names, vec!["2025-v16-note.md", "2024-V16-entry.yaml"]);
            assert_eq!(listing.total, 2);
        }

        #[test]
        fn preview_bounded() {
            let long = "z".repeat(600);
            let v = vault(
                MemoryStorage::default()
                    .with("/stream/long.yaml", &long)
                    .with("/stream/short.yaml", "short"),
            );

            let listing = get_stream(&v, None, 5);
            let long_entry = listing.entries.iter().find(|e| e.filename == "long.yaml").unwrap();
            let short_entry = listing.entries.iter().find(|e| e.filename == "short.yaml").unwrap();

            assert_eq!(long_entry.preview, format!("{}...", "z".repeat(500)));
            assert_eq!(short_entry.preview, "short");
        }

        #[test]
        fn limit_counts_total_before_truncation() {
            let v = vault(
                MemoryStorage::default()
                    .with("/stream/1.md", "")
                    .with("/stream/2.md", "")
                    .with("/stream/3.md", ""),
            );

            let listing = get_stream(&v, None, 1);
            assert_eq!(listing.entries.len(), 1);
            assert_eq!(listing.entries[0].filename, "3.md");
            assert_eq!(listing.total, 3);
        }

        #[test]
        fn missing_root_is_empty() {
            let v = vault(MemoryStorage::default().with("/jewels/a.md", ""));
            let listing = get_stream(&v, None, 5);

            assert!(listing.entries.is_empty());
            assert_eq!(listing.total, 0);
        }
    }
}
