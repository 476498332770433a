//! Term-overlap scoring and ranking.
//!
//! A document scores a fixed weight for every query term found in its content
//! and another for every term found in its filename. The weights depend on the
//! collection the document came from (see [`Source`]). Scores saturate at 1.0.

pub mod snippet;

use std::cmp::Ordering;
use std::path::PathBuf;

use serde::Serialize;

use crate::vault::{Document, Source};

/// Terms this short or shorter carry no match signal.
const MIN_TERM_CHARS: usize = 3;

/// Highest score a document can reach.
const MAX_SCORE: f64 = 1.0;

/// A single search result with match context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub filename: String,
    pub path: PathBuf,
    pub snippet: String,
    pub score: f64,
    pub source: Source,
}

/// Split a lowercased query into match terms, dropping short ones.
#[must_use]
pub fn query_terms(query_lower: &str) -> Vec<&str> {
    query_lower
        .split_whitespace()
        .filter(|t| t.chars().count() >= MIN_TERM_CHARS)
        .collect()
}

/// Raw, unclamped score for one document.
#[must_use]
pub fn raw_score(content_lower: &str, filename_lower: &str, terms: &[&str], source: Source) -> f64 {
    terms.iter().fold(0.0, |mut score, term| {
        if content_lower.contains(term) {
            score += source.content_weight();
        }
        if filename_lower.contains(term) {
            score += source.filename_weight();
        }
        score
    })
}

/// Score a document against a query, producing a result if anything matched.
///
/// `query_lower` is the whole lowercased query; it anchors the snippet when
/// no term survived filtering.
#[must_use]
pub fn score_document(doc: &Document, terms: &[&str], query_lower: &str) -> Option<SearchResult> {
    let content_lower = doc.content.to_lowercase();
    let filename_lower = doc.filename.to_lowercase();

    let score = raw_score(&content_lower, &filename_lower, terms, doc.source);
    if score <= 0.0 {
        return None;
    }

    let needle = terms.first().copied().unwrap_or(query_lower);

    Some(SearchResult {
        filename: doc.filename.clone(),
        path: doc.path.clone(),
        snippet: snippet::extract(&doc.content, &content_lower, needle),
        score: score.min(MAX_SCORE),
        source: doc.source,
    })
}

/// Sort results best-first. The sort is stable, so equal scores keep their
/// input order.
pub fn rank(results: &mut [SearchResult]) {
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}
