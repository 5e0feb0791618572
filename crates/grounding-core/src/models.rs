//! Core data models: corpus documents and retrieval snippets.

use serde::Serialize;

/// A corpus document, immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Unique, deterministic identifier (see [`document_id`]).
    pub id: String,
    /// First non-empty line with heading markers stripped.
    pub title: String,
    /// Full body text. Embeddings are always computed from this.
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<String>, title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            text: text.into(),
        }
    }
}

/// One entry of a retrieval result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snippet {
    pub title: String,
    /// Cosine similarity against the query, approximately in `[-1, 1]`.
    pub score: f64,
    /// Prefix of the document text, capped at the configured character count.
    pub text: String,
}

/// Build the identifier of the document at `position` in load order.
///
/// `name` is the source-relative name of the document (e.g. a file path
/// relative to the corpus root).
pub fn document_id(position: usize, name: &str) -> String {
    format!("doc_{}_{}", position, name)
}

/// Derive a display title from document text.
///
/// Takes the first non-empty line and strips leading `#` heading markers.
/// Falls back to `fallback` (usually the file name) when the text has no
/// non-empty line or the line is nothing but markers.
pub fn derive_title(text: &str, fallback: &str) -> String {
    let first = text.lines().map(str::trim).find(|l| !l.is_empty());
    match first.map(|l| l.trim_start_matches('#').trim()) {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => fallback.to_string(),
    }
}

/// Return the first `max_chars` characters of `text`.
///
/// Counts Unicode scalar values, not bytes, so the cut never lands inside a
/// multi-byte character. The result is always a prefix of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
