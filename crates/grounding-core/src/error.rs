//! Error taxonomy for the retrieval core.
//!
//! Every type here is `Clone`: a failed store initialization is shared by
//! all callers that were waiting on it, and each of them receives its own
//! copy of the same error.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

/// The embedding call failed or returned data that breaks the provider
/// contract.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The configured provider is `disabled`.
    #[error("embedding provider is disabled")]
    Disabled,

    /// The provider cannot be called as configured (e.g. missing API key).
    #[error("embedding provider misconfigured: {0}")]
    Config(String),

    /// Transport-level failure (connect, timeout, TLS, body decode).
    #[error("embedding request failed: {0}")]
    Request(String),

    /// Upstream answered with a non-success status.
    #[error("embedding API error {status}: {body}")]
    Api { status: u16, body: String },

    /// The response body did not have the expected shape.
    #[error("malformed embedding response: {0}")]
    Malformed(String),

    /// The number of vectors differs from the number of inputs.
    #[error("embedding count mismatch: sent {expected} texts, received {actual} vectors")]
    CountMismatch { expected: usize, actual: usize },

    /// Vectors do not have the dimension the provider is configured for.
    #[error("embedding dimension {actual} does not match configured {expected}")]
    UnexpectedDimension { expected: usize, actual: usize },

    /// Vectors within one response do not share a dimension.
    #[error("inconsistent embedding dimension at position {position}: expected {expected}, got {actual}")]
    InconsistentDimension {
        position: usize,
        expected: usize,
        actual: usize,
    },
}

/// A query vector and the corpus vectors have different lengths.
///
/// Indicates the corpus was embedded with a different model than the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("dimension mismatch: query has {query} dimensions, corpus has {corpus}")]
pub struct DimensionMismatch {
    pub query: usize,
    pub corpus: usize,
}

/// The corpus source exists but could not be read.
///
/// A missing source is not an error; loaders return an empty corpus for it.
#[derive(Debug, Clone, Error)]
#[error("failed to read corpus at {}: {source}", .path.display())]
pub struct CorpusLoadError {
    pub path: PathBuf,
    #[source]
    pub source: Arc<io::Error>,
}

impl CorpusLoadError {
    pub fn new(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            source: Arc::new(source),
        }
    }
}

/// Errors returned by [`KnowledgeStore`](crate::store::KnowledgeStore) and
/// the retrieval API.
#[derive(Debug, Clone, Error)]
pub enum KnowledgeError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    DimensionMismatch(#[from] DimensionMismatch),

    #[error(transparent)]
    CorpusLoad(#[from] CorpusLoadError),
}
