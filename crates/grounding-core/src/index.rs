//! Brute-force vector index over the corpus embeddings.
//!
//! Position `i` of the index always corresponds to position `i` of the
//! document list it was built for. The index never reorders its entries;
//! ranking produces positions into it.

use crate::embedding::cosine_similarity;
use crate::error::{DimensionMismatch, ProviderError};

/// A ranked hit: a corpus position and its similarity to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredEntry {
    pub position: usize,
    pub score: f64,
}

/// Corpus embeddings plus their shared dimension.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    embeddings: Vec<Vec<f32>>,
    dims: usize,
}

impl VectorIndex {
    /// Build an index from embeddings that must all share one length.
    ///
    /// `default_dims` is used only when `embeddings` is empty.
    pub fn new(embeddings: Vec<Vec<f32>>, default_dims: usize) -> Result<Self, ProviderError> {
        let dims = embeddings.first().map_or(default_dims, Vec::len);
        if let Some((position, v)) = embeddings.iter().enumerate().find(|(_, v)| v.len() != dims) {
            return Err(ProviderError::InconsistentDimension {
                position,
                expected: dims,
                actual: v.len(),
            });
        }
        Ok(Self { embeddings, dims })
    }

    pub fn empty(dims: usize) -> Self {
        Self {
            embeddings: Vec::new(),
            dims,
        }
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn embeddings(&self) -> &[Vec<f32>] {
        &self.embeddings
    }

    /// Cosine similarity of `query` against every entry, in index order.
    pub fn score(&self, query: &[f32]) -> Result<Vec<f64>, DimensionMismatch> {
        score(query, &self.embeddings)
    }

    /// Score `query` and return the `k` best entries.
    pub fn rank(&self, query: &[f32], k: usize) -> Result<Vec<ScoredEntry>, DimensionMismatch> {
        let scores = self.score(query)?;
        Ok(top_k(&scores, k))
    }
}

/// Score `query` against each corpus embedding.
///
/// Fails on the first entry whose length differs from the query's.
pub fn score(query: &[f32], corpus: &[Vec<f32>]) -> Result<Vec<f64>, DimensionMismatch> {
    corpus
        .iter()
        .map(|entry| cosine_similarity(query, entry))
        .collect()
}

/// Rank scores in descending order and keep the first `k`.
///
/// The sort is stable, so equal scores keep corpus order. Returns every
/// entry when there are fewer than `k`.
pub fn top_k(scores: &[f64], k: usize) -> Vec<ScoredEntry> {
    let mut ranked: Vec<ScoredEntry> = scores
        .iter()
        .enumerate()
        .map(|(position, &score)| ScoredEntry { position, score })
        .collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked.truncate(k);
    ranked
}
