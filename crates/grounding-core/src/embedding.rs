//! Embedding provider trait and vector utilities.
//!
//! Defines the [`EmbeddingProvider`] trait that every embedding backend
//! implements, the contract checks applied to each provider response, and
//! cosine similarity.
//!
//! Concrete providers (OpenAI, Ollama) live in the `policy-grounding` app
//! crate.

use async_trait::async_trait;

use crate::error::{DimensionMismatch, ProviderError};

/// Added to the cosine denominator so zero-norm vectors score `0.0`
/// instead of dividing by zero.
pub const COSINE_EPSILON: f64 = 1e-12;

/// Trait for embedding providers.
///
/// `embed` must return one vector per input text, in input order. The
/// store never trusts that blindly: every response goes through
/// [`embed_checked`] before it is used.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Returns the model identifier (e.g. `"text-embedding-3-small"`).
    fn model_name(&self) -> &str;
    /// Returns the configured vector dimensionality (e.g. `1536`), or `0`
    /// when it is not known up front.
    fn dims(&self) -> usize;
    /// Embed a batch of texts.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError>;
}

/// Embed `texts` and verify the provider contract.
///
/// Fails with [`ProviderError::CountMismatch`] if the number of vectors
/// differs from the number of inputs, and with
/// [`ProviderError::InconsistentDimension`] if the vectors do not all share
/// one length. When the provider reports a non-zero [`dims`], the vectors
/// must also have that length, or the call fails with
/// [`ProviderError::UnexpectedDimension`]. A rejected response is discarded
/// whole.
///
/// [`dims`]: EmbeddingProvider::dims
pub async fn embed_checked(
    provider: &dyn EmbeddingProvider,
    texts: &[String],
) -> Result<Vec<Vec<f32>>, ProviderError> {
    if texts.is_empty() {
        return Ok(Vec::new());
    }

    let vectors = provider.embed(texts).await?;
    if vectors.len() != texts.len() {
        return Err(ProviderError::CountMismatch {
            expected: texts.len(),
            actual: vectors.len(),
        });
    }

    let expected = vectors[0].len();
    let configured = provider.dims();
    if configured != 0 && expected != configured {
        return Err(ProviderError::UnexpectedDimension {
            expected: configured,
            actual: expected,
        });
    }
    if let Some((position, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != expected) {
        return Err(ProviderError::InconsistentDimension {
            position,
            expected,
            actual: v.len(),
        });
    }

    Ok(vectors)
}

/// Embed a single query text as a one-item batch.
pub async fn embed_query(
    provider: &dyn EmbeddingProvider,
    text: &str,
) -> Result<Vec<f32>, ProviderError> {
    let mut vectors = embed_checked(provider, &[text.to_string()]).await?;
    vectors.pop().ok_or(ProviderError::CountMismatch {
        expected: 1,
        actual: 0,
    })
}

/// Compute cosine similarity between two embedding vectors.
///
/// ```text
///               a · b
/// cos(θ) = ─────────────────
///          ‖a‖ × ‖b‖ + 1e-12
/// ```
///
/// Accumulates in `f64`. Returns a value in `[-1.0, 1.0]` for non-zero
/// vectors and `0.0` when either vector has zero norm. Vectors of different
/// lengths are rejected, never truncated or padded.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, DimensionMismatch> {
    if a.len() != b.len() {
        return Err(DimensionMismatch {
            query: a.len(),
            corpus: b.len(),
        });
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    Ok(dot / (norm_a.sqrt() * norm_b.sqrt() + COSINE_EPSILON))
}
