//! Top-k retrieval over a [`KnowledgeStore`].
//!
//! 1. `k ≤ 0` → empty result, nothing else happens.
//! 2. Resolve the store (loads and embeds the corpus on first use).
//! 3. Empty corpus → empty result; the query is never embedded.
//! 4. Embed the query as a one-item batch.
//! 5. Rank by cosine similarity, keep `min(k, documents)`.
//! 6. Cut each selected text to `snippet_chars` characters.
//!
//! Ranking always uses embeddings of the full document text; truncation
//! only shapes the returned snippets.

use tracing::debug;

use crate::embedding::embed_query;
use crate::error::KnowledgeError;
use crate::models::{truncate_chars, Snippet};
use crate::store::KnowledgeStore;

/// Number of snippets returned when the caller does not say.
pub const DEFAULT_K: i64 = 3;

/// Character cap applied to each returned snippet by default.
pub const DEFAULT_SNIPPET_CHARS: usize = 3000;

/// Bundles all inputs for a single retrieval.
#[derive(Debug, Clone)]
pub struct RetrievalRequest<'a> {
    pub query: &'a str,
    /// Maximum number of snippets. Non-positive values yield no snippets.
    pub k: i64,
    /// Maximum characters per snippet text.
    pub snippet_chars: usize,
}

impl<'a> RetrievalRequest<'a> {
    pub fn new(query: &'a str) -> Self {
        Self {
            query,
            k: DEFAULT_K,
            snippet_chars: DEFAULT_SNIPPET_CHARS,
        }
    }

    pub fn with_k(mut self, k: i64) -> Self {
        self.k = k;
        self
    }

    pub fn with_snippet_chars(mut self, snippet_chars: usize) -> Self {
        self.snippet_chars = snippet_chars;
        self
    }
}

/// Retrieve the `k` most relevant snippets for `query`, using the default
/// snippet cap.
pub async fn retrieve_context(
    store: &KnowledgeStore,
    query: &str,
    k: i64,
) -> Result<Vec<Snippet>, KnowledgeError> {
    retrieve(store, &RetrievalRequest::new(query).with_k(k)).await
}

/// Run a retrieval request against `store`.
///
/// Provider failures are returned as errors; an empty result means the
/// corpus is empty or `k` is non-positive.
pub async fn retrieve(
    store: &KnowledgeStore,
    req: &RetrievalRequest<'_>,
) -> Result<Vec<Snippet>, KnowledgeError> {
    let k = match usize::try_from(req.k) {
        Ok(k) if k > 0 => k,
        _ => return Ok(Vec::new()),
    };

    let kb = store.ensure().await?;
    if kb.is_empty() {
        debug!("corpus is empty, nothing to rank");
        return Ok(Vec::new());
    }

    let query_vec = embed_query(store.provider(), req.query).await?;
    let ranked = kb.index().rank(&query_vec, k)?;
    debug!(
        candidates = kb.len(),
        returned = ranked.len(),
        top_score = ranked.first().map(|e| e.score),
        "ranked corpus"
    );

    let documents = kb.documents();
    Ok(ranked
        .into_iter()
        .map(|entry| {
            let doc = &documents[entry.position];
            Snippet {
                title: doc.title.clone(),
                score: entry.score,
                text: truncate_chars(&doc.text, req.snippet_chars).to_string(),
            }
        })
        .collect())
}
