use chrono::{DateTime, Utc};

use crate::error::ProviderError;
use crate::index::VectorIndex;
use crate::models::Document;

/// The Ready state of a knowledge store: documents and their embeddings,
/// aligned by position. Immutable once built.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    documents: Vec<Document>,
    index: VectorIndex,
    loaded_at: DateTime<Utc>,
}

impl KnowledgeBase {
    /// Pair documents with their index. Both must have the same length.
    pub fn new(documents: Vec<Document>, index: VectorIndex) -> Result<Self, ProviderError> {
        if documents.len() != index.len() {
            return Err(ProviderError::CountMismatch {
                expected: documents.len(),
                actual: index.len(),
            });
        }
        Ok(Self {
            documents,
            index,
            loaded_at: Utc::now(),
        })
    }

    pub fn empty(dims: usize) -> Self {
        Self {
            documents: Vec::new(),
            index: VectorIndex::empty(dims),
            loaded_at: Utc::now(),
        }
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn dims(&self) -> usize {
        self.index.dims()
    }

    /// When the corpus was loaded and embedded. The base is never refreshed,
    /// so this is also how stale it may be.
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}
