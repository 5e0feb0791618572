//! Corpus loading abstraction.
//!
//! A [`CorpusLoader`] produces the ordered document list that the knowledge
//! store embeds. The order it returns becomes the index alignment, so
//! implementations must return the same order for an unchanged source.

use async_trait::async_trait;

use crate::error::CorpusLoadError;
use crate::models::{derive_title, document_id, Document};

/// Source of corpus documents.
///
/// Returns an empty list, not an error, when the source does not exist.
/// Returns [`CorpusLoadError`] when it exists but cannot be read.
#[async_trait]
pub trait CorpusLoader: Send + Sync {
    /// Human-readable description of the source, used in logs.
    fn describe(&self) -> String;

    /// Load every eligible document, in stable order.
    async fn load(&self) -> Result<Vec<Document>, CorpusLoadError>;
}

/// A corpus held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticCorpus {
    documents: Vec<Document>,
}

impl StaticCorpus {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Build documents from `(name, text)` pairs the way a file-backed
    /// loader would: ids from position and name, titles from the text.
    pub fn from_texts<N, T>(entries: impl IntoIterator<Item = (N, T)>) -> Self
    where
        N: AsRef<str>,
        T: Into<String>,
    {
        let documents = entries
            .into_iter()
            .enumerate()
            .map(|(position, (name, text))| {
                let text = text.into();
                let name = name.as_ref();
                Document::new(document_id(position, name), derive_title(&text, name), text)
            })
            .collect();
        Self { documents }
    }
}

#[async_trait]
impl CorpusLoader for StaticCorpus {
    fn describe(&self) -> String {
        format!("static corpus ({} documents)", self.documents.len())
    }

    async fn load(&self) -> Result<Vec<Document>, CorpusLoadError> {
        Ok(self.documents.clone())
    }
}
