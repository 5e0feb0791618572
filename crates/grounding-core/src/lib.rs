//! # Grounding Core
//!
//! Runtime-agnostic logic for grounding free-text questions in a small,
//! static corpus of policy documents: data models, the error taxonomy,
//! the embedding-provider trait, cosine scoring, the lazily-initialized
//! knowledge store, and the top-k retrieval operation.
//!
//! This crate contains no tokio, filesystem I/O, or HTTP clients. Concrete
//! corpus loaders and embedding providers live in the `policy-grounding`
//! app crate and are injected through [`corpus::CorpusLoader`] and
//! [`embedding::EmbeddingProvider`].
//!
//! ```text
//! retrieve() ──▶ KnowledgeStore::ensure() ──▶ CorpusLoader::load()
//!     │                     └───────────────▶ EmbeddingProvider::embed(corpus)
//!     ├──▶ EmbeddingProvider::embed([query])
//!     └──▶ VectorIndex::rank() ──▶ truncate ──▶ Vec<Snippet>
//! ```

pub mod corpus;
pub mod embedding;
pub mod error;
pub mod index;
pub mod models;
pub mod retrieve;
pub mod store;

#[cfg(test)]
mod testing;

pub use error::{CorpusLoadError, DimensionMismatch, KnowledgeError, ProviderError};
pub use models::{Document, Snippet};
pub use retrieve::{retrieve, retrieve_context, RetrievalRequest};
pub use store::{KnowledgeBase, KnowledgeStore, StoreState};
