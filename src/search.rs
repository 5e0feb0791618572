//! Application-level entry points for retrieval.
//!
//! The ranking algorithm and the lazily-built store live in
//! `grounding_core`. This module wires them to the configured filesystem
//! corpus and embedding provider, and formats results for the CLI.

use anyhow::Result;
use std::sync::Arc;

pub use grounding_core::Snippet;
use grounding_core::{retrieve, KnowledgeStore, RetrievalRequest};

use crate::config::Config;
use crate::corpus_fs::FilesystemCorpus;
use crate::embedding;

/// Build a [`KnowledgeStore`] over the configured corpus and provider.
///
/// Nothing is read or embedded until the first retrieval.
pub fn open_store(config: &Config) -> Result<KnowledgeStore> {
    let corpus = FilesystemCorpus::new(&config.corpus)?;
    let provider = embedding::create_provider(&config.embedding)?;
    Ok(KnowledgeStore::new(Arc::new(corpus), provider)
        .with_default_dims(config.embedding.default_dims()))
}

/// Retrieve snippets for `query` using the configured snippet cap.
///
/// `k` defaults to `retrieval.default_k`. This is the shared implementation
/// behind `ground search` and `ground context`.
pub async fn search_snippets(
    store: &KnowledgeStore,
    config: &Config,
    query: &str,
    k: Option<i64>,
) -> Result<Vec<Snippet>> {
    let req = RetrievalRequest::new(query)
        .with_k(k.unwrap_or(config.retrieval.default_k))
        .with_snippet_chars(config.retrieval.snippet_chars);
    Ok(retrieve(store, &req).await?)
}

/// CLI entry point for `ground search`.
pub async fn run_search(config: &Config, query: &str, k: Option<i64>, json: bool) -> Result<()> {
    let store = open_store(config)?;
    let results = search_snippets(&store, config, query, k).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        println!("{}. [{:.4}] {}", i + 1, result.score, result.title);
        println!(
            "    excerpt: \"{}\"",
            excerpt(&result.text, 240).replace('\n', " ").trim()
        );
        println!();
    }

    Ok(())
}

fn excerpt(text: &str, max_chars: usize) -> &str {
    grounding_core::models::truncate_chars(text, max_chars)
}
