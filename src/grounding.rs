//! Grounding block formatting.
//!
//! Turns retrieval results into the numbered notes block a question
//! answering prompt embeds, plus the matching citation list. Citation
//! `[n]` always refers to the n-th snippet in result order.

use anyhow::Result;
use serde::Serialize;

use grounding_core::Snippet;

use crate::config::Config;
use crate::search::{open_store, search_snippets};

const HEADER: &str = "KNOWN POLICY/NOTES:";

/// A source reference matching a `[n]` marker in the grounding block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Citation {
    pub index: usize,
    pub title: String,
}

/// Grounding block plus citations for one question.
#[derive(Debug, Clone, Serialize)]
pub struct GroundedContext {
    pub question: String,
    pub block: String,
    pub sources: Vec<Citation>,
}

/// Format snippets as a numbered notes block.
///
/// ```text
/// KNOWN POLICY/NOTES:
/// [1] Eligibility
/// Applicants must be 18-35 ...
///
/// [2] Budget
/// ...
/// ```
pub fn grounding_block(snippets: &[Snippet]) -> String {
    if snippets.is_empty() {
        return format!("{} (none found)", HEADER);
    }

    let notes: Vec<String> = snippets
        .iter()
        .enumerate()
        .map(|(i, s)| format!("[{}] {}\n{}", i + 1, s.title, s.text))
        .collect();
    format!("{}\n{}", HEADER, notes.join("\n\n"))
}

pub fn citations(snippets: &[Snippet]) -> Vec<Citation> {
    snippets
        .iter()
        .enumerate()
        .map(|(i, s)| Citation {
            index: i + 1,
            title: s.title.clone(),
        })
        .collect()
}

pub fn ground(question: &str, snippets: &[Snippet]) -> GroundedContext {
    GroundedContext {
        question: question.to_string(),
        block: grounding_block(snippets),
        sources: citations(snippets),
    }
}

/// CLI entry point for `ground context`.
pub async fn run_context(config: &Config, question: &str, k: Option<i64>, json: bool) -> Result<()> {
    let store = open_store(config)?;
    let snippets = search_snippets(&store, config, question, k).await?;
    let context = ground(question, &snippets);

    if json {
        println!("{}", serde_json::to_string_pretty(&context)?);
        return Ok(());
    }

    println!("{}", context.block);
    if !context.sources.is_empty() {
        println!();
        println!("SOURCES:");
        for source in &context.sources {
            println!("[{}] {}", source.index, source.title);
        }
    }
    Ok(())
}
