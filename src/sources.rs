//! `ground sources`: list the corpus without embedding it.

use anyhow::Result;

use crate::config::Config;
use crate::corpus_fs::FilesystemCorpus;

pub fn list_sources(config: &Config) -> Result<()> {
    let corpus = FilesystemCorpus::new(&config.corpus)?;
    let documents = corpus.scan()?;

    println!("corpus: {}", corpus.root().display());
    if documents.is_empty() {
        println!("No documents.");
        return Ok(());
    }

    println!("{:<32} {:>8}  TITLE", "ID", "CHARS");
    for doc in &documents {
        println!("{:<32} {:>8}  {}", doc.id, doc.text.chars().count(), doc.title);
    }
    println!("{} documents", documents.len());
    Ok(())
}
