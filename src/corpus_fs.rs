//! Filesystem corpus loader.
//!
//! Reads every file under `corpus.root` that matches the include globs and
//! none of the exclude globs, one [`Document`] per file. Files are ordered by
//! their path relative to the root, which fixes the index alignment.
//!
//! A missing root is an empty corpus. A root that exists but cannot be
//! walked, or a matching file that cannot be read as UTF-8 text, is a
//! [`CorpusLoadError`].

use anyhow::Result;
use async_trait::async_trait;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use grounding_core::corpus::CorpusLoader;
use grounding_core::models::{derive_title, document_id, Document};
use grounding_core::CorpusLoadError;

use crate::config::CorpusConfig;

/// Directories never worth indexing.
const DEFAULT_EXCLUDES: &[&str] = &["**/.git/**", "**/target/**", "**/node_modules/**"];

pub struct FilesystemCorpus {
    root: PathBuf,
    include: GlobSet,
    exclude: GlobSet,
    recursive: bool,
    follow_symlinks: bool,
}

impl FilesystemCorpus {
    pub fn new(config: &CorpusConfig) -> Result<Self> {
        let mut excludes: Vec<String> = DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect();
        excludes.extend(config.exclude_globs.iter().cloned());

        Ok(Self {
            root: config.root.clone(),
            include: build_globset(&config.include_globs)?,
            exclude: build_globset(&excludes)?,
            recursive: config.recursive,
            follow_symlinks: config.follow_symlinks,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the root and read every eligible file.
    pub fn scan(&self) -> Result<Vec<Document>, CorpusLoadError> {
        let root = &self.root;
        match std::fs::metadata(root) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!(root = %root.display(), "corpus directory does not exist, using empty corpus");
                return Ok(Vec::new());
            }
            Err(e) => return Err(CorpusLoadError::new(root, e)),
            Ok(meta) if !meta.is_dir() => {
                return Err(CorpusLoadError::new(
                    root,
                    io::Error::new(io::ErrorKind::InvalidInput, "corpus root is not a directory"),
                ));
            }
            Ok(_) => {}
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(self.follow_symlinks);

        let mut files: Vec<(String, PathBuf)> = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root.as_path()).to_path_buf();
                CorpusLoadError::new(path, io::Error::from(e))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(root).unwrap_or(path);
            let rel_str = relative.to_string_lossy().replace('\\', "/");

            // Apply exclude patterns
            if self.exclude.is_match(&rel_str) {
                continue;
            }

            // Apply include patterns
            if !self.include.is_match(&rel_str) {
                debug!(file = %rel_str, "skipping unsupported file");
                continue;
            }

            files.push((rel_str, path.to_path_buf()));
        }

        // Sort for deterministic ordering
        files.sort_by(|a, b| a.0.cmp(&b.0));

        files
            .into_iter()
            .enumerate()
            .map(|(position, (rel_str, path))| file_to_document(position, &rel_str, &path))
            .collect()
    }
}

#[async_trait]
impl CorpusLoader for FilesystemCorpus {
    fn describe(&self) -> String {
        format!("filesystem:{}", self.root.display())
    }

    async fn load(&self) -> Result<Vec<Document>, CorpusLoadError> {
        let documents = self.scan()?;
        debug!(root = %self.root.display(), documents = documents.len(), "loaded corpus");
        Ok(documents)
    }
}

fn file_to_document(
    position: usize,
    relative_path: &str,
    path: &Path,
) -> Result<Document, CorpusLoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| CorpusLoadError::new(path, e))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| relative_path.to_string());

    Ok(Document::new(
        document_id(position, relative_path),
        derive_title(&text, &file_name),
        text,
    ))
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
