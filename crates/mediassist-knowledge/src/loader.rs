//! Directory loader feeding extracted document text into a knowledge base

use crate::config::LoaderConfig;
use crate::error::LoaderError;
use mediassist_domain::traits::{KnowledgeStore, TextExtractor};
use mediassist_domain::{FileImportResult, KnowledgeDocument, LoadSummary};
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Loads every matching file in a directory into a named knowledge base
///
/// Per-file failures are recorded in the [`LoadSummary`] and the run
/// continues. Only an unreadable directory or a failure to create the
/// knowledge base aborts the run.
pub struct KnowledgeBaseLoader<S, X>
where
    S: KnowledgeStore,
    X: TextExtractor,
{
    store: S,
    extractor: X,
    config: LoaderConfig,
}

impl<S, X> KnowledgeBaseLoader<S, X>
where
    S: KnowledgeStore,
    X: TextExtractor,
    S::Error: Display,
    X::Error: Display,
{
    /// Create a new loader
    pub fn new(store: S, extractor: X, config: LoaderConfig) -> Self {
        Self {
            store,
            extractor,
            config,
        }
    }

    /// Borrow the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the loader, returning the store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Files in `dir` whose names match the configured pattern, sorted by path
    pub fn matching_files(&self, dir: &Path) -> Result<Vec<PathBuf>, LoaderError> {
        let matcher = self.config.matcher().map_err(LoaderError::Config)?;

        let entries = fs::read_dir(dir).map_err(|source| LoaderError::Directory {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| LoaderError::Directory {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            let name_matches = path
                .file_name()
                .map(|name| matcher.is_match(name))
                .unwrap_or(false);
            if path.is_file() && name_matches {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    /// Load every matching file in `dir` into the knowledge base `kb_name`
    ///
    /// The knowledge base is created when the first file yields text, so a
    /// run that recovers nothing leaves the store untouched.
    pub fn load_directory(
        &mut self,
        kb_name: &str,
        dir: &Path,
    ) -> Result<LoadSummary, LoaderError> {
        self.config.validate().map_err(LoaderError::Config)?;

        let files = self.matching_files(dir)?;
        let total = files.len();
        info!(
            "Loading {} files from {} into '{}'",
            total,
            dir.display(),
            kb_name
        );

        let mut summary = LoadSummary::new(kb_name);
        let mut kb_ready = false;
        let mut loaded = 0;

        for path in files {
            let result = match self.read_file(&path) {
                Ok(extracted) => {
                    if !kb_ready {
                        self.store
                            .get_or_create(kb_name)
                            .map_err(|e| LoaderError::Store(e.to_string()))?;
                        kb_ready = true;
                    }
                    self.insert_file(kb_name, &path, extracted)
                }
                Err(failed) => failed,
            };

            if result.success {
                loaded += 1;
                info!("Loaded {}/{}: {}", loaded, total, path.display());
            } else {
                error!(
                    "Failed to load {}: {}",
                    path.display(),
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            summary.results.push(result);
        }

        info!("{}", summary);
        Ok(summary)
    }

    /// Recover the text of one file, page by page
    fn read_file(&self, path: &Path) -> Result<ExtractedFile, FileImportResult> {
        let pages = self
            .extractor
            .extract_pages(path)
            .map_err(|e| FileImportResult::failed(path, e.to_string()))?;

        let mut texts = Vec::new();
        let mut skipped = 0;
        for (idx, page) in pages.into_iter().enumerate() {
            match page {
                Ok(text) => {
                    let text = text.trim();
                    if !text.is_empty() {
                        texts.push(text.to_string());
                    }
                }
                Err(e) => {
                    warn!("{}: skipping page {}: {}", path.display(), idx + 1, e);
                    skipped += 1;
                }
            }
        }

        if texts.is_empty() {
            return Err(FileImportResult::failed(path, "no text extracted"));
        }

        Ok(ExtractedFile {
            content: texts.join(&self.config.page_separator),
            pages_extracted: texts.len(),
            pages_skipped: skipped,
        })
    }

    fn insert_file(
        &mut self,
        kb_name: &str,
        path: &Path,
        extracted: ExtractedFile,
    ) -> FileImportResult {
        let document = KnowledgeDocument::new(path.display().to_string(), extracted.content);
        match self.store.insert(kb_name, &[document]) {
            Ok(_) => FileImportResult::succeeded(
                path,
                extracted.pages_extracted,
                extracted.pages_skipped,
            ),
            Err(e) => FileImportResult::failed(path, format!("insert failed: {}", e)),
        }
    }
}

/// Text recovered from one file
struct ExtractedFile {
    content: String,
    pages_extracted: usize,
    pages_skipped: usize,
}
