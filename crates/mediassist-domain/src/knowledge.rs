//! Knowledge module - documents ingested into named knowledge bases

use std::fmt;
use std::path::PathBuf;

/// Unique identifier for an ingested document based on UUIDv7
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId(u128);

impl DocumentId {
    /// Generate a new UUIDv7-based DocumentId
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a DocumentId from a raw u128 value
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// A named knowledge base
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBase {
    /// Knowledge base name
    pub name: String,
}

impl KnowledgeBase {
    /// Create a knowledge base handle
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A document submitted for ingestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeDocument {
    /// Document identifier
    pub id: DocumentId,
    /// Where the text came from (usually a file path)
    pub source: String,
    /// Extracted text
    pub content: String,
}

impl KnowledgeDocument {
    /// Create a document with a fresh id
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: DocumentId::new(),
            source: source.into(),
            content: content.into(),
        }
    }
}

/// Outcome of importing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileImportResult {
    /// File that was processed
    pub file_path: PathBuf,
    /// Whether the file was ingested
    pub success: bool,
    /// Failure reason, if any
    pub error: Option<String>,
    /// Pages whose text was recovered
    pub pages_extracted: usize,
    /// Pages that failed extraction and were skipped
    pub pages_skipped: usize,
}

impl FileImportResult {
    /// A successful import
    pub fn succeeded(
        file_path: impl Into<PathBuf>,
        pages_extracted: usize,
        pages_skipped: usize,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            success: true,
            error: None,
            pages_extracted,
            pages_skipped,
        }
    }

    /// A failed import
    pub fn failed(file_path: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            success: false,
            error: Some(error.into()),
            pages_extracted: 0,
            pages_skipped: 0,
        }
    }
}

/// Aggregate result of one loader run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    /// Knowledge base the files were loaded into
    pub knowledge_base: String,
    /// One entry per processed file, in processing order
    pub results: Vec<FileImportResult>,
}

impl LoadSummary {
    /// Create an empty summary
    pub fn new(knowledge_base: impl Into<String>) -> Self {
        Self {
            knowledge_base: knowledge_base.into(),
            results: Vec::new(),
        }
    }

    /// Files processed
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Files ingested successfully
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    /// Failed files
    pub fn failed(&self) -> impl Iterator<Item = &FileImportResult> {
        self.results.iter().filter(|r| !r.success)
    }
}

impl fmt::Display for LoadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} files loaded into '{}'",
            self.succeeded(),
            self.total(),
            self.knowledge_base
        )
    }
}
