//! MediAssist Knowledge Layer
//!
//! Implements the `KnowledgeStore` and `TextExtractor` boundaries and the
//! loader that ties them together.
//!
//! # Architecture
//!
//! - SQLite for a local, self-contained knowledge store
//! - MindsDB's HTTP SQL API for server-hosted knowledge bases
//! - `lopdf` for page-by-page PDF text
//!
//! ```text
//! directory → glob filter → PdfTextExtractor → KnowledgeDocument → KnowledgeStore
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use mediassist_knowledge::{
//!     KnowledgeBaseLoader, LoaderConfig, PdfTextExtractor, SqliteKnowledgeStore,
//! };
//! use std::path::Path;
//!
//! let store = SqliteKnowledgeStore::new("knowledge.db").unwrap();
//! let mut loader =
//!     KnowledgeBaseLoader::new(store, PdfTextExtractor::new(), LoaderConfig::default());
//!
//! let summary = loader.load_directory("medical_guidelines", Path::new("./docs")).unwrap();
//! println!("{}", summary);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod mindsdb;
mod pdf;
mod sqlite;

pub use config::LoaderConfig;
pub use error::{LoaderError, PdfError, StoreError};
pub use loader::KnowledgeBaseLoader;
pub use mindsdb::{quote_literal, validate_identifier, MindsDbStore, DEFAULT_MINDSDB_URL};
pub use pdf::PdfTextExtractor;
pub use sqlite::SqliteKnowledgeStore;
