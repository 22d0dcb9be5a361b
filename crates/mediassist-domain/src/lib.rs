//! MediAssist Domain Layer
//!
//! This crate contains the core domain model for MediAssist. It depends only on
//! `uuid` and defines the value objects and trait interfaces that all other
//! layers build upon.
//!
//! ## Key Concepts
//!
//! - **Transcript**: Append-only ordered list of turns between the assistant and the patient
//! - **ExtractedRecord**: Patient intake fields recovered from a finished transcript
//! - **CompletionRequest**: Messages plus sampling parameters sent to a completion service
//! - **Knowledge documents**: Text recovered from files and ingested into a named knowledge base
//!
//! ## Architecture
//!
//! - Pure domain logic only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for every external boundary (completion service,
//!   knowledge store, text extraction)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod completion;
pub mod knowledge;
pub mod record;
pub mod role;
pub mod traits;
pub mod turn;

// Re-exports for convenience
pub use completion::{ChatMessage, ChatRole, CompletionRequest, SamplingParams};
pub use knowledge::{DocumentId, FileImportResult, KnowledgeBase, KnowledgeDocument, LoadSummary};
pub use record::{ExtractedRecord, RecordField};
pub use role::UserRole;
pub use turn::{Speaker, Transcript, Turn};
