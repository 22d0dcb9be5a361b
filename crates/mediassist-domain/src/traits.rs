//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::completion::CompletionRequest;
use crate::knowledge::{KnowledgeBase, KnowledgeDocument};
use std::path::Path;

/// Trait for text-completion services
///
/// Implemented by the infrastructure layer (mediassist-llm)
pub trait CompletionProvider {
    /// Error type for completion operations
    type Error;

    /// Generate a completion for the request
    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error>;

    /// Generate a completion, handing text fragments to `on_fragment` as they arrive
    ///
    /// Returns the full concatenated text. Providers without streaming support
    /// deliver the whole completion as a single fragment.
    fn complete_streaming(
        &self,
        request: &CompletionRequest,
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<String, Self::Error> {
        let text = self.complete(request)?;
        on_fragment(&text);
        Ok(text)
    }
}

impl<P: CompletionProvider + ?Sized> CompletionProvider for Box<P> {
    type Error = P::Error;

    fn complete(&self, request: &CompletionRequest) -> Result<String, Self::Error> {
        (**self).complete(request)
    }

    fn complete_streaming(
        &self,
        request: &CompletionRequest,
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<String, Self::Error> {
        (**self).complete_streaming(request, on_fragment)
    }
}

/// Trait for named knowledge stores
///
/// Implemented by the infrastructure layer (mediassist-knowledge)
pub trait KnowledgeStore {
    /// Error type for store operations
    type Error;

    /// Return the named knowledge base, creating it if it does not exist
    ///
    /// Calling this twice with the same name must not create a second base.
    fn get_or_create(&mut self, name: &str) -> Result<KnowledgeBase, Self::Error>;

    /// Insert documents into a knowledge base, returning how many were stored
    fn insert(
        &mut self,
        name: &str,
        documents: &[KnowledgeDocument],
    ) -> Result<usize, Self::Error>;

    /// List knowledge bases
    fn list(&self) -> Result<Vec<KnowledgeBase>, Self::Error>;

    /// Drop a knowledge base; returns false if it did not exist
    fn drop_base(&mut self, name: &str) -> Result<bool, Self::Error>;
}

impl<S: KnowledgeStore + ?Sized> KnowledgeStore for Box<S> {
    type Error = S::Error;

    fn get_or_create(&mut self, name: &str) -> Result<KnowledgeBase, Self::Error> {
        (**self).get_or_create(name)
    }

    fn insert(
        &mut self,
        name: &str,
        documents: &[KnowledgeDocument],
    ) -> Result<usize, Self::Error> {
        (**self).insert(name, documents)
    }

    fn list(&self) -> Result<Vec<KnowledgeBase>, Self::Error> {
        (**self).list()
    }

    fn drop_base(&mut self, name: &str) -> Result<bool, Self::Error> {
        (**self).drop_base(name)
    }
}

/// Per-page extraction outcome
pub type PageResult<E> = Result<String, E>;

/// Trait for pulling text out of documents page by page
///
/// The outer `Result` is a file-level failure (cannot open or parse the file);
/// each inner `Result` is one page.
pub trait TextExtractor {
    /// Error type for extraction operations
    type Error;

    /// Extract text from every page of the file at `path`
    fn extract_pages(&self, path: &Path) -> Result<Vec<PageResult<Self::Error>>, Self::Error>;
}
