//! Page-by-page PDF text extraction

use crate::error::PdfError;
use lopdf::Document;
use mediassist_domain::traits::{PageResult, TextExtractor};
use std::path::Path;
use tracing::debug;

/// Reads the text layer of each PDF page with `lopdf`
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    /// Create a new extractor
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    type Error = PdfError;

    fn extract_pages(&self, path: &Path) -> Result<Vec<PageResult<Self::Error>>, Self::Error> {
        let document = Document::load(path).map_err(|e| PdfError::Open {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let pages = document.get_pages();
        debug!("{}: {} pages", path.display(), pages.len());

        Ok(pages
            .keys()
            .map(|&page| {
                document
                    .extract_text(&[page])
                    .map_err(|e| PdfError::Page {
                        page,
                        reason: e.to_string(),
                    })
            })
            .collect())
    }
}
