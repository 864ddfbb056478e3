//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// PDF text extractor.
///
/// lopdf handles document structure (page count, encryption); pdf-extract
/// performs the actual text extraction from the raw bytes.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    max_pages: usize,
}

impl PdfExtractor {
    /// Create a new PDF extractor with no page limit.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            max_pages: 0,
        }
    }

    /// Limit extraction to the first `max_pages` pages (0 = unlimited).
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data)
            .map_err(|e| PdfError::Parse(format!("failed to load PDF: {}", e)))?;

        if doc.is_encrypted() {
            // Try to decrypt with empty password
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("decrypted PDF with empty password");

            // Save decrypted document so pdf-extract sees plaintext streams
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    /// Extract the full text blob: each page's text in page order, each page
    /// followed by a line break. All-or-nothing: a page that cannot be decoded
    /// fails the whole extraction rather than yielding a partial blob.
    fn extract_text(&self) -> Result<String> {
        if self.document.is_none() {
            return Err(PdfError::Parse("no document loaded".to_string()));
        }
        if self.page_count() == 0 {
            return Err(PdfError::NoPages);
        }

        let mut pages = pdf_extract::extract_text_from_mem_by_pages(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))?;

        if self.max_pages > 0 && pages.len() > self.max_pages {
            pages.truncate(self.max_pages);
        }

        let mut blob = String::new();
        for page_text in &pages {
            blob.push_str(page_text);
            blob.push('\n');
        }

        debug!(
            "extracted {} chars of text from {} pages",
            blob.len(),
            pages.len()
        );
        Ok(blob)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
    }

    #[test]
    fn test_extract_without_load_fails() {
        let extractor = PdfExtractor::new();
        assert!(extractor.extract_text().is_err());
    }

    #[test]
    fn test_load_garbage_fails() {
        let mut extractor = PdfExtractor::new();
        let result = extractor.load(b"not a pdf");
        assert!(matches!(result, Err(PdfError::Parse(_))));
    }
}
