//! PDF page text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, warn};

use super::{split_pages, PdfProcessor, Result};
use crate::error::PdfError;

/// PDF text extractor. Loads with lopdf (handling empty-password
/// encryption) and extracts text with pdf-extract.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    /// Load `data` and return its page texts.
    pub fn pages_from_bytes(data: &[u8]) -> Result<Vec<String>> {
        let mut extractor = Self::new();
        extractor.load(data)?;
        extractor.extract_pages()
    }

    fn loaded(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))
    }

    /// Whole-document extraction split on form feeds, padded or merged to
    /// match the real page count.
    fn pages_from_full_text(&self) -> Result<Vec<String>> {
        let page_count = self.page_count() as usize;
        let mut pages = split_pages(&self.extract_text()?);

        if pages.len() > page_count && page_count > 0 {
            let tail = pages.split_off(page_count - 1).join("\n");
            pages.push(tail);
        }
        pages.resize(page_count.max(pages.len()), String::new());
        Ok(pages)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Statements are often "protected" with an empty user password
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        self.loaded()?;
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    fn extract_pages(&self) -> Result<Vec<String>> {
        self.loaded()?;

        match pdf_extract::extract_text_from_mem_by_pages(&self.raw_data) {
            Ok(pages) if !pages.is_empty() => {
                debug!("Extracted text of {} pages", pages.len());
                Ok(pages)
            }
            Ok(_) => self.pages_from_full_text(),
            Err(e) => {
                warn!("Per-page extraction failed ({}), splitting full text", e);
                self.pages_from_full_text()
            }
        }
    }
}
