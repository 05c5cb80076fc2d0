//! Page text extraction.
//!
//! Parsers work on one string per page. PDF input goes through
//! [`PdfExtractor`]; plain-text input (one page per form-feed-separated
//! chunk) goes through [`split_pages`].

#[cfg(feature = "pdf")]
mod extractor;

#[cfg(feature = "pdf")]
pub use extractor::PdfExtractor;

use crate::error::PdfError;

/// Page separator emitted by text extractors.
pub const PAGE_BREAK: char = '\u{000C}';

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from the entire PDF.
    fn extract_text(&self) -> Result<String>;

    /// Extract the text of every page, in page order.
    fn extract_pages(&self) -> Result<Vec<String>>;
}

/// Split extracted text into pages on form feeds.
///
/// A trailing form feed does not start an extra page.
pub fn split_pages(text: &str) -> Vec<String> {
    let text = text.strip_suffix(PAGE_BREAK).unwrap_or(text);
    text.split(PAGE_BREAK).map(str::to_string).collect()
}

/// Keep at most `max_pages` pages; zero means no limit.
pub fn limit_pages(mut pages: Vec<String>, max_pages: usize) -> Vec<String> {
    if max_pages > 0 && pages.len() > max_pages {
        tracing::debug!("Limiting {} pages to {}", pages.len(), max_pages);
        pages.truncate(max_pages);
    }
    pages
}
