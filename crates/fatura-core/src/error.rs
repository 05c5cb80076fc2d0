//! Error types for the fatura-core library.

use thiserror::Error;

/// Main error type for the fatura library.
#[derive(Error, Debug)]
pub enum FaturaError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Statement extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors raised while turning statement lines into records.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// A date-shaped line resolved to a day that does not exist.
    ///
    /// Usually means the wrong layout was selected or the text is corrupted.
    #[error("invalid calendar date {day:02}/{month:02}/{year} in line {line:?}")]
    DateResolution {
        day: u32,
        month: u32,
        year: i32,
        line: String,
    },

    /// The statement year is needed but was neither configured nor found in the document.
    #[error("statement year is not configured and could not be inferred from the document")]
    MissingStatementYear,
}

/// A monetary token that does not follow the statement's number convention.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid amount: {0:?}")]
pub struct ParseAmountError(pub String);

/// Result type for the fatura library.
pub type Result<T> = std::result::Result<T, FaturaError>;
