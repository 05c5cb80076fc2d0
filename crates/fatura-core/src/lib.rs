//! Core library for credit-card statement extraction.
//!
//! This crate provides:
//! - Page text extraction from PDF (and form-feed separated text) files
//! - Line rules for Brazilian statements (dates, BRL amounts, section headers)
//! - Parsers for the Nubank and Sicoob statement layouts
//! - Transaction models split into primary and secondary sequences

pub mod document;
pub mod error;
pub mod models;
pub mod pdf;
pub mod statement;

pub use document::{extract_file, load_pages};
pub use error::{ExtractionError, FaturaError, PdfError, Result};
pub use models::config::{BankChoice, FaturaConfig, OutputConfig, PdfConfig, StatementConfig};
pub use models::statement::{Amount, ExtractionResult, Layout, Route, TransactionRecord};
#[cfg(feature = "pdf")]
pub use pdf::PdfExtractor;
pub use pdf::{split_pages, PdfProcessor};
pub use statement::{detect_layout, extract_statement, parser_for, StatementParser};
