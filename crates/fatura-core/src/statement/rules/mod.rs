//! Rule-based line classification for statement text.

pub mod amounts;
pub mod classifier;
pub mod dates;
pub mod patterns;

pub use amounts::{clean_description, BareAmountExtractor, BrlAmountExtractor};
pub use classifier::{AmountToken, DateToken, LineClass, LineClassifier, SectionMarker};
pub use dates::{month_from_abbreviation, resolve_date, StatementPeriod};

/// Trait for extractors that pull one kind of token out of a line.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract every occurrence, in line order.
    fn extract_all(&self, text: &str) -> Vec<ExtractionMatch<Self::Output>>;

    /// Extract the last occurrence. When a line carries several
    /// monetary-looking numbers, the last one is the amount.
    fn extract_last(&self, text: &str) -> Option<ExtractionMatch<Self::Output>> {
        self.extract_all(text).pop()
    }
}

/// A value found in a line together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range of the match in the source line.
    pub position: (usize, usize),
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, start: usize, end: usize, source: impl Into<String>) -> Self {
        Self {
            value,
            position: (start, end),
            source: source.into(),
        }
    }

    pub fn start(&self) -> usize {
        self.position.0
    }

    pub fn end(&self) -> usize {
        self.position.1
    }
}
