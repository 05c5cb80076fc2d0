//! Nubank statement parser.
//!
//! Nubank statements list every cardholder's purchases under a
//! "TRANSAÇÕES DE ..." header that repeats on each page. Only the block
//! headed by the configured holder's name is kept, followed by the
//! "Pagamentos e Financiamentos" block, which is kept for all holders.
//! Dates are printed as `DD MMM` without a year.

use tracing::{debug, trace};

use crate::models::statement::{ExtractionResult, Layout, Route};

use super::accumulator::{PendingRecord, RecordAccumulator};
use super::rules::dates::{resolve_date, year_for_abbreviated_month};
use super::rules::{LineClass, LineClassifier, SectionMarker};
use super::{page_lines, Result, StatementParser};

/// Section of a Nubank statement the parser is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NubankSection {
    /// Before the first transactions header.
    Preamble,
    /// Transactions header seen, holder's block not reached yet.
    AwaitingHolder,
    /// Inside the holder's own transactions.
    Holder,
    /// Inside "Pagamentos e Financiamentos".
    Payments,
}

impl NubankSection {
    fn route(self) -> Route {
        match self {
            NubankSection::Payments => Route::Secondary,
            _ => Route::Primary,
        }
    }
}

/// Parser for Nubank credit-card statements.
#[derive(Debug, Clone)]
pub struct NubankParser {
    statement_year: i32,
    classifier: LineClassifier,
}

impl NubankParser {
    /// Create a parser for a statement of `statement_year` belonging to `holder_name`.
    pub fn new(statement_year: i32, holder_name: impl Into<String>) -> Self {
        Self {
            statement_year,
            classifier: LineClassifier::nubank(holder_name),
        }
    }
}

impl StatementParser for NubankParser {
    fn layout(&self) -> Layout {
        Layout::Nubank
    }

    fn parse(&self, pages: &[String]) -> Result<ExtractionResult> {
        let mut state = NubankState {
            parser: self,
            section: NubankSection::Preamble,
            records: RecordAccumulator::new(),
        };

        for page in pages {
            for line in page_lines(page) {
                state.line(line)?;
            }
            // The next page starts with the holder banner and running
            // headers; never let them extend this page's last record.
            state.flush();
        }

        let (primary, secondary) = state.records.finish();
        debug!(
            "Parsed Nubank statement: {} pages, {} transactions, {} payments",
            pages.len(),
            primary.len(),
            secondary.len()
        );

        Ok(ExtractionResult {
            layout: Layout::Nubank,
            primary,
            secondary,
        })
    }
}

struct NubankState<'a> {
    parser: &'a NubankParser,
    section: NubankSection,
    records: RecordAccumulator,
}

impl NubankState<'_> {
    fn flush(&mut self) {
        self.records.flush(self.section.route());
    }

    fn enter(&mut self, section: NubankSection) {
        if self.section != section {
            trace!("Nubank section {:?} -> {:?}", self.section, section);
            self.section = section;
        }
    }

    fn line(&mut self, line: &str) -> Result<()> {
        let class = self.parser.classifier.classify(line);

        match (self.section, class) {
            (_, LineClass::Section(SectionMarker::Transactions)) => {
                self.flush();
                if self.section == NubankSection::Preamble {
                    self.enter(NubankSection::AwaitingHolder);
                }
            }
            (NubankSection::Preamble, _) => {}

            // Repeated page banner inside the payments block.
            (NubankSection::Payments, LineClass::Section(SectionMarker::Holder)) => {}
            (_, LineClass::Section(SectionMarker::Holder)) => {
                self.flush();
                self.enter(NubankSection::Holder);
            }
            (_, LineClass::Section(SectionMarker::Payments)) => {
                self.flush();
                self.enter(NubankSection::Payments);
            }
            // Other holders' blocks come first on multi-card statements.
            (NubankSection::AwaitingHolder, _) => {}

            (_, LineClass::Noise) => {}
            (_, LineClass::UnknownDate) => self.flush(),
            (_, LineClass::DateStart(token)) => {
                self.flush();
                let year = year_for_abbreviated_month(self.parser.statement_year, token.month);
                let date = resolve_date(year, token.month, token.day, line)?;
                self.records
                    .open(PendingRecord::new(Some(date), &token.description, token.amount));
            }
            (_, LineClass::Amount(token)) => {
                self.records.set_amount(token.amount);
                self.records.append_description(&token.text);
            }
            (_, LineClass::Continuation) => self.records.append_description(line),
            (_, LineClass::Section(_) | LineClass::PriorBalance { .. }) => {
                self.records.append_description(line);
            }
        }

        Ok(())
    }
}
