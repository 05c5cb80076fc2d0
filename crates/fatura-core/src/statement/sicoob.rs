//! Sicoob card statement parser.
//!
//! Purchases live under "GASTOS DE <holder>" and end at a totals line;
//! payments, charges and the prior balance live under "MOVIMENTOS".
//! Dates are printed as `DD/MM`; the reference month and year come from
//! the first full `DD/MM/YYYY` date on the first page.

use tracing::{debug, trace};

use crate::models::statement::{ExtractionResult, Layout, Route};

use super::accumulator::{PendingRecord, RecordAccumulator};
use super::rules::dates::{resolve_date, StatementPeriod};
use super::rules::{LineClass, LineClassifier, SectionMarker};
use super::{page_lines, Result, StatementParser};

/// Parser for Sicoob credit-card statements.
#[derive(Debug, Clone)]
pub struct SicoobParser {
    fallback_year: Option<i32>,
    classifier: LineClassifier,
}

impl SicoobParser {
    /// Create a parser. `fallback_year` is used only when the first page
    /// carries no `DD/MM/YYYY` date.
    pub fn new(fallback_year: Option<i32>) -> Self {
        Self {
            fallback_year,
            classifier: LineClassifier::sicoob(),
        }
    }
}

impl StatementParser for SicoobParser {
    fn layout(&self) -> Layout {
        Layout::Sicoob
    }

    fn parse(&self, pages: &[String]) -> Result<ExtractionResult> {
        let first_page = pages.first().map(String::as_str).unwrap_or_default();
        let period = StatementPeriod::from_header(first_page, self.fallback_year)?;

        let mut state = SicoobState {
            classifier: &self.classifier,
            period,
            movements: false,
            purchases: false,
            records: RecordAccumulator::new(),
        };

        for page in pages {
            for line in page_lines(page) {
                state.line(line)?;
            }
            // Keep the next page's client/account banner out of this record.
            state.flush();
        }

        let (primary, secondary) = state.records.finish();
        debug!(
            "Parsed Sicoob statement ({:02}/{}): {} pages, {} purchases, {} movements",
            period.month,
            period.year,
            pages.len(),
            primary.len(),
            secondary.len()
        );

        Ok(ExtractionResult {
            layout: Layout::Sicoob,
            primary,
            secondary,
        })
    }
}

struct SicoobState<'a> {
    classifier: &'a LineClassifier,
    period: StatementPeriod,
    movements: bool,
    purchases: bool,
    records: RecordAccumulator,
}

impl SicoobState<'_> {
    fn route(&self) -> Route {
        if self.purchases {
            Route::Primary
        } else {
            Route::Secondary
        }
    }

    fn flush(&mut self) {
        let route = self.route();
        self.records.flush(route);
    }

    fn line(&mut self, line: &str) -> Result<()> {
        let class = self.classifier.classify(line);

        match class {
            LineClass::Section(SectionMarker::Movements) => {
                self.flush();
                trace!("Sicoob: entering MOVIMENTOS");
                self.movements = true;
                self.purchases = false;
            }
            LineClass::Section(SectionMarker::Purchases) => {
                self.flush();
                trace!("Sicoob: entering GASTOS");
                self.purchases = true;
                self.movements = false;
            }
            LineClass::Section(SectionMarker::PurchasesEnd) if self.purchases => {
                self.flush();
                trace!("Sicoob: leaving GASTOS");
                self.purchases = false;
            }
            _ if !self.movements && !self.purchases => {}

            LineClass::Noise => {}
            LineClass::PriorBalance { description, amount } if self.movements => {
                self.flush();
                self.records.open(PendingRecord::new(None, &description, amount));
                self.flush();
            }
            // Installment counters ("01/02") wrap onto their own line and look
            // like dates; a month outside the statement period cannot be one.
            LineClass::DateStart(token)
                if self.purchases
                    && self.records.is_open()
                    && !self.period.is_valid_month(token.month) =>
            {
                trace!("Sicoob: {:?} read as installment continuation", line);
                self.merge_continuation(line);
            }
            LineClass::DateStart(token) => {
                self.flush();
                let year = self.period.year_for(token.month);
                let date = resolve_date(year, token.month, token.day, line)?;
                self.records
                    .open(PendingRecord::new(Some(date), &token.description, token.amount));
            }
            _ => self.merge_continuation(line),
        }

        Ok(())
    }

    /// Extend the open record. A trailing amount fills the record's amount
    /// only if it has none yet.
    fn merge_continuation(&mut self, line: &str) {
        if !self.records.is_open() {
            return;
        }

        match self.classifier.continuation(line) {
            LineClass::Amount(token) => {
                self.records.append_description(&token.text);
                self.records.set_amount_if_unset(token.amount);
            }
            _ => self.records.append_description(line),
        }
    }
}
