//! The single open record and the two output sequences.

use chrono::NaiveDate;
use tracing::{trace, warn};

use crate::models::statement::{Amount, Route, TransactionRecord};

use super::rules::amounts::{clean_description, join_description};

/// A record still receiving continuation lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRecord {
    date: Option<NaiveDate>,
    description: String,
    amount: Option<Amount>,
}

impl PendingRecord {
    pub fn new(date: Option<NaiveDate>, description: &str, amount: Option<Amount>) -> Self {
        Self {
            date,
            description: clean_description(description),
            amount,
        }
    }

    fn into_record(self) -> TransactionRecord {
        TransactionRecord::new(self.date, self.description, self.amount)
    }
}

/// Holds at most one open record plus the primary and secondary outputs.
///
/// Records leave the accumulator only through [`RecordAccumulator::flush`],
/// after which they are never touched again.
#[derive(Debug, Default)]
pub struct RecordAccumulator {
    current: Option<PendingRecord>,
    primary: Vec<TransactionRecord>,
    secondary: Vec<TransactionRecord>,
}

impl RecordAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new record. Callers flush first; the state machines enforce it.
    pub fn open(&mut self, record: PendingRecord) {
        debug_assert!(self.current.is_none(), "record opened while another is open");
        if let Some(dropped) = self.current.replace(record) {
            warn!("Discarding unflushed record: {:?}", dropped);
        }
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn has_amount(&self) -> bool {
        self.current.as_ref().is_some_and(|r| r.amount.is_some())
    }

    /// Append a description fragment to the open record.
    pub fn append_description(&mut self, text: &str) {
        if let Some(current) = self.current.as_mut() {
            let extra = clean_description(text);
            current.description = join_description(&current.description, &extra);
        }
    }

    /// Set the open record's amount, replacing any earlier one.
    pub fn set_amount(&mut self, amount: Amount) {
        if let Some(current) = self.current.as_mut() {
            current.amount = Some(amount);
        }
    }

    /// Set the open record's amount only if it has none yet.
    pub fn set_amount_if_unset(&mut self, amount: Amount) {
        if let Some(current) = self.current.as_mut() {
            current.amount.get_or_insert(amount);
        }
    }

    /// Move the open record into the output selected by `route`.
    /// Does nothing when no record is open.
    pub fn flush(&mut self, route: Route) {
        let Some(pending) = self.current.take() else {
            return;
        };

        let record = pending.into_record();
        trace!("Flushing {:?} record: {:?}", route, record);
        match route {
            Route::Primary => self.primary.push(record),
            Route::Secondary => self.secondary.push(record),
        }
    }

    pub fn primary(&self) -> &[TransactionRecord] {
        &self.primary
    }

    pub fn secondary(&self) -> &[TransactionRecord] {
        &self.secondary
    }

    /// Consume the accumulator, returning `(primary, secondary)`.
    ///
    /// The caller must flush first; a record still open is dropped with a
    /// warning.
    pub fn finish(self) -> (Vec<TransactionRecord>, Vec<TransactionRecord>) {
        if let Some(open) = self.current {
            warn!("Record still open at end of parse: {:?}", open);
        }
        (self.primary, self.secondary)
    }
}
