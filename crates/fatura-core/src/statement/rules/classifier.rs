//! Stateless classification of single statement lines.
//!
//! Rules are tried in a fixed order and the first match wins:
//! section marker, noise, date start, amount, continuation. Noise is
//! checked before dates and amounts so that repeated banners are dropped
//! even when they happen to contain a date or an amount.

use crate::models::statement::{Amount, Layout};

use super::amounts::{
    clean_description, strip_trailing_amount, BareAmountExtractor, BrlAmountExtractor,
};
use super::dates::month_from_abbreviation;
use super::patterns::*;
use super::FieldExtractor;

/// Literal section headings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionMarker {
    /// Nubank "TRANSAÇÕES DE ..." (repeats on every page).
    Transactions,
    /// Nubank line starting with the configured holder name.
    Holder,
    /// Nubank "Pagamentos e Financiamentos".
    Payments,
    /// Sicoob "MOVIMENTOS".
    Movements,
    /// Sicoob "GASTOS DE ...".
    Purchases,
    /// Sicoob totals / summary line closing the purchases block.
    PurchasesEnd,
}

/// A line opening a new dated record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateToken {
    pub day: u32,
    pub month: u32,
    /// Text after the date, cleaned, with a trailing amount removed.
    pub description: String,
    pub amount: Option<Amount>,
}

/// A line carrying an amount and possibly some description text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountToken {
    pub amount: Amount,
    /// The cleaned text before the amount token.
    pub text: String,
}

/// Classification of one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    Section(SectionMarker),
    /// Sicoob "- SALDO ANTERIOR ..." line: a complete dateless record.
    PriorBalance {
        description: String,
        amount: Option<Amount>,
    },
    Noise,
    DateStart(DateToken),
    /// Shaped like `DD MMM` but the abbreviation is not a month.
    UnknownDate,
    Amount(AmountToken),
    Continuation,
}

/// Line classifier for one statement layout.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    layout: Layout,
    holder_name: String,
}

impl LineClassifier {
    /// Classifier for Nubank statements of the given cardholder.
    pub fn nubank(holder_name: impl Into<String>) -> Self {
        Self {
            layout: Layout::Nubank,
            holder_name: holder_name.into(),
        }
    }

    /// Classifier for Sicoob statements.
    pub fn sicoob() -> Self {
        Self {
            layout: Layout::Sicoob,
            holder_name: String::new(),
        }
    }

    /// Classify a trimmed, non-empty line.
    pub fn classify(&self, line: &str) -> LineClass {
        if let Some(class) = self.section_marker(line) {
            return class;
        }
        if self.is_noise(line) {
            return LineClass::Noise;
        }
        if let Some(class) = self.date_start(line) {
            return class;
        }
        self.continuation(line)
    }

    /// Classify a line already known to extend the open record: either it
    /// carries an amount or it is plain text.
    pub fn continuation(&self, line: &str) -> LineClass {
        match self.amount(line) {
            Some(token) => LineClass::Amount(token),
            None => LineClass::Continuation,
        }
    }

    fn section_marker(&self, line: &str) -> Option<LineClass> {
        let marker = match self.layout {
            Layout::Nubank => {
                if line.starts_with(NUBANK_TRANSACTIONS_HEADER) {
                    SectionMarker::Transactions
                } else if self.is_holder_line(line) {
                    SectionMarker::Holder
                } else if line.starts_with(NUBANK_PAYMENTS_HEADER) {
                    SectionMarker::Payments
                } else {
                    return None;
                }
            }
            Layout::Sicoob => {
                if line.starts_with(SICOOB_MOVEMENTS_HEADER) {
                    SectionMarker::Movements
                } else if line.starts_with(SICOOB_PURCHASES_HEADER) {
                    SectionMarker::Purchases
                } else if SICOOB_PURCHASES_END.iter().any(|p| line.starts_with(p)) {
                    SectionMarker::PurchasesEnd
                } else if line.starts_with(SICOOB_PRIOR_BALANCE) {
                    return Some(self.prior_balance(line));
                } else {
                    return None;
                }
            }
        };
        Some(LineClass::Section(marker))
    }

    fn is_holder_line(&self, line: &str) -> bool {
        !self.holder_name.is_empty() && line.starts_with(self.holder_name.as_str())
    }

    fn prior_balance(&self, line: &str) -> LineClass {
        let extractor = BareAmountExtractor::new();
        let amount = extractor.extract_last(line).map(|m| m.value);

        let body = strip_trailing_amount(&extractor, line.trim_start_matches('-'));
        let rest = clean_description(&body.replace(SICOOB_PRIOR_BALANCE_LABEL, ""));
        let description = if rest.is_empty() {
            format!("{}:", SICOOB_PRIOR_BALANCE_LABEL)
        } else {
            format!("{}: {}", SICOOB_PRIOR_BALANCE_LABEL, rest)
        };

        LineClass::PriorBalance { description, amount }
    }

    fn is_noise(&self, line: &str) -> bool {
        match self.layout {
            Layout::Nubank => {
                PAGE_FOOTER.is_match(line) || (line.contains("FATURA") && line.contains("EMISSÃO"))
            }
            Layout::Sicoob => {
                line == SICOOB_BANNER
                    || line.contains(SICOOB_DOCUMENT_TITLE)
                    || SICOOB_RUNNING_HEADERS.iter().any(|p| line.starts_with(p))
            }
        }
    }

    fn date_start(&self, line: &str) -> Option<LineClass> {
        match self.layout {
            Layout::Nubank => {
                let caps = NUBANK_DATE.captures(line)?;
                let day: u32 = caps[1].parse().ok()?;
                let Some(month) = month_from_abbreviation(&caps[2]) else {
                    return Some(LineClass::UnknownDate);
                };
                let rest = &line[caps.get(0)?.end()..];

                let extractor = BrlAmountExtractor::new();
                let cleaned = clean_description(rest);
                let description = strip_trailing_amount(&extractor, &cleaned).to_string();
                let amount = extractor.extract_last(line).map(|m| m.value);

                Some(LineClass::DateStart(DateToken {
                    day,
                    month,
                    description,
                    amount,
                }))
            }
            Layout::Sicoob => {
                let caps = SICOOB_DATE.captures(line)?;
                let day: u32 = caps[1].parse().ok()?;
                let month: u32 = caps[2].parse().ok()?;
                let rest = line[caps.get(0)?.end()..].trim();

                let extractor = BareAmountExtractor::new();
                let amount = extractor
                    .extract_last(rest)
                    .or_else(|| extractor.extract_last(line))
                    .map(|m| m.value);
                let description = clean_description(strip_trailing_amount(&extractor, rest));

                Some(LineClass::DateStart(DateToken {
                    day,
                    month,
                    description,
                    amount,
                }))
            }
        }
    }

    fn amount(&self, line: &str) -> Option<AmountToken> {
        match self.layout {
            Layout::Nubank => {
                let m = BrlAmountExtractor::new().extract_last(line)?;
                Some(AmountToken {
                    amount: m.value,
                    text: clean_description(&line[..m.start()]),
                })
            }
            Layout::Sicoob => {
                let m = BareAmountExtractor::new().extract_last(line)?;
                Some(AmountToken {
                    amount: m.value,
                    text: clean_description(&line[..m.start()]),
                })
            }
        }
    }
}
