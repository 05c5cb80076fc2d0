//! Statement data models shared by every layout parser.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseAmountError;

/// Currency mark used in the canonical amount text.
pub const CURRENCY_MARK: &str = "R$";

/// Unicode minus sign, printed by some statements instead of a hyphen.
pub const UNICODE_MINUS: char = '\u{2212}';

/// Supported statement layouts, one per issuing institution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Nubank statement ("TRANSAÇÕES DE ..." / "Pagamentos e Financiamentos").
    Nubank,
    /// Sicoob card statement ("GASTOS DE ..." / "MOVIMENTOS").
    Sicoob,
}

impl Layout {
    pub fn name(&self) -> &'static str {
        match self {
            Layout::Nubank => "nubank",
            Layout::Sicoob => "sicoob",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Output sequence a record is flushed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Ordinary purchases.
    Primary,
    /// Payments, financing and balance movements.
    Secondary,
}

/// A signed amount in the statement currency.
///
/// Displays in the canonical form `[-]R$ 1.234,56`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Build an amount from a sign flag and a `1.234,56`-style number.
    pub fn from_parts(negative: bool, number: &str) -> Result<Self, ParseAmountError> {
        let normalized = number.trim().replace('.', "").replace(',', ".");
        let value = Decimal::from_str(&normalized)
            .map_err(|_| ParseAmountError(number.to_string()))?;
        Ok(Self(if negative { -value } else { value }))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        write!(f, "{}{} {}", sign, CURRENCY_MARK, format_brl_number(self.0.abs()))
    }
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    /// Accepts the canonical form as well as a bare number, with either an
    /// ASCII hyphen or a Unicode minus as the sign.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (negative, rest) = match trimmed.strip_prefix(['-', UNICODE_MINUS]) {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let rest = rest.trim_start();
        let number = rest.strip_prefix(CURRENCY_MARK).unwrap_or(rest).trim();

        let numeric = number.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',');
        if number.is_empty() || !numeric {
            return Err(ParseAmountError(s.to_string()));
        }

        Self::from_parts(negative, number)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Format a non-negative value as `1.234,56`.
fn format_brl_number(value: Decimal) -> String {
    let s = format!("{:.2}", value.round_dp(2));
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut grouped = String::with_capacity(chars.len() + chars.len() / 3);
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    format!("{},{}", grouped, decimal_part)
}

/// One logical transaction or movement taken from a statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Transaction date; `None` for dateless entries such as the prior balance.
    pub date: Option<NaiveDate>,

    /// Whitespace-normalized description.
    pub description: String,

    /// Amount, or `None` when the statement never supplied one.
    pub amount: Option<Amount>,
}

impl TransactionRecord {
    pub fn new(
        date: Option<NaiveDate>,
        description: impl Into<String>,
        amount: Option<Amount>,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
        }
    }

    /// Date as ISO 8601, or an empty string.
    pub fn date_text(&self) -> String {
        self.date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
    }

    /// Canonical amount text, or an empty string.
    pub fn amount_text(&self) -> String {
        self.amount.map(|a| a.to_string()).unwrap_or_default()
    }
}

/// Records extracted from one statement, split by route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Layout the statement was parsed as.
    pub layout: Layout,

    /// Ordinary purchases, in statement order.
    pub primary: Vec<TransactionRecord>,

    /// Payments, financing and balance movements, in statement order.
    pub secondary: Vec<TransactionRecord>,
}

impl ExtractionResult {
    pub fn len(&self) -> usize {
        self.primary.len() + self.secondary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty()
    }

    /// All records, primary first, tagged with their route.
    pub fn iter(&self) -> impl Iterator<Item = (Route, &TransactionRecord)> {
        self.primary
            .iter()
            .map(|r| (Route::Primary, r))
            .chain(self.secondary.iter().map(|r| (Route::Secondary, r)))
    }
}
