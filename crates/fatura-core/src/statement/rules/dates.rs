//! Date resolution for statement lines that omit the year.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::ExtractionError;

use super::patterns::FULL_DATE;

/// Portuguese month abbreviations as printed on Nubank statements.
pub const MONTHS: [(&str, u32); 12] = [
    ("JAN", 1),
    ("FEV", 2),
    ("MAR", 3),
    ("ABR", 4),
    ("MAI", 5),
    ("JUN", 6),
    ("JUL", 7),
    ("AGO", 8),
    ("SET", 9),
    ("OUT", 10),
    ("NOV", 11),
    ("DEZ", 12),
];

/// Month number for a three-letter abbreviation, `None` if unknown.
pub fn month_from_abbreviation(abbr: &str) -> Option<u32> {
    MONTHS
        .iter()
        .find(|(name, _)| *name == abbr)
        .map(|(_, month)| *month)
}

/// Year for a `DD MMM` date on a statement of `statement_year`.
///
/// A statement closing in January lists December purchases from the
/// previous year ("31 DEZ ... 31 JAN").
pub fn year_for_abbreviated_month(statement_year: i32, month: u32) -> i32 {
    if month == 12 {
        statement_year - 1
    } else {
        statement_year
    }
}

/// Build a calendar date, failing on days that do not exist.
pub fn resolve_date(
    year: i32,
    month: u32,
    day: u32,
    line: &str,
) -> Result<NaiveDate, ExtractionError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| ExtractionError::DateResolution {
        day,
        month,
        year,
        line: line.to_string(),
    })
}

/// Reference period of a statement whose lines print `DD/MM` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementPeriod {
    /// Reference year.
    pub year: i32,
    /// Reference month (1-12).
    pub month: u32,
}

impl StatementPeriod {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Read the period from the first full `DD/MM/YYYY` date of the first
    /// page, falling back to January of `fallback_year`.
    pub fn from_header(
        first_page: &str,
        fallback_year: Option<i32>,
    ) -> Result<Self, ExtractionError> {
        let found = FULL_DATE.captures_iter(first_page).find_map(|caps| {
            let month: u32 = caps[2].parse().ok()?;
            let year: i32 = caps[3].parse().ok()?;
            (1..=12).contains(&month).then_some(Self::new(year, month))
        });

        match (found, fallback_year) {
            (Some(period), _) => {
                debug!("Statement period from header: {:02}/{}", period.month, period.year);
                Ok(period)
            }
            (None, Some(year)) => {
                debug!("No header date found, using January {}", year);
                Ok(Self::new(year, 1))
            }
            (None, None) => Err(ExtractionError::MissingStatementYear),
        }
    }

    /// Month preceding the reference month, wrapping January to December.
    pub fn previous_month(&self) -> u32 {
        if self.month == 1 { 12 } else { self.month - 1 }
    }

    /// Months a purchase date may legitimately carry: the reference month
    /// and the one before it.
    pub fn valid_months(&self) -> [u32; 2] {
        [self.month, self.previous_month()]
    }

    pub fn is_valid_month(&self, month: u32) -> bool {
        self.valid_months().contains(&month)
    }

    /// Year for a `DD/MM` date: months after the reference month belong to
    /// the previous year.
    pub fn year_for(&self, month: u32) -> i32 {
        if month > self.month {
            self.year - 1
        } else {
            self.year
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_month_table() {
        assert_eq!(month_from_abbreviation("JAN"), Some(1));
        assert_eq!(month_from_abbreviation("DEZ"), Some(12));
        assert_eq!(month_from_abbreviation("DEC"), None);
        assert_eq!(month_from_abbreviation("jan"), None);
    }

    #[test]
    fn test_abbreviated_year_wrap() {
        assert_eq!(year_for_abbreviated_month(2026, 12), 2025);
        for month in 1..=11 {
            assert_eq!(year_for_abbreviated_month(2026, month), 2026);
        }
    }

    #[test]
    fn test_resolve_date_rejects_impossible_day() {
        assert_eq!(
            resolve_date(2026, 1, 31, "31 JAN").unwrap(),
            NaiveDate::from_ymd_opt(2026, 1, 31).unwrap()
        );

        let err = resolve_date(2026, 4, 31, "31/04 LOJA").unwrap_err();
        assert_eq!(
            err,
            ExtractionError::DateResolution {
                day: 31,
                month: 4,
                year: 2026,
                line: "31/04 LOJA".to_string(),
            }
        );
    }

    #[test]
    fn test_period_from_header() {
        let header = "SICOOB\nVencimento 10/02/2026\nFechamento 31/01/2026";
        let period = StatementPeriod::from_header(header, None).unwrap();
        assert_eq!(period, StatementPeriod::new(2026, 2));
        assert_eq!(period.valid_months(), [2, 1]);
    }

    #[test]
    fn test_period_fallback() {
        let period = StatementPeriod::from_header("no dates here", Some(2024)).unwrap();
        assert_eq!(period, StatementPeriod::new(2024, 1));
        assert_eq!(period.valid_months(), [1, 12]);

        assert_eq!(
            StatementPeriod::from_header("no dates here", None),
            Err(ExtractionError::MissingStatementYear)
        );
    }

    #[test]
    fn test_period_year_for() {
        let period = StatementPeriod::new(2026, 1);
        assert_eq!(period.year_for(12), 2025);
        assert_eq!(period.year_for(1), 2026);

        let period = StatementPeriod::new(2026, 3);
        assert_eq!(period.year_for(2), 2026);
        assert_eq!(period.year_for(4), 2025);
    }
}
