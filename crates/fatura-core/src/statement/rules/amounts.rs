//! Amount tokens and description cleanup.

use crate::models::statement::Amount;

use super::patterns::{CARD_MASK, NUBANK_AMOUNT, SICOOB_TRAILING_AMOUNT, WHITESPACE};
use super::{ExtractionMatch, FieldExtractor};

/// Extracts `[sign] R$ 1.234,56` tokens anywhere in a line.
pub struct BrlAmountExtractor;

impl BrlAmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BrlAmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for BrlAmountExtractor {
    type Output = Amount;

    fn extract_all(&self, text: &str) -> Vec<ExtractionMatch<Amount>> {
        let mut results = Vec::new();

        for caps in NUBANK_AMOUNT.captures_iter(text) {
            let Some(full_match) = caps.get(0) else {
                continue;
            };
            let negative = !caps[1].is_empty();
            if let Ok(amount) = Amount::from_parts(negative, &caps[2]) {
                results.push(ExtractionMatch::new(
                    amount,
                    full_match.start(),
                    full_match.end(),
                    full_match.as_str().trim(),
                ));
            }
        }

        results
    }
}

/// Extracts a bare signed `1.234,56` token anchored at the end of a line.
pub struct BareAmountExtractor;

impl BareAmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BareAmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for BareAmountExtractor {
    type Output = Amount;

    fn extract_all(&self, text: &str) -> Vec<ExtractionMatch<Amount>> {
        let Some(caps) = SICOOB_TRAILING_AMOUNT.captures(text) else {
            return Vec::new();
        };
        let (Some(sign), Some(number)) = (caps.get(1), caps.get(2)) else {
            return Vec::new();
        };

        match Amount::from_parts(!sign.as_str().is_empty(), number.as_str()) {
            Ok(amount) => vec![ExtractionMatch::new(
                amount,
                sign.start(),
                number.end(),
                &text[sign.start()..number.end()],
            )],
            Err(_) => Vec::new(),
        }
    }
}

/// Remove a trailing amount token, if the last token of `text` is one.
pub fn strip_trailing_amount<'a, E: FieldExtractor>(extractor: &E, text: &'a str) -> &'a str {
    let trimmed = text.trim_end();
    match extractor.extract_last(trimmed) {
        Some(m) if m.end() == trimmed.len() => trimmed[..m.start()].trim_end(),
        _ => trimmed,
    }
}

/// Normalize a description fragment: trim, drop a leading masked card
/// number ("•••• 0539 ") and collapse whitespace runs.
pub fn clean_description(text: &str) -> String {
    let trimmed = text.trim();
    let unmasked = CARD_MASK.replace(trimmed, "");
    WHITESPACE.replace_all(&unmasked, " ").trim().to_string()
}

/// Join two description fragments with a single space.
pub fn join_description(current: &str, extra: &str) -> String {
    match (current.is_empty(), extra.is_empty()) {
        (_, true) => current.to_string(),
        (true, false) => extra.to_string(),
        (false, false) => format!("{} {}", current, extra),
    }
}
