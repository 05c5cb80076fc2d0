//! Regex patterns for statement line classification.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Nubank: "01 JAN ..." (month abbreviation resolved through the month table)
    pub static ref NUBANK_DATE: Regex = Regex::new(
        r"^(\d{2})\s+([A-Z]{3})\b"
    ).unwrap();

    // Nubank amounts: "R$ 1.234,56", "-R$ 3,94", "−R$ 3,94"
    pub static ref NUBANK_AMOUNT: Regex = Regex::new(
        r"([\x{2212}-]?)\s*R\$\s*(\d{1,3}(?:\.\d{3})*,\d{2}|\d+,\d{2})"
    ).unwrap();

    // Page footer "2 de 7"
    pub static ref PAGE_FOOTER: Regex = Regex::new(
        r"^\d+\s*de\s*\d+$"
    ).unwrap();

    // Sicoob: "15/01 ..."
    pub static ref SICOOB_DATE: Regex = Regex::new(
        r"^(\d{2})/(\d{2})\b"
    ).unwrap();

    // Full date in the Sicoob header: "31/01/2026"
    pub static ref FULL_DATE: Regex = Regex::new(
        r"\b(\d{2})/(\d{2})/(\d{4})\b"
    ).unwrap();

    // Sicoob amounts: bare "1.234,56" / "-30,00" at the end of the line.
    // The leading group keeps "1234,56" from matching as "234,56".
    pub static ref SICOOB_TRAILING_AMOUNT: Regex = Regex::new(
        r"(?:^|[^\d.,])([\x{2212}-]?)(\d{1,3}(?:\.\d{3})*,\d{2}|\d+,\d{2})\s*$"
    ).unwrap();

    // Masked card number at the start of a description: "•••• 0539 "
    pub static ref CARD_MASK: Regex = Regex::new(
        r"^•{4}\s+\d{4}\s+"
    ).unwrap();

    pub static ref WHITESPACE: Regex = Regex::new(
        r"\s+"
    ).unwrap();
}

// Nubank literals
pub const NUBANK_TRANSACTIONS_HEADER: &str = "TRANSAÇÕES DE ";
pub const NUBANK_PAYMENTS_HEADER: &str = "Pagamentos e Financiamentos";

// Sicoob literals
pub const SICOOB_MOVEMENTS_HEADER: &str = "MOVIMENTOS";
pub const SICOOB_PURCHASES_HEADER: &str = "GASTOS DE ";
pub const SICOOB_PURCHASES_END: [&str; 2] = ["TOTAL ", "DEMONSTRATIVO"];
pub const SICOOB_PRIOR_BALANCE: &str = "- SALDO ANTERIOR";
pub const SICOOB_PRIOR_BALANCE_LABEL: &str = "SALDO ANTERIOR";
pub const SICOOB_BANNER: &str = "SICOOB";
pub const SICOOB_DOCUMENT_TITLE: &str = "EXTRATO DE CARTÃO DE CRÉDITO";
pub const SICOOB_RUNNING_HEADERS: [&str; 3] = ["Cliente:", "Fatura de ", "Conta Cartão:"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nubank_amount_variants() {
        let caps = NUBANK_AMOUNT.captures("Estorno −R$ 3,94").unwrap();
        assert_eq!(&caps[1], "\u{2212}");
        assert_eq!(&caps[2], "3,94");

        let caps = NUBANK_AMOUNT.captures("Compra R$ 1.234,56").unwrap();
        assert_eq!(&caps[1], "");
        assert_eq!(&caps[2], "1.234,56");
    }

    #[test]
    fn test_sicoob_trailing_amount_is_anchored() {
        assert!(SICOOB_TRAILING_AMOUNT.is_match("CANED 69,15"));
        assert!(!SICOOB_TRAILING_AMOUNT.is_match("69,15 CANED"));

        let caps = SICOOB_TRAILING_AMOUNT.captures("AJUSTE 1234,56").unwrap();
        assert_eq!(&caps[2], "1234,56");

        let caps = SICOOB_TRAILING_AMOUNT.captures("PAGAMENTO -1.030,00").unwrap();
        assert_eq!(&caps[1], "-");
        assert_eq!(&caps[2], "1.030,00");
    }

    #[test]
    fn test_page_footer() {
        assert!(PAGE_FOOTER.is_match("2 de 7"));
        assert!(PAGE_FOOTER.is_match("10de12"));
        assert!(!PAGE_FOOTER.is_match("2 de 7 páginas"));
    }
}
