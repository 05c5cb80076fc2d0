//! Statement parsing: line rules, the record accumulator and one parser
//! per supported layout.

mod accumulator;
mod detect;
mod nubank;
pub mod rules;
mod sicoob;

pub use accumulator::{PendingRecord, RecordAccumulator};
pub use detect::detect_layout;
pub use nubank::NubankParser;
pub use sicoob::SicoobParser;

use tracing::info;

use crate::error::ExtractionError;
use crate::models::config::StatementConfig;
use crate::models::statement::{ExtractionResult, Layout};

/// Result type for statement parsing.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// A parser for one statement layout.
///
/// Parsers hold configuration only; every call to [`StatementParser::parse`]
/// owns its own state, so one parser may serve several threads.
pub trait StatementParser: Send + Sync {
    /// Layout this parser understands.
    fn layout(&self) -> Layout;

    /// Parse a statement given the extracted text of each page, in order.
    fn parse(&self, pages: &[String]) -> Result<ExtractionResult>;
}

/// Non-empty trimmed lines of one page, in order.
pub fn page_lines(page: &str) -> impl Iterator<Item = &str> {
    page.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// Build the parser for `layout` from the statement configuration.
pub fn parser_for(layout: Layout, config: &StatementConfig) -> Result<Box<dyn StatementParser>> {
    match layout {
        Layout::Nubank => {
            let year = config.year.ok_or(ExtractionError::MissingStatementYear)?;
            Ok(Box::new(NubankParser::new(year, config.holder_name.clone())))
        }
        Layout::Sicoob => Ok(Box::new(SicoobParser::new(config.year))),
    }
}

/// Select a parser per `config.bank` (sniffing the first page when set to
/// auto) and parse `pages`.
pub fn extract_statement(pages: &[String], config: &StatementConfig) -> Result<ExtractionResult> {
    let first_page = pages.first().map(String::as_str).unwrap_or_default();
    let parser = parser_for(config.bank.resolve(first_page), config)?;
    info!("Parsing {} page(s) as {} statement", pages.len(), parser.layout());

    parser.parse(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::BankChoice;
    use crate::models::statement::Route;

    const NUBANK: &str = "\
Nu Pagamentos S.A.
RESUMO DA FATURA ATUAL
TRANSAÇÕES DE 01 JAN A 31 JAN
Nome do Titular
05 JAN Mercado R$ 10,00
Pagamentos e Financiamentos
06 JAN Pagamento em 06 JAN -R$ 10,00";

    const SICOOB: &str = "\
SICOOB
EXTRATO DE CARTÃO DE CRÉDITO
Fatura de 31/01/2026
MOVIMENTOS
05/01 PAGAMENTO -10,00
GASTOS DE JOAO
06/01 MERCADO 10,00";

    #[test]
    fn test_page_lines() {
        let lines: Vec<&str> = page_lines("  a  \n\n\t\n b\r\nc ").collect();
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_extract_statement_auto_detects() {
        let config = StatementConfig {
            year: Some(2026),
            ..StatementConfig::default()
        };

        let nubank = extract_statement(&[NUBANK.to_string()], &config).unwrap();
        assert_eq!(nubank.layout, Layout::Nubank);
        assert_eq!((nubank.primary.len(), nubank.secondary.len()), (1, 1));

        let sicoob = extract_statement(&[SICOOB.to_string()], &config).unwrap();
        assert_eq!(sicoob.layout, Layout::Sicoob);
        assert_eq!((sicoob.primary.len(), sicoob.secondary.len()), (1, 1));
    }

    #[test]
    fn test_parser_for_layout() {
        let config = StatementConfig {
            year: Some(2026),
            ..StatementConfig::default()
        };
        assert_eq!(parser_for(Layout::Nubank, &config).unwrap().layout(), Layout::Nubank);
        assert_eq!(parser_for(Layout::Sicoob, &config).unwrap().layout(), Layout::Sicoob);
    }

    #[test]
    fn test_records_are_partitioned() {
        let config = StatementConfig {
            year: Some(2026),
            ..StatementConfig::default()
        };
        let result = extract_statement(&[NUBANK.to_string()], &config).unwrap();

        let routes: Vec<Route> = result.iter().map(|(route, _)| route).collect();
        assert_eq!(routes, vec![Route::Primary, Route::Secondary]);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_nubank_requires_year() {
        let config = StatementConfig {
            bank: BankChoice::Nubank,
            ..StatementConfig::default()
        };
        assert_eq!(
            extract_statement(&[NUBANK.to_string()], &config).unwrap_err(),
            ExtractionError::MissingStatementYear
        );
    }

    #[test]
    fn test_sicoob_reads_year_from_header() {
        let config = StatementConfig {
            bank: BankChoice::Sicoob,
            ..StatementConfig::default()
        };
        let result = extract_statement(&[SICOOB.to_string()], &config).unwrap();
        assert_eq!(result.primary[0].date_text(), "2026-01-06");
    }
}
