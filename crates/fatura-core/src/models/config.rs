//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};

use crate::models::statement::Layout;
use crate::statement::detect_layout;

/// Placeholder holder name used when none is configured.
pub const DEFAULT_HOLDER_NAME: &str = "Nome do Titular";

/// Label marking secondary rows in single-sheet outputs.
pub const DEFAULT_SECONDARY_LABEL: &str = "Pagamentos e Financiamentos";

/// Main configuration for the fatura pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FaturaConfig {
    /// Statement interpretation settings.
    pub statement: StatementConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Which parser to run on a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BankChoice {
    /// Sniff the first page.
    #[default]
    Auto,
    Nubank,
    Sicoob,
}

impl BankChoice {
    /// Resolve to a concrete layout, inspecting the first page when set to `Auto`.
    pub fn resolve(self, first_page: &str) -> Layout {
        match self {
            BankChoice::Auto => detect_layout(first_page),
            BankChoice::Nubank => Layout::Nubank,
            BankChoice::Sicoob => Layout::Sicoob,
        }
    }
}

/// Statement interpretation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementConfig {
    /// Statement reference year. Required for Nubank statements, which print
    /// dates without a year; Sicoob statements fall back to it when the
    /// header carries no full date.
    pub year: Option<i32>,

    /// Cardholder name heading the holder's own block (Nubank only).
    pub holder_name: String,

    /// Parser selection.
    pub bank: BankChoice,
}

impl Default for StatementConfig {
    fn default() -> Self {
        Self {
            year: None,
            holder_name: DEFAULT_HOLDER_NAME.to_string(),
            bank: BankChoice::Auto,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to process (0 = unlimited).
    pub max_pages: usize,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Label prefixed to secondary rows in single-sheet formats.
    pub secondary_label: String,

    /// Write the `Data, Descrição, Valor` header row.
    pub include_header: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            secondary_label: DEFAULT_SECONDARY_LABEL.to_string(),
            include_header: true,
        }
    }
}

impl FaturaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = FaturaConfig::default();
        assert_eq!(config.statement.year, None);
        assert_eq!(config.statement.holder_name, "Nome do Titular");
        assert_eq!(config.statement.bank, BankChoice::Auto);
        assert_eq!(config.output.secondary_label, "Pagamentos e Financiamentos");
        assert!(config.output.include_header);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: FaturaConfig =
            serde_json::from_str(r#"{"statement": {"year": 2026, "bank": "sicoob"}}"#).unwrap();
        assert_eq!(config.statement.year, Some(2026));
        assert_eq!(config.statement.bank, BankChoice::Sicoob);
        assert_eq!(config.statement.holder_name, DEFAULT_HOLDER_NAME);
        assert_eq!(config.pdf.max_pages, 0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = FaturaConfig::default();
        config.statement.year = Some(2025);
        config.statement.holder_name = "MARIA SILVA".to_string();
        config.save(&path).unwrap();

        let loaded = FaturaConfig::from_file(&path).unwrap();
        assert_eq!(loaded.statement.year, Some(2025));
        assert_eq!(loaded.statement.holder_name, "MARIA SILVA");
    }

    #[test]
    fn test_bank_choice_resolve() {
        assert_eq!(BankChoice::Sicoob.resolve(""), Layout::Sicoob);
        assert_eq!(
            BankChoice::Nubank.resolve("SICOOB EXTRATO DE CARTÃO DE CRÉDITO"),
            Layout::Nubank
        );
        assert_eq!(
            BankChoice::Auto.resolve("SICOOB\nEXTRATO DE CARTÃO DE CRÉDITO"),
            Layout::Sicoob
        );
    }
}
