//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod process;

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use fatura_core::{BankChoice, FaturaConfig};

/// Statement options shared by `process` and `batch`. Each flag overrides
/// the matching config file value.
#[derive(Args, Clone, Debug, Default)]
pub struct StatementArgs {
    /// Statement layout
    #[arg(long, value_enum)]
    pub bank: Option<BankArg>,

    /// Statement reference year (required for Nubank)
    #[arg(long)]
    pub year: Option<i32>,

    /// Cardholder name heading the holder's own transactions
    #[arg(long)]
    pub owner: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum BankArg {
    Auto,
    Nubank,
    Sicoob,
}

impl From<BankArg> for BankChoice {
    fn from(arg: BankArg) -> Self {
        match arg {
            BankArg::Auto => BankChoice::Auto,
            BankArg::Nubank => BankChoice::Nubank,
            BankArg::Sicoob => BankChoice::Sicoob,
        }
    }
}

impl StatementArgs {
    fn apply(&self, config: &mut FaturaConfig) {
        if let Some(bank) = self.bank {
            config.statement.bank = bank.into();
        }
        if let Some(year) = self.year {
            config.statement.year = Some(year);
        }
        if let Some(owner) = &self.owner {
            config.statement.holder_name = owner.clone();
        }
    }
}

/// Load the config file (or the per-user default when present) and apply
/// command-line overrides.
pub fn load_config(
    config_path: Option<&str>,
    overrides: &StatementArgs,
) -> anyhow::Result<FaturaConfig> {
    let mut config = match config_path {
        Some(path) => FaturaConfig::from_file(Path::new(path))?,
        None => {
            let default_path = config::default_config_path();
            if default_path.exists() {
                FaturaConfig::from_file(&default_path)?
            } else {
                FaturaConfig::default()
            }
        }
    };

    overrides.apply(&mut config);
    Ok(config)
}

/// Whether `path` is a statement file this tool reads.
pub fn is_statement_file(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    matches!(ext.to_lowercase().as_str(), "pdf" | "txt")
}

/// `input` with its extension replaced by the format's.
pub fn default_output_path(input: &Path, extension: &str) -> PathBuf {
    input.with_extension(extension)
}

/// Write `data` to `output`, creating missing parent directories. Refuses
/// to write over `input`.
pub fn write_output(input: &Path, output: &Path, data: &[u8]) -> anyhow::Result<()> {
    let same_file = match (fs::canonicalize(input), fs::canonicalize(output)) {
        (Ok(a), Ok(b)) => a == b,
        _ => input == output,
    };
    if same_file {
        anyhow::bail!("Refusing to overwrite input file {}", input.display());
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, data)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply() {
        let mut config = FaturaConfig::default();
        let args = StatementArgs {
            bank: Some(BankArg::Sicoob),
            year: Some(2026),
            owner: Some("MARIA".to_string()),
        };
        args.apply(&mut config);

        assert_eq!(config.statement.bank, BankChoice::Sicoob);
        assert_eq!(config.statement.year, Some(2026));
        assert_eq!(config.statement.holder_name, "MARIA");

        StatementArgs::default().apply(&mut config);
        assert_eq!(config.statement.year, Some(2026));
    }

    #[test]
    fn test_statement_file_filter() {
        assert!(is_statement_file(Path::new("a/fatura.PDF")));
        assert!(is_statement_file(Path::new("fatura.txt")));
        assert!(!is_statement_file(Path::new("fatura.csv")));
        assert!(!is_statement_file(Path::new("fatura")));
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("dir/fatura.pdf"), "csv"),
            PathBuf::from("dir/fatura.csv")
        );
        assert_eq!(
            default_output_path(Path::new("fatura.txt"), "summary.txt"),
            PathBuf::from("fatura.summary.txt")
        );
    }

    #[test]
    fn test_write_output_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("fatura.txt");
        fs::write(&input, "statement").unwrap();

        let output = dir.path().join("new").join("dir").join("out.csv");
        write_output(&input, &output, b"a,b,c\n").unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "a,b,c\n");
    }

    #[test]
    fn test_write_output_never_replaces_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("fatura.txt");
        fs::write(&input, "statement").unwrap();

        let aliased = dir.path().join(".").join("fatura.txt");
        assert!(write_output(&input, &aliased, b"summary").is_err());
        assert!(write_output(&input, &input, b"summary").is_err());
        assert_eq!(fs::read_to_string(&input).unwrap(), "statement");
    }
}
