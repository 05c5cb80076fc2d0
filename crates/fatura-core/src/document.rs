//! Reading statement files into page texts.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{FaturaError, Result};
use crate::models::config::{FaturaConfig, PdfConfig};
use crate::models::statement::ExtractionResult;
use crate::pdf::{limit_pages, split_pages};
use crate::statement::extract_statement;

/// Read the page texts of a statement file.
///
/// `.txt` files are split on form feeds; anything else is read as a PDF.
pub fn load_pages(path: &Path, config: &PdfConfig) -> Result<Vec<String>> {
    let is_text = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));

    let pages = if is_text {
        debug!("Reading {} as plain text", path.display());
        split_pages(&std::fs::read_to_string(path)?)
    } else {
        read_pdf(path)?
    };

    Ok(limit_pages(pages, config.max_pages))
}

#[cfg(feature = "pdf")]
fn read_pdf(path: &Path) -> Result<Vec<String>> {
    let data = std::fs::read(path)?;
    debug!("Read {} bytes from {}", data.len(), path.display());
    Ok(crate::pdf::PdfExtractor::pages_from_bytes(&data)?)
}

#[cfg(not(feature = "pdf"))]
fn read_pdf(path: &Path) -> Result<Vec<String>> {
    Err(FaturaError::Config(format!(
        "cannot read {}: built without PDF support",
        path.display()
    )))
}

/// Load a statement file and extract its transactions.
pub fn extract_file(path: &Path, config: &FaturaConfig) -> Result<ExtractionResult> {
    if !path.is_file() {
        return Err(FaturaError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a file", path.display()),
        )));
    }

    let pages = load_pages(path, &config.pdf)?;
    let result = extract_statement(&pages, &config.statement)?;
    info!(
        "{}: {} primary and {} secondary records",
        path.display(),
        result.primary.len(),
        result.secondary.len()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use crate::models::statement::Layout;

    const STATEMENT: &str = "\
TRANSAÇÕES DE 01 JAN A 31 JAN
Nome do Titular
05 JAN Mercado R$ 10,00
\u{000C}Nome do Titular
06 JAN Padaria R$ 4,50
";

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_text_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "fatura.TXT", STATEMENT);

        let pages = load_pages(&path, &PdfConfig::default()).unwrap();
        assert_eq!(pages.len(), 2);

        let limited = load_pages(&path, &PdfConfig { max_pages: 1 }).unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_extract_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "fatura.txt", STATEMENT);

        let mut config = FaturaConfig::default();
        config.statement.year = Some(2026);
        let result = extract_file(&path, &config).unwrap();

        assert_eq!(result.layout, Layout::Nubank);
        assert_eq!(result.primary.len(), 2);
        assert_eq!(result.primary[1].description, "Padaria");
    }

    #[test]
    fn test_extract_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.pdf");
        assert!(matches!(
            extract_file(&missing, &FaturaConfig::default()),
            Err(FaturaError::Io(_))
        ));

        let path = write(&dir, "fatura.txt", STATEMENT);
        assert!(matches!(
            extract_file(&path, &FaturaConfig::default()),
            Err(FaturaError::Extraction(ExtractionError::MissingStatementYear))
        ));
    }
}
