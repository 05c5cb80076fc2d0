//! Output writers. Every format carries the same three columns:
//! `Data`, `Descrição` and `Valor`.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use serde::Serialize;

use fatura_core::models::config::OutputConfig;
use fatura_core::{ExtractionResult, Layout, Route, TransactionRecord};

/// Column headers shared by all formats.
pub const HEADER: [&str; 3] = ["Data", "Descrição", "Valor"];

/// Sheet holding primary records in the workbook.
pub const PRIMARY_SHEET: &str = "Transações";

/// Excel accounting format: `R$` aligned left, negatives red in parentheses,
/// a dash for zero.
const BRL_ACCOUNTING: &str = r#"_("R$"* #,##0.00_);[Red]_("R$"* (#,##0.00);_("R$"* "-"??_);_(@_)"#;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Single-sheet CSV
    Csv,
    /// Workbook with one sheet per section and numeric amounts
    Xlsx,
    /// JSON with one array per section
    Json,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// Suffix replacing the input's extension. The text summary gets a
    /// compound suffix so it never lands on a `.txt` statement.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Json => "json",
            OutputFormat::Text => "summary.txt",
        }
    }

    /// Whether the rendered output is text that can go to a terminal.
    pub fn is_textual(self) -> bool {
        !matches!(self, OutputFormat::Xlsx)
    }
}

/// Render `result` in the requested format.
pub fn format_result(
    result: &ExtractionResult,
    format: OutputFormat,
    config: &OutputConfig,
) -> anyhow::Result<Vec<u8>> {
    match format {
        OutputFormat::Csv => Ok(format_csv(result, config)?.into_bytes()),
        OutputFormat::Xlsx => format_xlsx(result, config),
        OutputFormat::Json => Ok(format_json(result)?.into_bytes()),
        OutputFormat::Text => Ok(format_text(result, config).into_bytes()),
    }
}

/// Description column, with secondary rows tagged by `label`.
fn row_description(route: Route, record: &TransactionRecord, label: &str) -> String {
    match route {
        Route::Primary => record.description.clone(),
        Route::Secondary => format!("[{}] {}", label, record.description),
    }
}

/// Primary rows first, then secondary rows prefixed with the configured label.
pub fn format_csv(result: &ExtractionResult, config: &OutputConfig) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    if config.include_header {
        wtr.write_record(HEADER)?;
    }

    for (route, record) in result.iter() {
        wtr.write_record([
            record.date_text(),
            row_description(route, record, &config.secondary_label),
            record.amount_text(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// Two sheets, primary records under [`PRIMARY_SHEET`] and secondary ones
/// under the configured label. `Valor` is a number in BRL accounting format;
/// records without an amount leave it blank.
pub fn format_xlsx(result: &ExtractionResult, config: &OutputConfig) -> anyhow::Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let money = Format::new().set_num_format(BRL_ACCOUNTING);

    let sheets = [
        (PRIMARY_SHEET, &result.primary),
        (config.secondary_label.as_str(), &result.secondary),
    ];
    for (name, records) in sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;
        write_sheet(sheet, records, config.include_header, &header, &money)?;
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_sheet(
    sheet: &mut Worksheet,
    records: &[TransactionRecord],
    include_header: bool,
    header: &Format,
    money: &Format,
) -> anyhow::Result<()> {
    let mut row = 0;
    if include_header {
        for (col, title) in HEADER.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *title, header)?;
        }
        row = 1;
    }

    for record in records {
        sheet.write_string(row, 0, record.date_text())?;
        sheet.write_string(row, 1, record.description.as_str())?;
        if let Some(value) = record.amount.and_then(|a| a.value().to_f64()) {
            sheet.write_number_with_format(row, 2, value, money)?;
        }
        row += 1;
    }

    sheet.set_column_width(0, 12)?;
    sheet.set_column_width(1, 50)?;
    sheet.set_column_width(2, 16)?;
    Ok(())
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    date: Option<String>,
    description: &'a str,
    amount: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    value: Option<Decimal>,
}

impl<'a> From<&'a TransactionRecord> for JsonRecord<'a> {
    fn from(record: &'a TransactionRecord) -> Self {
        Self {
            date: record.date.map(|d| d.to_string()),
            description: &record.description,
            amount: record.amount.map(|a| a.to_string()),
            value: record.amount.map(|a| a.value()),
        }
    }
}

#[derive(Serialize)]
struct JsonStatement<'a> {
    layout: Layout,
    primary: Vec<JsonRecord<'a>>,
    secondary: Vec<JsonRecord<'a>>,
}

pub fn format_json(result: &ExtractionResult) -> anyhow::Result<String> {
    let statement = JsonStatement {
        layout: result.layout,
        primary: result.primary.iter().map(JsonRecord::from).collect(),
        secondary: result.secondary.iter().map(JsonRecord::from).collect(),
    };
    Ok(serde_json::to_string_pretty(&statement)?)
}

pub fn format_text(result: &ExtractionResult, config: &OutputConfig) -> String {
    let mut output = String::new();

    output.push_str(&format!("Layout: {}\n", result.layout));

    let sections = [
        ("Lançamentos", &result.primary),
        (config.secondary_label.as_str(), &result.secondary),
    ];
    for (title, records) in sections {
        output.push('\n');
        output.push_str(&format!("{} ({}):\n", title, records.len()));
        for record in records.iter() {
            output.push_str(&format!(
                "  {:<10}  {:<50}  {:>14}\n",
                record.date_text(),
                record.description,
                record.amount_text()
            ));
        }
    }

    let total: Decimal = result
        .primary
        .iter()
        .filter_map(|r| r.amount.map(|a| a.value()))
        .sum();
    output.push_str(&format!(
        "\nTotal lançamentos: {}\n",
        fatura_core::Amount::new(total)
    ));

    output
}
