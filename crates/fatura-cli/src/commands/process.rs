//! Process command - extract transactions from a single statement.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use fatura_core::{extract_statement, load_pages};

use super::{default_output_path, is_statement_file, load_config, write_output, StatementArgs};
use crate::output::{format_result, OutputFormat};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input statement (PDF, or text with form-feed page breaks)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: input path with the format's extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Write to stdout instead of a file
    #[arg(long, conflicts_with = "output")]
    stdout: bool,

    #[command(flatten)]
    statement: StatementArgs,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path, &args.statement)?;

    if !args.input.is_file() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    if !is_statement_file(&args.input) {
        anyhow::bail!("Unsupported file format: {}", args.input.display());
    }
    if args.stdout && !args.format.is_textual() {
        anyhow::bail!("The {:?} format cannot be written to stdout; use --output", args.format);
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    if args.stdout {
        pb.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }

    pb.set_message("Reading pages...");
    let pages = load_pages(&args.input, &config.pdf)?;
    debug!("{} has {} pages", args.input.display(), pages.len());

    pb.set_message("Extracting transactions...");
    let result = extract_statement(&pages, &config.statement)?;
    pb.finish_and_clear();

    let rendered = format_result(&result, args.format, &config.output)?;

    if args.stdout {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&rendered)?;
        if !rendered.ends_with(b"\n") {
            stdout.write_all(b"\n")?;
        }
    } else {
        let output_path = args
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&args.input, args.format.extension()));
        write_output(&args.input, &output_path, &rendered)?;
        println!(
            "{} {} linhas salvas em {}",
            style("OK:").green(),
            result.len(),
            output_path.display()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
