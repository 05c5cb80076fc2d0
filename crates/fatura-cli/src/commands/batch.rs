//! Batch processing command for multiple statement files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use fatura_core::{extract_file, ExtractionResult, FaturaConfig};

use super::{is_statement_file, load_config, write_output, StatementArgs};
use crate::output::{format_result, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching the input statements
    #[arg(required = true)]
    input: String,

    /// Output directory (default: next to each input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Also write a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    #[command(flatten)]
    statement: StatementArgs,
}

const PROGRESS_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files";

/// Result of processing a single file.
struct FileOutcome {
    path: PathBuf,
    result: Result<ExtractionResult, String>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = Arc::new(load_config(config_path, &args.statement)?);

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file() && is_statement_file(p))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!("{} Found {} files to process", style("ℹ").blue(), files.len());

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(PROGRESS_TEMPLATE)?
            .progress_chars("=>-"),
    );

    let outcomes = extract_all(&files, &config, args.jobs, args.continue_on_error, &pb).await?;
    pb.finish_and_clear();

    let mut written = 0;
    for outcome in &outcomes {
        if let Ok(result) = &outcome.result {
            let output_path =
                output_path_for(&outcome.path, args.output_dir.as_deref(), args.format);
            let rendered = format_result(result, args.format, &config.output)?;
            write_output(&outcome.path, &output_path, &rendered)?;
            debug!("Wrote output to {}", output_path.display());
            written += 1;
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &outcomes)?;
        println!("{} Summary written to {}", style("✓").green(), summary_path.display());
    }

    let failed: Vec<_> = outcomes.iter().filter(|o| o.result.is_err()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        outcomes.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(written).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for outcome in &failed {
            if let Err(e) = &outcome.result {
                println!("  - {}: {}", outcome.path.display(), e);
            }
        }
    }

    Ok(())
}

/// Extract every file with at most `jobs` parses in flight. Outcomes come
/// back in input order.
async fn extract_all(
    files: &[PathBuf],
    config: &Arc<FaturaConfig>,
    jobs: usize,
    continue_on_error: bool,
    pb: &ProgressBar,
) -> anyhow::Result<Vec<FileOutcome>> {
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let mut tasks = JoinSet::new();

    for (index, path) in files.iter().cloned().enumerate() {
        let permit = semaphore.clone().acquire_owned().await?;
        let config = Arc::clone(config);
        tasks.spawn_blocking(move || {
            let result = extract_file(&path, &config).map_err(|e| e.to_string());
            drop(permit);
            (index, FileOutcome { path, result })
        });
    }

    let mut outcomes: Vec<Option<FileOutcome>> = files.iter().map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        let (index, outcome) = joined?;
        pb.inc(1);

        if let Err(e) = &outcome.result {
            if continue_on_error {
                warn!("Failed to process {}: {}", outcome.path.display(), e);
            } else {
                error!("Failed to process {}: {}", outcome.path.display(), e);
                tasks.abort_all();
                anyhow::bail!("Processing failed for {}: {}", outcome.path.display(), e);
            }
        }
        outcomes[index] = Some(outcome);
    }

    Ok(outcomes.into_iter().flatten().collect())
}

fn output_path_for(input: &Path, output_dir: Option<&Path>, format: OutputFormat) -> PathBuf {
    let renamed = input.with_extension(format.extension());
    match (output_dir, renamed.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => renamed,
    }
}

fn write_summary(path: &Path, outcomes: &[FileOutcome]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["file", "layout", "primary", "secondary", "error"])?;

    for outcome in outcomes {
        let filename = outcome.path.display().to_string();

        match &outcome.result {
            Ok(result) => wtr.write_record([
                filename,
                result.layout.to_string(),
                result.primary.len().to_string(),
                result.secondary.len().to_string(),
                String::new(),
            ])?,
            Err(e) => wtr.write_record([
                filename,
                String::new(),
                String::new(),
                String::new(),
                e.clone(),
            ])?,
        }
    }

    wtr.flush()?;
    Ok(())
}
