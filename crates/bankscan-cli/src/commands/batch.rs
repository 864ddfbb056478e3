//! Batch processing command for multiple statement files.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error};

use bankscan_core::ParsedTransaction;

use super::process::{format_transactions, load_config, parse_statement, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct FileResult {
    path: PathBuf,
    transactions: Vec<ParsedTransaction>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            ext.eq_ignore_ascii_case("pdf")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());
    for path in files {
        let file_start = Instant::now();
        let outcome = parse_statement(&path, &config);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(transactions) => FileResult {
                path: path.clone(),
                transactions,
                error: None,
                processing_time_ms,
            },
            Err(e) => {
                error!("failed to process {}: {}", path.display(), e);
                if !args.continue_on_error {
                    pb.abandon();
                    return Err(e);
                }
                FileResult {
                    path: path.clone(),
                    transactions: Vec::new(),
                    error: Some(e.to_string()),
                    processing_time_ms,
                }
            }
        };

        if result.error.is_none() {
            write_file_output(&result, &args)?;
        }

        results.push(result);
        pb.inc(1);
    }

    pb.finish_with_message("Done");

    if args.summary {
        write_summary(&results, &args)?;
    }

    let succeeded = results.iter().filter(|r| r.error.is_none()).count();
    let total_transactions: usize = results.iter().map(|r| r.transactions.len()).sum();
    println!(
        "{} Processed {}/{} files, {} transactions in {:?}",
        style("✓").green(),
        succeeded,
        results.len(),
        total_transactions,
        start.elapsed()
    );

    Ok(())
}

fn write_file_output(result: &FileResult, args: &BatchArgs) -> anyhow::Result<()> {
    let output = format_transactions(&result.transactions, args.format)?;

    if let Some(ref output_dir) = args.output_dir {
        let stem = result
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("statement");
        let extension = match args.format {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        };
        let output_path = output_dir.join(format!("{}.{}", stem, extension));
        fs::write(&output_path, output)?;
        debug!("wrote {}", output_path.display());
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn write_summary(results: &[FileResult], args: &BatchArgs) -> anyhow::Result<()> {
    let summary_path = args
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("summary.csv");

    let mut writer = csv::Writer::from_path(&summary_path)?;
    writer.write_record(["file", "transactions", "time_ms", "error"])?;
    for result in results {
        writer.write_record([
            result.path.display().to_string(),
            result.transactions.len().to_string(),
            result.processing_time_ms.to_string(),
            result.error.clone().unwrap_or_default(),
        ])?;
    }
    writer.flush()?;

    println!(
        "{} Summary written to {}",
        style("✓").green(),
        summary_path.display()
    );
    Ok(())
}
