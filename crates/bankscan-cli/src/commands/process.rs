//! Process command - extract transactions from a single statement file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use bankscan_core::models::config::BankscanConfig;
use bankscan_core::pipeline::{PdfTextSource, TextSource};
use bankscan_core::statement::StatementParser;
use bankscan_core::ParsedTransaction;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input statement file (PDF)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let transactions = parse_statement(&args.input, &config)?;

    let output = format_transactions(&transactions, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    println!(
        "{} {} transactions extracted",
        style("✓").green(),
        transactions.len()
    );

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

pub fn load_config(config_path: Option<&str>) -> anyhow::Result<BankscanConfig> {
    let config = if let Some(path) = config_path {
        BankscanConfig::from_file(Path::new(path))?
    } else {
        BankscanConfig::default()
    };
    Ok(config)
}

/// Extract text from a statement PDF and parse its transactions.
pub fn parse_statement(
    path: &Path,
    config: &BankscanConfig,
) -> anyhow::Result<Vec<ParsedTransaction>> {
    let source = PdfTextSource::new(config.pdf.max_pages);
    let text = source.statement_text(path)?;
    debug!("extracted {} chars of statement text", text.len());

    Ok(StatementParser::new().parse(&text))
}

/// Render transactions in the requested output format.
pub fn format_transactions(
    transactions: &[ParsedTransaction],
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(transactions)?),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            for transaction in transactions {
                writer.serialize(transaction)?;
            }
            Ok(String::from_utf8(writer.into_inner()?)?)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for transaction in transactions {
                out.push_str(&format!(
                    "{}  {:>12}  {}\n",
                    transaction.date, transaction.amount, transaction.description
                ));
            }
            Ok(out)
        }
    }
}
