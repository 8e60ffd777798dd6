//! BIDS Report CLI Application
//!
//! This is the command-line interface for the bids-report library.
//! It adds:
//! - TOML configuration files
//! - Text or JSON output to stdout or a file
//! - Entity value queries over a dataset tree

use anyhow::{Context, Result};
use bids_report::{Dataset, DatasetSummary};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

mod config;

use config::{AppConfig, OutputFormat};

/// BIDS Report - Summarize BIDS electrophysiology datasets
#[derive(Parser, Debug)]
#[command(name = "bids-report")]
#[command(about = "Generate human-readable reports for BIDS datasets (MEG, EEG, iEEG)", long_about = None)]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the dataset report
    Report {
        /// BIDS dataset root
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        /// Only summarize scans of this session
        #[arg(long, value_name = "LABEL")]
        session: Option<String>,

        /// Wrap the report to this many columns
        #[arg(long, value_name = "COLUMNS")]
        width: Option<usize>,

        /// Output format
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Output file (default: stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// List the values of a BIDS entity (sub, ses, task, run, recording, ...)
    Entities {
        /// BIDS dataset root
        #[arg(value_name = "ROOT")]
        root: PathBuf,

        /// Entity key, short (`sub`) or long (`subject`)
        #[arg(value_name = "KEY")]
        key: String,
    },
}

/// JSON output: the collected summary and the rendered text
#[derive(Serialize)]
struct JsonReport<'a> {
    version: &'a str,
    summary: &'a DatasetSummary,
    report: String,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("BIDS Report CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using report library v{}", bids_report::VERSION);

    let mut app_config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    match args.command {
        Command::Report {
            root,
            session,
            width,
            format,
            output,
        } => {
            // Command-line flags override the config file
            if let Some(session) = session {
                app_config.report.session = Some(session);
            }
            if let Some(width) = width {
                anyhow::ensure!(width > 0, "--width must be positive");
                app_config.report.wrap_width = width;
            }
            if let Some(format) = format {
                app_config.output.format = format;
            }
            if output.is_some() {
                app_config.output.path = output;
            }
            report_mode(&root, app_config)
        }
        Command::Entities { root, key } => entities_mode(&root, &key, app_config),
    }
}

/// Summarize a dataset and write the report
fn report_mode(root: &Path, app_config: AppConfig) -> Result<()> {
    let AppConfig { report, output } = app_config;
    let dataset = Dataset::with_config(root, report)
        .with_context(|| format!("Failed to open dataset: {:?}", root))?;

    let summary = dataset
        .summarize()
        .with_context(|| format!("Failed to summarize dataset: {:?}", root))?;
    let text = bids_report::render_report(&summary, dataset.config());

    let content = match output.format {
        OutputFormat::Txt => format!("{text}\n"),
        OutputFormat::Json => {
            let json = JsonReport {
                version: bids_report::VERSION,
                summary: &summary,
                report: text,
            };
            format!("{}\n", serde_json::to_string_pretty(&json)?)
        }
    };

    write_output(output.path.as_deref(), &content)
}

/// Print the values of one entity, one per line
fn entities_mode(root: &Path, key: &str, app_config: AppConfig) -> Result<()> {
    let dataset = Dataset::with_config(root, app_config.report)
        .with_context(|| format!("Failed to open dataset: {:?}", root))?;

    let values = dataset
        .entity_values(key)
        .with_context(|| format!("Failed to collect '{}' values in {:?}", key, root))?;
    log::info!("Found {} values for entity '{}'", values.len(), key);

    let mut content = values.join("\n");
    if !content.is_empty() {
        content.push('\n');
    }
    write_output(None, &content)
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    use std::io::Write;

    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write output file: {:?}", path))?;
            log::info!("Report written to {:?}", path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
