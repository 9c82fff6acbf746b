//! CLI entry point for the table rater tool.
//!
//! Provides subcommands for grading a class of scores, analyzing a
//! weather dataset, and summarizing per-building energy consumption.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use table_rater::config::GradingConfig;
use table_rater::ingest::{InteractivePrompt, RecordSource, ScoreCsv};
use table_rater::reports::{energy, gradebook, weather};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "table_rater")]
#[command(about = "A tool to summarize and grade tabular datasets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a class of name,score records and save the results CSV
    Gradebook {
        /// Two-column name,score CSV; interactive entry when omitted
        #[arg(short, long)]
        input: Option<String>,

        /// Results CSV to write (Name,Marks,Grade,Status)
        #[arg(short, long, default_value = "gradebook_results.csv")]
        output: String,

        /// Optional JSON file with custom grade thresholds and pass mark
        #[arg(short, long)]
        grading: Option<String>,
    },
    /// Clean and summarize a weather CSV, writing a markdown report
    Weather {
        /// CSV with date, temperature, rainfall, and humidity columns
        #[arg(short, long)]
        input: String,

        /// Where to export the cleaned dataset
        #[arg(short, long, default_value = "weather_data_cleaned.csv")]
        cleaned: String,

        /// Where to write the markdown report
        #[arg(short, long, default_value = "weather_analysis_report.md")]
        report: String,
    },
    /// Aggregate per-building meter CSVs into summary files
    Energy {
        /// Directory containing one CSV per building
        #[arg(short, long)]
        data_dir: String,

        /// Directory to write the summary CSVs and summary.txt
        #[arg(short, long, default_value = "energy_summary")]
        out_dir: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/table_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("table_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Gradebook {
            input,
            output,
            grading,
        } => {
            let config = match grading {
                Some(path) => GradingConfig::load(&path)?,
                None => GradingConfig::default(),
            };

            let mut source: Box<dyn RecordSource> = match input {
                Some(path) => {
                    info!(path = %path, "Reading scores from CSV");
                    Box::new(ScoreCsv::new(&path))
                }
                None => {
                    info!("No input file, starting interactive entry");
                    Box::new(InteractivePrompt::from_terminal())
                }
            };

            gradebook::run(source.as_mut(), &output, &config)?;
        }
        Commands::Weather {
            input,
            cleaned,
            report,
        } => {
            weather::run(&input, &cleaned, &report)?;
        }
        Commands::Energy { data_dir, out_dir } => {
            energy::run(&data_dir, &out_dir)?;
        }
    }

    Ok(())
}
