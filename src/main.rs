//! CLI entry point for the Awqaf metrics dashboard pipelines.
//!
//! Each subcommand runs one dashboard page's pipeline and writes its payload
//! as JSON, or appends a daily-activity summary row to a CSV file.

use anyhow::Result;
use awqaf_metrics::{
    config::DashboardConfig,
    fetch::{BasicClient, Loader},
    output::{SummaryRow, append_record, print_json, print_pretty, write_error_state, write_json},
    pipelines::{news, performance, post_mix, post_types, sentiment, summary},
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "awqaf_metrics")]
#[command(about = "Builds dashboard payloads from published CSV and API data", long_about = None)]
struct Cli {
    /// JSON file overriding sources, thresholds and reference tables
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Where to write the JSON payload (logged when omitted)
    #[arg(short, long, global = true, value_name = "FILE")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// News mentions payload, API first with CSV fallback
    News,
    /// Post type cards and insights from the tab-delimited export
    PostTypes,
    /// Totals per section of the sectioned post type export
    PostMix,
    /// Performance metric cards; every metric must load
    Performance,
    /// Sentiment breakdown with shares
    Sentiment,
    /// Aggregate a date,count source and append a summary row
    Summarize {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Category name recorded in the summary
        #[arg(long, default_value = "Daily activity")]
        category: String,

        /// CSV file to append results to
        #[arg(long, default_value = "summary.csv")]
        csv: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/awqaf_metrics.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("awqaf_metrics.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        error!(error = %e, "Pipeline failed");
        if let Some(path) = &cli.output {
            write_error_state(path, &e.to_string())?;
            info!(path = %path.display(), "Wrote error state");
        }
        return Err(e);
    }

    Ok(())
}

async fn run(cli: &Cli) -> Result<()> {
    let config = DashboardConfig::load_or_default(cli.config.as_deref())?;
    let loader = Loader::new(BasicClient::new());
    let output = cli.output.as_deref();

    match &cli.command {
        Commands::News => {
            let payload = news::load_news(&loader, &config).await?;
            emit(output, &payload)?;
        }
        Commands::PostTypes => {
            let report = post_types::load_post_types(&loader, &config).await?;
            emit(output, &report)?;
        }
        Commands::PostMix => {
            let report = post_mix::load_post_mix(&loader, &config).await?;
            emit(output, &report)?;
        }
        Commands::Performance => {
            let cards = performance::load_performance(&loader, &config).await?;
            emit(output, &cards)?;
        }
        Commands::Sentiment => {
            let report = sentiment::load_sentiment(&loader, &config).await?;
            emit(output, &report)?;
        }
        Commands::Summarize {
            source,
            category,
            csv,
        } => {
            let summary = summary::load_summary(&loader, source, category, &config).await?;
            print_pretty(&summary);
            append_record(csv, &SummaryRow::from(&summary))?;
            if output.is_some() {
                emit(output, &summary)?;
            }
        }
    }

    Ok(())
}

fn emit<T: Serialize>(output: Option<&Path>, report: &T) -> Result<()> {
    match output {
        Some(path) => {
            write_json(path, report)?;
            info!(path = %path.display(), "Wrote payload");
            Ok(())
        }
        None => print_json(report),
    }
}
