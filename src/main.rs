//! CLI entry point for quake_stats.
//!
//! Fetches earthquakes from the USGS event API (or a saved GeoJSON file) and
//! prints the strongest events, per-year statistics or a per-year chart.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use quake_stats::{
    fetch::{BasicClient, is_http_url},
    output::{ChartReporter, CsvReporter, JsonReporter, Reporter, TextReporter},
    pipeline::run,
    query::{DEFAULT_ENDPOINT, EventQuery},
    source::{DataSource, FileSource, UsgsSource},
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "quake_stats")]
#[command(about = "Summarise earthquakes reported by the USGS event API", long_about = None)]
struct Cli {
    #[command(flatten)]
    input: InputArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Saved GeoJSON file or full query URL; defaults to building a USGS query
    #[arg(short, long, global = true, value_name = "FILE_OR_URL")]
    input: Option<String>,

    /// JSON file holding the query window and bounding box
    #[arg(short, long, global = true)]
    query_file: Option<String>,

    /// Override the query start date (YYYY-MM-DD)
    #[arg(long, global = true)]
    start: Option<NaiveDate>,

    /// Override the query end date (YYYY-MM-DD)
    #[arg(long, global = true)]
    end: Option<NaiveDate>,

    /// Override the minimum magnitude
    #[arg(long, global = true)]
    min_magnitude: Option<f64>,

    /// Event query endpoint
    #[arg(long, global = true, env = "QUAKE_STATS_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the event count and the strongest earthquake(s)
    Summary {
        /// Print the full summary as JSON instead
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print per-year counts and average magnitudes
    Yearly {
        /// CSV file to append the yearly series to
        #[arg(long)]
        csv: Option<String>,
    },
    /// Chart events per year and average magnitude per year
    Chart {
        /// Maximum bar width in characters
        #[arg(short, long, default_value_t = 40)]
        width: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/quake_stats.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("quake_stats.log"));

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
    let source = build_source(&cli.input)?;
    let stdout = std::io::stdout();

    let mut reporter: Box<dyn Reporter> = match cli.command {
        Commands::Summary { json: true } => Box::new(JsonReporter::new(stdout)),
        Commands::Summary { json: false } => Box::new(TextReporter::new(stdout).summary_only()),
        Commands::Yearly { csv: Some(path) } => {
            info!(path = %path, "Appending yearly series to CSV");
            Box::new(CsvReporter::new(path, TextReporter::new(stdout)))
        }
        Commands::Yearly { csv: None } => Box::new(TextReporter::new(stdout)),
        Commands::Chart { width } => Box::new(ChartReporter::new(stdout, width)),
    };

    run(source.as_ref(), reporter.as_mut()).await?;

    Ok(())
}

/// Picks a file or HTTP source from the CLI input options.
fn build_source(args: &InputArgs) -> Result<Box<dyn DataSource>> {
    if let Some(input) = &args.input {
        return Ok(if is_http_url(input) {
            Box::new(UsgsSource::from_url(BasicClient::new()?, input)?)
        } else {
            Box::new(FileSource::new(input))
        });
    }

    let mut query = match &args.query_file {
        Some(path) => EventQuery::load(path)?,
        None => EventQuery::default(),
    };
    if let Some(start) = args.start {
        query.start = start;
    }
    if let Some(end) = args.end {
        query.end = end;
    }
    if let Some(min_magnitude) = args.min_magnitude {
        query.min_magnitude = min_magnitude;
    }
    debug!(?query, "Event query");

    Ok(Box::new(UsgsSource::with_client(
        BasicClient::new()?,
        &args.endpoint,
        &query,
    )?))
}
