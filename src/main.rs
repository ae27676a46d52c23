use chrono::NaiveDate;
use clap::Parser;
use clay_adjustment_board::clay::{self, ClayAdjustmentBoard};
use clay_adjustment_board::{run_scrapper, HttpFetcher, JsonLinesPipeline};
use std::path::PathBuf;
use tokio::io::{AsyncWrite, BufWriter};
use tokio::time::Duration;
use tracing::info;
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;

/// Scrape Clayton Board of Adjustment meetings as JSON lines.
#[derive(Debug, Parser)]
#[command(name = "clay-adjustment-board", version)]
struct Args {
    /// Write meetings to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Minimum delay between two requests, in milliseconds
    #[arg(long, default_value_t = 200)]
    delay_ms: u64,

    /// HTTP request timeout, in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Crawl as if today were this date (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| {
                "debug,html5ever=error,selectors=error,hyper=warn,reqwest=info".into()
            }),
        )
        .with(ErrorLayer::default())
        .init();

    let args = Args::parse();

    let crawler = match args.today {
        Some(today) => ClayAdjustmentBoard::starting_at(
            today.and_hms_opt(0, 0, 0).ok_or("Invalid --today date")?,
        ),
        None => ClayAdjustmentBoard::new(),
    };

    let writer: Box<dyn AsyncWrite + Unpin + Send> = match &args.output {
        Some(path) => Box::new(BufWriter::new(tokio::fs::File::create(path).await?)),
        None => Box::new(tokio::io::stdout()),
    };

    info!(
        "Scraping {} as {} ({})",
        clay::AGENCY,
        clay::NAME,
        clay::TIMEZONE
    );

    let fetcher = HttpFetcher::new(Duration::from_secs(args.timeout_secs))?;
    let stats = run_scrapper(
        crawler,
        fetcher,
        JsonLinesPipeline::new(writer),
        Duration::from_millis(args.delay_ms),
    )
    .await?;

    if stats.failed > 0 {
        info!("{} pages failed, see warnings above", stats.failed);
    }

    Ok(())
}
