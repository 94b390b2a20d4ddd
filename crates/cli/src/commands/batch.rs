//! Watchlist batch scan command.

use anyhow::{anyhow, Result};
use clap::Args;

use market_mood_core::ConfigLoader;
use market_mood_sentiment::BatchRunner;
use market_mood_yahoo::YahooChainSource;

use super::{format_outcome, PCR_LEGEND};

/// Arguments for the batch command.
#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Tickers to scan, comma separated (defaults to the configured watchlist)
    #[arg(long, value_delimiter = ',')]
    pub tickers: Vec<String>,

    /// Recency window in hours (overrides configuration)
    #[arg(long)]
    pub window_hours: Option<u64>,

    /// Pause between tickers in seconds (overrides configuration)
    #[arg(long)]
    pub inter_delay_secs: Option<u64>,

    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: String,
}

/// Runs the batch command.
///
/// # Errors
/// Returns an error if configuration cannot be loaded or the resolved ticker
/// list is empty. Per-ticker failures are rendered, never propagated.
pub async fn run_batch(args: BatchArgs) -> Result<()> {
    let mut config = ConfigLoader::load_from(&args.config)?;
    if let Some(hours) = args.window_hours {
        config.batch.window_hours = hours;
    }
    if let Some(secs) = args.inter_delay_secs {
        config.batch.inter_delay_secs = secs;
    }

    let tickers = resolve_tickers(&args.tickers, &config.batch.watchlist)?;

    tracing::info!(
        count = tickers.len(),
        window_hours = config.batch.window_hours,
        inter_delay_secs = config.batch.inter_delay_secs,
        "Starting batch scan"
    );

    let source = YahooChainSource::new(&config.source);
    let runner = BatchRunner::new(source, config.batch.window(), config.batch.inter_delay());

    // Abort between tickers on Ctrl+C; an in-flight fetch finishes first
    let abort = runner.abort_flag();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Ctrl+C received, finishing current ticker then stopping");
            abort.store(true, std::sync::atomic::Ordering::SeqCst);
        }
    });

    let outcomes = runner.run_batch(&tickers).await;

    println!("{}", "=".repeat(72));
    println!("Put/Call Ratios (options traded in the last {} hours)", config.batch.window_hours);
    println!("{}", "=".repeat(72));
    for ticker in &tickers {
        match outcomes.get(ticker) {
            Some(outcome) => println!("{}", format_outcome(ticker, outcome)),
            None => println!("{ticker}: skipped (batch aborted)"),
        }
    }
    println!("{}", "-".repeat(72));
    println!("{PCR_LEGEND}");

    Ok(())
}

/// Explicit tickers win over the configured watchlist; both are normalized
/// to uppercase and deduplicated preserving first occurrence.
fn resolve_tickers(explicit: &[String], watchlist: &[String]) -> Result<Vec<String>> {
    let requested = if explicit.is_empty() {
        watchlist
    } else {
        explicit
    };

    let mut seen = std::collections::HashSet::new();
    let tickers: Vec<String> = requested
        .iter()
        .map(|ticker| ticker.trim().to_uppercase())
        .filter(|ticker| !ticker.is_empty())
        .filter(|ticker| seen.insert(ticker.clone()))
        .collect();

    if tickers.is_empty() {
        return Err(anyhow!(
            "No tickers to scan. Pass --tickers or configure a watchlist."
        ));
    }

    Ok(tickers)
}
