//! Single-ticker PCR scan command.

use anyhow::Result;
use clap::Args;

use market_mood_core::ConfigLoader;
use market_mood_sentiment::BatchRunner;
use market_mood_yahoo::YahooChainSource;

use super::{format_outcome, PCR_LEGEND};

/// Arguments for the scan command.
#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Ticker symbol to scan (e.g., "AAPL")
    pub ticker: String,

    /// Recency window in hours (overrides configuration)
    #[arg(long)]
    pub window_hours: Option<u64>,

    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml")]
    pub config: String,

    /// Emit the outcome as JSON instead of text
    #[arg(long, default_value = "false")]
    pub json: bool,
}

/// Runs the scan command.
///
/// # Errors
/// Returns an error if configuration cannot be loaded. Source failures are
/// reported as the ticker's outcome, not as process errors.
pub async fn run_scan(args: ScanArgs) -> Result<()> {
    let mut config = ConfigLoader::load_from(&args.config)?;
    if let Some(hours) = args.window_hours {
        config.batch.window_hours = hours;
    }

    let ticker = args.ticker.trim().to_uppercase();
    tracing::info!(
        ticker,
        window_hours = config.batch.window_hours,
        "Scanning option chain"
    );

    let source = YahooChainSource::new(&config.source);
    let runner = BatchRunner::new(source, config.batch.window(), config.batch.inter_delay());

    let outcome = runner.scan(&ticker).await;

    if args.json {
        println!("{}", outcome_json(&ticker, &outcome)?);
    } else {
        println!("{}", format_outcome(&ticker, &outcome));
        println!("{PCR_LEGEND}");
    }

    Ok(())
}

fn outcome_json(
    ticker: &str,
    outcome: &market_mood_sentiment::TickerOutcome,
) -> Result<String> {
    use market_mood_sentiment::TickerOutcome;

    let value = match outcome {
        TickerOutcome::Success(result) => serde_json::json!({
            "ticker": ticker,
            "status": "ok",
            "total_call_volume": result.total_call_volume,
            "total_put_volume": result.total_put_volume,
            "ratio": result.ratio,
            "mood": result.mood().map(|mood| mood.to_string()),
        }),
        TickerOutcome::Failure { error, .. } => serde_json::json!({
            "ticker": ticker,
            "status": "failed",
            "reason": error.to_string(),
        }),
    };

    Ok(serde_json::to_string_pretty(&value)?)
}
