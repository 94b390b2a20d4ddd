//! Sequential multi-ticker batch orchestration.
//!
//! One ticker's failure never halts the batch, and a mandatory pause
//! separates consecutive ticker scans to stay under the upstream rate limit.
//! Per ticker the run moves Pending -> Fetching -> (Aggregated -> Computed ->
//! Success) or (FetchFailed -> Failure); there are no retries here, retry
//! policy belongs to the caller.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

use market_mood_core::{ChainSource, ChainSourceError};

use crate::aggregator::ChainAggregator;
use crate::pcr::{compute_ratio, PcrResult};

/// How much of a ticker's scan a failure invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureScope {
    /// The expiration list itself could not be fetched.
    WholeTicker,
    /// Expirations were listed but every single chain fetch failed.
    ExpirationSubset,
}

/// Outcome of scanning one ticker, independent of every other ticker.
#[derive(Debug, Clone, PartialEq)]
pub enum TickerOutcome {
    Success(PcrResult),
    Failure {
        error: ChainSourceError,
        scope: FailureScope,
    },
}

impl TickerOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Runs aggregation plus ratio computation over a ticker list, one at a time.
pub struct BatchRunner<S> {
    aggregator: ChainAggregator<S>,
    inter_delay: Duration,
    abort: Arc<AtomicBool>,
}

impl<S: ChainSource> BatchRunner<S> {
    /// Creates a runner with a recency `window` and an `inter_delay` enforced
    /// between consecutive ticker scans.
    pub fn new(source: S, window: chrono::Duration, inter_delay: Duration) -> Self {
        Self {
            aggregator: ChainAggregator::new(source, window),
            inter_delay,
            abort: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that aborts the batch between tickers when set.
    ///
    /// An in-flight scan finishes on its own; the flag is observed at the
    /// top of each iteration.
    #[must_use]
    pub fn abort_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.abort)
    }

    /// Scans a single ticker: aggregate, then reduce to a ratio.
    pub async fn scan(&self, ticker: &str) -> TickerOutcome {
        match self.aggregator.aggregate(ticker).await {
            Ok((set, stats)) => {
                if stats.all_failed() {
                    let cause = stats
                        .failures
                        .last()
                        .map(|failure| failure.error.clone())
                        .unwrap_or_else(|| {
                            ChainSourceError::unavailable("every expiration failed")
                        });
                    error!(ticker, %cause, "All expirations failed");
                    return TickerOutcome::Failure {
                        error: cause,
                        scope: FailureScope::ExpirationSubset,
                    };
                }

                let result = compute_ratio(&set);
                info!(
                    ticker,
                    calls = result.total_call_volume,
                    puts = result.total_put_volume,
                    "Computed put/call ratio"
                );
                TickerOutcome::Success(result)
            }
            Err(error) => {
                error!(ticker, %error, "Ticker scan failed");
                TickerOutcome::Failure {
                    error,
                    scope: FailureScope::WholeTicker,
                }
            }
        }
    }

    /// Scans `tickers` sequentially in input order.
    ///
    /// The inter-ticker delay runs between scans, never before the first one
    /// or after the last. On abort, outcomes gathered so far are returned.
    pub async fn run_batch(&self, tickers: &[String]) -> HashMap<String, TickerOutcome> {
        let mut outcomes = HashMap::with_capacity(tickers.len());

        for (index, ticker) in tickers.iter().enumerate() {
            if self.abort.load(Ordering::SeqCst) {
                warn!(
                    scanned = outcomes.len(),
                    remaining = tickers.len() - outcomes.len(),
                    "Batch aborted between tickers"
                );
                break;
            }

            if index > 0 {
                tokio::time::sleep(self.inter_delay).await;
            }

            info!(ticker, "Scanning ticker");
            let outcome = self.scan(ticker).await;
            outcomes.insert(ticker.clone(), outcome);
        }

        let succeeded = outcomes.values().filter(|o| o.is_success()).count();
        info!(
            succeeded,
            failed = outcomes.len() - succeeded,
            "Batch complete"
        );

        outcomes
    }
}
