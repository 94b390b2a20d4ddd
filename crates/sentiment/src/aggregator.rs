//! Recency-filtered aggregation of option chains across expirations.
//!
//! One aggregation run walks every listed expiration for a ticker, fetches
//! each chain independently, and unions the rows that traded inside the
//! window. A single bad expiration never aborts the run; a failure to list
//! expirations fails the whole ticker.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use market_mood_core::{ChainSource, ChainSourceError, OptionContractRow, SourceResult};

use crate::recency::filter_recent;

/// Calls/puts rows for one ticker, unioned across all expirations and
/// restricted to the recency window.
///
/// Empty sequences are a valid result (no recent activity), distinct from a
/// fetch failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecentChainSet {
    pub calls: Vec<OptionContractRow>,
    pub puts: Vec<OptionContractRow>,
}

impl RecentChainSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty() && self.puts.is_empty()
    }
}

/// One skipped expiration and the error behind the skip.
#[derive(Debug, Clone)]
pub struct ExpirationFailure {
    pub expiry: NaiveDate,
    pub error: ChainSourceError,
}

/// Statistics for a single aggregation run.
#[derive(Debug, Default, Clone)]
pub struct AggregationStats {
    /// Expirations returned by the source for this ticker.
    pub expirations_listed: usize,
    /// Expirations whose chain fetch and parse succeeded.
    pub expirations_fetched: usize,
    /// Per-expiration failures, kept for diagnostics.
    pub failures: Vec<ExpirationFailure>,
    /// Call rows surviving the recency filter.
    pub calls_kept: usize,
    /// Put rows surviving the recency filter.
    pub puts_kept: usize,
}

impl AggregationStats {
    /// True when at least one expiration was listed and none could be fetched.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        self.expirations_listed > 0 && self.expirations_fetched == 0
    }

    /// Formats a summary report.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Expirations: {}/{} fetched ({} failed), rows kept: {} calls, {} puts",
            self.expirations_fetched,
            self.expirations_listed,
            self.failures.len(),
            self.calls_kept,
            self.puts_kept
        )
    }
}

/// Drives a [`ChainSource`] across all expirations of one ticker.
pub struct ChainAggregator<S> {
    source: S,
    window: Duration,
}

impl<S: ChainSource> ChainAggregator<S> {
    /// Creates an aggregator over `source` with a trailing recency `window`.
    pub fn new(source: S, window: Duration) -> Self {
        Self { source, window }
    }

    /// Aggregates recent rows for `ticker`, cutting off at now minus the window.
    ///
    /// # Errors
    /// Fails only when the expiration list itself cannot be fetched;
    /// individual expiration failures are recorded in the stats and skipped.
    pub async fn aggregate(
        &self,
        ticker: &str,
    ) -> SourceResult<(RecentChainSet, AggregationStats)> {
        let cutoff = Utc::now() - self.window;
        self.aggregate_since(ticker, cutoff).await
    }

    /// Aggregates recent rows for `ticker` against an explicit cutoff.
    ///
    /// # Errors
    /// Same contract as [`Self::aggregate`].
    pub async fn aggregate_since(
        &self,
        ticker: &str,
        cutoff: DateTime<Utc>,
    ) -> SourceResult<(RecentChainSet, AggregationStats)> {
        let expirations = self.source.list_expirations(ticker).await?;

        let mut set = RecentChainSet::default();
        let mut stats = AggregationStats {
            expirations_listed: expirations.len(),
            ..AggregationStats::default()
        };

        for expiry in expirations {
            match self.source.fetch_chain(ticker, expiry).await {
                Ok(snapshot) => {
                    stats.expirations_fetched += 1;
                    set.calls.extend(filter_recent(&snapshot.calls, cutoff));
                    set.puts.extend(filter_recent(&snapshot.puts, cutoff));
                }
                Err(error) => {
                    warn!(ticker, %expiry, %error, "Skipping expiration after fetch failure");
                    stats.failures.push(ExpirationFailure { expiry, error });
                }
            }
        }

        stats.calls_kept = set.calls.len();
        stats.puts_kept = set.puts.len();
        debug!(ticker, "{}", stats.summary());

        Ok((set, stats))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use market_mood_core::{OptionChainSnapshot, OptionRight};
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn expiry(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn cutoff() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 16, 0, 0, 0).unwrap()
    }

    fn row(symbol: &str, right: OptionRight, volume: u64, recent: bool) -> OptionContractRow {
        let offset = if recent {
            Duration::hours(1)
        } else {
            Duration::hours(-1)
        };
        OptionContractRow {
            contract_symbol: symbol.to_string(),
            strike: dec!(100),
            expiry: expiry(20),
            right,
            last_trade: Some(cutoff() + offset),
            volume: Some(volume),
            open_interest: None,
        }
    }

    fn snapshot(day: u32, calls: Vec<OptionContractRow>, puts: Vec<OptionContractRow>) -> OptionChainSnapshot {
        OptionChainSnapshot {
            ticker: "TEST".to_string(),
            expiry: expiry(day),
            calls,
            puts,
        }
    }

    /// Scripted source replaying canned per-expiration results.
    struct ScriptedSource {
        expirations: SourceResult<Vec<NaiveDate>>,
        chains: HashMap<NaiveDate, SourceResult<OptionChainSnapshot>>,
    }

    #[async_trait]
    impl ChainSource for ScriptedSource {
        async fn list_expirations(&self, _ticker: &str) -> SourceResult<Vec<NaiveDate>> {
            self.expirations.clone()
        }

        async fn fetch_chain(
            &self,
            _ticker: &str,
            expiry: NaiveDate,
        ) -> SourceResult<OptionChainSnapshot> {
            self.chains
                .get(&expiry)
                .cloned()
                .unwrap_or_else(|| Err(ChainSourceError::unavailable("unscripted expiry")))
        }
    }

    fn aggregator(source: ScriptedSource) -> ChainAggregator<ScriptedSource> {
        ChainAggregator::new(source, Duration::hours(96))
    }

    #[tokio::test]
    async fn test_unions_rows_across_expirations() {
        let mut chains = HashMap::new();
        chains.insert(
            expiry(20),
            Ok(snapshot(
                20,
                vec![row("C1", OptionRight::Call, 100, true)],
                vec![row("P1", OptionRight::Put, 30, true)],
            )),
        );
        chains.insert(
            expiry(27),
            Ok(snapshot(27, vec![row("C2", OptionRight::Call, 50, true)], vec![])),
        );

        let agg = aggregator(ScriptedSource {
            expirations: Ok(vec![expiry(20), expiry(27)]),
            chains,
        });

        let (set, stats) = agg.aggregate_since("TEST", cutoff()).await.unwrap();
        assert_eq!(set.calls.len(), 2);
        assert_eq!(set.puts.len(), 1);
        assert_eq!(stats.expirations_fetched, 2);
        assert!(stats.failures.is_empty());
    }

    #[tokio::test]
    async fn test_stale_rows_filtered_out() {
        let mut chains = HashMap::new();
        chains.insert(
            expiry(20),
            Ok(snapshot(
                20,
                vec![
                    row("FRESH", OptionRight::Call, 10, true),
                    row("STALE", OptionRight::Call, 99, false),
                ],
                vec![],
            )),
        );

        let agg = aggregator(ScriptedSource {
            expirations: Ok(vec![expiry(20)]),
            chains,
        });

        let (set, stats) = agg.aggregate_since("TEST", cutoff()).await.unwrap();
        assert_eq!(set.calls.len(), 1);
        assert_eq!(set.calls[0].contract_symbol, "FRESH");
        assert_eq!(stats.calls_kept, 1);
    }

    #[tokio::test]
    async fn test_one_bad_expiration_does_not_abort() {
        let mut chains = HashMap::new();
        chains.insert(
            expiry(20),
            Ok(snapshot(20, vec![row("C1", OptionRight::Call, 100, true)], vec![])),
        );
        chains.insert(
            expiry(27),
            Err(ChainSourceError::malformed("calls table missing")),
        );
        chains.insert(
            expiry(31),
            Ok(snapshot(31, vec![], vec![row("P1", OptionRight::Put, 25, true)])),
        );

        let agg = aggregator(ScriptedSource {
            expirations: Ok(vec![expiry(20), expiry(27), expiry(31)]),
            chains,
        });

        let (set, stats) = agg.aggregate_since("TEST", cutoff()).await.unwrap();
        assert_eq!(set.calls.len(), 1);
        assert_eq!(set.puts.len(), 1);
        assert_eq!(stats.expirations_fetched, 2);
        assert_eq!(stats.failures.len(), 1);
        assert_eq!(stats.failures[0].expiry, expiry(27));
        assert!(!stats.all_failed());
    }

    #[tokio::test]
    async fn test_expiration_list_failure_is_whole_ticker() {
        let agg = aggregator(ScriptedSource {
            expirations: Err(ChainSourceError::unknown_ticker("ZZZZ")),
            chains: HashMap::new(),
        });

        let result = agg.aggregate_since("ZZZZ", cutoff()).await;
        assert!(matches!(
            result,
            Err(ChainSourceError::UnknownTicker { .. })
        ));
    }

    #[tokio::test]
    async fn test_zero_expirations_is_empty_not_error() {
        let agg = aggregator(ScriptedSource {
            expirations: Ok(vec![]),
            chains: HashMap::new(),
        });

        let (set, stats) = agg.aggregate_since("TEST", cutoff()).await.unwrap();
        assert!(set.is_empty());
        assert_eq!(stats.expirations_listed, 0);
        assert!(!stats.all_failed());
    }

    #[tokio::test]
    async fn test_all_expirations_failed() {
        let mut chains = HashMap::new();
        chains.insert(expiry(20), Err(ChainSourceError::unavailable("boom")));
        chains.insert(expiry(27), Err(ChainSourceError::unavailable("boom")));

        let agg = aggregator(ScriptedSource {
            expirations: Ok(vec![expiry(20), expiry(27)]),
            chains,
        });

        let (set, stats) = agg.aggregate_since("TEST", cutoff()).await.unwrap();
        assert!(set.is_empty());
        assert!(stats.all_failed());
        assert_eq!(stats.failures.len(), 2);
    }

    #[test]
    fn test_stats_summary() {
        let stats = AggregationStats {
            expirations_listed: 3,
            expirations_fetched: 2,
            failures: vec![ExpirationFailure {
                expiry: expiry(27),
                error: ChainSourceError::unavailable("boom"),
            }],
            calls_kept: 5,
            puts_kept: 4,
        };

        let summary = stats.summary();
        assert!(summary.contains("2/3"));
        assert!(summary.contains("1 failed"));
        assert!(summary.contains("5 calls"));
        assert!(summary.contains("4 puts"));
    }
}
