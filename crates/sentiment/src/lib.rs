//! Recency-filtered option-chain aggregation and put/call ratio sentiment.
//!
//! The pipeline per ticker: list expirations, fetch each chain, keep rows
//! traded inside the trailing window, union them, and reduce to a volume
//! put/call ratio. `BatchRunner` sequences that pipeline over a watchlist
//! with per-ticker failure isolation and a rate-limit pause between tickers.

pub mod aggregator;
pub mod batch;
pub mod pcr;
pub mod recency;

pub use aggregator::{AggregationStats, ChainAggregator, ExpirationFailure, RecentChainSet};
pub use batch::{BatchRunner, FailureScope, TickerOutcome};
pub use pcr::{compute_ratio, MarketMood, PcrResult};
pub use recency::filter_recent;
