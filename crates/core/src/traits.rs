use crate::error::SourceResult;
use crate::types::OptionChainSnapshot;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Boundary to the upstream option-chain data source.
///
/// Implementations are treated as unreliable and rate limited; callers must
/// not issue concurrent requests through a single source.
#[async_trait]
pub trait ChainSource: Send + Sync {
    /// Lists the expiration dates currently available for a ticker.
    async fn list_expirations(&self, ticker: &str) -> SourceResult<Vec<NaiveDate>>;

    /// Fetches the raw calls/puts tables for one ticker and expiration.
    async fn fetch_chain(&self, ticker: &str, expiry: NaiveDate)
        -> SourceResult<OptionChainSnapshot>;
}
