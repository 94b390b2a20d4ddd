//! Option-chain queries against Yahoo's public options endpoint.
//!
//! Yahoo serves `GET /v7/finance/options/{ticker}` with an envelope of the form:
//!
//! ```text
//! {
//!   "optionChain": {
//!     "result": [{
//!       "expirationDates": [1709251200, ...],   // epoch seconds, UTC midnight
//!       "options": [{
//!         "expirationDate": 1709251200,
//!         "calls": [{ "contractSymbol": "...", "strike": 140.0,
//!                     "lastTradeDate": 1709222400, "volume": 12,
//!                     "openInterest": 340, ... }],
//!         "puts":  [...]
//!       }]
//!     }],
//!     "error": null
//!   }
//! }
//! ```
//!
//! Without a `date` query parameter the envelope carries the expiration list;
//! with `?date={epoch}` it carries that expiration's calls/puts tables.
//! `volume`, `openInterest` and `lastTradeDate` are absent for contracts that
//! never traded.

use std::num::NonZeroU32;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use governor::{clock::DefaultClock, state::InMemoryState, Quota, RateLimiter};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use market_mood_core::{
    ChainSource, ChainSourceError, OptionChainSnapshot, OptionContractRow, OptionRight,
    SourceConfig, SourceResult,
};

/// Request timeout for a single chain fetch.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Chain source backed by Yahoo's options endpoint.
///
/// Requests are paced through a local token bucket so that a burst of
/// expirations for one ticker cannot exceed the configured request rate.
pub struct YahooChainSource {
    client: reqwest::Client,
    base_url: String,
    rate_limiter:
        Arc<RateLimiter<governor::state::direct::NotKeyed, InMemoryState, DefaultClock>>,
}

impl YahooChainSource {
    /// Creates a source from configuration.
    #[must_use]
    pub fn new(config: &SourceConfig) -> Self {
        Self::with_config(&config.base_url, config.requests_per_second)
    }

    /// Creates a source with an explicit base URL and request rate.
    #[must_use]
    pub fn with_config(base_url: &str, requests_per_second: u32) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        let quota = Quota::per_second(
            NonZeroU32::new(requests_per_second).expect("Request rate must be > 0"),
        );
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            rate_limiter,
        }
    }

    /// Fetches one options envelope, optionally pinned to an expiration date.
    async fn get_envelope(&self, ticker: &str, date: Option<i64>) -> SourceResult<RawResult> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/v7/finance/options/{}", self.base_url, ticker);
        let mut request = self.client.get(&url);
        if let Some(epoch) = date {
            request = request.query(&[("date", epoch.to_string())]);
        }

        let response = request.send().await.map_err(|e| transport_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = parse_retry_after(response.headers());
            return Err(status_to_error(status.as_u16(), ticker, retry_after));
        }

        let envelope: RawEnvelope = response
            .json()
            .await
            .map_err(|e| ChainSourceError::malformed(format!("invalid options JSON: {e}")))?;

        envelope
            .option_chain
            .result
            .into_iter()
            .next()
            .ok_or_else(|| ChainSourceError::unknown_ticker(ticker))
    }
}

#[async_trait]
impl ChainSource for YahooChainSource {
    async fn list_expirations(&self, ticker: &str) -> SourceResult<Vec<NaiveDate>> {
        debug!(ticker, "Listing option expirations");

        let result = self.get_envelope(ticker, None).await?;
        Ok(result
            .expiration_dates
            .iter()
            .filter_map(|&epoch| epoch_to_date(epoch))
            .collect())
    }

    async fn fetch_chain(
        &self,
        ticker: &str,
        expiry: NaiveDate,
    ) -> SourceResult<OptionChainSnapshot> {
        debug!(ticker, %expiry, "Fetching option chain");

        let result = self.get_envelope(ticker, Some(date_to_epoch(expiry))).await?;
        let tables = result.options.into_iter().next().ok_or_else(|| {
            ChainSourceError::malformed(format!("no options tables for expiry {expiry}"))
        })?;

        let calls = tables
            .calls
            .ok_or_else(|| ChainSourceError::malformed("calls table missing"))?;
        let puts = tables
            .puts
            .ok_or_else(|| ChainSourceError::malformed("puts table missing"))?;

        Ok(OptionChainSnapshot {
            ticker: ticker.to_uppercase(),
            expiry,
            calls: parse_rows(&calls, expiry, OptionRight::Call),
            puts: parse_rows(&puts, expiry, OptionRight::Put),
        })
    }
}

// =============================================================================
// Raw response shapes
// =============================================================================

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    #[serde(rename = "optionChain")]
    option_chain: RawOptionChain,
}

#[derive(Debug, Deserialize)]
struct RawOptionChain {
    #[serde(default)]
    result: Vec<RawResult>,
}

#[derive(Debug, Deserialize)]
struct RawResult {
    #[serde(rename = "expirationDates", default)]
    expiration_dates: Vec<i64>,
    #[serde(default)]
    options: Vec<RawTables>,
}

#[derive(Debug, Deserialize)]
struct RawTables {
    calls: Option<Vec<RawContract>>,
    puts: Option<Vec<RawContract>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContract {
    contract_symbol: Option<String>,
    strike: Option<f64>,
    last_trade_date: Option<i64>,
    volume: Option<u64>,
    open_interest: Option<u64>,
}

// =============================================================================
// Parsing
// =============================================================================

fn parse_rows(raw: &[RawContract], expiry: NaiveDate, right: OptionRight) -> Vec<OptionContractRow> {
    raw.iter()
        .filter_map(|contract| parse_contract(contract, expiry, right))
        .collect()
}

/// Parses a single raw contract into a typed row.
///
/// A row without a contract symbol or a usable strike has no identity and is
/// dropped; missing trade data stays `None` and is handled downstream.
fn parse_contract(
    raw: &RawContract,
    expiry: NaiveDate,
    right: OptionRight,
) -> Option<OptionContractRow> {
    let contract_symbol = raw.contract_symbol.clone()?;
    // String round-trip preserves the quoted decimal digits
    let strike = Decimal::from_str(&raw.strike?.to_string()).ok()?;

    Some(OptionContractRow {
        contract_symbol,
        strike,
        expiry,
        right,
        last_trade: raw.last_trade_date.and_then(epoch_to_instant),
        volume: raw.volume,
        open_interest: raw.open_interest,
    })
}

fn epoch_to_instant(epoch: i64) -> Option<chrono::DateTime<Utc>> {
    Utc.timestamp_opt(epoch, 0).single()
}

fn epoch_to_date(epoch: i64) -> Option<NaiveDate> {
    epoch_to_instant(epoch).map(|instant| instant.date_naive())
}

/// Epoch seconds at UTC midnight of an expiration date, as Yahoo keys them.
fn date_to_epoch(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc().timestamp())
        .unwrap_or_default()
}

// =============================================================================
// Error mapping
// =============================================================================

fn transport_error(err: &reqwest::Error) -> ChainSourceError {
    if err.is_timeout() {
        ChainSourceError::unavailable(format!("request timeout: {err}"))
    } else if err.is_connect() {
        ChainSourceError::unavailable(format!("connection failed: {err}"))
    } else {
        ChainSourceError::unavailable(err.to_string())
    }
}

fn status_to_error(status: u16, ticker: &str, retry_after: Option<u64>) -> ChainSourceError {
    match status {
        404 => ChainSourceError::unknown_ticker(ticker),
        429 => ChainSourceError::RateLimited {
            retry_after_secs: retry_after,
        },
        _ => ChainSourceError::unavailable(format!("HTTP {status}")),
    }
}

fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
}
