//! Core types for option-chain sentiment analysis.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Option contract right (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionRight {
    Call,
    Put,
}

impl std::fmt::Display for OptionRight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "C"),
            Self::Put => write!(f, "P"),
        }
    }
}

/// One traded option contract observation, immutable once fetched.
///
/// `volume` and `open_interest` may be absent in the upstream feed; a row
/// without a usable `last_trade` timestamp is kept here and excluded later
/// by the recency filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContractRow {
    /// Unique contract symbol (e.g., "AAPL260320C00140000").
    pub contract_symbol: String,
    pub strike: Decimal,
    pub expiry: NaiveDate,
    pub right: OptionRight,
    /// Instant of the most recent trade in this contract, if known.
    pub last_trade: Option<DateTime<Utc>>,
    /// Contracts traded in the current session.
    pub volume: Option<u64>,
    /// Outstanding contracts not yet closed or exercised.
    pub open_interest: Option<u64>,
}

impl OptionContractRow {
    /// Human-readable contract description (e.g., "AAPL 140C 2026-03-20").
    pub fn display_name(&self) -> String {
        format!("{} {}{} {}", self.contract_symbol, self.strike, self.right, self.expiry)
    }
}

/// Raw calls/puts tables for one ticker and one expiration date.
///
/// Produced by a [`crate::ChainSource`], consumed once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionChainSnapshot {
    pub ticker: String,
    pub expiry: NaiveDate,
    pub calls: Vec<OptionContractRow>,
    pub puts: Vec<OptionContractRow>,
}

impl OptionChainSnapshot {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty() && self.puts.is_empty()
    }
}
