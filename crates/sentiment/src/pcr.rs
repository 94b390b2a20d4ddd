//! Put/call volume ratio over a recency-filtered chain set.

use serde::{Deserialize, Serialize};

use market_mood_core::OptionContractRow;

use crate::aggregator::RecentChainSet;

/// Ratio at which put and call activity are conventionally read as balanced.
const NEUTRAL_PCR: f64 = 0.7;

/// Volume totals and the derived put/call ratio for one ticker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PcrResult {
    pub total_call_volume: u64,
    pub total_put_volume: u64,
    /// Put volume over call volume. `None` when no call volume exists,
    /// which also covers the no-recent-activity case.
    pub ratio: Option<f64>,
}

impl PcrResult {
    /// Sentiment read of the ratio, if defined.
    #[must_use]
    pub fn mood(&self) -> Option<MarketMood> {
        self.ratio.map(MarketMood::from_ratio)
    }
}

/// Rule-of-thumb sentiment classification of a volume PCR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketMood {
    Bullish,
    Neutral,
    Bearish,
}

impl MarketMood {
    /// Classifies a defined ratio: above 0.7 bearish, below bullish.
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio > NEUTRAL_PCR {
            Self::Bearish
        } else if ratio < NEUTRAL_PCR {
            Self::Bullish
        } else {
            Self::Neutral
        }
    }
}

impl std::fmt::Display for MarketMood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "bullish"),
            Self::Neutral => write!(f, "neutral"),
            Self::Bearish => write!(f, "bearish"),
        }
    }
}

/// Reduces a chain set to volume totals and the put/call ratio.
///
/// Absent per-row volume counts as zero. The ratio is defined exactly when
/// the call total is positive; an empty set yields zero totals and an
/// undefined ratio, never a division error.
#[must_use]
pub fn compute_ratio(chain_set: &RecentChainSet) -> PcrResult {
    let total_call_volume = total_volume(&chain_set.calls);
    let total_put_volume = total_volume(&chain_set.puts);

    let ratio = (total_call_volume > 0)
        .then(|| total_put_volume as f64 / total_call_volume as f64);

    PcrResult {
        total_call_volume,
        total_put_volume,
        ratio,
    }
}

fn total_volume(rows: &[OptionContractRow]) -> u64 {
    rows.iter().map(|row| row.volume.unwrap_or(0)).sum()
}
