//! Recency filtering of option-contract rows.

use chrono::{DateTime, Utc};
use market_mood_core::OptionContractRow;

/// Returns the rows whose last trade happened strictly after `cutoff`.
///
/// Rows without a usable trade timestamp are treated as not recent and
/// dropped, never errored. Input order is preserved.
pub fn filter_recent(
    rows: &[OptionContractRow],
    cutoff: DateTime<Utc>,
) -> Vec<OptionContractRow> {
    rows.iter()
        .filter(|row| matches!(row.last_trade, Some(traded) if traded > cutoff))
        .cloned()
        .collect()
}
