//! CLI commands for the market-mood sentiment engine.

pub mod batch;
pub mod scan;

pub use batch::{run_batch, BatchArgs};
pub use scan::{run_scan, ScanArgs};

use market_mood_sentiment::{FailureScope, TickerOutcome};

/// Renders a ticker outcome for terminal output.
///
/// This is the presentation boundary: the ratio is rounded to two decimals
/// here and nowhere else, an undefined ratio prints as "N/A", and failures
/// surface their reason as plain text.
#[must_use]
pub fn format_outcome(ticker: &str, outcome: &TickerOutcome) -> String {
    match outcome {
        TickerOutcome::Success(result) => match result.ratio {
            Some(ratio) => {
                let mood = result
                    .mood()
                    .map(|mood| format!(" [{mood}]"))
                    .unwrap_or_default();
                format!(
                    "{ticker}: PCR (Volume) {ratio:.2}{mood} ({} calls / {} puts)",
                    result.total_call_volume, result.total_put_volume
                )
            }
            None => format!("{ticker}: PCR (Volume) N/A (no recent call volume)"),
        },
        TickerOutcome::Failure { error, scope } => {
            let scope = match scope {
                FailureScope::WholeTicker => "ticker",
                FailureScope::ExpirationSubset => "all expirations",
            };
            format!("{ticker}: failed ({scope}): {error}")
        }
    }
}

/// Rule-of-thumb legend printed under PCR listings.
pub const PCR_LEGEND: &str =
    "Rule of thumb: PCR = 0.7 neutral | PCR > 0.7 bearish | PCR < 0.7 bullish";

#[cfg(test)]
mod tests {
    use super::*;
    use market_mood_core::ChainSourceError;
    use market_mood_sentiment::PcrResult;

    #[test]
    fn test_format_success_two_decimals() {
        let outcome = TickerOutcome::Success(PcrResult {
            total_call_volume: 150,
            total_put_volume: 30,
            ratio: Some(0.2),
        });

        let line = format_outcome("AAPL", &outcome);
        assert!(line.contains("0.20"), "{line}");
        assert!(line.contains("bullish"), "{line}");
    }

    #[test]
    fn test_format_undefined_is_na() {
        let outcome = TickerOutcome::Success(PcrResult {
            total_call_volume: 0,
            total_put_volume: 0,
            ratio: None,
        });

        let line = format_outcome("AAPL", &outcome);
        assert!(line.contains("N/A"), "{line}");
        assert!(!line.contains("0.00"), "undefined must not read as zero: {line}");
    }

    #[test]
    fn test_format_failure_is_human_readable() {
        let outcome = TickerOutcome::Failure {
            error: ChainSourceError::unknown_ticker("ZZZZ"),
            scope: FailureScope::WholeTicker,
        };

        let line = format_outcome("ZZZZ", &outcome);
        assert!(line.contains("failed"), "{line}");
        assert!(line.contains("unknown ticker"), "{line}");
    }
}
