//! Error types for the option-chain data source boundary.
//!
//! "No recent activity" is deliberately not an error: an empty result set is
//! a valid state and travels through the data model, not this taxonomy.

use thiserror::Error;

/// Errors that can occur when talking to an option-chain data source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainSourceError {
    /// The ticker is not known to the data source.
    #[error("unknown ticker: {ticker}")]
    UnknownTicker {
        /// The symbol that was not found.
        ticker: String,
    },

    /// Network or service failure.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// The source rejected the request due to rate limiting.
    #[error("rate limited by source")]
    RateLimited {
        /// Seconds to wait before retry, when the source says so.
        retry_after_secs: Option<u64>,
    },

    /// The response arrived but did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl ChainSourceError {
    /// Creates an unknown-ticker error.
    pub fn unknown_ticker(ticker: impl Into<String>) -> Self {
        Self::UnknownTicker {
            ticker: ticker.into(),
        }
    }

    /// Creates a source-unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::SourceUnavailable(message.into())
    }

    /// Creates a rate-limited error without a retry hint.
    #[must_use]
    pub fn rate_limited() -> Self {
        Self::RateLimited {
            retry_after_secs: None,
        }
    }

    /// Creates a malformed-response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Returns true if a later retry of the same request could succeed.
    ///
    /// Unknown tickers and malformed payloads are permanent for a given
    /// request; transport failures and rate limits are not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::SourceUnavailable(_) | Self::RateLimited { .. })
    }
}

/// Result type alias for chain-source operations.
pub type SourceResult<T> = std::result::Result<T, ChainSourceError>;

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Error Construction Tests ====================

    #[test]
    fn test_unknown_ticker_construction() {
        let err = ChainSourceError::unknown_ticker("ZZZZ");
        assert!(matches!(err, ChainSourceError::UnknownTicker { .. }));
        assert!(err.to_string().contains("ZZZZ"));
    }

    #[test]
    fn test_rate_limited_construction() {
        let err = ChainSourceError::rate_limited();
        assert_eq!(
            err,
            ChainSourceError::RateLimited {
                retry_after_secs: None
            }
        );
    }

    #[test]
    fn test_malformed_construction() {
        let err = ChainSourceError::malformed("missing calls table");
        assert!(err.to_string().contains("missing calls table"));
    }

    // ==================== Transience Tests ====================

    #[test]
    fn test_unavailable_is_transient() {
        let err = ChainSourceError::unavailable("connection refused");
        assert!(err.is_transient());
    }

    #[test]
    fn test_rate_limited_is_transient() {
        let err = ChainSourceError::RateLimited {
            retry_after_secs: Some(30),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn test_unknown_ticker_is_not_transient() {
        let err = ChainSourceError::unknown_ticker("ZZZZ");
        assert!(!err.is_transient());
    }

    #[test]
    fn test_malformed_is_not_transient() {
        let err = ChainSourceError::malformed("no options field");
        assert!(!err.is_transient());
    }

    // ==================== Error Display Tests ====================

    #[test]
    fn test_error_display_unavailable() {
        let err = ChainSourceError::unavailable("dns failure");
        let display = err.to_string();
        assert!(display.contains("source unavailable"));
        assert!(display.contains("dns failure"));
    }

    #[test]
    fn test_error_display_rate_limited() {
        let err = ChainSourceError::rate_limited();
        assert!(err.to_string().contains("rate limited"));
    }
}
