use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub base_url: String,
    /// Client-side request pacing, independent of the inter-ticker delay.
    pub requests_per_second: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Trailing recency window in hours.
    pub window_hours: u64,
    /// Minimum pause between consecutive ticker scans, in seconds.
    pub inter_delay_secs: u64,
    /// Tickers scanned by the batch command when none are given explicitly.
    pub watchlist: Vec<String>,
}

impl BatchConfig {
    #[must_use]
    pub fn window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.window_hours as i64)
    }

    #[must_use]
    pub fn inter_delay(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.inter_delay_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            batch: BatchConfig::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://query1.finance.yahoo.com".to_string(),
            requests_per_second: 2,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            window_hours: 96,
            inter_delay_secs: 5,
            watchlist: vec![
                "AMZN".to_string(),
                "AAPL".to_string(),
                "NVDA".to_string(),
                "TSLA".to_string(),
            ],
        }
    }
}
