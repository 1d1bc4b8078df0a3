//! Market-data provider configuration constants and types.

/// Configuration for the HTTP client talking to the chart API
/// (This is the runtime struct used by the Http Client)
pub struct ChartApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for ChartApiConfig {
    fn default() -> Self {
        Self {
            base_url: MARKET_DATA.yahoo.base_url.to_string(),
            timeout_ms: MARKET_DATA.yahoo.timeout_ms,
            user_agent: MARKET_DATA.yahoo.user_agent.to_string(),
        }
    }
}

/// Yahoo chart endpoint defaults
pub struct YahooDefaults {
    pub base_url: &'static str,
    pub timeout_ms: u64,
    // The endpoint rejects requests without a browser-like agent
    pub user_agent: &'static str,
    /// Only daily bars are requested
    pub interval: &'static str,
}

/// Local CSV files, one per ticker
pub struct CsvDefaults {
    pub extension: &'static str,
    pub date_column: &'static str,
    pub date_format: &'static str,
}

/// The Master Configuration Struct
pub struct MarketDataConfig {
    pub yahoo: YahooDefaults,
    pub csv: CsvDefaults,
}

pub const MARKET_DATA: MarketDataConfig = MarketDataConfig {
    yahoo: YahooDefaults {
        base_url: "https://query1.finance.yahoo.com/v8/finance/chart",
        timeout_ms: 10_000,
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
        interval: "1d",
    },
    csv: CsvDefaults {
        extension: "csv",
        date_column: "Date",
        date_format: "%Y-%m-%d",
    },
};
