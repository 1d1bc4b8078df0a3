//! Descriptive statistics and indicator configuration

/// Settings for the multi-stock CAPM expected-return report
pub struct CapmSettings {
    // Benchmark the stocks are regressed against
    pub market_ticker: &'static str,
    pub default_tickers: &'static [&'static str],
    pub default_years: u32,
    pub max_years: u32,
    // Annual risk-free rate, in percent
    pub default_risk_free_pct: f64,
}

/// Settings for the single-stock beta report
pub struct BetaSettings {
    pub default_stock: &'static str,
    pub default_market: &'static str,
    pub default_rolling_window: usize,
    pub min_rolling_window: usize,
    pub max_rolling_window: usize,
    pub default_risk_free_pct: f64,
    // Example peer group for the sector comparison
    pub sector_tickers: &'static [&'static str],
}

/// Settings for the stock analysis report (indicators and volatility)
pub struct StockSettings {
    pub default_ticker: &'static str,
    pub default_volatility_window: usize,
    pub min_volatility_window: usize,
    pub max_volatility_window: usize,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub moving_average_window: usize,
}

/// The Master Analysis Configuration
pub struct AnalysisConfig {
    /// Used to annualise daily means and volatilities
    pub trading_days_per_year: usize,

    // Sub-groups
    pub capm: CapmSettings,
    pub beta: BetaSettings,
    pub stock: StockSettings,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    trading_days_per_year: 252,

    capm: CapmSettings {
        market_ticker: "^GSPC",
        default_tickers: &["TSLA", "AAPL", "AMZN", "GOOGL"],
        default_years: 1,
        max_years: 10,
        default_risk_free_pct: 5.0,
    },

    beta: BetaSettings {
        default_stock: "TSLA",
        default_market: "^GSPC",
        default_rolling_window: 180,
        min_rolling_window: 30,
        max_rolling_window: 365,
        default_risk_free_pct: 2.0,
        sector_tickers: &["AAPL", "MSFT", "GOOGL", "AMZN", "META"],
    },

    stock: StockSettings {
        default_ticker: "TSLA",
        default_volatility_window: 30,
        min_volatility_window: 10,
        max_volatility_window: 180,
        rsi_period: 14,
        macd_fast: 12,
        macd_slow: 26,
        macd_signal: 9,
        moving_average_window: 50,
    },
};
