//! Forecast pipeline configuration

/// Settings for the stationarity-driven differencing search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationaritySettings {
    // ADF p-value above which the series counts as non-stationary
    pub p_value_threshold: f64,
    // p-values are rounded to this many decimals before comparison
    pub p_value_decimals: i32,
    // Hard ceiling on d. Hitting it without passing the test is an error
    pub max_differencing_order: usize,
}

/// ARIMA(p, d, q) orders. `d` comes from the differencing search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelOrders {
    pub ar_order: usize,
    pub ma_order: usize,
}

/// The Master Forecast Configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastConfig {
    /// Trailing window of the smoothing moving average
    pub rolling_window: usize,
    /// Number of forward daily rows produced (also the held-out test size)
    pub horizon: usize,
    /// RMSE is reported rounded to this many decimals
    pub rmse_decimals: i32,
    /// Implicit history start date (year, month, day) for forecast requests
    pub history_start: (i32, u32, u32),

    // Sub-groups
    pub stationarity: StationaritySettings,
    pub orders: ModelOrders,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        FORECAST
    }
}

pub const FORECAST: ForecastConfig = ForecastConfig {
    rolling_window: 7,
    horizon: 30,
    rmse_decimals: 2,
    history_start: (2024, 1, 1),

    stationarity: StationaritySettings {
        p_value_threshold: 0.05,
        p_value_decimals: 3,
        max_differencing_order: 5,
    },

    // Low order keeps the fit fast and stable on ~1y of daily data
    orders: ModelOrders {
        ar_order: 1,
        ma_order: 1,
    },
};
