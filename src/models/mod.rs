// Data models: raw provider bars, the forecasting model and its outputs
pub mod arima;
pub mod forecast;
pub mod ohlcv;

// Re-export key types for convenience
pub use arima::{Arima, ArimaCoefficients, ArimaOrder};
pub use forecast::{ForecastReport, ForecastRow, ForecastTable};
pub use ohlcv::OhlcvTimeSeries;
