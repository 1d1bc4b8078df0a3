pub mod capm;
pub mod forecast;
pub mod indicators;
pub mod risk;
pub mod stationarity;
pub mod stock;

pub use capm::{BetaReport, CapmSummary, beta_report, capm_regression, capm_summary};
pub use forecast::{evaluate_model, run_forecast};
pub use stationarity::{AdfResult, adf_test, differencing_order};
pub use stock::{ChartPeriod, ReturnsPeriod, StockAnalysis, analyze_stock};
