#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod analysis;
pub mod commands;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod models;
pub mod output;
pub mod transform;
pub mod utils;

// Re-export commonly used types
pub use analysis::{analyze_stock, beta_report, capm_regression, capm_summary, run_forecast};
pub use data::{SeriesRequest, fetch_price_data};
pub use domain::{Candle, PricePoint, PriceSeries, Ticker};
pub use error::{AnalysisError, AnalysisResult};
pub use models::{Arima, ForecastReport, ForecastTable, OhlcvTimeSeries};

// CLI argument parsing
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use analysis::ChartPeriod;
use config::ANALYSIS;
use utils::time_utils::parse_date;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use the API as primary source instead of the local CSV directory
    #[arg(long, global = true, default_value_t = false)]
    pub prefer_api: bool,

    /// Directory of `<TICKER>.csv` files to read before (or after) the API
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Print the report as JSON instead of text tables
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// 30-day closing price forecast with held-out RMSE
    Forecast {
        #[arg(default_value = ANALYSIS.stock.default_ticker)]
        ticker: Ticker,
    },

    /// CAPM expected returns, volatility and Sharpe ratio against the market
    Capm {
        #[arg(long, value_delimiter = ',', default_values = ANALYSIS.capm.default_tickers.iter().copied())]
        tickers: Vec<Ticker>,

        /// Years of history, counted back from today
        #[arg(long, default_value_t = ANALYSIS.capm.default_years, value_parser = parse_years)]
        years: u32,

        /// Annual risk-free rate, percent
        #[arg(long, default_value_t = ANALYSIS.capm.default_risk_free_pct, value_parser = parse_risk_free)]
        risk_free: f64,

        #[arg(long, default_value = ANALYSIS.capm.market_ticker)]
        market: Ticker,
    },

    /// Regression beta, rolling beta and sector comparison for one stock
    Beta {
        #[arg(default_value = ANALYSIS.beta.default_stock)]
        ticker: Ticker,

        #[arg(long, default_value = ANALYSIS.beta.default_market)]
        market: Ticker,

        /// First day (YYYY-MM-DD); one year before `--end` if omitted
        #[arg(long, value_parser = parse_date)]
        start: Option<NaiveDate>,

        /// Last day (YYYY-MM-DD); today if omitted
        #[arg(long, value_parser = parse_date)]
        end: Option<NaiveDate>,

        #[arg(long, default_value_t = ANALYSIS.beta.default_rolling_window, value_parser = parse_rolling_window)]
        rolling_window: usize,

        /// Annual risk-free rate, percent
        #[arg(long, default_value_t = ANALYSIS.beta.default_risk_free_pct, value_parser = parse_risk_free)]
        risk_free: f64,

        #[arg(long, value_delimiter = ',', default_values = ANALYSIS.beta.sector_tickers.iter().copied())]
        sector: Vec<Ticker>,
    },

    /// Daily change, period returns, indicators and volatility for one stock
    Analyze {
        #[arg(default_value = ANALYSIS.stock.default_ticker)]
        ticker: Ticker,

        #[arg(long, value_parser = parse_date)]
        start: Option<NaiveDate>,

        #[arg(long, value_parser = parse_date)]
        end: Option<NaiveDate>,

        /// Rolling volatility window, in trading days
        #[arg(long, default_value_t = ANALYSIS.stock.default_volatility_window, value_parser = parse_volatility_window)]
        window: usize,

        /// Chart window: 5d, 1mo, 6mo, ytd, 1y, 5y or max
        #[arg(long, default_value_t = ChartPeriod::default())]
        period: ChartPeriod,
    },
}

// Annual risk-free rate accepted on the command line, percent
const RISK_FREE_RANGE_PCT: (f64, f64) = (0.0, 10.0);

fn parse_bounded<T>(text: &str, lo: T, hi: T) -> Result<T, String>
where
    T: std::str::FromStr + PartialOrd + std::fmt::Display + Copy,
{
    let value: T = text.parse().map_err(|_| format!("`{}` is not a number", text))?;
    if !(lo..=hi).contains(&value) {
        return Err(format!("must be between {} and {}", lo, hi));
    }
    Ok(value)
}

fn parse_years(text: &str) -> Result<u32, String> {
    parse_bounded(text, 1, ANALYSIS.capm.max_years)
}

fn parse_risk_free(text: &str) -> Result<f64, String> {
    parse_bounded(text, RISK_FREE_RANGE_PCT.0, RISK_FREE_RANGE_PCT.1)
}

fn parse_rolling_window(text: &str) -> Result<usize, String> {
    parse_bounded(
        text,
        ANALYSIS.beta.min_rolling_window,
        ANALYSIS.beta.max_rolling_window,
    )
}

fn parse_volatility_window(text: &str) -> Result<usize, String> {
    parse_bounded(
        text,
        ANALYSIS.stock.min_volatility_window,
        ANALYSIS.stock.max_volatility_window,
    )
}
