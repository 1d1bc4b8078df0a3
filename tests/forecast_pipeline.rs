//! End-to-end forecast pipeline on a synthetic price path.

mod common;

use chrono::NaiveDate;

use equity_lens::analysis::{evaluate_model, run_forecast};
use equity_lens::config::FORECAST;
use equity_lens::models::ArimaOrder;
use equity_lens::transform::{StandardScaler, rolling_mean};
use equity_lens::utils::time_utils::consecutive_days;
use equity_lens::{AnalysisError, PriceSeries, Ticker};

fn synthetic_series(n: usize, seed: u64) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    PriceSeries::new(
        Ticker::new("SYN"),
        consecutive_days(start, n),
        common::price_path(n, 150.0, seed),
    )
    .unwrap()
}

#[test]
fn forecast_report_covers_thirty_days_from_start() {
    let series = synthetic_series(320, 42);
    let forecast_start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    let report = run_forecast(&series, forecast_start, &FORECAST).unwrap();

    assert_eq!(report.ticker, Ticker::new("SYN"));
    assert_eq!(report.table.len(), 30);
    let rows = report.table.rows();
    assert_eq!(rows[0].date, forecast_start);
    assert_eq!(rows[29].date, NaiveDate::from_ymd_opt(2025, 3, 30).unwrap());
    assert!(rows.iter().all(|r| r.close.is_finite() && r.close > 0.0));

    assert_eq!(report.order.p, 1);
    assert_eq!(report.order.q, 1);
    assert!(report.order.d <= FORECAST.stationarity.max_differencing_order);
    assert!(report.p_value <= 0.05);
    assert!(report.rmse >= 0.0);
    // Two decimals exactly
    assert_eq!((report.rmse * 100.0).round() / 100.0, report.rmse);

    // Smoothed history drops the first window - 1 closes
    assert_eq!(report.history.len(), 320 - FORECAST.rolling_window + 1);
    assert_eq!(report.history[0].date, series.dates()[FORECAST.rolling_window - 1]);

    // Forecast starts near the last smoothed close
    let last_smoothed = report.history.last().unwrap().price;
    assert!((rows[0].close / last_smoothed - 1.0).abs() < 0.05);
}

#[test]
fn scaler_in_report_matches_smoothed_history() {
    let series = synthetic_series(200, 7);
    let report = run_forecast(&series, NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(), &FORECAST)
        .unwrap();
    let smoothed = rolling_mean(series.values(), FORECAST.rolling_window).unwrap();
    let expected = StandardScaler::fit(&smoothed).unwrap();
    assert_eq!(report.scaler, expected);
}

#[test]
fn evaluation_needs_more_than_the_test_window() {
    let order = ArimaOrder { p: 1, d: 1, q: 1 };
    let short: Vec<f64> = (0..32).map(|i| i as f64).collect();
    assert!(matches!(
        evaluate_model(&short, order, 30, 2),
        Err(AnalysisError::InsufficientData { .. })
    ));
}

#[test]
fn too_short_history_is_an_error() {
    let series = synthetic_series(5, 1);
    let result = run_forecast(&series, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(), &FORECAST);
    assert!(matches!(result, Err(AnalysisError::InsufficientData { .. })));
}
