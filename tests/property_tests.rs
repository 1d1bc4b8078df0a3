//! Invariants that hold for any valid input, checked on generated series.

mod common;

use approx::assert_relative_eq;
use chrono::NaiveDate;
use proptest::prelude::*;

use equity_lens::AnalysisError;
use equity_lens::analysis::capm::{calculate_beta, capm_regression};
use equity_lens::analysis::indicators::rsi;
use equity_lens::analysis::risk::correlation_matrix;
use equity_lens::analysis::stationarity::{differencing_order, stationarity_p_value};
use equity_lens::config::FORECAST;
use equity_lens::models::ForecastTable;
use equity_lens::transform::{StandardScaler, difference, rolling_mean};

/// Values with a small trend added so no series is constant.
fn varied_values(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    (min_len..max_len).prop_flat_map(|len| {
        prop::collection::vec(-50.0..50.0_f64, len).prop_map(|mut v| {
            for (i, val) in v.iter_mut().enumerate() {
                *val += (i as f64) * 0.001;
            }
            v
        })
    })
}

fn positive_prices(min_len: usize, max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0..500.0_f64, min_len..max_len)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn rolling_mean_drops_warm_up_rows(
        values in prop::collection::vec(-1e3..1e3_f64, 0..200),
        window in 1usize..30
    ) {
        let out = rolling_mean(&values, window).unwrap();
        prop_assert_eq!(out.len(), (values.len() + 1).saturating_sub(window));
        prop_assert!(out.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn scaler_round_trips(values in prop::collection::vec(-1e4..1e4_f64, 1..200)) {
        let (scaler, scaled) = StandardScaler::fit_transform(&values).unwrap();
        let back = scaler.inverse_transform(&scaled);
        prop_assert_eq!(back.len(), values.len());
        for (a, b) in values.iter().zip(&back) {
            prop_assert!((a - b).abs() <= 1e-8 * (1.0 + a.abs()), "{} vs {}", a, b);
        }
    }

    #[test]
    fn forecast_table_has_consecutive_days(
        closes in prop::collection::vec(1.0..1000.0_f64, FORECAST.horizon),
        offset in 0u64..20_000
    ) {
        let start = NaiveDate::from_ymd_opt(1990, 1, 1)
            .unwrap()
            .checked_add_days(chrono::Days::new(offset))
            .unwrap();
        let table = ForecastTable::from_start(start, &closes).unwrap();
        prop_assert_eq!(table.len(), 30);
        prop_assert_eq!(table.rows()[0].date, start);
        for pair in table.rows().windows(2) {
            prop_assert_eq!(pair[0].date.succ_opt().unwrap(), pair[1].date);
        }
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal(
        columns in (30usize..80).prop_flat_map(|n| {
            prop::collection::vec(varied_values(n, n + 1), 2..5)
        })
    ) {
        let labels = (0..columns.len()).map(|i| format!("S{}", i)).collect();
        let matrix = correlation_matrix(labels, &columns).unwrap();
        let k = columns.len();
        for i in 0..k {
            prop_assert_eq!(matrix.values[i][i], 1.0);
            for j in 0..k {
                prop_assert_eq!(matrix.values[i][j], matrix.values[j][i]);
                prop_assert!(matrix.values[i][j].abs() <= 1.0 + 1e-9);
            }
        }
    }

    #[test]
    fn beta_against_itself_is_one(returns in varied_values(10, 120)) {
        let (beta, alpha) = calculate_beta(&returns, &returns).unwrap();
        assert_relative_eq!(beta, 1.0, epsilon = 1e-9);
        assert_relative_eq!(alpha, 0.0, epsilon = 1e-9);

        let reg = capm_regression(&returns, &returns).unwrap();
        assert_relative_eq!(reg.beta, 1.0, epsilon = 1e-6);
        assert_relative_eq!(reg.alpha, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn rsi_stays_in_bounds(closes in positive_prices(1, 300), period in 2usize..30) {
        let values = rsi(&closes, period).unwrap();
        prop_assert_eq!(values.len(), closes.len());
        for v in values.iter().filter(|v| !v.is_nan()) {
            prop_assert!((0.0..=100.0).contains(v), "rsi {}", v);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn differencing_search_terminates(seed in 0u64..10_000, len in 80usize..300) {
        let prices = common::price_path(len, 100.0, seed);
        let settings = FORECAST.stationarity;
        match differencing_order(&prices, &settings) {
            Ok(found) => {
                prop_assert!(found.d <= settings.max_differencing_order);
                let p = stationarity_p_value(
                    &difference(&prices, found.d),
                    settings.p_value_decimals,
                )
                .unwrap();
                prop_assert!(p <= settings.p_value_threshold);
                prop_assert_eq!(p, found.p_value);
            }
            Err(e) => prop_assert!(
                matches!(
                    e,
                    AnalysisError::NonStationary { .. }
                        | AnalysisError::InsufficientData { .. }
                ),
                "unexpected error {:?}",
                e
            ),
        }
    }
}
