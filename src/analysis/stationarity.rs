//! Augmented Dickey–Fuller unit-root test and the differencing-order search
//! built on it.
//!
//! The test regression (constant, no trend) is
//! `dy_t = a + g * y_{t-1} + sum_i b_i * dy_{t-i} + e_t`
//! and the statistic is the t-value of `g`. P-values use MacKinnon's (1994)
//! approximate surface, critical values his (2010) finite-sample response
//! surface.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

use crate::config::forecast::StationaritySettings;
use crate::error::{AnalysisError, AnalysisResult};
use crate::transform::difference;
use crate::utils::maths_utils::round_to;
use crate::utils::ols::OlsFit;

// MacKinnon (1994), one series, constant-only regression
const TAU_MAX: f64 = 2.74;
const TAU_MIN: f64 = -18.83;
const TAU_STAR: f64 = -1.61;
const SMALL_P_COEFS: [f64; 3] = [2.1659, 1.4412, 0.038269];
const LARGE_P_COEFS: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

// MacKinnon (2010) response surface: b0 + b1/T + b2/T^2 + b3/T^3
const CRIT_1PCT: [f64; 4] = [-3.43035, -6.5393, -16.786, -79.433];
const CRIT_5PCT: [f64; 4] = [-2.86154, -2.8903, -4.234, -40.040];
const CRIT_10PCT: [f64; 4] = [-2.56677, -1.5384, -2.809, 0.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CriticalValues {
    pub one_pct: f64,
    pub five_pct: f64,
    pub ten_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdfResult {
    pub statistic: f64,
    pub p_value: f64,
    /// Number of lagged differences in the final regression.
    pub used_lag: usize,
    /// Observations in the final regression.
    pub nobs: usize,
    pub critical_values: CriticalValues,
}

/// Outcome of the differencing search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifferencingOrder {
    pub d: usize,
    /// Rounded p-value of the series differenced `d` times.
    pub p_value: f64,
}

fn polyval(coefs: &[f64], x: f64) -> f64 {
    // coefs are in increasing power order
    coefs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Approximate asymptotic p-value of an ADF statistic (constant, no trend).
pub fn mackinnon_p_value(statistic: f64) -> f64 {
    if statistic.is_nan() {
        return f64::NAN;
    }
    if statistic > TAU_MAX {
        return 1.0;
    }
    if statistic < TAU_MIN {
        return 0.0;
    }
    let coefs: &[f64] = if statistic <= TAU_STAR {
        &SMALL_P_COEFS
    } else {
        &LARGE_P_COEFS
    };
    match Normal::new(0.0, 1.0) {
        Ok(normal) => normal.cdf(polyval(coefs, statistic)),
        Err(_) => f64::NAN,
    }
}

pub fn mackinnon_critical_values(nobs: usize) -> CriticalValues {
    let inv = 1.0 / nobs as f64;
    CriticalValues {
        one_pct: polyval(&CRIT_1PCT, inv),
        five_pct: polyval(&CRIT_5PCT, inv),
        ten_pct: polyval(&CRIT_10PCT, inv),
    }
}

/// Default lag ceiling: `ceil(12 * (n / 100)^(1/4))`, capped at `n / 2 - 2`
/// so the regression keeps more rows than regressors.
pub fn default_max_lag(n: usize) -> Option<usize> {
    let schwert = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
    let cap = (n / 2).checked_sub(2)?;
    Some(schwert.min(cap))
}

/// ADF regression with `lag` lagged differences, using rows `first..dy.len()`
/// of the differenced series.
fn adf_regression(y: &[f64], dy: &[f64], lag: usize, first: usize) -> AnalysisResult<OlsFit> {
    let rows = first..dy.len();
    let target: Vec<f64> = dy[rows.clone()].to_vec();

    let mut columns = Vec::with_capacity(lag + 2);
    columns.push(vec![1.0; target.len()]);
    // dy[t] = y[t+1] - y[t], so the lagged level for row t is y[t]
    columns.push(y[rows.clone()].to_vec());
    for i in 1..=lag {
        columns.push(rows.clone().map(|t| dy[t - i]).collect());
    }
    OlsFit::fit(&target, &columns)
}

/// Augmented Dickey–Fuller test with a constant. The number of lagged
/// differences is picked by AIC over `0..=max_lag` on a common sample, then the
/// regression is re-run on all rows available for the chosen lag.
pub fn adf_test(series: &[f64], max_lag: Option<usize>) -> AnalysisResult<AdfResult> {
    let n = series.len();
    if n == 0 {
        return Err(AnalysisError::EmptyData);
    }
    if series.iter().any(|v| !v.is_finite()) {
        return Err(AnalysisError::InvalidSeries(
            "ADF input contains non-finite values".to_string(),
        ));
    }

    let too_short = AnalysisError::InsufficientData { needed: 6, got: n };
    let max_lag = match max_lag {
        Some(lag) => lag,
        None => default_max_lag(n).ok_or(too_short)?,
    };
    // Regression on max_lag needs more rows than its max_lag + 2 columns
    let needed = 2 * max_lag + 4;
    if n < needed.max(6) {
        return Err(AnalysisError::InsufficientData {
            needed: needed.max(6),
            got: n,
        });
    }

    let dy = difference(series, 1);

    let mut best: Option<(usize, f64)> = None;
    for lag in 0..=max_lag {
        let aic = adf_regression(series, &dy, lag, max_lag)?.aic();
        if best.is_none_or(|(_, best_aic)| aic < best_aic) {
            best = Some((lag, aic));
        }
    }
    let used_lag = best.map(|(lag, _)| lag).unwrap_or(0);

    let fit = adf_regression(series, &dy, used_lag, used_lag)?;
    let statistic = fit.t_value(1);
    if !statistic.is_finite() {
        return Err(AnalysisError::Computation(
            "ADF statistic is not finite (perfectly fitting regression)".to_string(),
        ));
    }

    Ok(AdfResult {
        statistic,
        p_value: mackinnon_p_value(statistic),
        used_lag,
        nobs: fit.nobs,
        critical_values: mackinnon_critical_values(fit.nobs),
    })
}

fn is_constant(series: &[f64]) -> bool {
    match series.first() {
        Some(first) => series.iter().all(|v| (v - first).abs() <= 1e-12 * first.abs().max(1.0)),
        None => false,
    }
}

/// ADF p-value rounded to `decimals`. A constant series has no unit root and
/// reports 0.
pub fn stationarity_p_value(series: &[f64], decimals: i32) -> AnalysisResult<f64> {
    if series.is_empty() {
        return Err(AnalysisError::EmptyData);
    }
    if is_constant(series) {
        return Ok(0.0);
    }
    let adf = adf_test(series, None)?;
    Ok(round_to(adf.p_value, decimals))
}

/// Smallest `d` whose d-times differenced series passes the ADF threshold.
///
/// Gives up with `NonStationary` once `max_differencing_order` differences
/// have been tried, or with `InsufficientData` if differencing shortens the
/// series below what the test needs.
pub fn differencing_order(
    series: &[f64],
    settings: &StationaritySettings,
) -> AnalysisResult<DifferencingOrder> {
    let mut current = series.to_vec();
    for d in 0..=settings.max_differencing_order {
        if d > 0 {
            current = difference(&current, 1);
        }
        let p_value = match stationarity_p_value(&current, settings.p_value_decimals) {
            Ok(p) => p,
            // Degenerate regression (e.g. an exact trend): try one more difference
            Err(AnalysisError::Computation(reason)) => {
                log::debug!("Differencing search: d = {} not testable ({})", d, reason);
                continue;
            }
            Err(e) => return Err(e),
        };

        #[cfg(debug_assertions)]
        if crate::config::DEBUG_FLAGS.print_differencing_search {
            log::info!("Differencing search: d = {} -> p = {:.3}", d, p_value);
        }

        if p_value <= settings.p_value_threshold {
            return Ok(DifferencingOrder { d, p_value });
        }
    }
    Err(AnalysisError::NonStationary {
        max_order: settings.max_differencing_order,
    })
}
