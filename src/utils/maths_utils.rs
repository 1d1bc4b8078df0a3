use statrs::statistics::Statistics;

use crate::error::{AnalysisError, AnalysisResult};

/// Arithmetic mean. NaN for an empty slice.
#[inline]
pub fn mean(values: &[f64]) -> f64 {
    values.mean()
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(values: &[f64]) -> f64 {
    values.std_dev()
}

/// Population standard deviation (n denominator).
pub fn population_std(values: &[f64]) -> f64 {
    values.population_std_dev()
}

/// Sample covariance of two equally long slices.
pub fn sample_covariance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.covariance(b)
}

/// Pearson correlation. NaN when either side has zero variance.
pub fn pearson_correlation(a: &[f64], b: &[f64]) -> f64 {
    let denom = sample_std(a) * sample_std(b);
    if denom == 0.0 || denom.is_nan() {
        return f64::NAN;
    }
    sample_covariance(a, b) / denom
}

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn rmse(actual: &[f64], predicted: &[f64]) -> AnalysisResult<f64> {
    if actual.is_empty() {
        return Err(AnalysisError::EmptyData);
    }
    if actual.len() != predicted.len() {
        return Err(AnalysisError::InvalidParameter(format!(
            "rmse needs equal lengths, got {} actual vs {} predicted",
            actual.len(),
            predicted.len()
        )));
    }
    let mse = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64;
    Ok(mse.sqrt())
}

/// Degree-1 least-squares fit `y = slope * x + intercept`.
/// Returns `(slope, intercept)` in that order.
pub fn linear_fit(x: &[f64], y: &[f64]) -> AnalysisResult<(f64, f64)> {
    if x.len() != y.len() {
        return Err(AnalysisError::InvalidParameter(format!(
            "linear fit needs equal lengths, got {} and {}",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(AnalysisError::InsufficientData {
            needed: 2,
            got: x.len(),
        });
    }

    let x_mean = mean(x);
    let y_mean = mean(y);
    let (sxx, sxy) = x
        .iter()
        .zip(y)
        .fold((0.0, 0.0), |(sxx, sxy), (&xi, &yi)| {
            let dx = xi - x_mean;
            (sxx + dx * dx, sxy + dx * (yi - y_mean))
        });

    if sxx == 0.0 {
        return Err(AnalysisError::Computation(
            "regressor has zero variance".to_string(),
        ));
    }
    let slope = sxy / sxx;
    Ok((slope, y_mean - slope * x_mean))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn std_flavours_differ_by_denominator() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(population_std(&v), 2.0, epsilon = 1e-12);
        assert_relative_eq!(sample_std(&v), (32.0f64 / 7.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn correlation_of_affine_copy_is_one() {
        let a = [1.0, 3.0, 2.0, 5.0, 4.0];
        let b: Vec<f64> = a.iter().map(|x| 3.0 * x - 7.0).collect();
        assert_relative_eq!(pearson_correlation(&a, &b), 1.0, epsilon = 1e-12);
        let c: Vec<f64> = a.iter().map(|x| -x).collect();
        assert_relative_eq!(pearson_correlation(&a, &c), -1.0, epsilon = 1e-12);
        assert!(pearson_correlation(&a, &[1.0; 5]).is_nan());
    }

    #[test]
    fn round_to_matches_display_rounding() {
        assert_eq!(round_to(0.04951, 3), 0.05);
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(-2.675, 1), -2.7);
    }

    #[test]
    fn rmse_checks_lengths() {
        assert_relative_eq!(rmse(&[1.0, 2.0], &[1.0, 4.0]).unwrap(), 2.0f64.sqrt());
        assert_eq!(rmse(&[], &[]), Err(AnalysisError::EmptyData));
        assert!(rmse(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn linear_fit_recovers_line() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 3.0, 5.0, 7.0];
        let (slope, intercept) = linear_fit(&x, &y).unwrap();
        assert_relative_eq!(slope, 2.0, epsilon = 1e-12);
        assert_relative_eq!(intercept, 1.0, epsilon = 1e-12);
        assert!(linear_fit(&[1.0, 1.0], &[0.0, 1.0]).is_err());
    }
}
