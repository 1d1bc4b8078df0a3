use serde::Serialize;

use crate::error::{AnalysisError, AnalysisResult};
use crate::utils::maths_utils::{mean, pearson_correlation, sample_std};

pub use crate::transform::rolling_std;

/// Sample std of daily returns scaled to a year (`sqrt(days)`).
pub fn annualized_volatility(daily_returns: &[f64], trading_days: usize) -> f64 {
    sample_std(daily_returns) * (trading_days as f64).sqrt()
}

/// Daily Sharpe ratio: mean excess daily return over its sample std.
/// `annual_rf` is a fraction (0.02 for 2%) spread evenly over the trading days.
pub fn sharpe_ratio(
    daily_returns: &[f64],
    annual_rf: f64,
    trading_days: usize,
) -> AnalysisResult<f64> {
    if daily_returns.len() < 2 {
        return Err(AnalysisError::InsufficientData {
            needed: 2,
            got: daily_returns.len(),
        });
    }
    let std = sample_std(daily_returns);
    if std == 0.0 {
        return Err(AnalysisError::Computation(
            "returns have zero volatility".to_string(),
        ));
    }
    Ok((mean(daily_returns) - annual_rf / trading_days as f64) / std)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    /// Row-major, `values[i][j]` = corr(label i, label j).
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == a)?;
        let j = self.labels.iter().position(|l| l == b)?;
        Some(self.values[i][j])
    }
}

/// Pairwise Pearson correlation of equally long columns.
/// Symmetric with a unit diagonal; pairs involving a constant column are NaN.
pub fn correlation_matrix(
    labels: Vec<String>,
    columns: &[Vec<f64>],
) -> AnalysisResult<CorrelationMatrix> {
    if columns.is_empty() {
        return Err(AnalysisError::EmptyData);
    }
    if labels.len() != columns.len() {
        return Err(AnalysisError::InvalidParameter(format!(
            "{} labels for {} columns",
            labels.len(),
            columns.len()
        )));
    }
    let n = columns[0].len();
    if columns.iter().any(|c| c.len() != n) {
        return Err(AnalysisError::InvalidParameter(
            "correlation columns differ in length".to_string(),
        ));
    }

    let k = columns.len();
    let mut values = vec![vec![1.0; k]; k];
    for i in 0..k {
        for j in (i + 1)..k {
            let r = pearson_correlation(&columns[i], &columns[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }
    Ok(CorrelationMatrix { labels, values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn volatility_scales_with_root_days() {
        let r = [0.01, -0.02, 0.015, 0.0, -0.005];
        assert_relative_eq!(
            annualized_volatility(&r, 252),
            sample_std(&r) * 252f64.sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn sharpe_subtracts_daily_risk_free() {
        let r = [0.01, 0.02, 0.03];
        let expected = (0.02 - 0.0252 / 252.0) / 0.01;
        assert_relative_eq!(sharpe_ratio(&r, 0.0252, 252).unwrap(), expected, epsilon = 1e-12);
        assert!(sharpe_ratio(&[0.01, 0.01], 0.0, 252).is_err());
        assert!(sharpe_ratio(&[0.01], 0.0, 252).is_err());
    }

    #[test]
    fn matrix_is_symmetric_with_unit_diagonal() {
        let cols = vec![
            vec![1.0, 2.0, 3.0, 4.0],
            vec![2.0, 1.0, 4.0, 3.0],
            vec![4.0, 3.0, 2.0, 1.0],
        ];
        let labels = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let m = correlation_matrix(labels, &cols).unwrap();
        for i in 0..3 {
            assert_eq!(m.values[i][i], 1.0);
            for j in 0..3 {
                assert_eq!(m.values[i][j], m.values[j][i]);
            }
        }
        assert_relative_eq!(m.get("A", "C").unwrap(), -1.0, epsilon = 1e-12);
        assert_relative_eq!(m.get("A", "B").unwrap(), 0.6, epsilon = 1e-12);
        assert!(m.get("A", "Z").is_none());
    }
}
