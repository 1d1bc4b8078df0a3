//! Ordinary least squares with coefficient standard errors.
//!
//! Small dense problems only (a handful of regressors): the normal
//! equations are solved through a Cholesky factorisation, which also gives
//! `(X'X)^-1` for the covariance of the estimates.

use std::f64::consts::PI;

use crate::error::{AnalysisError, AnalysisResult};

/// A fitted linear regression `y = X b + e`.
#[derive(Debug, Clone)]
pub struct OlsFit {
    /// One coefficient per design column, in column order.
    pub params: Vec<f64>,
    pub std_errors: Vec<f64>,
    /// Residual sum of squares.
    pub ssr: f64,
    /// Coefficient of determination (centred; 0 if `y` is constant).
    pub r_squared: f64,
    pub nobs: usize,
}

impl OlsFit {
    /// Fit against `columns`, each of length `y.len()`. Include an explicit
    /// column of ones to get an intercept.
    pub fn fit(y: &[f64], columns: &[Vec<f64>]) -> AnalysisResult<Self> {
        let n = y.len();
        let k = columns.len();

        if k == 0 {
            return Err(AnalysisError::InvalidParameter(
                "regression needs at least one design column".to_string(),
            ));
        }
        if let Some(bad) = columns.iter().find(|c| c.len() != n) {
            return Err(AnalysisError::InvalidParameter(format!(
                "design column has {} rows, expected {}",
                bad.len(),
                n
            )));
        }
        if n <= k {
            return Err(AnalysisError::InsufficientData {
                needed: k + 1,
                got: n,
            });
        }

        let mut xtx = vec![vec![0.0; k]; k];
        let mut xty = vec![0.0; k];
        for i in 0..k {
            for j in 0..=i {
                let s: f64 = columns[i].iter().zip(&columns[j]).map(|(a, b)| a * b).sum();
                xtx[i][j] = s;
                xtx[j][i] = s;
            }
            xty[i] = columns[i].iter().zip(y).map(|(a, b)| a * b).sum();
        }

        let chol = cholesky(&xtx).ok_or_else(|| {
            AnalysisError::Computation("singular design matrix in regression".to_string())
        })?;
        let params = cholesky_solve(&chol, &xty);

        let ssr: f64 = (0..n)
            .map(|t| {
                let fitted: f64 = (0..k).map(|j| columns[j][t] * params[j]).sum();
                (y[t] - fitted).powi(2)
            })
            .sum();

        let y_mean = y.iter().sum::<f64>() / n as f64;
        let tss: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();
        let r_squared = if tss > 0.0 { 1.0 - ssr / tss } else { 0.0 };

        let sigma_sq = ssr / (n - k) as f64;
        let inv = cholesky_inverse(&chol);
        let std_errors = (0..k).map(|j| (sigma_sq * inv[j][j]).sqrt()).collect();

        Ok(Self {
            params,
            std_errors,
            ssr,
            r_squared,
            nobs: n,
        })
    }

    /// t-statistic of coefficient `idx`.
    pub fn t_value(&self, idx: usize) -> f64 {
        self.params[idx] / self.std_errors[idx]
    }

    /// Gaussian log-likelihood at the ML variance estimate.
    pub fn log_likelihood(&self) -> f64 {
        let n = self.nobs as f64;
        -0.5 * n * ((2.0 * PI).ln() + (self.ssr / n).ln() + 1.0)
    }

    pub fn aic(&self) -> f64 {
        -2.0 * self.log_likelihood() + 2.0 * self.params.len() as f64
    }
}

/// Lower-triangular `L` with `A = L L'`. `None` if `A` is not positive definite.
fn cholesky(a: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n = a.len();
    let mut l = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let mut sum = a[i][j];
            for k in 0..j {
                sum -= l[i][k] * l[j][k];
            }
            if i == j {
                // Relative pivot check catches near-collinear columns
                if sum <= a[i][i].abs() * 1e-12 || sum <= 0.0 {
                    return None;
                }
                l[i][j] = sum.sqrt();
            } else {
                l[i][j] = sum / l[j][j];
            }
        }
    }
    Some(l)
}

fn cholesky_solve(l: &[Vec<f64>], b: &[f64]) -> Vec<f64> {
    let n = b.len();
    let mut z = vec![0.0; n];
    for i in 0..n {
        let sum: f64 = (0..i).map(|j| l[i][j] * z[j]).sum();
        z[i] = (b[i] - sum) / l[i][i];
    }
    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let sum: f64 = ((i + 1)..n).map(|j| l[j][i] * x[j]).sum();
        x[i] = (z[i] - sum) / l[i][i];
    }
    x
}

fn cholesky_inverse(l: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let n = l.len();
    let mut inv = vec![vec![0.0; n]; n];
    for col in 0..n {
        let mut e = vec![0.0; n];
        e[col] = 1.0;
        let x = cholesky_solve(l, &e);
        for row in 0..n {
            inv[row][col] = x[row];
        }
    }
    inv
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn recovers_exact_plane() {
        let x1: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let x2: Vec<f64> = (0..20).map(|i| ((i * 7) % 5) as f64).collect();
        let y: Vec<f64> = x1.iter().zip(&x2).map(|(a, b)| 1.5 + 2.0 * a - 0.5 * b).collect();

        let fit = OlsFit::fit(&y, &[vec![1.0; 20], x1, x2]).unwrap();
        assert_relative_eq!(fit.params[0], 1.5, epsilon = 1e-9);
        assert_relative_eq!(fit.params[1], 2.0, epsilon = 1e-9);
        assert_relative_eq!(fit.params[2], -0.5, epsilon = 1e-9);
        assert_relative_eq!(fit.r_squared, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn standard_error_of_slope_matches_closed_form() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y = [0.1, 1.2, 1.9, 3.2, 3.9, 5.1, 6.0, 6.8, 8.3, 8.9];
        let fit = OlsFit::fit(&y, &[vec![1.0; 10], x.clone()]).unwrap();

        let x_mean = 4.5;
        let sxx: f64 = x.iter().map(|v| (v - x_mean).powi(2)).sum();
        let expected = (fit.ssr / 8.0 / sxx).sqrt();
        assert_relative_eq!(fit.std_errors[1], expected, epsilon = 1e-10);
        assert!(fit.t_value(1) > 10.0);
    }

    #[test]
    fn collinear_columns_are_rejected() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let twice: Vec<f64> = x.iter().map(|v| v * 2.0).collect();
        let y = x.clone();
        assert!(matches!(
            OlsFit::fit(&y, &[vec![1.0; 10], x, twice]),
            Err(AnalysisError::Computation(_))
        ));
    }

    #[test]
    fn too_few_rows() {
        assert!(matches!(
            OlsFit::fit(&[1.0, 2.0], &[vec![1.0, 1.0], vec![0.0, 1.0]]),
            Err(AnalysisError::InsufficientData { needed: 3, got: 2 })
        ));
    }
}
