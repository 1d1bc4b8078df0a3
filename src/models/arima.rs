use std::f64::consts::PI;

use serde::Serialize;

use crate::error::{AnalysisError, AnalysisResult};
use crate::transform::{difference, integrate};
use crate::utils::optimization::{SimplexSettings, nelder_mead};

// AR/MA coefficients are kept inside the stationary/invertible region
const COEFFICIENT_BOUND: f64 = 0.99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

impl ArimaOrder {
    /// Shortest series `fit` accepts.
    pub fn min_observations(&self) -> usize {
        self.d + self.p.max(self.q) + 2
    }

    /// Integrated models carry no constant; only `d == 0` estimates a mean.
    pub fn has_intercept(&self) -> bool {
        self.d == 0
    }

    fn n_params(&self) -> usize {
        self.p + self.q + usize::from(self.has_intercept())
    }
}

impl std::fmt::Display for ArimaOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "ARIMA({},{},{})", self.p, self.d, self.q)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArimaCoefficients {
    pub intercept: f64,
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
}

#[derive(Debug, Clone)]
struct FittedState {
    coefficients: ArimaCoefficients,
    /// Undifferenced training data, needed to integrate forecasts back.
    history: Vec<f64>,
    diffed: Vec<f64>,
    residuals: Vec<f64>,
    residual_variance: f64,
    aic: f64,
    bic: f64,
}

/// ARIMA(p, d, q) fitted by conditional sum of squares.
#[derive(Debug, Clone)]
pub struct Arima {
    order: ArimaOrder,
    state: Option<FittedState>,
}

/// One-step-ahead residuals of the ARMA recursion on the differenced scale.
/// The first `max(p, q)` residuals are zero (conditioning values).
fn css_residuals(diffed: &[f64], coef: &ArimaCoefficients) -> Vec<f64> {
    let start = coef.ar.len().max(coef.ma.len());
    let mut residuals = vec![0.0; diffed.len()];
    for t in start..diffed.len() {
        let pred = one_step(diffed, &residuals, t, coef);
        residuals[t] = diffed[t] - pred;
    }
    residuals
}

fn one_step(values: &[f64], residuals: &[f64], t: usize, coef: &ArimaCoefficients) -> f64 {
    let c = coef.intercept;
    let ar: f64 = coef
        .ar
        .iter()
        .enumerate()
        .map(|(i, phi)| phi * (values[t - 1 - i] - c))
        .sum();
    let ma: f64 = coef
        .ma
        .iter()
        .enumerate()
        .map(|(j, theta)| theta * residuals[t - 1 - j])
        .sum();
    c + ar + ma
}

impl Arima {
    pub fn new(p: usize, d: usize, q: usize) -> Self {
        Self {
            order: ArimaOrder { p, d, q },
            state: None,
        }
    }

    pub fn order(&self) -> ArimaOrder {
        self.order
    }

    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    fn unpack(&self, params: &[f64]) -> ArimaCoefficients {
        let ArimaOrder { p, q, .. } = self.order;
        let offset = usize::from(self.order.has_intercept());
        ArimaCoefficients {
            intercept: if offset == 1 { params[0] } else { 0.0 },
            ar: params[offset..offset + p].to_vec(),
            ma: params[offset + p..offset + p + q].to_vec(),
        }
    }

    pub fn fit(&mut self, values: &[f64]) -> AnalysisResult<()> {
        let needed = self.order.min_observations();
        if values.len() < needed {
            return Err(AnalysisError::InsufficientData {
                needed,
                got: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(AnalysisError::InvalidSeries(
                "ARIMA input contains non-finite values".to_string(),
            ));
        }

        let diffed = difference(values, self.order.d);
        let mean = diffed.iter().sum::<f64>() / diffed.len() as f64;

        let mut start = Vec::with_capacity(self.order.n_params());
        let mut bounds = Vec::with_capacity(self.order.n_params());
        if self.order.has_intercept() {
            start.push(mean);
            bounds.push((f64::NEG_INFINITY, f64::INFINITY));
        }
        for _ in 0..self.order.p + self.order.q {
            start.push(0.1);
            bounds.push((-COEFFICIENT_BOUND, COEFFICIENT_BOUND));
        }

        let css = |params: &[f64]| {
            let coef = self.unpack(params);
            css_residuals(&diffed, &coef).iter().map(|e| e * e).sum::<f64>()
        };
        let settings = SimplexSettings {
            max_iter: 1000 * self.order.n_params().max(1),
            tolerance: 1e-10,
            ..Default::default()
        };
        let best = nelder_mead(css, &start, Some(&bounds), &settings);
        if !best.value.is_finite() {
            return Err(AnalysisError::Computation(format!(
                "{} objective did not produce a finite value",
                self.order
            )));
        }

        let coefficients = self.unpack(&best.point);
        let residuals = css_residuals(&diffed, &coefficients);

        let conditioning = self.order.p.max(self.order.q);
        let effective = &residuals[conditioning..];
        let n_eff = effective.len() as f64;
        let residual_variance = effective.iter().map(|e| e * e).sum::<f64>() / n_eff;
        let log_lik = -0.5 * n_eff * (1.0 + residual_variance.ln() + (2.0 * PI).ln());
        // Innovation variance counts as a parameter too
        let k = (self.order.n_params() + 1) as f64;

        #[cfg(debug_assertions)]
        if crate::config::DEBUG_FLAGS.print_arima_fit {
            log::info!(
                "{} fit: {:?}, sigma2 {:.6}, {} simplex iterations (converged: {})",
                self.order,
                coefficients,
                residual_variance,
                best.iterations,
                best.converged
            );
        }

        self.state = Some(FittedState {
            coefficients,
            history: values.to_vec(),
            diffed,
            residuals,
            residual_variance,
            aic: -2.0 * log_lik + 2.0 * k,
            bic: -2.0 * log_lik + k * n_eff.ln(),
        });
        Ok(())
    }

    fn state(&self) -> AnalysisResult<&FittedState> {
        self.state.as_ref().ok_or(AnalysisError::FitRequired)
    }

    /// Point forecast `horizon` steps past the end of the training data.
    /// Future shocks are taken as zero.
    pub fn forecast(&self, horizon: usize) -> AnalysisResult<Vec<f64>> {
        let state = self.state()?;
        let coef = &state.coefficients;

        let mut values = state.diffed.clone();
        let mut residuals = state.residuals.clone();
        for _ in 0..horizon {
            let t = values.len();
            let next = one_step(&values, &residuals, t, coef);
            values.push(next);
            residuals.push(0.0);
        }

        let ahead = &values[state.diffed.len()..];
        Ok(integrate(ahead, &state.history, self.order.d))
    }

    pub fn coefficients(&self) -> AnalysisResult<&ArimaCoefficients> {
        Ok(&self.state()?.coefficients)
    }

    pub fn residual_variance(&self) -> AnalysisResult<f64> {
        Ok(self.state()?.residual_variance)
    }

    pub fn aic(&self) -> AnalysisResult<f64> {
        Ok(self.state()?.aic)
    }

    pub fn bic(&self) -> AnalysisResult<f64> {
        Ok(self.state()?.bic)
    }
}
