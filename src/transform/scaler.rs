use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::utils::maths_utils::{mean, population_std};

/// Z-score scaling with parameters learnt from one series.
///
/// Uses the population standard deviation. A constant series gets scale 1 so
/// the transform degrades to plain centring instead of dividing by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: f64,
    pub scale: f64,
}

impl StandardScaler {
    pub fn fit(values: &[f64]) -> AnalysisResult<Self> {
        if values.is_empty() {
            return Err(AnalysisError::EmptyData);
        }
        let std = population_std(values);
        let scale = if std > 0.0 && std.is_finite() { std } else { 1.0 };
        Ok(Self {
            mean: mean(values),
            scale,
        })
    }

    pub fn transform(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|v| (v - self.mean) / self.scale).collect()
    }

    pub fn inverse_transform(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|v| v * self.scale + self.mean).collect()
    }

    pub fn fit_transform(values: &[f64]) -> AnalysisResult<(Self, Vec<f64>)> {
        let scaler = Self::fit(values)?;
        let scaled = scaler.transform(values);
        Ok((scaler, scaled))
    }
}
