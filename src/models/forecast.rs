use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{PricePoint, Ticker};
use crate::error::{AnalysisError, AnalysisResult};
use crate::models::arima::ArimaOrder;
use crate::transform::StandardScaler;
use crate::utils::time_utils::consecutive_days;

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct ForecastRow {
    pub date: NaiveDate,
    pub close: f64,
}

/// Forecast closes on consecutive calendar days.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ForecastTable {
    rows: Vec<ForecastRow>,
}

impl ForecastTable {
    /// Pair `closes` with consecutive days starting at `start`.
    pub fn from_start(start: NaiveDate, closes: &[f64]) -> AnalysisResult<Self> {
        let dates = consecutive_days(start, closes.len());
        if dates.len() != closes.len() {
            return Err(AnalysisError::InvalidParameter(format!(
                "cannot lay out {} forecast days from {}",
                closes.len(),
                start
            )));
        }
        let rows = dates
            .into_iter()
            .zip(closes)
            .map(|(date, &close)| ForecastRow { date, close })
            .collect();
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[ForecastRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.close).collect()
    }
}

/// Everything one forecast run produces.
#[derive(Serialize, Debug, Clone)]
pub struct ForecastReport {
    pub ticker: Ticker,
    pub table: ForecastTable,
    /// Held-out RMSE on the scaled series, rounded.
    pub rmse: f64,
    pub order: ArimaOrder,
    /// Rounded ADF p-value of the series differenced `order.d` times.
    pub p_value: f64,
    pub scaler: StandardScaler,
    /// Smoothed closes the model was trained on, for plotting next to the table.
    pub history: Vec<PricePoint>,
}
