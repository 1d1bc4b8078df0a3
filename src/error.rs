//! Typed errors for the numeric side of the crate (transforms, tests, models).
//!
//! Fetching and CLI code stays on `anyhow`; anything that crunches numbers
//! returns `AnalysisError` so callers can match on the failure.

use thiserror::Error;

pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("empty input data")]
    EmptyData,

    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Series violates an ordering or finiteness invariant.
    #[error("invalid series: {0}")]
    InvalidSeries(String),

    #[error("series still non-stationary after {max_order} differences")]
    NonStationary { max_order: usize },

    #[error("model must be fitted before forecasting")]
    FitRequired,

    #[error("computation error: {0}")]
    Computation(String),
}
