//! Series transforms used ahead of model fitting.

pub mod diff;
pub mod rolling;
pub mod scaler;

pub use diff::{difference, integrate};
pub use rolling::{rolling_mean, rolling_std};
pub use scaler::StandardScaler;
