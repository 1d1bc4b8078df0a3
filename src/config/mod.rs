//! Configuration module for the equity analytics crate.

pub mod analysis;
pub mod forecast;
pub mod market_data;

mod debug; // Private: callers go through crate::config::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

// Re-export commonly used items
pub use analysis::ANALYSIS;
pub use forecast::{FORECAST, ForecastConfig};
pub use market_data::MARKET_DATA;
