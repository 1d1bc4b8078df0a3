// Data loading from market-data providers
pub mod pre_main_async;
pub mod timeseries;

// Re-export commonly used types
pub use pre_main_async::fetch_price_data;
pub use timeseries::{CreateTimeSeriesData, SeriesRequest, get_timeseries_data_async};
