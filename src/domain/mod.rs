// Domain types and value objects
pub mod candle;
pub mod price_series;
pub mod ticker;

// Re-export commonly used types
pub use candle::{Candle, CandleType};
pub use price_series::{AlignedSeries, PricePoint, PriceSeries};
pub use ticker::Ticker;
