use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandleType {
    Bullish,
    Bearish,
}

/// One daily OHLCV bar, the unit a candlestick chart draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub date: NaiveDate,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(
        date: NaiveDate,
        open_price: f64,
        high_price: f64,
        low_price: f64,
        close_price: f64,
        volume: f64,
    ) -> Self {
        Candle {
            date,
            open_price,
            high_price,
            low_price,
            close_price,
            volume,
        }
    }

    pub fn get_type(&self) -> CandleType {
        if self.close_price >= self.open_price {
            CandleType::Bullish
        } else {
            CandleType::Bearish
        }
    }

    /// High minus low.
    pub fn range(&self) -> f64 {
        self.high_price - self.low_price
    }
}
