use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Candle, PriceSeries, Ticker};
use crate::error::{AnalysisError, AnalysisResult};

// ============================================================================
// OhlcvTimeSeries: raw daily bars for one ticker, as a provider returns them
// ============================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OhlcvTimeSeries {
    pub ticker: Ticker,
    pub dates: Vec<NaiveDate>,

    // Prices
    pub open_prices: Vec<f64>,
    pub high_prices: Vec<f64>,
    pub low_prices: Vec<f64>,
    pub close_prices: Vec<f64>,
    /// Split/dividend adjusted close. Equal to close when the provider has none.
    pub adj_close_prices: Vec<f64>,

    pub volumes: Vec<f64>,
}

impl OhlcvTimeSeries {
    /// Empty series to push rows into.
    pub fn with_capacity(ticker: Ticker, capacity: usize) -> Self {
        Self {
            ticker,
            dates: Vec::with_capacity(capacity),
            open_prices: Vec::with_capacity(capacity),
            high_prices: Vec::with_capacity(capacity),
            low_prices: Vec::with_capacity(capacity),
            close_prices: Vec::with_capacity(capacity),
            adj_close_prices: Vec::with_capacity(capacity),
            volumes: Vec::with_capacity(capacity),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn push_row(
        &mut self,
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        adj_close: Option<f64>,
        volume: f64,
    ) {
        self.dates.push(date);
        self.open_prices.push(open);
        self.high_prices.push(high);
        self.low_prices.push(low);
        self.close_prices.push(close);
        self.adj_close_prices.push(adj_close.unwrap_or(close));
        self.volumes.push(volume);
    }

    /// Sort by date and drop repeated dates (the later row wins). Providers
    /// occasionally repeat the current session as a separate bar.
    pub fn normalize_order(&mut self) {
        let mut idx: Vec<usize> = (0..self.dates.len()).collect();
        idx.sort_by_key(|&i| (self.dates[i], i));
        let mut keep: Vec<usize> = Vec::with_capacity(idx.len());
        for i in idx {
            match keep.last() {
                Some(&prev) if self.dates[prev] == self.dates[i] => {
                    if let Some(last) = keep.last_mut() {
                        *last = i;
                    }
                }
                _ => keep.push(i),
            }
        }

        let pick = |v: &[f64]| keep.iter().map(|&i| v[i]).collect::<Vec<f64>>();
        let dates = keep.iter().map(|&i| self.dates[i]).collect();
        self.open_prices = pick(&self.open_prices);
        self.high_prices = pick(&self.high_prices);
        self.low_prices = pick(&self.low_prices);
        self.close_prices = pick(&self.close_prices);
        self.adj_close_prices = pick(&self.adj_close_prices);
        self.volumes = pick(&self.volumes);
        self.dates = dates;
    }

    pub fn klines(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn get_candle(&self, idx: usize) -> Candle {
        Candle::new(
            self.dates[idx],
            self.open_prices[idx],
            self.high_prices[idx],
            self.low_prices[idx],
            self.close_prices[idx],
            self.volumes[idx],
        )
    }

    pub fn candles(&self) -> Vec<Candle> {
        (0..self.klines()).map(|i| self.get_candle(i)).collect()
    }

    /// Closing prices as a validated series.
    pub fn close_series(&self) -> AnalysisResult<PriceSeries> {
        if self.is_empty() {
            return Err(AnalysisError::EmptyData);
        }
        PriceSeries::new(
            self.ticker.clone(),
            self.dates.clone(),
            self.close_prices.clone(),
        )
    }

    pub fn adj_close_series(&self) -> AnalysisResult<PriceSeries> {
        if self.is_empty() {
            return Err(AnalysisError::EmptyData);
        }
        PriceSeries::new(
            self.ticker.clone(),
            self.dates.clone(),
            self.adj_close_prices.clone(),
        )
    }

    /// Half-open index range of the rows dated `start..=end`. `None` if no row falls inside.
    pub fn get_indices_by_date_range(
        &self,
        start: NaiveDate,
        end: Option<NaiveDate>,
    ) -> Option<(usize, usize)> {
        let lo = self.dates.partition_point(|d| *d < start);
        let hi = match end {
            Some(end) => self.dates.partition_point(|d| *d <= end),
            None => self.dates.len(),
        };
        (lo < hi).then_some((lo, hi))
    }

    /// Copy of rows `start..end`.
    pub fn slice(&self, (start, end): (usize, usize)) -> OhlcvTimeSeries {
        OhlcvTimeSeries {
            ticker: self.ticker.clone(),
            dates: self.dates[start..end].to_vec(),
            open_prices: self.open_prices[start..end].to_vec(),
            high_prices: self.high_prices[start..end].to_vec(),
            low_prices: self.low_prices[start..end].to_vec(),
            close_prices: self.close_prices[start..end].to_vec(),
            adj_close_prices: self.adj_close_prices[start..end].to_vec(),
            volumes: self.volumes[start..end].to_vec(),
        }
    }

    /// Rows dated on or after `start`. Empty when `start` is past the last row.
    pub fn since(&self, start: NaiveDate) -> OhlcvTimeSeries {
        match self.get_indices_by_date_range(start, None) {
            Some(range) => self.slice(range),
            None => self.slice((self.klines(), self.klines())),
        }
    }
}
