pub mod csv_version;
pub mod yahoo_version;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::Ticker;
use crate::models::OhlcvTimeSeries;
use crate::utils::time_utils::today_local;

/// Daily bars wanted for one ticker, `start..=end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesRequest {
    pub ticker: Ticker,
    pub start: NaiveDate,
    /// Inclusive. `None` means up to today.
    pub end: Option<NaiveDate>,
}

impl SeriesRequest {
    pub fn new(ticker: Ticker, start: NaiveDate, end: Option<NaiveDate>) -> Self {
        Self { ticker, start, end }
    }

    pub fn end_or_today(&self) -> NaiveDate {
        self.end.unwrap_or_else(today_local)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end_or_today()
    }
}

#[async_trait]
pub trait CreateTimeSeriesData {
    // Either create a time-series OR return an anyhow::error
    async fn create_timeseries_data(&self, request: &SeriesRequest) -> Result<OhlcvTimeSeries>;

    /// A unique identifier for this implementation (so that afterwards we know which one we used).
    fn signature(&self) -> &'static str;
}

pub async fn get_timeseries_data_async(
    implementations: &[Box<dyn CreateTimeSeriesData + Send + Sync>],
    request: &SeriesRequest,
) -> Result<(OhlcvTimeSeries, &'static str)> {
    for imp in implementations {
        match imp.create_timeseries_data(request).await {
            Ok(data) => return Ok((data, imp.signature())),
            Err(e) => {
                log::info!("{} failed for {}: {:#}", imp.signature(), request.ticker, e);
                // Continue to the next implementation
            }
        }
    }
    Err(anyhow!(
        "No data found for {} between {} and {}",
        request.ticker,
        request.start,
        request.end_or_today()
    ))
}
