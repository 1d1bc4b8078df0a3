use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::config::MARKET_DATA;
use crate::data::timeseries::{CreateTimeSeriesData, SeriesRequest};
use crate::domain::Ticker;
use crate::models::OhlcvTimeSeries;

/// One row of a downloaded history file:
/// `Date,Open,High,Low,Close,Adj Close,Volume` (`Adj Close` may be absent).
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: Option<f64>,
    #[serde(rename = "High")]
    high: Option<f64>,
    #[serde(rename = "Low")]
    low: Option<f64>,
    #[serde(rename = "Close")]
    close: Option<f64>,
    #[serde(rename = "Adj Close", default)]
    adj_close: Option<f64>,
    #[serde(rename = "Volume", default)]
    volume: Option<f64>,
}

/// Reads `<dir>/<TICKER>.csv` (caret stripped, so `^GSPC` -> `GSPC.csv`).
pub struct CsvFileVersion {
    pub dir: PathBuf,
}

impl CsvFileVersion {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, ticker: &Ticker) -> PathBuf {
        self.dir
            .join(format!("{}.{}", ticker.file_stem(), MARKET_DATA.csv.extension))
    }
}

/// Parse CSV text, keeping complete rows dated inside `request`.
pub fn parse_csv(text: &str, request: &SeriesRequest, source: &Path) -> Result<OhlcvTimeSeries> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers().context("CSV has no header row")?.clone();
    if !headers.iter().any(|h| h == MARKET_DATA.csv.date_column) {
        bail!(
            "{} has no '{}' column",
            source.display(),
            MARKET_DATA.csv.date_column
        );
    }

    let mut series = OhlcvTimeSeries::with_capacity(request.ticker.clone(), 256);
    let mut skipped = 0usize;
    for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
        // Blank cells and "null" markers both leave the row unusable
        let Ok(row) = row else {
            skipped += 1;
            continue;
        };
        let date = NaiveDate::parse_from_str(&row.date, MARKET_DATA.csv.date_format)
            .or_else(|_| {
                // Some exports append a time of day
                NaiveDate::parse_from_str(
                    row.date.get(..10).unwrap_or(&row.date),
                    MARKET_DATA.csv.date_format,
                )
            })
            .with_context(|| format!("{} line {}: bad date '{}'", source.display(), line + 2, row.date))?;
        if !request.contains(date) {
            continue;
        }
        match (row.open, row.high, row.low, row.close) {
            (Some(open), Some(high), Some(low), Some(close)) => series.push_row(
                date,
                open,
                high,
                low,
                close,
                row.adj_close,
                row.volume.unwrap_or(0.0),
            ),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        log::info!("{}: skipped {} incomplete rows", source.display(), skipped);
    }
    if series.is_empty() {
        bail!(
            "{} has no rows between {} and {}",
            source.display(),
            request.start,
            request.end_or_today()
        );
    }
    series.normalize_order();
    Ok(series)
}

#[async_trait]
impl CreateTimeSeriesData for CsvFileVersion {
    fn signature(&self) -> &'static str {
        "Local CSV"
    }

    async fn create_timeseries_data(&self, request: &SeriesRequest) -> Result<OhlcvTimeSeries> {
        let path = self.path_for(&request.ticker);
        let text = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Cannot read {}", path.display()))?;
        parse_csv(&text, request, &path)
    }
}
