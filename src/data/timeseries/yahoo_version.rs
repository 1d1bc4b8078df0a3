use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use serde::Deserialize;

use crate::config::MARKET_DATA;
use crate::config::market_data::ChartApiConfig;
use crate::data::timeseries::{CreateTimeSeriesData, SeriesRequest};
use crate::domain::Ticker;
use crate::models::OhlcvTimeSeries;
use crate::utils::time_utils::{date_to_epoch_sec, day_after, epoch_sec_to_date};

// Chart endpoint payload, only the parts we read
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    /// Exchange offset from UTC, used so bars land on their local trading date.
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
    #[serde(default)]
    adjclose: Vec<AdjCloseColumn>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseColumn {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Daily bars from the Yahoo Finance chart endpoint.
#[derive(Default)]
pub struct YahooApiVersion {
    pub config: ChartApiConfig,
}

impl YahooApiVersion {
    pub fn url(&self, request: &SeriesRequest) -> String {
        // period2 is exclusive
        format!(
            "{}/{}?period1={}&period2={}&interval={}",
            self.config.base_url.trim_end_matches('/'),
            request.ticker,
            date_to_epoch_sec(request.start),
            date_to_epoch_sec(day_after(request.end_or_today())),
            MARKET_DATA.yahoo.interval
        )
    }
}

/// Turn a chart payload into bars. Rows with any missing OHLC value are
/// skipped; a missing volume counts as zero.
pub fn parse_response(ticker: &Ticker, json: &str) -> Result<OhlcvTimeSeries> {
    let response: ChartResponse =
        serde_json::from_str(json).context("Unexpected chart payload layout")?;

    if let Some(err) = response.chart.error {
        bail!("Chart API error [{}]: {}", err.code, err.description);
    }
    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| anyhow!("Chart API returned no result for {}", ticker))?;

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adj = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .unwrap_or_default();

    let field = |v: &[Option<f64>], i: usize| v.get(i).copied().flatten().filter(|x| x.is_finite());

    let mut series = OhlcvTimeSeries::with_capacity(ticker.clone(), result.timestamp.len());
    let mut skipped = 0usize;
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let Some(date) = epoch_sec_to_date(ts + result.meta.gmtoffset) else {
            skipped += 1;
            continue;
        };
        match (
            field(&quote.open, i),
            field(&quote.high, i),
            field(&quote.low, i),
            field(&quote.close, i),
        ) {
            (Some(open), Some(high), Some(low), Some(close)) => series.push_row(
                date,
                open,
                high,
                low,
                close,
                field(&adj, i),
                field(&quote.volume, i).unwrap_or(0.0),
            ),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        log::info!("{}: skipped {} incomplete bars", ticker, skipped);
    }
    if series.is_empty() {
        bail!("No usable bars returned for {}", ticker);
    }
    series.normalize_order();
    Ok(series)
}

#[async_trait]
impl CreateTimeSeriesData for YahooApiVersion {
    fn signature(&self) -> &'static str {
        "Yahoo Chart API"
    }

    async fn create_timeseries_data(&self, request: &SeriesRequest) -> Result<OhlcvTimeSeries> {
        let url = self.url(request);
        log::info!("Fetching {} from {}", request.ticker, self.signature());

        let client = reqwest::Client::builder()
            .user_agent(self.config.user_agent.as_str())
            .timeout(Duration::from_millis(self.config.timeout_ms))
            .build()
            .context("Failed to build HTTP client")?;

        let response = client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Request for {} failed", request.ticker))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("Reading response for {} failed", request.ticker))?;

        // Error payloads still carry a JSON body worth surfacing
        match parse_response(&request.ticker, &body) {
            Ok(series) => Ok(series),
            Err(e) if !status.is_success() => Err(e.context(format!("HTTP {}", status))),
            Err(e) => Err(e),
        }
    }
}
