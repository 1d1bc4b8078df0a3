// Async fetch run by the CLI before any analysis starts

use anyhow::Result;

use crate::Cli;
use crate::data::timeseries::csv_version::CsvFileVersion;
use crate::data::timeseries::yahoo_version::YahooApiVersion;
use crate::data::timeseries::{CreateTimeSeriesData, SeriesRequest, get_timeseries_data_async};
use crate::models::OhlcvTimeSeries;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Provider order for this invocation: a local CSV directory is tried first
/// unless `--prefer-api` is set, in which case it becomes the fallback.
pub fn build_providers(args: &Cli) -> Vec<Box<dyn CreateTimeSeriesData + Send + Sync>> {
    match (args.prefer_api, args.data_dir.as_ref()) {
        (false, Some(dir)) => vec![
            Box::new(CsvFileVersion::new(dir)),
            Box::new(YahooApiVersion::default()),
        ], // local first
        (true, Some(dir)) => vec![
            Box::new(YahooApiVersion::default()),
            Box::new(CsvFileVersion::new(dir)),
        ], // API first
        (_, None) => vec![Box::new(YahooApiVersion::default())], // API only
    }
}

/// Fetch daily bars for `request`, failing when no provider has any.
pub async fn fetch_price_data(request: &SeriesRequest, args: &Cli) -> Result<OhlcvTimeSeries> {
    let providers = build_providers(args);
    let (series, signature) = get_timeseries_data_async(&providers, request).await?;

    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_fetch {
        log::info!(
            "📈 {}: {} bars from {} ({:?} to {:?})",
            series.ticker,
            series.klines(),
            signature,
            series.first_date(),
            series.last_date()
        );
    }
    #[cfg(not(debug_assertions))]
    let _ = signature;

    Ok(series)
}
