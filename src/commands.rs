//! One function per CLI subcommand: fetch what the report needs, then run it.

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use serde::Serialize;

use crate::analysis::{
    BetaReport, CapmSummary, ChartPeriod, StockAnalysis, analyze_stock, beta_report, capm_summary,
    run_forecast,
};
use crate::config::{ANALYSIS, FORECAST};
use crate::data::{SeriesRequest, fetch_price_data};
use crate::domain::{PriceSeries, Ticker};
use crate::models::ForecastReport;
use crate::utils::time_utils::{today_local, years_before};
use crate::{Cli, Command};

/// Result of one subcommand.
#[derive(Serialize, Debug, Clone)]
#[serde(untagged)]
pub enum Report {
    Forecast(ForecastReport),
    Capm(CapmSummary),
    Beta(BetaReport),
    Analysis(Box<StockAnalysis>),
}

pub async fn execute(cli: &Cli) -> Result<Report> {
    let today = today_local();
    match &cli.command {
        Command::Forecast { ticker } => forecast(cli, ticker, today).await.map(Report::Forecast),
        Command::Capm {
            tickers,
            years,
            risk_free,
            market,
        } => capm(cli, tickers, market, *years, *risk_free, today)
            .await
            .map(Report::Capm),
        Command::Beta {
            ticker,
            market,
            start,
            end,
            rolling_window,
            risk_free,
            sector,
        } => {
            let (start, end) = resolve_range(*start, *end, today)?;
            beta(cli, ticker, market, (start, end), *rolling_window, *risk_free, sector)
                .await
                .map(Report::Beta)
        }
        Command::Analyze {
            ticker,
            start,
            end,
            window,
            period,
        } => {
            let (start, end) = resolve_range(*start, *end, today)?;
            analyze(cli, ticker, (start, end), *window, *period, today)
                .await
                .map(|a| Report::Analysis(Box::new(a)))
        }
    }
}

/// Defaults: `end` is today, `start` one year before `end`.
fn resolve_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate)> {
    let end = end.unwrap_or(today);
    let start = start.unwrap_or_else(|| years_before(end, 1));
    if start >= end {
        bail!("Start date {} must be before end date {}", start, end);
    }
    Ok((start, end))
}

async fn closes(cli: &Cli, request: &SeriesRequest, adjusted: bool) -> Result<PriceSeries> {
    let data = fetch_price_data(request, cli).await?;
    let series = if adjusted {
        data.adj_close_series()
    } else {
        data.close_series()
    };
    series.with_context(|| format!("Unusable price data for {}", request.ticker))
}

async fn forecast(cli: &Cli, ticker: &Ticker, today: NaiveDate) -> Result<ForecastReport> {
    let (y, m, d) = FORECAST.history_start;
    let start = NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| anyhow!("Invalid forecast history start {}-{}-{}", y, m, d))?;

    let request = SeriesRequest::new(ticker.clone(), start, None);
    let series = closes(cli, &request, false).await?;
    let report = run_forecast(&series, today, &FORECAST)
        .with_context(|| format!("Forecast for {} failed", ticker))?;
    Ok(report)
}

async fn capm(
    cli: &Cli,
    tickers: &[Ticker],
    market: &Ticker,
    years: u32,
    risk_free: f64,
    today: NaiveDate,
) -> Result<CapmSummary> {
    let start = years_before(today, years);

    // Fetched one ticker at a time
    let mut stocks = Vec::with_capacity(tickers.len());
    for ticker in tickers {
        let request = SeriesRequest::new(ticker.clone(), start, Some(today));
        stocks.push(closes(cli, &request, false).await?);
    }
    let request = SeriesRequest::new(market.clone(), start, Some(today));
    let market = closes(cli, &request, false).await?;

    let summary = capm_summary(&stocks, &market, risk_free, ANALYSIS.trading_days_per_year)?;
    Ok(summary)
}

async fn beta(
    cli: &Cli,
    ticker: &Ticker,
    market: &Ticker,
    (start, end): (NaiveDate, NaiveDate),
    rolling_window: usize,
    risk_free: f64,
    sector: &[Ticker],
) -> Result<BetaReport> {
    let stock = closes(cli, &SeriesRequest::new(ticker.clone(), start, Some(end)), true).await?;
    let market = closes(cli, &SeriesRequest::new(market.clone(), start, Some(end)), true).await?;

    // A peer that cannot be loaded is left out of the comparison
    let mut peers = Vec::with_capacity(sector.len());
    for peer in sector {
        let request = SeriesRequest::new(peer.clone(), start, Some(end));
        match closes(cli, &request, true).await {
            Ok(series) => peers.push(series),
            Err(e) => log::warn!("⚠️ Skipping sector peer {}: {:#}", peer, e),
        }
    }

    let report = beta_report(
        &stock,
        &market,
        rolling_window,
        risk_free,
        &peers,
        ANALYSIS.trading_days_per_year,
    )
    .with_context(|| format!("Beta analysis for {} failed", ticker))?;
    Ok(report)
}

async fn analyze(
    cli: &Cli,
    ticker: &Ticker,
    (start, end): (NaiveDate, NaiveDate),
    window: usize,
    period: ChartPeriod,
    today: NaiveDate,
) -> Result<StockAnalysis> {
    let data = fetch_price_data(&SeriesRequest::new(ticker.clone(), start, Some(end)), cli).await?;
    let history_request = SeriesRequest::new(ticker.clone(), period.history_start(today), None);
    let chart_history = fetch_price_data(&history_request, cli).await?;

    let analysis = analyze_stock(&data, &chart_history, period, window, &ANALYSIS.stock)
        .with_context(|| format!("Analysis of {} failed", ticker))?;
    Ok(analysis)
}
