//! CAPM beta, alpha and expected returns.
//!
//! The multi-stock report works in percent throughout: daily returns in
//! percent, the risk-free rate in percent per year, expected returns in
//! percent per year. The single-stock beta report regresses fractional
//! returns, which leaves beta unchanged and puts alpha in daily fraction units.

use chrono::NaiveDate;
use serde::Serialize;

use crate::analysis::risk::{
    CorrelationMatrix, annualized_volatility, correlation_matrix, sharpe_ratio,
};
use crate::domain::{PricePoint, PriceSeries, Ticker};
use crate::error::{AnalysisError, AnalysisResult};
use crate::utils::maths_utils::{linear_fit, mean, sample_covariance};
use crate::utils::ols::OlsFit;

/// Each price divided by the first one.
pub fn normalize(prices: &[f64]) -> AnalysisResult<Vec<f64>> {
    let first = *prices.first().ok_or(AnalysisError::EmptyData)?;
    if first == 0.0 {
        return Err(AnalysisError::InvalidParameter(
            "cannot normalise a series starting at zero".to_string(),
        ));
    }
    Ok(prices.iter().map(|p| p / first).collect())
}

/// Day-over-day change in percent, same length as `prices` with the first row 0.
pub fn daily_returns_pct(prices: &[f64]) -> Vec<f64> {
    if prices.is_empty() {
        return Vec::new();
    }
    std::iter::once(0.0)
        .chain(prices.windows(2).map(|w| (w[1] - w[0]) / w[0] * 100.0))
        .collect()
}

/// Fractional day-over-day change, one shorter than `prices`.
pub fn pct_change(prices: &[f64]) -> Vec<f64> {
    prices.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

/// Least-squares line `stock = beta * market + alpha`, returned as `(beta, alpha)`.
pub fn calculate_beta(market_returns: &[f64], stock_returns: &[f64]) -> AnalysisResult<(f64, f64)> {
    linear_fit(market_returns, stock_returns)
}

pub fn annualized_market_return(market_daily_pct: &[f64], trading_days: usize) -> f64 {
    mean(market_daily_pct) * trading_days as f64
}

/// `rf + beta * (rm - rf)`.
pub fn expected_return(risk_free: f64, beta: f64, market_return: f64) -> f64 {
    risk_free + beta * (market_return - risk_free)
}

/// Market-model OLS with standard errors, the numbers a regression table shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapmRegression {
    pub beta: f64,
    pub alpha: f64,
    pub beta_std_err: f64,
    pub alpha_std_err: f64,
    pub beta_t: f64,
    pub alpha_t: f64,
    pub r_squared: f64,
    pub nobs: usize,
}

pub fn capm_regression(
    stock_returns: &[f64],
    market_returns: &[f64],
) -> AnalysisResult<CapmRegression> {
    let design = [vec![1.0; market_returns.len()], market_returns.to_vec()];
    let fit = OlsFit::fit(stock_returns, &design)?;
    Ok(CapmRegression {
        alpha: fit.params[0],
        beta: fit.params[1],
        alpha_std_err: fit.std_errors[0],
        beta_std_err: fit.std_errors[1],
        alpha_t: fit.t_value(0),
        beta_t: fit.t_value(1),
        r_squared: fit.r_squared,
        nobs: fit.nobs,
    })
}

/// Sample cov(stock, market) / var(market) over each full trailing window.
/// A window where the market does not move yields NaN.
pub fn rolling_beta(
    stock_returns: &[f64],
    market_returns: &[f64],
    window: usize,
) -> AnalysisResult<Vec<f64>> {
    if stock_returns.len() != market_returns.len() {
        return Err(AnalysisError::InvalidParameter(format!(
            "rolling beta needs aligned returns, got {} and {}",
            stock_returns.len(),
            market_returns.len()
        )));
    }
    if window < 2 {
        return Err(AnalysisError::InvalidParameter(
            "rolling beta window must be at least 2".to_string(),
        ));
    }
    Ok(stock_returns
        .windows(window)
        .zip(market_returns.windows(window))
        .map(|(s, m)| {
            let var = sample_covariance(m, m);
            if var == 0.0 {
                f64::NAN
            } else {
                sample_covariance(s, m) / var
            }
        })
        .collect())
}

// ============================================================================
// Multi-stock expected-return report
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapmRow {
    pub ticker: Ticker,
    pub beta: f64,
    pub alpha: f64,
    /// Annual, percent.
    pub expected_return: f64,
    /// Annualised std of daily percent returns.
    pub volatility: f64,
    pub sharpe: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapmSummary {
    pub market: Ticker,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Trading days shared by every series.
    pub observations: usize,
    /// Annualised market return, percent.
    pub market_return: f64,
    pub risk_free: f64,
    pub rows: Vec<CapmRow>,
    /// Daily percent returns, stocks first then the market.
    pub correlation: CorrelationMatrix,
}

/// Beta, CAPM expected return, volatility and Sharpe ratio of each stock
/// against `market`, on the dates all series share.
pub fn capm_summary(
    stocks: &[PriceSeries],
    market: &PriceSeries,
    risk_free_pct: f64,
    trading_days: usize,
) -> AnalysisResult<CapmSummary> {
    if stocks.is_empty() {
        return Err(AnalysisError::InvalidParameter(
            "at least one stock is required".to_string(),
        ));
    }

    let mut all: Vec<&PriceSeries> = stocks.iter().collect();
    all.push(market);
    let aligned = PriceSeries::inner_join(&all)?;
    let (Some(&start), Some(&end)) = (aligned.dates.first(), aligned.dates.last()) else {
        return Err(AnalysisError::InvalidSeries(
            "stocks and market share no trading days".to_string(),
        ));
    };
    if aligned.dates.len() < 3 {
        return Err(AnalysisError::InsufficientData {
            needed: 3,
            got: aligned.dates.len(),
        });
    }

    let returns: Vec<Vec<f64>> = aligned.columns.iter().map(|c| daily_returns_pct(c)).collect();
    let (stock_returns, market_returns) = returns.split_at(stocks.len());
    let market_returns = &market_returns[0];

    let market_return = annualized_market_return(market_returns, trading_days);

    let rows = stocks
        .iter()
        .zip(stock_returns)
        .map(|(stock, r)| {
            let (beta, alpha) = calculate_beta(market_returns, r)?;
            let expected = expected_return(risk_free_pct, beta, market_return);
            let volatility = annualized_volatility(r, trading_days);
            if volatility == 0.0 {
                return Err(AnalysisError::Computation(format!(
                    "{} has zero volatility, Sharpe ratio undefined",
                    stock.ticker
                )));
            }
            Ok(CapmRow {
                ticker: stock.ticker.clone(),
                beta,
                alpha,
                expected_return: expected,
                volatility,
                sharpe: (expected - risk_free_pct) / volatility,
            })
        })
        .collect::<AnalysisResult<Vec<CapmRow>>>()?;

    let labels = all.iter().map(|s| s.ticker.to_string()).collect();
    let correlation = correlation_matrix(labels, &returns)?;

    Ok(CapmSummary {
        market: market.ticker.clone(),
        start,
        end,
        observations: aligned.dates.len(),
        market_return,
        risk_free: risk_free_pct,
        rows,
        correlation,
    })
}

// ============================================================================
// Single-stock beta report
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorBeta {
    pub ticker: Ticker,
    pub beta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BetaReport {
    pub stock: Ticker,
    pub market: Ticker,
    pub regression: CapmRegression,
    /// Beta over each trailing window, dated at the window's last day.
    pub rolling_beta: Vec<PricePoint>,
    pub rolling_window: usize,
    /// Peers that could be aligned with the market; others are skipped.
    pub sector_betas: Vec<SectorBeta>,
    pub sharpe: f64,
    pub risk_free: f64,
}

/// Joined dates and fractional returns of `stock` and `market`.
fn aligned_returns(
    stock: &PriceSeries,
    market: &PriceSeries,
) -> AnalysisResult<(Vec<NaiveDate>, Vec<f64>, Vec<f64>)> {
    let aligned = PriceSeries::inner_join(&[stock, market])?;
    let dates = aligned.dates.iter().skip(1).copied().collect();
    Ok((
        dates,
        pct_change(&aligned.columns[0]),
        pct_change(&aligned.columns[1]),
    ))
}

/// Regression summary, rolling beta, peer betas and Sharpe ratio of `stock`
/// against `market`. `risk_free_pct` is an annual percentage.
pub fn beta_report(
    stock: &PriceSeries,
    market: &PriceSeries,
    rolling_window: usize,
    risk_free_pct: f64,
    sector: &[PriceSeries],
    trading_days: usize,
) -> AnalysisResult<BetaReport> {
    let (dates, stock_returns, market_returns) = aligned_returns(stock, market)?;
    let regression = capm_regression(&stock_returns, &market_returns)?;

    let rolling = rolling_beta(&stock_returns, &market_returns, rolling_window)?;
    let rolling_beta = dates
        .iter()
        .skip(rolling_window.saturating_sub(1))
        .zip(rolling)
        .filter(|(_, beta)| beta.is_finite())
        .map(|(&date, price)| PricePoint { date, price })
        .collect();

    let sector_betas = sector
        .iter()
        .filter_map(|peer| {
            let beta = aligned_returns(peer, market)
                .and_then(|(_, s, m)| capm_regression(&s, &m))
                .map(|r| r.beta);
            match beta {
                Ok(beta) => Some(SectorBeta {
                    ticker: peer.ticker.clone(),
                    beta,
                }),
                Err(e) => {
                    log::info!("Skipping sector peer {}: {}", peer.ticker, e);
                    None
                }
            }
        })
        .collect();

    let sharpe = sharpe_ratio(&stock_returns, risk_free_pct / 100.0, trading_days)?;

    Ok(BetaReport {
        stock: stock.ticker.clone(),
        market: market.ticker.clone(),
        regression,
        rolling_beta,
        rolling_window,
        sector_betas,
        sharpe,
        risk_free: risk_free_pct,
    })
}
