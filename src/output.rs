//! Plain-text and JSON rendering of subcommand reports.

use std::fmt::Write;

use anyhow::Result;
use itertools::{Itertools, MinMaxResult};

use crate::analysis::{BetaReport, CapmSummary, StockAnalysis};
use crate::commands::Report;
use crate::domain::CandleType;
use crate::models::ForecastReport;
use crate::utils::time_utils::format_date;

pub fn render(report: &Report, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(report)?);
    }
    match report {
        Report::Forecast(r) => render_forecast(r),
        Report::Capm(r) => render_capm(r),
        Report::Beta(r) => render_beta(r),
        Report::Analysis(r) => render_analysis(r),
    }
}

/// Fixed decimals, or "n/a" for NaN/inf.
fn num(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        format!("{:.*}", decimals, value)
    } else {
        "n/a".to_string()
    }
}

fn last_finite(values: &[f64]) -> Option<f64> {
    values.iter().rev().copied().find(|v| v.is_finite())
}

pub fn render_forecast(report: &ForecastReport) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "{} forecast, {} (ADF p-value {:.3} after {} difference(s))",
        report.ticker, report.order, report.p_value, report.order.d
    )?;
    writeln!(out, "RMSE (scaled): {:.2}", report.rmse)?;
    writeln!(out)?;
    writeln!(out, "{:<12} {:>12}", "Date", "Close")?;
    for row in report.table.rows() {
        writeln!(out, "{:<12} {:>12}", format_date(row.date), num(row.close, 2))?;
    }
    Ok(out)
}

pub fn render_capm(summary: &CapmSummary) -> Result<String> {
    let mut out = String::new();
    writeln!(
        out,
        "CAPM vs {}, {} to {} ({} trading days)",
        summary.market,
        format_date(summary.start),
        format_date(summary.end),
        summary.observations
    )?;
    writeln!(
        out,
        "Market return {}% | Risk-free {}%",
        num(summary.market_return, 2),
        num(summary.risk_free, 2)
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "{:<8} {:>8} {:>8} {:>12} {:>12} {:>8}",
        "Ticker", "Beta", "Alpha", "Exp. ret %", "Vol %", "Sharpe"
    )?;
    for row in &summary.rows {
        writeln!(
            out,
            "{:<8} {:>8} {:>8} {:>12} {:>12} {:>8}",
            row.ticker.as_str(),
            num(row.beta, 2),
            num(row.alpha, 4),
            num(row.expected_return, 2),
            num(row.volatility, 2),
            num(row.sharpe, 2)
        )?;
    }

    let matrix = &summary.correlation;
    writeln!(out)?;
    writeln!(out, "Correlation of daily returns")?;
    writeln!(
        out,
        "{:<8} {}",
        "",
        matrix.labels.iter().map(|l| format!("{:>8}", l)).join(" ")
    )?;
    for (label, row) in matrix.labels.iter().zip(&matrix.values) {
        writeln!(
            out,
            "{:<8} {}",
            label,
            row.iter().map(|v| format!("{:>8}", num(*v, 2))).join(" ")
        )?;
    }
    Ok(out)
}

pub fn render_beta(report: &BetaReport) -> Result<String> {
    let reg = &report.regression;
    let mut out = String::new();
    writeln!(out, "{} vs {} ({} observations)", report.stock, report.market, reg.nobs)?;
    writeln!(out, "{:<8} {:>10} {:>10} {:>8}", "", "Coef", "Std err", "t")?;
    writeln!(
        out,
        "{:<8} {:>10} {:>10} {:>8}",
        "Beta",
        num(reg.beta, 4),
        num(reg.beta_std_err, 4),
        num(reg.beta_t, 2)
    )?;
    writeln!(
        out,
        "{:<8} {:>10} {:>10} {:>8}",
        "Alpha",
        num(reg.alpha, 6),
        num(reg.alpha_std_err, 6),
        num(reg.alpha_t, 2)
    )?;
    writeln!(out, "R-squared {}", num(reg.r_squared, 4))?;
    writeln!(
        out,
        "Sharpe ratio {} (risk-free {}%)",
        num(report.sharpe, 4),
        num(report.risk_free, 2)
    )?;

    let betas = report.rolling_beta.iter().map(|p| p.price);
    match betas.minmax_by(|a, b| a.total_cmp(b)) {
        MinMaxResult::NoElements => writeln!(
            out,
            "Rolling beta ({} days): not enough data",
            report.rolling_window
        )?,
        MinMaxResult::OneElement(only) => writeln!(
            out,
            "Rolling beta ({} days): {}",
            report.rolling_window,
            num(only, 2)
        )?,
        MinMaxResult::MinMax(lo, hi) => {
            let latest = report.rolling_beta.last().map_or(f64::NAN, |p| p.price);
            writeln!(
                out,
                "Rolling beta ({} days): latest {}, range {} to {}",
                report.rolling_window,
                num(latest, 2),
                num(lo, 2),
                num(hi, 2)
            )?
        }
    }

    if !report.sector_betas.is_empty() {
        writeln!(out)?;
        writeln!(out, "{:<8} {:>8}", "Sector", "Beta")?;
        for peer in &report.sector_betas {
            writeln!(out, "{:<8} {:>8}", peer.ticker.as_str(), num(peer.beta, 2))?;
        }
    }
    Ok(out)
}

pub fn render_analysis(analysis: &StockAnalysis) -> Result<String> {
    let mut out = String::new();
    let change = &analysis.daily_change;
    writeln!(
        out,
        "{} last close {} ({:+.2})",
        analysis.ticker,
        num(change.last_close, 2),
        change.change
    )?;
    writeln!(
        out,
        "Returns: {}",
        analysis
            .returns
            .iter()
            .map(|r| format!(
                "{} {}",
                r.period,
                r.value.map_or("n/a".to_string(), |v| format!("{:+.2}%", v))
            ))
            .join(" | ")
    )?;

    writeln!(out)?;
    writeln!(
        out,
        "{:<12} {:>10} {:>10} {:>10} {:>10} {:>8} {:>14}",
        "Date", "Open", "High", "Low", "Close", "Range", "Volume"
    )?;
    for c in &analysis.recent {
        let marker = match c.get_type() {
            CandleType::Bullish => "+",
            CandleType::Bearish => "-",
        };
        writeln!(
            out,
            "{:<12} {:>10} {:>10} {:>10} {:>9}{} {:>8} {:>14}",
            format_date(c.date),
            num(c.open_price, 2),
            num(c.high_price, 2),
            num(c.low_price, 2),
            num(c.close_price, 2),
            marker,
            num(c.range(), 2),
            num(c.volume, 0)
        )?;
    }

    writeln!(out)?;
    let volatility: Vec<f64> = analysis.volatility.iter().map(|p| p.price).collect();
    writeln!(
        out,
        "Volatility ({}-day std of close): {}",
        analysis.volatility_window,
        last_finite(&volatility).map_or("n/a".to_string(), |v| num(v, 2))
    )?;

    let chart = &analysis.chart;
    let latest = |values: &[f64]| last_finite(values).map_or("n/a".to_string(), |v| num(v, 2));
    writeln!(
        out,
        "Chart {}: {} candles | RSI {} | MACD {} / signal {} | SMA {}",
        chart.period,
        chart.candles.len(),
        latest(&chart.rsi),
        latest(&chart.macd.macd),
        latest(&chart.macd.signal),
        latest(&chart.moving_average)
    )?;
    Ok(out)
}
