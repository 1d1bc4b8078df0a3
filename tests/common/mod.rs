//! Deterministic synthetic market data shared by the integration tests.
#![allow(dead_code)]

use std::fmt::Write;
use std::path::Path;

use chrono::{Days, NaiveDate};

const MUL: u64 = 6364136223846793005;
const INC: u64 = 1442695040888963407;

/// Approximately standard normal draws (sum of 12 uniforms), reproducible per seed.
pub fn noise(n: usize, seed: u64) -> Vec<f64> {
    let mut state = seed.wrapping_mul(MUL).wrapping_add(INC);
    (0..n)
        .map(|_| {
            let mut sum = 0.0;
            for _ in 0..12 {
                state = state.wrapping_mul(MUL).wrapping_add(INC);
                sum += (state >> 11) as f64 / (1u64 << 53) as f64;
            }
            sum - 6.0
        })
        .collect()
}

/// Prices compounding the given daily log returns from `start`.
pub fn compound(start: f64, log_returns: &[f64]) -> Vec<f64> {
    let mut price = start;
    let mut out = Vec::with_capacity(log_returns.len() + 1);
    out.push(price);
    for r in log_returns {
        price *= r.exp();
        out.push(price);
    }
    out
}

/// Geometric random walk with 1% daily volatility, `n` prices long.
pub fn price_path(n: usize, start: f64, seed: u64) -> Vec<f64> {
    let returns: Vec<f64> = noise(n.saturating_sub(1), seed).iter().map(|e| 0.01 * e).collect();
    compound(start, &returns)
}

/// `n` calendar days ending at (and including) `last`.
pub fn days_ending(last: NaiveDate, n: usize) -> Vec<NaiveDate> {
    let first = last
        .checked_sub_days(Days::new(n.saturating_sub(1) as u64))
        .unwrap();
    first.iter_days().take(n).collect()
}

/// Write `<dir>/<stem>.csv` in the usual downloader layout.
pub fn write_csv(dir: &Path, stem: &str, dates: &[NaiveDate], closes: &[f64]) {
    let mut text = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
    for (date, close) in dates.iter().zip(closes) {
        writeln!(
            text,
            "{},{:.4},{:.4},{:.4},{:.4},{:.4},{}",
            date.format("%Y-%m-%d"),
            close * 0.995,
            close * 1.01,
            close * 0.99,
            close,
            close,
            1_000_000
        )
        .unwrap();
    }
    std::fs::write(dir.join(format!("{}.csv", stem)), text).unwrap();
}
