//! Chart indicators. Every output is aligned with its input (same length),
//! with NaN where the indicator is still warming up.

use serde::Serialize;

use crate::error::{AnalysisError, AnalysisResult};
use crate::transform::rolling::{align_to_input, rolling_mean};

fn mask_warm_up(mut values: Vec<f64>, first_valid: usize) -> Vec<f64> {
    for v in values.iter_mut().take(first_valid) {
        *v = f64::NAN;
    }
    values
}

/// Simple moving average, NaN for the first `window - 1` points.
pub fn sma(values: &[f64], window: usize) -> AnalysisResult<Vec<f64>> {
    Ok(align_to_input(&rolling_mean(values, window)?, values.len()))
}

/// Exponential moving average with smoothing `alpha`, recursive form
/// `e_t = alpha * x_t + (1 - alpha) * e_{t-1}` seeded with the first finite value.
/// Leading NaNs are passed through.
pub fn ewm(values: &[f64], alpha: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    let mut state: Option<f64> = None;
    for &x in values {
        if x.is_nan() {
            out.push(state.unwrap_or(f64::NAN));
            continue;
        }
        let next = match state {
            Some(prev) => alpha * x + (1.0 - alpha) * prev,
            None => x,
        };
        state = Some(next);
        out.push(next);
    }
    out
}

/// EMA over `span` periods (`alpha = 2 / (span + 1)`), NaN until `span` values are in.
pub fn ema(values: &[f64], span: usize) -> AnalysisResult<Vec<f64>> {
    if span == 0 {
        return Err(AnalysisError::InvalidParameter(
            "EMA span must be at least 1".to_string(),
        ));
    }
    let alpha = 2.0 / (span as f64 + 1.0);
    let first = values.iter().position(|v| !v.is_nan()).unwrap_or(values.len());
    Ok(mask_warm_up(ewm(values, alpha), first + span - 1))
}

/// Relative Strength Index with Wilder smoothing (`alpha = 1 / period`).
/// Values lie in `[0, 100]`; a window without losses reads 100.
pub fn rsi(closes: &[f64], period: usize) -> AnalysisResult<Vec<f64>> {
    if period == 0 {
        return Err(AnalysisError::InvalidParameter(
            "RSI period must be at least 1".to_string(),
        ));
    }
    // The first row has no previous close and counts as no movement
    let changes: Vec<f64> = std::iter::once(0.0)
        .chain(closes.windows(2).map(|w| w[1] - w[0]))
        .take(closes.len())
        .collect();
    let gains: Vec<f64> = changes.iter().map(|c| c.max(0.0)).collect();
    let losses: Vec<f64> = changes.iter().map(|c| (-c).max(0.0)).collect();

    let alpha = 1.0 / period as f64;
    let avg_gain = ewm(&gains, alpha);
    let avg_loss = ewm(&losses, alpha);

    let out = avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&g, &l)| {
            if l == 0.0 {
                100.0
            } else {
                100.0 - 100.0 / (1.0 + g / l)
            }
        })
        .collect();
    Ok(mask_warm_up(out, period - 1))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Macd {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// MACD line (fast EMA minus slow EMA), its signal EMA, and their difference.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> AnalysisResult<Macd> {
    if fast >= slow {
        return Err(AnalysisError::InvalidParameter(format!(
            "MACD fast span {} must be shorter than slow span {}",
            fast, slow
        )));
    }
    let fast_ema = ema(closes, fast)?;
    let slow_ema = ema(closes, slow)?;
    let line: Vec<f64> = fast_ema.iter().zip(&slow_ema).map(|(f, s)| f - s).collect();
    let signal_line = ema(&line, signal)?;
    let histogram = line.iter().zip(&signal_line).map(|(m, s)| m - s).collect();
    Ok(Macd {
        macd: line,
        signal: signal_line,
        histogram,
    })
}
