//! Trailing window statistics.
//!
//! Outputs keep only full windows: the first `window - 1` positions (the
//! ones a dataframe would fill with NaN) are dropped, so the result has
//! `len - window + 1` entries, or none when the input is shorter than the window.

use crate::error::{AnalysisError, AnalysisResult};
use crate::utils::maths_utils::sample_std;

fn check_window(window: usize) -> AnalysisResult<()> {
    if window == 0 {
        return Err(AnalysisError::InvalidParameter(
            "rolling window must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Simple moving average over each full trailing window.
pub fn rolling_mean(values: &[f64], window: usize) -> AnalysisResult<Vec<f64>> {
    check_window(window)?;
    if values.len() < window {
        return Ok(Vec::new());
    }

    // Running sum, re-based each window to avoid drift on long inputs
    let mut out = Vec::with_capacity(values.len() - window + 1);
    let mut sum: f64 = values[..window].iter().sum();
    out.push(sum / window as f64);
    for i in window..values.len() {
        sum += values[i] - values[i - window];
        out.push(sum / window as f64);
        if i % 1024 == 0 {
            sum = values[i + 1 - window..=i].iter().sum();
        }
    }
    Ok(out)
}

/// Sample standard deviation of each full trailing window.
pub fn rolling_std(values: &[f64], window: usize) -> AnalysisResult<Vec<f64>> {
    check_window(window)?;
    Ok(values.windows(window).map(sample_std).collect())
}

/// Pads a full-window output back to input length with leading NaNs, so it
/// lines up with the dates of the input series.
pub fn align_to_input(full_windows: &[f64], input_len: usize) -> Vec<f64> {
    let pad = input_len.saturating_sub(full_windows.len());
    std::iter::repeat_n(f64::NAN, pad)
        .chain(full_windows.iter().copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_drops_warm_up_rows() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let out = rolling_mean(&v, 3).unwrap();
        assert_eq!(out, vec![2.0, 3.0, 4.0, 5.0]);
        assert!(rolling_mean(&v, 7).unwrap().is_empty());
        assert_eq!(rolling_mean(&v, 1).unwrap(), v.to_vec());
        assert!(rolling_mean(&v, 0).is_err());
    }

    #[test]
    fn long_input_does_not_drift() {
        let v: Vec<f64> = (0..5000).map(|i| 1e6 + (i % 13) as f64 * 0.1).collect();
        let out = rolling_mean(&v, 7).unwrap();
        let last = &v[v.len() - 7..];
        assert_relative_eq!(
            *out.last().unwrap(),
            last.iter().sum::<f64>() / 7.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn std_uses_sample_denominator() {
        let out = rolling_std(&[1.0, 2.0, 3.0, 5.0], 3).unwrap();
        assert_eq!(out.len(), 2);
        assert_relative_eq!(out[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn alignment_pads_front() {
        let aligned = align_to_input(&[2.0, 3.0], 4);
        assert!(aligned[0].is_nan() && aligned[1].is_nan());
        assert_eq!(&aligned[2..], &[2.0, 3.0]);
    }
}
