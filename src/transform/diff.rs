//! Differencing and its inverse.

/// Apply `d` rounds of first differencing. Each round shortens the series by one.
pub fn difference(values: &[f64], d: usize) -> Vec<f64> {
    let mut out = values.to_vec();
    for _ in 0..d {
        if out.len() < 2 {
            return Vec::new();
        }
        out = out.windows(2).map(|w| w[1] - w[0]).collect();
    }
    out
}

/// Undo `d` rounds of differencing on values that continue `history`.
///
/// `diffed` lives on the d-times differenced scale and follows the end of
/// `history` (the undifferenced observations). Each level is rebuilt with a
/// cumulative sum anchored at the last value of that level's history.
pub fn integrate(diffed: &[f64], history: &[f64], d: usize) -> Vec<f64> {
    let mut out = diffed.to_vec();
    for level in (0..d).rev() {
        let anchor = difference(history, level).last().copied().unwrap_or(0.0);
        out = out
            .iter()
            .scan(anchor, |acc, step| {
                *acc += step;
                Some(*acc)
            })
            .collect();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_difference_of_quadratic_is_constant() {
        let v: Vec<f64> = (0..6).map(|i| (i * i) as f64).collect();
        assert_eq!(difference(&v, 1), vec![1.0, 3.0, 5.0, 7.0, 9.0]);
        assert_eq!(difference(&v, 2), vec![2.0; 4]);
        assert_eq!(difference(&v, 0), v);
        assert!(difference(&[1.0], 1).is_empty());
    }

    #[test]
    fn integrate_continues_the_history() {
        let full: Vec<f64> = (0..10).map(|i| (i * i) as f64).collect();
        let (history, future) = full.split_at(7);
        for d in 0..3 {
            // Future differences taken over the whole series, tail only
            let diffed = difference(&full, d);
            let tail = &diffed[diffed.len() - future.len()..];
            assert_eq!(integrate(tail, history, d), future.to_vec(), "d = {d}");
        }
    }
}
