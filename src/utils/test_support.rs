//! Deterministic synthetic series for unit tests.

/// Approximately standard normal noise (Irwin–Hall sum of 12 uniforms) from a seeded LCG.
pub fn gaussian_noise(n: usize, seed: u64) -> Vec<f64> {
    let mut state = seed;
    let mut uniform = move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    (0..n)
        .map(|_| (0..12).map(|_| uniform()).sum::<f64>() - 6.0)
        .collect()
}

/// `start` plus the running sum of `drift + noise`.
pub fn random_walk(n: usize, start: f64, drift: f64, seed: u64) -> Vec<f64> {
    gaussian_noise(n, seed)
        .into_iter()
        .scan(start, |level, e| {
            *level += drift + e;
            Some(*level)
        })
        .collect()
}

/// Mean-reverting AR(1) around `mean`.
pub fn ar1(phi: f64, mean: f64, n: usize, seed: u64) -> Vec<f64> {
    let e = gaussian_noise(n, seed);
    let mut y = vec![mean; n];
    for t in 1..n {
        y[t] = mean + phi * (y[t - 1] - mean) + e[t];
    }
    y
}
