//! Derivative-free minimisation (Nelder–Mead simplex) with box bounds.

use std::cmp::Ordering;

#[derive(Debug, Clone)]
pub struct SimplexSettings {
    pub max_iter: usize,
    /// Stop once the spread of objective values across the simplex drops below this.
    pub tolerance: f64,
    /// Size of the initial simplex edges (relative for non-zero starts).
    pub initial_step: f64,
}

impl Default for SimplexSettings {
    fn default() -> Self {
        Self {
            max_iter: 2000,
            tolerance: 1e-10,
            initial_step: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Minimum {
    pub point: Vec<f64>,
    pub value: f64,
    pub iterations: usize,
    pub converged: bool,
}

// Standard reflection / expansion / contraction / shrink coefficients
const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Minimise `objective` from `start`. Each coordinate is clamped to its
/// `(lo, hi)` pair in `bounds` (if given) before evaluation.
pub fn nelder_mead<F>(
    objective: F,
    start: &[f64],
    bounds: Option<&[(f64, f64)]>,
    settings: &SimplexSettings,
) -> Minimum
where
    F: Fn(&[f64]) -> f64,
{
    let dim = start.len();
    if dim == 0 {
        return Minimum {
            point: Vec::new(),
            value: objective(&[]),
            iterations: 0,
            converged: true,
        };
    }

    let clamp = |p: Vec<f64>| -> Vec<f64> {
        match bounds {
            Some(b) => p
                .into_iter()
                .enumerate()
                .map(|(i, x)| b.get(i).map_or(x, |&(lo, hi)| x.clamp(lo, hi)))
                .collect(),
            None => p,
        }
    };
    // NaN objective values sort last so they get replaced first
    let eval = |p: &[f64]| {
        let v = objective(p);
        if v.is_nan() { f64::INFINITY } else { v }
    };

    let mut vertices: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
    vertices.push(clamp(start.to_vec()));
    for i in 0..dim {
        let mut v = start.to_vec();
        v[i] += if v[i].abs() > 1e-8 {
            settings.initial_step * v[i].abs()
        } else {
            settings.initial_step
        };
        vertices.push(clamp(v));
    }
    let mut values: Vec<f64> = vertices.iter().map(|v| eval(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < settings.max_iter {
        iterations += 1;

        let mut order: Vec<usize> = (0..=dim).collect();
        order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap_or(Ordering::Equal));
        let (best, second_worst, worst) = (order[0], order[dim - 1], order[dim]);

        if (values[worst] - values[best]).abs() <= settings.tolerance {
            converged = true;
            break;
        }

        let centroid: Vec<f64> = (0..dim)
            .map(|j| {
                vertices
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != worst)
                    .map(|(_, v)| v[j])
                    .sum::<f64>()
                    / dim as f64
            })
            .collect();
        let toward = |from: &[f64], coef: f64| -> Vec<f64> {
            centroid
                .iter()
                .zip(from)
                .map(|(c, f)| c + coef * (f - c))
                .collect()
        };

        let reflected = clamp(toward(&vertices[worst], -REFLECT));
        let reflected_value = eval(&reflected);

        if reflected_value < values[best] {
            let expanded = clamp(toward(&reflected, EXPAND));
            let expanded_value = eval(&expanded);
            if expanded_value < reflected_value {
                vertices[worst] = expanded;
                values[worst] = expanded_value;
            } else {
                vertices[worst] = reflected;
                values[worst] = reflected_value;
            }
            continue;
        }

        if reflected_value < values[second_worst] {
            vertices[worst] = reflected;
            values[worst] = reflected_value;
            continue;
        }

        // Contract toward whichever of reflected/worst is better
        let (anchor, anchor_value) = if reflected_value < values[worst] {
            (reflected, reflected_value)
        } else {
            (vertices[worst].clone(), values[worst])
        };
        let contracted = clamp(toward(&anchor, CONTRACT));
        let contracted_value = eval(&contracted);
        if contracted_value < anchor_value {
            vertices[worst] = contracted;
            values[worst] = contracted_value;
            continue;
        }

        let best_vertex = vertices[best].clone();
        for i in 0..=dim {
            if i == best {
                continue;
            }
            let shrunk = best_vertex
                .iter()
                .zip(&vertices[i])
                .map(|(b, v)| b + SHRINK * (v - b))
                .collect();
            vertices[i] = clamp(shrunk);
            values[i] = eval(&vertices[i]);
        }
    }

    let best = values
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0);

    Minimum {
        point: vertices[best].clone(),
        value: values[best],
        iterations,
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn finds_bowl_minimum() {
        let min = nelder_mead(
            |x| (x[0] - 2.0).powi(2) + (x[1] + 1.0).powi(2),
            &[0.0, 0.0],
            None,
            &SimplexSettings::default(),
        );
        assert!(min.converged);
        assert_relative_eq!(min.point[0], 2.0, epsilon = 1e-4);
        assert_relative_eq!(min.point[1], -1.0, epsilon = 1e-4);
    }

    #[test]
    fn respects_bounds() {
        let min = nelder_mead(
            |x| (x[0] - 5.0).powi(2),
            &[0.0],
            Some(&[(-0.99, 0.99)]),
            &SimplexSettings::default(),
        );
        assert!(min.point[0] <= 0.99);
        assert_relative_eq!(min.point[0], 0.99, epsilon = 1e-6);
    }

    #[test]
    fn handles_rosenbrock_valley() {
        let settings = SimplexSettings {
            max_iter: 10_000,
            ..Default::default()
        };
        let min = nelder_mead(
            |x| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2),
            &[-1.2, 1.0],
            None,
            &settings,
        );
        assert_relative_eq!(min.point[0], 1.0, epsilon = 1e-2);
        assert_relative_eq!(min.point[1], 1.0, epsilon = 2e-2);
    }
}
