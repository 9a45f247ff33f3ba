//! Nelder-Mead downhill simplex.

use std::cmp::Ordering;

use super::{OptimizationConfig, OptimizationResult};
use crate::error::{MathError, MathResult};

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Minimises `objective` starting from `initial`.
///
/// The initial simplex is `initial` plus one vertex per dimension displaced
/// by the matching entry of `steps`. Non-finite objective values are treated
/// as `+inf`, so the simplex walks away from them. Hitting the iteration cap
/// is not an error: the best vertex is returned with `converged = false`.
///
/// # Example
///
/// ```rust
/// use strata_math::optimization::{nelder_mead, OptimizationConfig};
///
/// let rosenbrock = |p: &[f64]| (1.0 - p[0]).powi(2) + 100.0 * (p[1] - p[0] * p[0]).powi(2);
/// let result = nelder_mead(rosenbrock, &[-1.2, 1.0], &[0.5, 0.5], &OptimizationConfig::default()).unwrap();
/// assert!((result.parameters[0] - 1.0).abs() < 1e-4);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    steps: &[f64],
    config: &OptimizationConfig,
) -> MathResult<OptimizationResult>
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    if n == 0 {
        return Err(MathError::invalid_input("nelder-mead needs at least one parameter"));
    }
    if steps.len() != n {
        return Err(MathError::invalid_input(format!(
            "expected {n} initial steps, got {}",
            steps.len()
        )));
    }

    let eval = |p: &[f64]| {
        let v = objective(p);
        if v.is_finite() {
            v
        } else {
            f64::INFINITY
        }
    };

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(n + 1);
    simplex.push(initial.to_vec());
    for (i, step) in steps.iter().enumerate() {
        let mut vertex = initial.to_vec();
        vertex[i] += step;
        simplex.push(vertex);
    }
    let mut values: Vec<f64> = simplex.iter().map(|v| eval(v)).collect();

    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iterations {
        order(&mut simplex, &mut values);

        let spread = values[n] - values[0];
        if spread.abs() <= config.tolerance || diameter(&simplex) <= config.parameter_tolerance {
            converged = true;
            break;
        }
        iterations += 1;

        let centroid = centroid(&simplex[..n]);
        let worst = simplex[n].clone();

        let reflected = along(&centroid, &worst, -REFLECTION);
        let fr = eval(&reflected);

        if fr < values[0] {
            let expanded = along(&centroid, &worst, -EXPANSION);
            let fe = eval(&expanded);
            if fe < fr {
                simplex[n] = expanded;
                values[n] = fe;
            } else {
                simplex[n] = reflected;
                values[n] = fr;
            }
        } else if fr < values[n - 1] {
            simplex[n] = reflected;
            values[n] = fr;
        } else {
            let (contracted, fc) = if fr < values[n] {
                let outside = along(&centroid, &worst, -CONTRACTION);
                let f = eval(&outside);
                (outside, f)
            } else {
                let inside = along(&centroid, &worst, CONTRACTION);
                let f = eval(&inside);
                (inside, f)
            };

            if fc < values[n].min(fr) {
                simplex[n] = contracted;
                values[n] = fc;
            } else {
                let best = simplex[0].clone();
                for j in 1..=n {
                    for (x, b) in simplex[j].iter_mut().zip(&best) {
                        *x = b + SHRINK * (*x - b);
                    }
                    values[j] = eval(&simplex[j]);
                }
            }
        }
    }

    order(&mut simplex, &mut values);
    Ok(OptimizationResult {
        parameters: simplex.swap_remove(0),
        objective_value: values[0],
        iterations,
        converged,
    })
}

/// Sorts vertices by ascending objective value.
fn order(simplex: &mut Vec<Vec<f64>>, values: &mut Vec<f64>) {
    let mut paired: Vec<(f64, Vec<f64>)> = values.drain(..).zip(simplex.drain(..)).collect();
    paired.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    for (value, vertex) in paired {
        values.push(value);
        simplex.push(vertex);
    }
}

fn centroid(vertices: &[Vec<f64>]) -> Vec<f64> {
    let n = vertices.len() as f64;
    let mut c = vec![0.0; vertices[0].len()];
    for v in vertices {
        for (ci, vi) in c.iter_mut().zip(v) {
            *ci += vi / n;
        }
    }
    c
}

/// `centroid + t * (point - centroid)`.
fn along(centroid: &[f64], point: &[f64], t: f64) -> Vec<f64> {
    centroid
        .iter()
        .zip(point)
        .map(|(c, p)| c + t * (p - c))
        .collect()
}

fn diameter(simplex: &[Vec<f64>]) -> f64 {
    let best = &simplex[0];
    simplex[1..]
        .iter()
        .map(|v| {
            v.iter()
                .zip(best)
                .map(|(a, b)| (a - b) * (a - b))
                .sum::<f64>()
                .sqrt()
        })
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_quadratic_bowl() {
        let f = |p: &[f64]| (p[0] - 3.0).powi(2) + 2.0 * (p[1] + 1.0).powi(2);
        let result = nelder_mead(f, &[0.0, 0.0], &[1.0, 1.0], &OptimizationConfig::default()).unwrap();

        assert!(result.converged);
        assert_abs_diff_eq!(result.parameters[0], 3.0, epsilon = 1e-5);
        assert_abs_diff_eq!(result.parameters[1], -1.0, epsilon = 1e-5);
        assert!(result.objective_value < 1e-10);
    }

    #[test]
    fn test_rosenbrock() {
        let f = |p: &[f64]| (1.0 - p[0]).powi(2) + 100.0 * (p[1] - p[0] * p[0]).powi(2);
        let config = OptimizationConfig::default().with_max_iterations(5_000);
        let result = nelder_mead(f, &[-1.2, 1.0], &[0.5, 0.5], &config).unwrap();

        assert_abs_diff_eq!(result.parameters[0], 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(result.parameters[1], 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_avoids_non_finite_region() {
        // Undefined for x <= 0; minimum at x = 1.
        let f = |p: &[f64]| p[0] - p[0].ln();
        let result = nelder_mead(f, &[2.0], &[0.5], &OptimizationConfig::default()).unwrap();
        assert_abs_diff_eq!(result.parameters[0], 1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_iteration_cap() {
        let f = |p: &[f64]| p[0] * p[0] + p[1] * p[1];
        let config = OptimizationConfig::default().with_max_iterations(3);
        let result = nelder_mead(f, &[5.0, 5.0], &[0.1, 0.1], &config).unwrap();
        assert!(!result.converged);
        assert_eq!(result.iterations, 3);
    }

    #[test]
    fn test_rejects_mismatched_steps() {
        let f = |p: &[f64]| p[0];
        assert!(nelder_mead(f, &[1.0, 2.0], &[0.1], &OptimizationConfig::default()).is_err());
        assert!(nelder_mead(f, &[], &[], &OptimizationConfig::default()).is_err());
    }
}
