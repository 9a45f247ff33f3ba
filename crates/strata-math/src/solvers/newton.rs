//! Newton-Raphson root-finding algorithm.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Step size for central-difference derivatives.
const DERIVATIVE_STEP: f64 = 1e-8;

/// Newton-Raphson root-finding algorithm.
///
/// Uses the iteration `x_{n+1} = x_n - f(x_n) / f'(x_n)`. Converges when
/// either `|f(x)|` or the step falls below the tolerance; a vanishing
/// derivative is reported as [`MathError::DivisionByZero`].
///
/// # Example
///
/// ```rust
/// use strata_math::solvers::{newton_raphson, SolverConfig};
///
/// let f = |x: f64| x * x - 2.0;
/// let df = |x: f64| 2.0 * x;
///
/// let result = newton_raphson(f, df, 1.5, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn newton_raphson<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let mut x = initial_guess;

    for iteration in 0..config.max_iterations {
        let fx = f(x);
        if !fx.is_finite() {
            return Err(MathError::invalid_input(format!(
                "objective is not finite at {x}"
            )));
        }

        if fx.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }

        let dfx = df(x);
        if !dfx.is_finite() || dfx.abs() < 1e-15 {
            return Err(MathError::DivisionByZero { value: dfx });
        }

        let step = fx / dfx;
        x -= step;

        // Relative step test; absolute tolerance alone never triggers for
        // roots in the millions.
        if step.abs() < config.tolerance * x.abs().max(1.0) {
            let final_fx = f(x);
            return Ok(SolverResult {
                root: x,
                iterations: iteration + 1,
                residual: final_fx,
            });
        }
    }

    let residual = f(x).abs();
    log::debug!(
        "newton-raphson stopped after {} iterations at x = {x} (residual {residual:.2e})",
        config.max_iterations
    );
    Err(MathError::convergence_failed(config.max_iterations, residual))
}

/// Newton-Raphson with a central-difference derivative.
pub fn newton_raphson_numerical<F>(
    f: F,
    initial_guess: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let df = |x: f64| {
        let h = DERIVATIVE_STEP * x.abs().max(1.0);
        (f(x + h) - f(x - h)) / (2.0 * h)
    };

    newton_raphson(&f, df, initial_guess, config)
}
