//! Brent's root-finding algorithm and bracket expansion.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Growth factor applied when widening a bracket.
const EXPANSION_FACTOR: f64 = 1.6;

/// Brent's root-finding algorithm.
///
/// Requires `f(a)` and `f(b)` to have opposite signs (or one of them to be
/// zero). Each step takes inverse quadratic interpolation or a secant step
/// when it stays inside the bracket and shrinks fast enough, and bisects
/// otherwise.
///
/// # Example
///
/// ```rust
/// use strata_math::solvers::{brent, SolverConfig};
///
/// let f = |x: f64| x * x * x - x - 2.0;
///
/// let result = brent(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((f(result.root)).abs() < 1e-10);
/// ```
pub fn brent<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let mut a = a;
    let mut b = b;
    let mut fa = f(a);
    let mut fb = f(b);

    if fa == 0.0 {
        return Ok(SolverResult {
            root: a,
            iterations: 0,
            residual: fa,
        });
    }
    if fa * fb > 0.0 || fa.is_nan() || fb.is_nan() {
        return Err(MathError::InvalidBracket { a, b, fa, fb });
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for iteration in 0..config.max_iterations {
        if fb * fc > 0.0 {
            // Keep the root between b and c.
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * config.tolerance;
        let m = 0.5 * (c - b);

        if fb.abs() < config.tolerance || m.abs() <= tol {
            return Ok(SolverResult {
                root: b,
                iterations: iteration,
                residual: fb,
            });
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * m * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * m * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();

            let min1 = 3.0 * m * q - (tol * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = m;
                e = d;
            }
        } else {
            d = m;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(m) };
        fb = f(b);
    }

    Err(MathError::convergence_failed(config.max_iterations, fb.abs()))
}

/// Widens `[lower, upper]` until `f` changes sign across it.
///
/// The end with the smaller `|f|` moves outward by 1.6 times the bracket
/// width. A positive lower bound is halved instead, so brackets on the
/// positive axis stay positive.
pub fn expand_bracket<F>(
    f: F,
    lower: f64,
    upper: f64,
    max_expansions: u32,
) -> MathResult<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    if lower >= upper {
        return Err(MathError::invalid_input(format!(
            "bracket [{lower}, {upper}] is empty"
        )));
    }

    let (mut a, mut b) = (lower, upper);
    let (mut fa, mut fb) = (f(a), f(b));

    for _ in 0..max_expansions {
        if fa * fb <= 0.0 {
            return Ok((a, b));
        }
        if fa.abs() < fb.abs() || !fb.is_finite() {
            a = if a > 0.0 { 0.5 * a } else { a - EXPANSION_FACTOR * (b - a) };
            fa = f(a);
        } else {
            b += EXPANSION_FACTOR * (b - a);
            fb = f(b);
        }
    }

    if fa * fb <= 0.0 {
        Ok((a, b))
    } else {
        Err(MathError::InvalidBracket { a, b, fa, fb })
    }
}

/// Brent's method on a bracket widened by [`expand_bracket`].
pub fn brent_expanding<F>(
    f: F,
    lower: f64,
    upper: f64,
    max_expansions: u32,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let (a, b) = expand_bracket(&f, lower, upper, max_expansions)?;
    if (a, b) != (lower, upper) {
        log::debug!("expanded bracket [{lower}, {upper}] to [{a}, {b}]");
    }
    brent(f, a, b, config)
}
