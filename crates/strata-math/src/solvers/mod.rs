//! Root-finding algorithms.
//!
//! - [`newton_raphson`]: quadratic convergence when a derivative is available
//! - [`newton_raphson_numerical`]: Newton with a central-difference derivative
//! - [`brent`]: bracketing method combining bisection, secant and inverse
//!   quadratic interpolation
//! - [`brent_expanding`]: Brent after widening an initial bracket until it
//!   straddles a root
//!
//! Every solver honours a hard iteration cap and reports non-convergence as
//! [`MathError::ConvergenceFailed`](crate::MathError::ConvergenceFailed).
//!
//! # Example
//!
//! ```rust
//! use strata_math::solvers::{newton_raphson_numerical, SolverConfig};
//!
//! // Level annuity paying 1 per year for 4 years priced at 3.5
//! let f = |r: f64| (1..=4).map(|t| (1.0 + r).powi(-t)).sum::<f64>() - 3.5;
//! let result = newton_raphson_numerical(f, 0.05, &SolverConfig::default()).unwrap();
//! assert!(f(result.root).abs() < 1e-10);
//! ```

mod brent;
mod newton;

pub use brent::{brent, brent_expanding, expand_bracket};
pub use newton::{newton_raphson, newton_raphson_numerical};

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Tolerance for convergence.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a root-finding iteration.
#[derive(Debug, Clone, Copy)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Final residual (function value at root).
    pub residual: f64,
}
