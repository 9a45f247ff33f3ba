//! Optimization algorithms.
//!
//! Derivative-free minimisation used by smile calibration.

mod nelder_mead;

pub use nelder_mead::nelder_mead;

/// Configuration for optimization algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizationConfig {
    /// Convergence threshold on the spread of objective values.
    pub tolerance: f64,
    /// Convergence threshold on the simplex diameter.
    pub parameter_tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            parameter_tolerance: 1e-10,
            max_iterations: 1_000,
        }
    }
}

impl OptimizationConfig {
    /// Sets the objective tolerance.
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

/// Result of an optimization run.
#[derive(Debug, Clone)]
pub struct OptimizationResult {
    /// Optimal parameters found.
    pub parameters: Vec<f64>,
    /// Final objective function value.
    pub objective_value: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Whether the optimization converged.
    pub converged: bool,
}
