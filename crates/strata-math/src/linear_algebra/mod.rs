//! Linear algebra utilities.
//!
//! Dense solves backed by `nalgebra`, used by the parametric smile fits.

use crate::error::{MathError, MathResult};
use nalgebra::{DMatrix, DVector};

/// Solves the square system `A x = b` by LU decomposition with partial
/// pivoting.
pub fn solve_linear_system(a: &DMatrix<f64>, b: &DVector<f64>) -> MathResult<DVector<f64>> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(MathError::invalid_input("Matrix must be square"));
    }
    if n != b.len() {
        return Err(MathError::invalid_input(format!(
            "right-hand side has {} rows, matrix has {n}",
            b.len()
        )));
    }
    let lu = a.clone().lu();
    let scale = a.amax().max(f64::MIN_POSITIVE);
    if lu.u().diagonal().iter().any(|p| p.abs() <= scale * 1e-12) {
        return Err(MathError::SingularMatrix);
    }
    lu.solve(b).ok_or(MathError::SingularMatrix)
}

/// Least-squares solution of the overdetermined system `A x ≈ b`.
///
/// Forms the normal equations `AᵀA x = Aᵀb` and solves them by Cholesky.
/// A square design is solved directly with [`solve_linear_system`].
/// A rank-deficient design matrix is reported as
/// [`MathError::SingularMatrix`].
///
/// # Example
///
/// ```rust
/// use nalgebra::{DMatrix, DVector};
/// use strata_math::linear_algebra::least_squares;
///
/// // Fit y = 1 + 2x through three exact points.
/// let a = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
/// let b = DVector::from_vec(vec![1.0, 3.0, 5.0]);
/// let x = least_squares(&a, &b).unwrap();
/// assert!((x[1] - 2.0).abs() < 1e-12);
/// ```
pub fn least_squares(a: &DMatrix<f64>, b: &DVector<f64>) -> MathResult<DVector<f64>> {
    let (rows, cols) = a.shape();
    if rows != b.len() {
        return Err(MathError::invalid_input(format!(
            "design matrix has {rows} rows but {} observations were supplied",
            b.len()
        )));
    }
    if rows < cols {
        return Err(MathError::insufficient_data(cols, rows));
    }
    if rows == cols {
        return solve_linear_system(a, b);
    }

    let normal = a.transpose() * a;
    let rhs = a.transpose() * b;

    // Cholesky succeeds on a numerically singular matrix whose pivots are
    // tiny but positive; reject those relative to the diagonal scale.
    let scale = normal.diagonal().amax().max(f64::MIN_POSITIVE);
    let cholesky = normal.cholesky().ok_or(MathError::SingularMatrix)?;
    let l = cholesky.l_dirty();
    if (0..cols).any(|i| l[(i, i)] * l[(i, i)] <= scale * 1e-12) {
        return Err(MathError::SingularMatrix);
    }
    Ok(cholesky.solve(&rhs))
}
