//! # Strata Math
//!
//! Numerical building blocks for the Strata pricing-structure library.
//!
//! This crate provides:
//!
//! - **Solvers**: Newton-Raphson and Brent root finding with bracket expansion
//! - **Optimization**: Nelder-Mead simplex minimisation
//! - **Linear Algebra**: Dense solves and linear least squares
//! - **Sequences**: Halton low-discrepancy points
//! - **Interpolation**: Curve and smile interpolation behind one trait,
//!   with a name-keyed registry

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]

pub mod error;
pub mod interpolation;
pub mod linear_algebra;
pub mod optimization;
pub mod sequences;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{
        CubicHermiteSplineInterpolation, FlatInterpolation, Interpolation, InterpolationKind,
        InterpolationRegistry, LinearInterpolation, LinearRateInterpolation,
        LogLinearInterpolation, PiecewiseConstantInterpolation,
        PiecewiseConstantZeroRateInterpolation, SabrModelInterpolation, SpreadInterpolation,
        WingModelInterpolation,
    };
    pub use crate::optimization::{nelder_mead, OptimizationConfig, OptimizationResult};
    pub use crate::solvers::{
        brent, brent_expanding, newton_raphson, newton_raphson_numerical, SolverConfig,
        SolverResult,
    };
}

pub use error::{MathError, MathResult};
