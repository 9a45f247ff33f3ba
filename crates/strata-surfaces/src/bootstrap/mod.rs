//! Bootstrapping by root finding.
//!
//! Both bootstraps follow the same pattern: state a present-value objective
//! in one unknown, solve it with Newton-Raphson under a hard iteration cap,
//! then substitute the solution forward.
//!
//! - [`CreditFoncierBootstrap`]: the constant repayment of an amortizing
//!   loan, and the resulting principal/interest schedule
//! - [`ZeroCurveBootstrapper`]: discount factors that reprice deposits and
//!   par swaps, pillar by pillar

mod credit_foncier;
mod zero_curve;

pub use credit_foncier::{AmortizationItem, AmortizationSchedule, CreditFoncierBootstrap};
pub use zero_curve::{CurveInstrument, ZeroCurveBootstrapper};

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

use crate::error::{SurfaceError, SurfaceResult};

pub(crate) fn decimal_to_f64(value: Decimal, what: &str) -> SurfaceResult<f64> {
    value
        .to_f64()
        .ok_or_else(|| SurfaceError::invalid_data(format!("{what} {value} is not representable as f64")))
}

pub(crate) fn f64_to_decimal(value: f64, what: &str) -> SurfaceResult<Decimal> {
    Decimal::from_f64(value)
        .ok_or_else(|| SurfaceError::invalid_data(format!("{what} {value} is not representable as a decimal")))
}
