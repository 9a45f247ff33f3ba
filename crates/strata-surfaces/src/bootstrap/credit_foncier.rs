//! Credit foncier amortization.
//!
//! A credit foncier loan repays a constant amount `C` every period. `C` is
//! the root of
//!
//! ```text
//! f(C) = Σ C·dfᵢ − P,    dfᵢ = Π_{j ≤ i} 1 / (1 + r·τⱼ)
//! ```
//!
//! where `τⱼ` is the accrual fraction of period `j`. Once `C` is known the
//! schedule is rebuilt forward: interest accrues on the opening notional and
//! the rest of the payment retires principal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use strata_config::{BootstrapConfig, Validate};
use strata_core::schedule::{calculation_periods, coupon_dates_from_maturity, roll_dates, RollConvention};
use strata_core::{Date, Period};
use strata_math::solvers::newton_raphson;

use super::{decimal_to_f64, f64_to_decimal};
use crate::error::{SurfaceError, SurfaceResult};

const INSTRUMENT: &str = "credit foncier schedule";

/// One period of an amortization schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationItem {
    /// Period start.
    pub start: Date,
    /// Period end, when the payment is made.
    pub end: Date,
    /// Accrual fraction of the period.
    pub year_fraction: Decimal,
    /// Compounded discount factor from the first start to `end`.
    pub discount_factor: Decimal,
    /// Notional outstanding at `start`.
    pub opening_notional: Decimal,
    /// Interest accrued over the period.
    pub interest: Decimal,
    /// Principal retired by the payment.
    pub principal: Decimal,
    /// Total payment, interest plus principal.
    pub payment: Decimal,
    /// Notional outstanding after the payment.
    pub closing_notional: Decimal,
}

/// Solved repayment and the schedule it produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// Constant periodic payment.
    pub repayment: Decimal,
    /// Periods in date order.
    pub items: Vec<AmortizationItem>,
}

impl AmortizationSchedule {
    /// Sum of interest over all periods.
    pub fn total_interest(&self) -> Decimal {
        self.items.iter().map(|i| i.interest).sum()
    }

    /// Sum of principal over all periods.
    pub fn total_principal(&self) -> Decimal {
        self.items.iter().map(|i| i.principal).sum()
    }

    /// Notional left after the last payment.
    pub fn final_notional(&self) -> Decimal {
        self.items.last().map_or(Decimal::ZERO, |i| i.closing_notional)
    }

    /// Present value of all payments at the period discount factors.
    pub fn present_value(&self) -> Decimal {
        self.items.iter().map(|i| i.payment * i.discount_factor).sum()
    }
}

/// Solves credit foncier repayments.
///
/// # Example
///
/// ```rust
/// use rust_decimal_macros::dec;
/// use strata_config::BootstrapConfig;
/// use strata_core::schedule::RollConvention;
/// use strata_core::{Date, Period};
/// use strata_surfaces::bootstrap::CreditFoncierBootstrap;
///
/// let start = Date::from_ymd(2024, 1, 1).unwrap();
/// let schedule = CreditFoncierBootstrap::new(BootstrapConfig::standard())
///     .bootstrap_regular(start, 4, Period::months(6), RollConvention::None, dec!(1000000), dec!(0.05))
///     .unwrap();
///
/// assert_eq!(schedule.items.len(), 4);
/// assert!(schedule.final_notional().abs() < dec!(0.000001));
/// ```
#[derive(Debug, Clone, Default)]
pub struct CreditFoncierBootstrap {
    config: BootstrapConfig,
}

impl CreditFoncierBootstrap {
    /// Creates a bootstrap with the given solver and day count settings.
    #[must_use]
    pub fn new(config: BootstrapConfig) -> Self {
        Self { config }
    }

    /// Solver and day count settings.
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Schedule over `count` regular periods rolled from `start`.
    pub fn bootstrap_regular(
        &self,
        start: Date,
        count: usize,
        period: Period,
        roll: RollConvention,
        principal: Decimal,
        rate: Decimal,
    ) -> SurfaceResult<AmortizationSchedule> {
        let dates = roll_dates(start, count, period, roll)?;
        self.bootstrap(&dates, principal, rate)
    }

    /// Schedule rolled backward from `maturity`, any stub at the front.
    pub fn bootstrap_to_maturity(
        &self,
        effective: Date,
        maturity: Date,
        period: Period,
        principal: Decimal,
        rate: Decimal,
    ) -> SurfaceResult<AmortizationSchedule> {
        let roll = RollConvention::from_anchor(maturity);
        let dates = coupon_dates_from_maturity(effective, maturity, period, roll)?;
        self.bootstrap(&dates, principal, rate)
    }

    /// Schedule over the periods between consecutive `dates`.
    pub fn bootstrap(
        &self,
        dates: &[Date],
        principal: Decimal,
        rate: Decimal,
    ) -> SurfaceResult<AmortizationSchedule> {
        self.config.validate_or_error()?;
        if principal <= Decimal::ZERO {
            return Err(SurfaceError::invalid_data(format!("principal {principal} must be positive")));
        }
        let periods = calculation_periods(dates, self.config.day_count)
            .map_err(|e| SurfaceError::bootstrap_failed(INSTRUMENT, e.to_string()))?;

        let rate_f = decimal_to_f64(rate, "rate")?;
        let mut discount_factors = Vec::with_capacity(periods.len());
        let mut df = 1.0;
        for period in &periods {
            df /= 1.0 + rate_f * decimal_to_f64(period.year_fraction, "year fraction")?;
            if !df.is_finite() || df <= 0.0 {
                return Err(SurfaceError::bootstrap_failed(
                    INSTRUMENT,
                    format!("discount factor {df} to {} is not usable", period.end),
                ));
            }
            discount_factors.push(df);
        }

        let principal_f = decimal_to_f64(principal, "principal")?;
        let annuity: f64 = discount_factors.iter().sum();
        let objective = |c: f64| c * annuity - principal_f;
        let derivative = |_: f64| annuity;
        let guess = principal_f * self.config.initial_guess_fraction;

        let solved = newton_raphson(objective, derivative, guess, &self.config.solver_config())
            .map_err(|e| {
                tracing::warn!(error = %e, periods = periods.len(), "credit foncier solve failed");
                SurfaceError::bootstrap_failed(INSTRUMENT, e.to_string())
            })?;
        tracing::debug!(
            periods = periods.len(),
            repayment = solved.root,
            iterations = solved.iterations,
            "solved credit foncier repayment"
        );

        let repayment = f64_to_decimal(solved.root, "repayment")?;
        let mut notional = principal;
        let mut items = Vec::with_capacity(periods.len());
        for (period, df) in periods.iter().zip(discount_factors) {
            let interest = notional * rate * period.year_fraction;
            let retired = repayment - interest;
            let closing = notional - retired;
            items.push(AmortizationItem {
                start: period.start,
                end: period.end,
                year_fraction: period.year_fraction,
                discount_factor: f64_to_decimal(df, "discount factor")?,
                opening_notional: notional,
                interest,
                principal: retired,
                payment: repayment,
                closing_notional: closing,
            });
            notional = closing;
        }

        Ok(AmortizationSchedule { repayment, items })
    }
}
