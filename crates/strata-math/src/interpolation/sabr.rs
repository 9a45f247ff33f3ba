//! SABR volatility model: Hagan's implied-volatility expansion and a
//! smile calibrator.

use std::cmp::Ordering;

use super::samples::Samples;
use super::Interpolation;
use crate::error::{MathError, MathResult};
use crate::optimization::{nelder_mead, OptimizationConfig};
use crate::sequences::HaltonSequence;
use crate::solvers::{brent_expanding, SolverConfig};

const MODEL: &str = "SABR";

/// Correlations are kept this far inside `(-1, 1)`.
const RHO_BUFFER: f64 = 0.01;

/// SABR parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SabrParameters {
    /// Initial volatility level (`> 0`).
    pub alpha: f64,
    /// CEV exponent in `[0, 1]`.
    pub beta: f64,
    /// Forward/volatility correlation in `(-1, 1)`.
    pub rho: f64,
    /// Volatility of volatility (`>= 0`).
    pub nu: f64,
}

impl SabrParameters {
    /// Creates validated parameters.
    pub fn new(alpha: f64, beta: f64, rho: f64, nu: f64) -> MathResult<Self> {
        let params = Self {
            alpha,
            beta,
            rho,
            nu,
        };
        params.validate()?;
        Ok(params)
    }

    /// Checks parameter bounds.
    pub fn validate(&self) -> MathResult<()> {
        if !(self.alpha > 0.0) {
            return Err(MathError::invalid_input(format!("alpha {} must be positive", self.alpha)));
        }
        if !(0.0..=1.0).contains(&self.beta) {
            return Err(MathError::invalid_input(format!("beta {} must be in [0, 1]", self.beta)));
        }
        if !(self.rho.abs() < 1.0) {
            return Err(MathError::invalid_input(format!("rho {} must be in (-1, 1)", self.rho)));
        }
        if !(self.nu >= 0.0) {
            return Err(MathError::invalid_input(format!("nu {} must be non-negative", self.nu)));
        }
        Ok(())
    }
}

/// Hagan's lognormal implied volatility.
///
/// ```rust
/// use strata_math::interpolation::{sabr_implied_volatility, SabrParameters};
///
/// let params = SabrParameters::new(0.2, 1.0, 0.0, 0.0).unwrap();
/// // With beta = 1 and no vol of vol the smile is flat at alpha.
/// let vol = sabr_implied_volatility(&params, 100.0, 120.0, 1.0).unwrap();
/// assert!((vol - 0.2).abs() < 1e-12);
/// ```
pub fn sabr_implied_volatility(
    params: &SabrParameters,
    forward: f64,
    strike: f64,
    expiry: f64,
) -> MathResult<f64> {
    if !(forward > 0.0) || !(strike > 0.0) {
        return Err(MathError::invalid_input(format!(
            "forward {forward} and strike {strike} must be positive"
        )));
    }
    if !(expiry >= 0.0) {
        return Err(MathError::invalid_input(format!("expiry {expiry} must be non-negative")));
    }

    let SabrParameters {
        alpha,
        beta,
        rho,
        nu,
    } = *params;
    let one_b = 1.0 - beta;
    let log_fk = (forward / strike).ln();
    let fk_pow = (forward * strike).powf(0.5 * one_b);

    let log2 = log_fk * log_fk;
    let denominator =
        fk_pow * (1.0 + one_b * one_b / 24.0 * log2 + one_b.powi(4) / 1920.0 * log2 * log2);

    let z = nu / alpha * fk_pow * log_fk;
    let z_over_x = if z.abs() < 1e-6 {
        // Series expansion of z / x(z) around zero.
        1.0 - 0.5 * rho * z + (2.0 - 3.0 * rho * rho) * z * z / 12.0
    } else {
        let root = (1.0 - 2.0 * rho * z + z * z).sqrt();
        let x = ((root + z - rho) / (1.0 - rho)).ln();
        z / x
    };

    let correction = 1.0
        + (one_b * one_b / 24.0 * alpha * alpha / (fk_pow * fk_pow)
            + 0.25 * rho * beta * nu * alpha / fk_pow
            + (2.0 - 3.0 * rho * rho) / 24.0 * nu * nu)
            * expiry;

    let vol = alpha / denominator * z_over_x * correction;
    if vol.is_finite() {
        Ok(vol)
    } else {
        Err(MathError::invalid_input(format!(
            "SABR volatility is not finite at strike {strike}"
        )))
    }
}

/// Fits SABR to a single-expiry smile with `beta` held fixed.
///
/// The ATM volatility pins `alpha` through Hagan's ATM cubic, leaving a
/// two-parameter search over `rho = cos θ` and `nu = μ²`, which Nelder-Mead
/// solves unconstrained. If that fit misses `tolerance` (root-mean-square
/// volatility error), Halton points over `(nu, rho)` seed further restarts.
#[derive(Debug, Clone, PartialEq)]
pub struct SabrCalibrator {
    /// Fixed CEV exponent.
    pub beta: f64,
    /// RMS volatility error accepted without a wider search.
    pub tolerance: f64,
    /// RMS volatility error above which calibration fails.
    pub max_error: f64,
    /// Halton points drawn by the wider search.
    pub halton_points: usize,
    /// Best Halton points re-optimized by the wider search.
    pub restarts: usize,
    /// Simplex settings.
    pub optimization: OptimizationConfig,
}

impl Default for SabrCalibrator {
    fn default() -> Self {
        Self {
            beta: 0.85,
            tolerance: 1e-4,
            max_error: 5e-3,
            halton_points: 1_500,
            restarts: 5,
            optimization: OptimizationConfig::default(),
        }
    }
}

/// Market slice in the form the objective needs.
struct Smile<'a> {
    forward: f64,
    expiry: f64,
    strikes: &'a [f64],
    vols: &'a [f64],
    atm_vol: f64,
}

impl SabrCalibrator {
    /// Creates a calibrator with the given fixed beta.
    #[must_use]
    pub fn with_beta(beta: f64) -> Self {
        Self {
            beta,
            ..Self::default()
        }
    }

    /// Calibrates to absolute strikes and their volatilities.
    pub fn calibrate(
        &self,
        forward: f64,
        expiry: f64,
        strikes: &[f64],
        vols: &[f64],
    ) -> MathResult<SabrParameters> {
        if !(forward > 0.0) || !(expiry > 0.0) {
            return Err(MathError::invalid_input(format!(
                "forward {forward} and expiry {expiry} must be positive"
            )));
        }
        if !(0.0..=1.0).contains(&self.beta) {
            return Err(MathError::invalid_input(format!("beta {} must be in [0, 1]", self.beta)));
        }
        let samples = Samples::new(strikes, vols, 3)?;
        if samples.xs()[0] <= 0.0 || samples.ys().iter().any(|v| *v <= 0.0) {
            return Err(MathError::invalid_input("strikes and volatilities must be positive"));
        }

        let log_moneyness: Vec<f64> = strikes.iter().map(|k| (k / forward).ln()).collect();
        let atm = log_moneyness
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.abs().partial_cmp(&b.1.abs()).unwrap_or(Ordering::Equal))
            .map_or(0, |(i, _)| i);
        if atm == 0 || atm == strikes.len() - 1 {
            return Err(MathError::calibration_failed(MODEL, "ATM strike missing"));
        }

        // ATM vol read off the smile at zero log-moneyness.
        let (lo, hi) = if log_moneyness[atm] > 0.0 { (atm - 1, atm) } else { (atm, atm + 1) };
        let t = -log_moneyness[lo] / (log_moneyness[hi] - log_moneyness[lo]);
        let atm_vol = vols[lo] + t * (vols[hi] - vols[lo]);

        let slope = (vols[atm + 1] - vols[atm - 1]) / (log_moneyness[atm + 1] - log_moneyness[atm - 1]);
        let rho0 = if slope < 0.0 { -0.5 } else { 0.5 };
        let nu0 = 4.0 * (slope + rho0 * (1.0 - self.beta) * atm_vol).abs();

        let smile = Smile {
            forward,
            expiry,
            strikes,
            vols,
            atm_vol,
        };
        let objective = |p: &[f64]| self.objective(&smile, p[0], p[1]);

        let mut best = nelder_mead(objective, &[rho0.acos(), nu0.sqrt()], &[0.1, 0.1], &self.optimization)?;
        let n = strikes.len() as f64;

        if (best.objective_value / n).sqrt() > self.tolerance {
            log::debug!(
                "SABR first fit rms {:.3e} above tolerance, searching {} Halton points",
                (best.objective_value / n).sqrt(),
                self.halton_points
            );
            let mut candidates: Vec<(f64, [f64; 2])> = HaltonSequence::new(2)?
                .take(self.halton_points)
                .map(|h| {
                    let nu = h[0];
                    let rho = (2.0 * h[1] - 1.0).clamp(-1.0 + RHO_BUFFER, 1.0 - RHO_BUFFER);
                    let start = [rho.acos(), nu.sqrt()];
                    (objective(&start), start)
                })
                .filter(|(value, _)| value.is_finite())
                .collect();
            candidates.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

            for (_, start) in candidates.iter().take(self.restarts) {
                let result = nelder_mead(objective, start, &[0.1, 0.1], &self.optimization)?;
                if result.objective_value < best.objective_value {
                    best = result;
                }
            }
        }

        let rms = (best.objective_value / n).sqrt();
        if !rms.is_finite() || rms > self.max_error {
            return Err(MathError::calibration_failed(
                MODEL,
                format!("rms volatility error {rms:.3e} exceeds {:.3e}", self.max_error),
            ));
        }

        let (rho, nu) = decode(best.parameters[0], best.parameters[1]);
        let alpha = self.solve_alpha(forward, expiry, atm_vol, rho, nu)?;
        log::debug!(
            "SABR fit: alpha {alpha:.6}, beta {}, rho {rho:.6}, nu {nu:.6}, rms {rms:.3e}",
            self.beta
        );
        SabrParameters::new(alpha, self.beta, rho, nu)
    }

    /// Sum of squared volatility errors at `(θ, μ)`; `+inf` where the
    /// model cannot be evaluated.
    fn objective(&self, smile: &Smile<'_>, theta: f64, mu: f64) -> f64 {
        let (rho, nu) = decode(theta, mu);
        let Ok(alpha) = self.solve_alpha(smile.forward, smile.expiry, smile.atm_vol, rho, nu) else {
            return f64::INFINITY;
        };
        let params = SabrParameters {
            alpha,
            beta: self.beta,
            rho,
            nu,
        };
        smile
            .strikes
            .iter()
            .zip(smile.vols)
            .map(|(k, v)| {
                sabr_implied_volatility(&params, smile.forward, *k, smile.expiry)
                    .map_or(f64::INFINITY, |model| (model - v) * (model - v))
            })
            .sum()
    }

    /// Alpha reproducing the ATM volatility, from Hagan's ATM cubic.
    fn solve_alpha(&self, forward: f64, expiry: f64, atm_vol: f64, rho: f64, nu: f64) -> MathResult<f64> {
        let one_b = 1.0 - self.beta;
        let f_pow = forward.powf(one_b);
        let a3 = one_b * one_b * expiry / (24.0 * f_pow * f_pow);
        let a2 = rho * self.beta * nu * expiry / (4.0 * f_pow);
        let a1 = 1.0 + nu * nu * (2.0 - 3.0 * rho * rho) * expiry / 24.0;
        let a0 = -atm_vol * f_pow;
        let cubic = |a: f64| ((a3 * a + a2) * a + a1) * a + a0;

        let guess = atm_vol * f_pow;
        let result = brent_expanding(
            cubic,
            (0.5 * guess).min(1e-5),
            2.0 * guess,
            50,
            &SolverConfig::new(1e-14, 200),
        )?;
        if result.root > 0.0 {
            Ok(result.root)
        } else {
            Err(MathError::calibration_failed(MODEL, "no positive alpha reproduces the ATM volatility"))
        }
    }
}

/// `rho = cos θ` pulled inside the buffer, `nu = μ²`.
fn decode(theta: f64, mu: f64) -> (f64, f64) {
    let rho = theta.cos().clamp(-1.0 + RHO_BUFFER, 1.0 - RHO_BUFFER);
    (rho, mu * mu)
}

/// SABR smile fitted to a strike/volatility slice at one expiry.
///
/// With `relative_strikes` (the default) the sample and query strikes are
/// multiples of the forward. Samples with non-positive volatility are
/// dropped before calibration.
#[derive(Debug, Clone, PartialEq)]
pub struct SabrModelInterpolation {
    forward: f64,
    expiry: f64,
    relative_strikes: bool,
    calibrator: SabrCalibrator,
    fitted: Option<(Samples, SabrParameters)>,
}

impl Default for SabrModelInterpolation {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

impl SabrModelInterpolation {
    /// Creates an unfitted smile for the given forward and expiry in years.
    #[must_use]
    pub fn new(forward: f64, expiry: f64) -> Self {
        Self {
            forward,
            expiry,
            relative_strikes: true,
            calibrator: SabrCalibrator::default(),
            fitted: None,
        }
    }

    /// Sets the fixed beta.
    #[must_use]
    pub fn with_beta(mut self, beta: f64) -> Self {
        self.calibrator.beta = beta;
        self
    }

    /// Chooses between relative and absolute strikes.
    #[must_use]
    pub fn with_relative_strikes(mut self, relative: bool) -> Self {
        self.relative_strikes = relative;
        self
    }

    /// Replaces the calibrator settings.
    #[must_use]
    pub fn with_calibrator(mut self, calibrator: SabrCalibrator) -> Self {
        self.calibrator = calibrator;
        self
    }

    /// Fitted parameters, once initialized.
    #[must_use]
    pub fn parameters(&self) -> Option<&SabrParameters> {
        self.fitted.as_ref().map(|(_, p)| p)
    }

    fn absolute(&self, strike: f64) -> f64 {
        if self.relative_strikes {
            strike * self.forward
        } else {
            strike
        }
    }
}

impl Interpolation for SabrModelInterpolation {
    fn name(&self) -> &'static str {
        "SABRModelInterpolation"
    }

    fn initialize(&mut self, xs: &[f64], ys: &[f64]) -> MathResult<()> {
        if xs.len() != ys.len() {
            return Err(MathError::invalid_input(format!(
                "xs and ys must have same length: {} vs {}",
                xs.len(),
                ys.len()
            )));
        }
        let (strikes, vols): (Vec<f64>, Vec<f64>) =
            xs.iter().zip(ys).filter(|(_, v)| **v > 0.0).map(|(k, v)| (*k, *v)).unzip();
        if strikes.len() < xs.len() {
            log::debug!("dropped {} non-positive volatilities", xs.len() - strikes.len());
        }

        let samples = Samples::new(&strikes, &vols, 3)?;
        let absolute: Vec<f64> = strikes.iter().map(|k| self.absolute(*k)).collect();
        let params = self
            .calibrator
            .calibrate(self.forward, self.expiry, &absolute, &vols)?;
        self.fitted = Some((samples, params));
        Ok(())
    }

    fn value_at(&self, x: f64, allow_extrapolation: bool) -> MathResult<f64> {
        let (samples, params) = self
            .fitted
            .as_ref()
            .ok_or_else(|| MathError::not_initialized(self.name()))?;
        samples.check_range(x, allow_extrapolation)?;
        sabr_implied_volatility(params, self.forward, self.absolute(x), self.expiry)
    }

    fn min_x(&self) -> Option<f64> {
        self.fitted.as_ref().map(|(s, _)| s.min_x())
    }

    fn max_x(&self) -> Option<f64> {
        self.fitted.as_ref().map(|(s, _)| s.max_x())
    }

    fn box_clone(&self) -> Box<dyn Interpolation> {
        Box::new(self.clone())
    }
}
