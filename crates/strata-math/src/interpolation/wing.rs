//! Wing volatility model.
//!
//! The smile is parameterised in log-moneyness `x = ln(K / F_ssr)` by an ATM
//! level and slope, separate put and call curvatures inside the cutoffs,
//! quadratic transition zones beyond them and flat wings past the smoothing
//! ranges. Every region is linear in `(vc, sc, pc, cc)`, which makes the fit
//! a linear least-squares problem.

use nalgebra::{DMatrix, DVector};

use super::samples::Samples;
use super::Interpolation;
use crate::error::{MathError, MathResult};
use crate::linear_algebra::least_squares;

/// Parameters of the wing model.
///
/// `ssr` is the skew swimmingness rate in percent: 100 follows the forward
/// fully (sticky delta), 0 anchors to the reference forward (sticky strike).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WingParameters {
    /// Volatility at the money.
    pub current_vol: f64,
    /// Smile slope at the money.
    pub current_slope: f64,
    /// Curvature on the put side.
    pub put_curvature: f64,
    /// Curvature on the call side.
    pub call_curvature: f64,
    /// Log-moneyness where the put wing starts (negative).
    pub down_cutoff: f64,
    /// Log-moneyness where the call wing starts (positive).
    pub up_cutoff: f64,
    /// Down smoothing range, as a fraction of `down_cutoff`.
    pub down_smoothing: f64,
    /// Up smoothing range, as a fraction of `up_cutoff`.
    pub up_smoothing: f64,
    /// Skew swimmingness rate, in percent.
    pub ssr: f64,
    /// Volatility change rate.
    pub vcr: f64,
    /// Slope change rate.
    pub scr: f64,
    /// Reference forward.
    pub reference_forward: f64,
    /// Current forward.
    pub forward: f64,
}

impl Default for WingParameters {
    fn default() -> Self {
        Self {
            current_vol: 0.2,
            current_slope: 0.0,
            put_curvature: 0.0,
            call_curvature: 0.0,
            down_cutoff: -0.5,
            up_cutoff: 0.5,
            down_smoothing: 0.5,
            up_smoothing: 0.5,
            ssr: 100.0,
            vcr: 0.0,
            scr: 0.0,
            reference_forward: 1.0,
            forward: 1.0,
        }
    }
}

impl WingParameters {
    /// Checks the shape parameters.
    pub fn validate(&self) -> MathResult<()> {
        if self.down_cutoff >= 0.0 || self.up_cutoff <= 0.0 {
            return Err(MathError::invalid_input(format!(
                "wing cutoffs must straddle the money: down {}, up {}",
                self.down_cutoff, self.up_cutoff
            )));
        }
        if self.down_smoothing <= 0.0 || self.up_smoothing <= 0.0 {
            return Err(MathError::invalid_input("wing smoothing ranges must be positive"));
        }
        if self.forward <= 0.0 || self.reference_forward <= 0.0 {
            return Err(MathError::invalid_input("wing forwards must be positive"));
        }
        Ok(())
    }

    fn ssr_fraction(&self) -> f64 {
        self.ssr / 100.0
    }

    /// Relative forward move scaled by the swimmingness rate.
    fn forward_drift(&self) -> f64 {
        self.ssr_fraction() * (self.forward - self.reference_forward) / self.reference_forward
    }

    /// Forward the smile is centred on.
    #[must_use]
    pub fn effective_forward(&self) -> f64 {
        let s = self.ssr_fraction();
        self.forward.powf(s) * self.reference_forward.powf(1.0 - s)
    }

    /// ATM volatility after forward drift.
    #[must_use]
    pub fn effective_vol(&self) -> f64 {
        self.current_vol - self.vcr * self.forward_drift()
    }

    /// ATM slope after forward drift.
    #[must_use]
    pub fn effective_slope(&self) -> f64 {
        self.current_slope - self.scr * self.forward_drift()
    }

    /// Log-moneyness of `strike` against the effective forward.
    #[must_use]
    pub fn log_moneyness(&self, strike: f64) -> f64 {
        (strike / self.effective_forward()).ln()
    }

    /// Coefficients of `(vc, sc, pc, cc)` at log-moneyness `x`.
    fn basis(&self, x: f64) -> [f64; 4] {
        let (dc, uc) = (self.down_cutoff, self.up_cutoff);
        let (dsr, usr) = (self.down_smoothing, self.up_smoothing);

        if x <= dc * (1.0 + dsr) {
            [1.0, dc * (2.0 + dsr) / 2.0, (1.0 + dsr) * dc * dc, 0.0]
        } else if x <= dc {
            let k = 1.0 + 1.0 / dsr;
            [
                1.0,
                -dc / (2.0 * dsr) + k * x - x * x / (2.0 * dc * dsr),
                -k * dc * dc + 2.0 * k * dc * x - x * x / dsr,
                0.0,
            ]
        } else if x <= 0.0 {
            [1.0, x, x * x, 0.0]
        } else if x <= uc {
            [1.0, x, 0.0, x * x]
        } else if x <= uc * (1.0 + usr) {
            let k = 1.0 + 1.0 / usr;
            [
                1.0,
                -uc / (2.0 * usr) + k * x - x * x / (2.0 * uc * usr),
                0.0,
                -k * uc * uc + 2.0 * k * uc * x - x * x / usr,
            ]
        } else {
            [1.0, uc * (2.0 + usr) / 2.0, 0.0, (1.0 + usr) * uc * uc]
        }
    }

    /// Implied volatility at `strike`.
    #[must_use]
    pub fn volatility(&self, strike: f64) -> f64 {
        let b = self.basis(self.log_moneyness(strike));
        b[0] * self.effective_vol()
            + b[1] * self.effective_slope()
            + b[2] * self.put_curvature
            + b[3] * self.call_curvature
    }
}

/// Wing model fitted to a strike/volatility slice.
///
/// The shape parameters (cutoffs, smoothing ranges, forwards and change
/// rates) are fixed; `initialize` fits the ATM level, slope and both
/// curvatures by linear least squares.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WingModelInterpolation {
    parameters: WingParameters,
    samples: Option<Samples>,
}

impl WingModelInterpolation {
    /// Creates an unfitted model with the given shape.
    #[must_use]
    pub fn new(parameters: WingParameters) -> Self {
        Self {
            parameters,
            samples: None,
        }
    }

    /// Current parameters, fitted once initialized.
    #[must_use]
    pub fn parameters(&self) -> &WingParameters {
        &self.parameters
    }

    /// Fits `(vc, sc, pc, cc)` to the slice.
    pub fn calibrate(parameters: &WingParameters, strikes: &[f64], vols: &[f64]) -> MathResult<WingParameters> {
        parameters.validate()?;
        let samples = Samples::new(strikes, vols, 4)?;
        if let Some(k) = samples.xs().iter().find(|k| **k <= 0.0) {
            return Err(MathError::invalid_input(format!("strike {k} must be positive")));
        }

        let n = samples.len();
        let mut design = DMatrix::zeros(n, 4);
        for (i, k) in samples.xs().iter().enumerate() {
            let b = parameters.basis(parameters.log_moneyness(*k));
            for (j, v) in b.iter().enumerate() {
                design[(i, j)] = *v;
            }
        }
        let target = DVector::from_column_slice(samples.ys());

        let fitted = least_squares(&design, &target).map_err(|e| {
            MathError::calibration_failed("Wing", format!("least-squares fit failed: {e}"))
        })?;

        let drift = parameters.forward_drift();
        let result = WingParameters {
            current_vol: fitted[0] + parameters.vcr * drift,
            current_slope: fitted[1] + parameters.scr * drift,
            put_curvature: fitted[2],
            call_curvature: fitted[3],
            ..*parameters
        };
        log::debug!(
            "wing fit over {n} strikes: vol {:.6}, slope {:.6}, put {:.6}, call {:.6}",
            result.current_vol,
            result.current_slope,
            result.put_curvature,
            result.call_curvature
        );
        Ok(result)
    }
}

impl Interpolation for WingModelInterpolation {
    fn name(&self) -> &'static str {
        "WingModelInterpolation"
    }

    fn initialize(&mut self, xs: &[f64], ys: &[f64]) -> MathResult<()> {
        let fitted = Self::calibrate(&self.parameters, xs, ys)?;
        self.samples = Some(Samples::new(xs, ys, 4)?);
        self.parameters = fitted;
        Ok(())
    }

    fn value_at(&self, x: f64, allow_extrapolation: bool) -> MathResult<f64> {
        let samples = self
            .samples
            .as_ref()
            .ok_or_else(|| MathError::not_initialized(self.name()))?;
        samples.check_range(x, allow_extrapolation)?;
        if x <= 0.0 {
            return Err(MathError::invalid_input(format!("strike {x} must be positive")));
        }
        Ok(self.parameters.volatility(x))
    }

    fn min_x(&self) -> Option<f64> {
        self.samples.as_ref().map(Samples::min_x)
    }

    fn max_x(&self) -> Option<f64> {
        self.samples.as_ref().map(Samples::max_x)
    }

    fn box_clone(&self) -> Box<dyn Interpolation> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference() -> WingParameters {
        WingParameters {
            current_vol: 0.26,
            current_slope: -0.175,
            put_curvature: 0.10,
            call_curvature: 0.125,
            down_cutoff: -0.25,
            up_cutoff: 0.20,
            down_smoothing: 0.9,
            up_smoothing: 0.50,
            ssr: 100.0,
            vcr: 0.0,
            scr: 0.0,
            reference_forward: 100.0,
            forward: 100.0,
        }
    }

    #[test]
    fn test_central_regions() {
        let p = reference();
        assert_relative_eq!(p.volatility(100.0), 0.26, epsilon = 1e-14);

        let x: f64 = -0.1;
        let k = 100.0 * x.exp();
        assert_relative_eq!(p.volatility(k), 0.26 - 0.175 * x + 0.10 * x * x, epsilon = 1e-14);

        let x: f64 = 0.1;
        let k = 100.0 * x.exp();
        assert_relative_eq!(p.volatility(k), 0.26 - 0.175 * x + 0.125 * x * x, epsilon = 1e-14);
    }

    #[test]
    fn test_flat_wings() {
        let p = reference();
        let put_wing = 0.26 + (-0.25) * 2.9 * (-0.175) / 2.0 + 1.9 * 0.10 * 0.0625;
        assert_relative_eq!(p.volatility(100.0 * (-1.0_f64).exp()), put_wing, epsilon = 1e-14);
        assert_relative_eq!(p.volatility(100.0 * (-2.0_f64).exp()), put_wing, epsilon = 1e-14);

        let call_wing = 0.26 + 0.20 * 2.5 * (-0.175) / 2.0 + 1.5 * 0.125 * 0.04;
        assert_relative_eq!(p.volatility(100.0 * 0.5_f64.exp()), call_wing, epsilon = 1e-14);
    }

    #[test]
    fn test_continuous_across_region_boundaries() {
        let p = reference();
        for x in [-0.25 * 1.9, -0.25, 0.0, 0.20, 0.30] {
            let below = p.volatility(100.0 * (x - 1e-9_f64).exp());
            let above = p.volatility(100.0 * (x + 1e-9_f64).exp());
            assert!((below - above).abs() < 1e-8, "jump at {x}: {below} vs {above}");
        }
    }

    #[test]
    fn test_forward_drift() {
        let p = WingParameters {
            forward: 110.0,
            vcr: 0.5,
            ssr: 50.0,
            ..reference()
        };
        assert_relative_eq!(p.effective_forward(), (110.0_f64 * 100.0).sqrt(), epsilon = 1e-12);
        assert_relative_eq!(p.effective_vol(), 0.26 - 0.5 * 0.5 * 0.1, epsilon = 1e-14);
    }

    #[test]
    fn test_calibration_recovers_parameters() {
        let truth = reference();
        let strikes: Vec<f64> = (0..15).map(|i| 100.0 * (-0.6 + 0.08 * f64::from(i)).exp()).collect();
        let vols: Vec<f64> = strikes.iter().map(|k| truth.volatility(*k)).collect();

        let start = WingParameters {
            current_vol: 0.1,
            current_slope: 0.0,
            put_curvature: 0.0,
            call_curvature: 0.0,
            ..truth
        };
        let mut wing = WingModelInterpolation::new(start);
        wing.initialize(&strikes, &vols).unwrap();

        let fitted = wing.parameters();
        assert_relative_eq!(fitted.current_vol, 0.26, epsilon = 1e-10);
        assert_relative_eq!(fitted.current_slope, -0.175, epsilon = 1e-10);
        assert_relative_eq!(fitted.put_curvature, 0.10, epsilon = 1e-10);
        assert_relative_eq!(fitted.call_curvature, 0.125, epsilon = 1e-10);
        assert_relative_eq!(wing.interpolate(strikes[7]).unwrap(), vols[7], epsilon = 1e-10);
    }

    #[test]
    fn test_four_strikes_fit_exactly() {
        let truth = reference();
        let strikes: Vec<f64> = [-0.2, -0.1, 0.05, 0.15].iter().map(|x: &f64| 100.0 * x.exp()).collect();
        let vols: Vec<f64> = strikes.iter().map(|k| truth.volatility(*k)).collect();

        let fitted = WingModelInterpolation::calibrate(&truth, &strikes, &vols).unwrap();
        assert_relative_eq!(fitted.current_vol, 0.26, epsilon = 1e-10);
        assert_relative_eq!(fitted.current_slope, -0.175, epsilon = 1e-10);
        assert_relative_eq!(fitted.put_curvature, 0.10, epsilon = 1e-10);
        assert_relative_eq!(fitted.call_curvature, 0.125, epsilon = 1e-10);
    }

    #[test]
    fn test_calibration_needs_both_sides() {
        // Only call-side strikes: the put curvature is unidentified.
        let truth = reference();
        let strikes = [101.0, 104.0, 108.0, 112.0, 118.0];
        let vols: Vec<f64> = strikes.iter().map(|k| truth.volatility(*k)).collect();
        let mut wing = WingModelInterpolation::new(truth);
        assert!(matches!(
            wing.initialize(&strikes, &vols),
            Err(MathError::CalibrationFailed { .. })
        ));
        assert!(!wing.is_initialized());
    }

    #[test]
    fn test_needs_four_strikes() {
        let mut wing = WingModelInterpolation::new(reference());
        assert!(wing.initialize(&[90.0, 100.0, 110.0], &[0.3, 0.26, 0.25]).is_err());
    }
}
