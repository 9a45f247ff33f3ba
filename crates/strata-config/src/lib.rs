//! # Strata Configuration Layer
//!
//! Serde-backed settings for the Strata pricing-structure library:
//!
//! - **Curve Configuration**: interpolation method, day count, extrapolation
//! - **Surface Configuration**: expiry and strike interpolation, smile model settings
//! - **Smile Models**: SABR calibration and wing model shape
//! - **Bootstrap Configuration**: Newton-Raphson settings and output curve interpolation
//!
//! Interpolation methods are referenced by their registry names
//! (`"LinearInterpolation"`, `"SABRModelInterpolation"`, ...) and validated
//! against the built-in set.
//!
//! # Example
//!
//! ```rust
//! use strata_config::ConfigManager;
//!
//! let manager = ConfigManager::from_toml_str(
//!     r#"
//!     [[surfaces]]
//!     name = "EQ.VOL"
//!     strike_interpolation = "SABRModelInterpolation"
//!     sabr = { beta = 0.7 }
//!     "#,
//! )
//! .unwrap();
//!
//! let surface = manager.get_surface("EQ.VOL").unwrap();
//! assert_eq!(surface.sabr.beta, 0.7);
//! assert_eq!(surface.expiry_interpolation, "LinearInterpolation");
//! ```
//!
//! # Standard Configurations
//!
//! ## Curves
//! - `DISCOUNT` - linear in zero rate
//! - `DISCOUNT.LOGLINEAR` - linear in log discount factor
//! - `RATE.HERMITE` - cubic Hermite spline
//!
//! ## Surfaces
//! - `VOL.BILINEAR`, `VOL.SABR`, `VOL.WING`
//!
//! ## Bootstraps
//! - `STANDARD` - tolerance 1e-10, 10 iterations

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod bootstrap;
mod curve;
mod error;
mod manager;
mod smile;
mod surface;

pub use bootstrap::BootstrapConfig;
pub use curve::CurveConfig;
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use manager::{ConfigFile, ConfigManager, ConfigType};
pub use smile::{SabrConfig, WingConfig};
pub use surface::SurfaceConfig;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bootstrap::BootstrapConfig;
    pub use crate::curve::CurveConfig;
    pub use crate::error::{ConfigError, ConfigResult, Validate};
    pub use crate::manager::ConfigManager;
    pub use crate::smile::{SabrConfig, WingConfig};
    pub use crate::surface::SurfaceConfig;
}
