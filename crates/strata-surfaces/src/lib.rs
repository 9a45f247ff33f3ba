//! # Strata Surfaces
//!
//! Pricing structures for the Strata library.
//!
//! This crate provides:
//!
//! - **Keys and Indexes**: ordered `(expiry, tenor, strike)` keys and the
//!   index that maps them to value positions
//! - **Interpolated Surfaces**: expiry columns and per-expiry smiles over a
//!   dense grid, with pluggable interpolation
//! - **Volatility Surfaces**: named surfaces built from quotes, optionally
//!   sliced by underlying tenor
//! - **Curves**: one-dimensional term curves of discount factors or rates
//! - **Market Environment**: an owned collection of named curves and surfaces
//! - **Bootstrap**: credit foncier amortization and zero curves from
//!   deposits and par swaps
//!
//! ## Quick Start
//!
//! ```rust
//! use rust_decimal_macros::dec;
//! use strata_config::SurfaceConfig;
//! use strata_core::Date;
//! use strata_surfaces::prelude::*;
//!
//! let today = Date::from_ymd(2024, 1, 1).unwrap();
//! let surface = VolatilitySurfaceBuilder::new("EQ.VOL", today)
//!     .config(&SurfaceConfig::bilinear())
//!     .table(&["1Y", "2Y"], &[dec!(90), dec!(110)], &[vec![0.25, 0.21], vec![0.24, 0.20]])
//!     .unwrap()
//!     .build()
//!     .unwrap();
//!
//! let vol = surface.value_by_term("1Y".parse().unwrap(), 100.0).unwrap();
//! assert!((vol - 0.23).abs() < 1e-9);
//! ```
//!
//! ## Features
//!
//! - `parallel`: evaluate query batches with rayon

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::too_many_arguments)]

pub mod bootstrap;
mod curve;
mod environment;
mod error;
mod index;
mod key;
mod surface;
mod volatility;

pub use curve::InterpolatedCurve;
pub use environment::{MarketEnvironment, MarketEnvironmentBuilder};
pub use error::{SurfaceError, SurfaceResult};
pub use index::{SurfaceIndex, SurfaceRow, SurfaceTable};
pub use key::SurfaceKey;
pub use surface::{prototype_smile, InterpolatedSurface, SmileFactory, SurfaceSlice};
pub use volatility::{VolatilityPoint, VolatilitySurface, VolatilitySurfaceBuilder};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bootstrap::{
        AmortizationItem, AmortizationSchedule, CreditFoncierBootstrap, CurveInstrument,
        ZeroCurveBootstrapper,
    };
    pub use crate::curve::InterpolatedCurve;
    pub use crate::environment::{MarketEnvironment, MarketEnvironmentBuilder};
    pub use crate::error::{SurfaceError, SurfaceResult};
    pub use crate::index::{SurfaceIndex, SurfaceTable};
    pub use crate::key::SurfaceKey;
    pub use crate::surface::{InterpolatedSurface, SurfaceSlice};
    pub use crate::volatility::{VolatilityPoint, VolatilitySurface, VolatilitySurfaceBuilder};
}
