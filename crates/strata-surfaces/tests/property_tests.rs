//! Property-based tests for surface and bootstrap invariants.
//!
//! - Index lookups return the input position of every key
//! - Bilinear surfaces stay inside the range of their grid
//! - Credit foncier schedules amortize to zero and discount back to par

use std::collections::BTreeSet;
use std::sync::Arc;

use ndarray::Array2;
use proptest::prelude::*;
use rust_decimal::Decimal;

use strata_config::BootstrapConfig;
use strata_core::schedule::RollConvention;
use strata_core::{Date, Period};
use strata_math::interpolation::LinearInterpolation;
use strata_surfaces::bootstrap::CreditFoncierBootstrap;
use strata_surfaces::{prototype_smile, InterpolatedSurface, SurfaceIndex, SurfaceKey};

fn bilinear(times: Vec<f64>, strikes: Vec<f64>, values: Array2<f64>) -> InterpolatedSurface {
    InterpolatedSurface::new(
        times,
        strikes,
        values,
        &LinearInterpolation::default(),
        prototype_smile(Box::new(LinearInterpolation::default())),
        false,
    )
    .unwrap()
}

fn unique_keys() -> impl Strategy<Value = BTreeSet<(i32, i64)>> {
    prop::collection::btree_set((1i32..=120, 50i64..=150), 1..40)
}

proptest! {
    #[test]
    fn prop_index_returns_input_position(pairs in unique_keys()) {
        // reversed so input order differs from key order
        let keys: Vec<SurfaceKey> = pairs
            .iter()
            .rev()
            .map(|(months, strike)| SurfaceKey::new(Period::months(*months), Decimal::from(*strike)))
            .collect();
        let index = SurfaceIndex::build(keys.clone()).unwrap();

        prop_assert_eq!(index.len(), keys.len());
        for (position, key) in keys.iter().enumerate() {
            prop_assert_eq!(index.index_of(key), Some(position));
        }

        let ordered: Vec<SurfaceKey> = index.iter().map(|(k, _)| *k).collect();
        prop_assert!(ordered.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn prop_bilinear_surface_is_bounded(
        cells in prop::collection::vec(0.05f64..0.8, 6),
        ft in 0.0f64..=1.0,
        fk in 0.0f64..=1.0,
    ) {
        let values = Array2::from_shape_vec((2, 3), cells.clone()).unwrap();
        let surface = Arc::new(bilinear(vec![0.5, 2.0], vec![80.0, 100.0, 120.0], values));

        let t = 0.5 + ft * 1.5;
        let k = 80.0 + fk * 40.0;
        let v = surface.value(t, k).unwrap();

        let lo = cells.iter().copied().fold(f64::INFINITY, f64::min) - 1e-12;
        let hi = cells.iter().copied().fold(f64::NEG_INFINITY, f64::max) + 1e-12;
        prop_assert!(v >= lo && v <= hi, "{} outside [{}, {}]", v, lo, hi);
    }

    #[test]
    fn prop_bilinear_surface_reproduces_grid(cells in prop::collection::vec(0.05f64..0.8, 6)) {
        let values = Array2::from_shape_vec((2, 3), cells.clone()).unwrap();
        let surface = bilinear(vec![0.5, 2.0], vec![80.0, 100.0, 120.0], values);

        for (i, t) in [0.5, 2.0].iter().enumerate() {
            for (j, k) in [80.0, 100.0, 120.0].iter().enumerate() {
                let v = surface.value(*t, *k).unwrap();
                prop_assert!((v - cells[i * 3 + j]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn prop_credit_foncier_amortizes(
        periods in 1usize..=40,
        months in prop::sample::select(vec![1i32, 3, 6, 12]),
        rate_bp in 0i64..=1500,
        principal in 1_000i64..=10_000_000,
    ) {
        let principal = Decimal::from(principal);
        let rate = Decimal::new(rate_bp, 4);
        let start = Date::from_ymd(2024, 1, 31).unwrap();

        let schedule = CreditFoncierBootstrap::new(BootstrapConfig::standard())
            .bootstrap_regular(start, periods, Period::months(months), RollConvention::EndOfMonth, principal, rate)
            .unwrap();

        prop_assert_eq!(schedule.items.len(), periods);
        let tolerance = principal * Decimal::new(1, 8);
        prop_assert!((schedule.present_value() - principal).abs() < tolerance);
        prop_assert!(schedule.final_notional().abs() < tolerance);
        for pair in schedule.items.windows(2) {
            prop_assert_eq!(pair[0].closing_notional, pair[1].opening_notional);
            prop_assert!(pair[1].discount_factor <= pair[0].discount_factor);
        }
    }
}
