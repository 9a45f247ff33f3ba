//! Integration tests: pricing structures end to end.
//!
//! Covers the worked scenarios for the interpolation family, surface key
//! ordering, the credit foncier bootstrap and a zero curve bootstrapped from
//! deposits and swaps and then served through a market environment.
//!
//! Set `RUST_LOG=strata_surfaces=debug` to see the build and solve events.

use approx::assert_relative_eq;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use strata_config::{BootstrapConfig, SurfaceConfig};
use strata_core::schedule::RollConvention;
use strata_core::{Date, DayCountConvention, Period};
use strata_math::interpolation::{
    FlatInterpolation, Interpolation, InterpolationRegistry, LogLinearInterpolation,
};
use strata_math::MathError;
use strata_surfaces::bootstrap::{CreditFoncierBootstrap, CurveInstrument, ZeroCurveBootstrapper};
use strata_surfaces::{
    MarketEnvironment, SurfaceError, SurfaceIndex, SurfaceKey, VolatilityPoint,
    VolatilitySurfaceBuilder,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn d(y: i32, m: u32, day: u32) -> Date {
    Date::from_ymd(y, m, day).unwrap()
}

// =============================================================================
// INTERPOLATION
// =============================================================================

#[test]
fn test_linear_scenario() {
    let registry = InterpolationRegistry::with_defaults();
    let mut linear = registry.create("LinearInterpolation").unwrap();
    linear.initialize(&[1.0, 2.0, 3.0], &[10.0, 20.0, 15.0]).unwrap();

    assert_relative_eq!(linear.value_at(1.5, false).unwrap(), 15.0);
    assert_relative_eq!(linear.value_at(2.5, true).unwrap(), 17.5);

    let err = linear.value_at(4.0, false).unwrap_err();
    assert!(matches!(err, MathError::ExtrapolationNotAllowed { .. }));

    // slope of the last segment is -5
    assert_relative_eq!(linear.value_at(4.0, true).unwrap(), 10.0);
}

#[test]
fn test_log_linear_is_constant_zero_rate_between_pillars() {
    let dfs = LogLinearInterpolation::new(&[0.0, 1.0, 2.0], &[1.0, 0.97, 0.94]).unwrap();

    let df = dfs.value_at(0.5, false).unwrap();
    assert_relative_eq!(df, 0.97f64.sqrt(), epsilon = 1e-14);
    // the zero rate at 0.5 equals the zero rate at 1.0
    assert_relative_eq!(-df.ln() / 0.5, -(0.97f64).ln(), epsilon = 1e-12);

    let df = dfs.value_at(1.5, false).unwrap();
    assert_relative_eq!(df, (0.97f64 * 0.94).sqrt(), epsilon = 1e-14);
}

#[test]
fn test_flat_ignores_position_and_extrapolation_flag() {
    let mut flat = FlatInterpolation::default();
    flat.initialize(&[1.0, 2.0], &[0.3, 0.5]).unwrap();
    for x in [-10.0, 1.0, 1.7, 2.0, 50.0] {
        assert_relative_eq!(flat.value_at(x, false).unwrap(), 0.3);
        assert_relative_eq!(flat.value_at(x, true).unwrap(), 0.3);
    }
}

// =============================================================================
// SURFACE KEYS AND SNAPSHOTS
// =============================================================================

#[test]
fn test_key_ordering_and_index_lookup() {
    let e1_t2_k1 = SurfaceKey::parse("1Y", Some("10Y"), dec!(90)).unwrap();
    let e2_t1_k1 = SurfaceKey::parse("2Y", Some("5Y"), dec!(90)).unwrap();
    let e1_t1_k2 = SurfaceKey::parse("1Y", Some("5Y"), dec!(110)).unwrap();

    let mut sorted = vec![e2_t1_k1, e1_t2_k1, e1_t1_k2];
    sorted.sort();
    assert_eq!(sorted, vec![e1_t1_k2, e1_t2_k1, e2_t1_k1]);

    let index = SurfaceIndex::build([e2_t1_k1, e1_t2_k1, e1_t1_k2]).unwrap();
    assert_eq!(index.index_of(&e2_t1_k1), Some(0));
    assert_eq!(index.index_of(&e1_t2_k1), Some(1));
    assert_eq!(index.index_of(&e1_t1_k2), Some(2));
    assert_eq!(index.index_of(&SurfaceKey::parse("3Y", Some("5Y"), dec!(90)).unwrap()), None);

    let err = SurfaceIndex::build([e1_t1_k2, e2_t1_k1, e1_t1_k2]).unwrap_err();
    assert!(matches!(err, SurfaceError::DuplicateKey { .. }));
}

#[test]
fn test_tenor_surface_snapshot_and_queries() {
    init_tracing();
    let today = d(2024, 1, 2);
    let surface = VolatilitySurfaceBuilder::new("SWAPTION.VOL", today)
        .config(&SurfaceConfig::bilinear())
        .tenor_table("5Y", &["1Y", "2Y"], &[dec!(0.03), dec!(0.05)], &[vec![0.30, 0.26], vec![0.28, 0.24]])
        .unwrap()
        .tenor_table("10Y", &["1Y", "2Y"], &[dec!(0.03), dec!(0.05)], &[vec![0.26, 0.22], vec![0.24, 0.20]])
        .unwrap()
        .build()
        .unwrap();

    assert!(surface.has_tenor());
    assert_eq!(surface.len(), 8);

    let grid = surface.surface().unwrap().to_grid();
    assert_eq!(grid[0], vec!["Expiry", "Tenor", "0.03", "0.05"]);
    assert_eq!(grid[1], vec!["1Y", "5Y", "0.3", "0.26"]);
    assert_eq!(grid[2], vec!["1Y", "10Y", "0.26", "0.22"]);
    assert_eq!(grid.len(), 5);

    // one year expiry, halfway in strike, on each quoted tenor
    let one_year = Period::years(1);
    let t = DayCountConvention::Act365Fixed
        .year_fraction(today, one_year.add_to(today).unwrap())
        .to_f64()
        .unwrap();
    assert_relative_eq!(surface.value_with_tenor(t, Period::years(5), 0.04).unwrap(), 0.28, epsilon = 1e-12);
    assert_relative_eq!(surface.value_with_tenor(t, Period::years(10), 0.04).unwrap(), 0.24, epsilon = 1e-12);

    // a surface with tenors needs one to be named
    assert!(surface.value(t, 0.04).is_err());
}

#[test]
fn test_environment_copies_share_surfaces() {
    let today = d(2024, 1, 2);
    let base = VolatilitySurfaceBuilder::new("EQ.VOL", today)
        .points([
            VolatilityPoint::parse("6M", None, dec!(100), 0.20).unwrap(),
            VolatilityPoint::parse("1Y", None, dec!(100), 0.22).unwrap(),
        ])
        .build()
        .unwrap();

    let env = MarketEnvironment::builder(today).surface(base).build();
    let scenario = env.clone();
    assert!(std::sync::Arc::ptr_eq(
        &env.surface("EQ.VOL").unwrap(),
        &scenario.surface("EQ.VOL").unwrap()
    ));

    let key = SurfaceKey::parse("6M", None, dec!(100)).unwrap();
    assert_eq!(scenario.surface("EQ.VOL").unwrap().quote(&key), Some(0.20));
    assert_eq!(scenario.surface_ids(), vec!["EQ.VOL"]);
}

// =============================================================================
// CREDIT FONCIER
// =============================================================================

#[test]
fn test_credit_foncier_semi_annual_scenario() {
    init_tracing();
    let principal = dec!(1000000);
    let bootstrap = CreditFoncierBootstrap::new(
        BootstrapConfig::standard().with_day_count(DayCountConvention::Act365Fixed),
    );
    let schedule = bootstrap
        .bootstrap_regular(d(2024, 1, 1), 4, Period::months(6), RollConvention::None, principal, dec!(0.05))
        .unwrap();

    assert_eq!(schedule.items.len(), 4);
    assert_eq!(schedule.items[0].start, d(2024, 1, 1));
    assert_eq!(schedule.items[3].end, d(2026, 1, 1));

    // repayments discounted at the compounded period factors give back the principal
    let pv = schedule.present_value();
    let relative = ((pv - principal) / principal).abs();
    assert!(relative < dec!(0.00000001), "pv {pv}");

    // fully amortized after the fourth payment
    assert!(schedule.final_notional().abs() < dec!(0.000001));
    assert!((schedule.total_principal() - principal).abs() < dec!(0.000001));

    // level payment: interest falls while principal rises
    for pair in schedule.items.windows(2) {
        assert_eq!(pair[0].payment, pair[1].payment);
        assert!(pair[1].interest < pair[0].interest);
    }

    let repayment = schedule.repayment.to_f64().unwrap();
    assert!(repayment > 250_000.0 && repayment < 270_000.0);
}

#[test]
fn test_credit_foncier_rounds_trip_through_json() {
    let schedule = CreditFoncierBootstrap::default()
        .bootstrap(&[d(2024, 1, 1), d(2024, 7, 1), d(2025, 1, 1)], dec!(5000), dec!(0.04))
        .unwrap();
    let json = serde_json::to_string(&schedule).unwrap();
    let back: strata_surfaces::bootstrap::AmortizationSchedule = serde_json::from_str(&json).unwrap();
    assert_eq!(back.items.len(), 2);
    assert_eq!(back.items[1].end, d(2025, 1, 1));
    assert!((back.repayment - schedule.repayment).abs() < Decimal::new(1, 10));
}

// =============================================================================
// ZERO CURVE
// =============================================================================

#[test]
fn test_zero_curve_reprices_and_serves_environment() {
    init_tracing();
    let today = d(2024, 1, 2);
    let bootstrapper = ZeroCurveBootstrapper::new(today, BootstrapConfig::new("USD.OIS"))
        .instruments([
            CurveInstrument::deposit("1M", 0.0530).unwrap(),
            CurveInstrument::deposit("3M", 0.0535).unwrap(),
            CurveInstrument::par_swap("1Y", 0.0500, "3M").unwrap(),
            CurveInstrument::par_swap("3Y", 0.0420, "6M").unwrap(),
            CurveInstrument::par_swap("10Y", 0.0390, "1Y").unwrap(),
        ]);
    let curve = bootstrapper.bootstrap().unwrap();

    for (instrument, pv) in bootstrapper.reprice(&curve).unwrap() {
        assert!(pv.abs() < 1e-9, "{instrument} reprices to {pv}");
    }

    let env = MarketEnvironment::builder(today).curve(curve).build();
    assert_relative_eq!(env.discount_factor("USD.OIS", today).unwrap(), 1.0);

    let five_years = env.discount_factor("USD.OIS", d(2029, 1, 2)).unwrap();
    let ten_years = env.discount_factor("USD.OIS", d(2034, 1, 2)).unwrap();
    assert!(five_years > ten_years && ten_years > 0.6);

    // past the last pillar the curve extrapolates
    assert!(env.discount_factor("USD.OIS", d(2040, 1, 2)).unwrap() < ten_years);

    let missing = env.discount_factor("EUR.ESTR", today).unwrap_err();
    assert!(matches!(missing, SurfaceError::CurveNotFound { .. }));
}

#[test]
fn test_zero_curve_rejects_bad_tenor() {
    let err = CurveInstrument::deposit("3Q", 0.05).unwrap_err();
    assert!(matches!(err, SurfaceError::InvalidPeriod { .. }));

    let err = CurveInstrument::par_swap("2Y", 0.05, "").unwrap_err();
    assert!(matches!(err, SurfaceError::InvalidPeriod { .. }));
}
