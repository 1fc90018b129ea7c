//! GDP contribution model tests.

use impact_core::{engine::ImpactEngine, error::ImpactError};

fn assert_approx(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() < tol,
        "expected {expected}, got {actual}"
    );
}

/// Mining, $100M against a $28.4B economy.
#[test]
fn mining_reference_case() {
    let engine = ImpactEngine::build_test();

    let gdp = engine.gdp.compute(100.0, "MIN").unwrap();

    assert_approx(gdp.direct, 85.0, 1e-9);
    assert_approx(gdp.indirect, 45.0, 1e-9);
    assert_approx(gdp.total, 130.0, 1e-9);
    assert_approx(gdp.gdp_percentage, 0.4577, 1e-4);
    assert_approx(gdp.tax_revenue, 23.4, 1e-9);
}

#[test]
fn parts_sum_and_tax_is_flat_rate() {
    let engine = ImpactEngine::build_test();

    for code in engine.sectors().codes() {
        for amount in [1.0, 42.0, 1_000.0] {
            let g = engine.gdp.compute(amount, code).unwrap();
            assert_approx(g.direct + g.indirect, g.total, 1e-9);
            assert_approx(g.tax_revenue, 0.18 * g.total, 1e-9);
            assert_approx(g.gdp_percentage, g.total / 28_400.0 * 100.0, 1e-12);
        }
    }
}

#[test]
fn projection_ramps_then_grows() {
    let engine = ImpactEngine::build_test();

    // MIN ramps over 3 years at 8% growth.
    let p = engine.gdp.project(100.0, "MIN", 5).unwrap();

    assert_eq!(p.years.len(), 5);
    assert_approx(p.years[0].gdp, 13.0 * (1.0 / 3.0) * 1.08, 1e-9);
    assert_approx(p.years[2].gdp, 13.0 * 1.08f64.powi(3), 1e-9);
    assert_approx(p.years[4].gdp, 13.0 * 1.08f64.powi(5), 1e-9);

    let sum: f64 = p.years.iter().map(|y| y.gdp).sum();
    assert_approx(p.years[4].cumulative, sum, 1e-9);
    assert!(p.years.windows(2).all(|w| w[1].cumulative > w[0].cumulative));
}

#[test]
fn projection_horizon_validated() {
    let engine = ImpactEngine::build_test();

    for years in [0, 31] {
        let err = engine.gdp.project(100.0, "MIN", years).unwrap_err();
        assert_eq!(err.field(), Some("horizon_years"));
        assert_eq!(err.code(), "out_of_range");
    }
}

#[test]
fn unknown_sector_rejected() {
    let engine = ImpactEngine::build_test();

    assert!(matches!(
        engine.gdp.compute(10.0, "TOU"),
        Err(ImpactError::UnknownSector { .. })
    ));
}

#[test]
fn forex_generation_is_thirty_percent_of_investment() {
    let engine = ImpactEngine::build_test();

    for code in engine.sectors().codes() {
        let g = engine.gdp.compute(250.0, code).unwrap();
        assert_approx(g.forex_generation, 75.0, 1e-9);
    }
}

#[test]
fn non_finite_total_is_overflow() {
    let engine = ImpactEngine::build_test();

    let err = engine.gdp.compute(f64::MAX, "MIN").unwrap_err();

    assert!(matches!(err, ImpactError::NumericOverflow { .. }));
    assert_eq!(err.code(), "numeric_overflow");
    assert_eq!(err.field(), Some("total"));
}
