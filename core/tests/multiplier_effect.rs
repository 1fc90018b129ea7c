//! Multiplier effect model tests.

use impact_core::{engine::ImpactEngine, error::ImpactError};

fn assert_approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn mining_flow_decomposition() {
    let engine = ImpactEngine::build_test();

    let m = engine.multiplier.compute(100.0, "MIN").unwrap();

    assert_approx(m.direct, 85.0);
    assert_approx(m.indirect, 27.0);
    assert_approx(m.induced, 18.0);
    assert_approx(m.total, 130.0);
    assert_eq!(m.total_jobs, 675);
    assert_approx(m.tax_revenue, 23.4);
}

#[test]
fn parts_sum_to_total_across_sectors() {
    let engine = ImpactEngine::build_test();

    for code in engine.sectors().codes() {
        let m = engine.multiplier.compute(37.5, code).unwrap();
        assert_approx(m.direct + m.indirect + m.induced, m.total);
        assert_approx(m.tax_revenue, 0.18 * m.total);
        // 60/40 split of the multiplier's excess
        assert_approx(m.indirect * 0.4, m.induced * 0.6);
    }
}

#[test]
fn negative_amount_rejected() {
    let engine = ImpactEngine::build_test();

    let err = engine.multiplier.compute(-1.0, "MIN").unwrap_err();

    assert_eq!(err.field(), Some("amount"));
}

#[test]
fn non_finite_flow_is_overflow() {
    let engine = ImpactEngine::build_test();

    let err = engine.multiplier.compute(f64::MAX, "ICT").unwrap_err();

    assert!(matches!(err, ImpactError::NumericOverflow { .. }));
    assert_eq!(err.field(), Some("total"));
}
