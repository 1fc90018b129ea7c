//! ROI timeline model tests.

use impact_core::{engine::ImpactEngine, error::ImpactError};

fn assert_approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

/// $100M at 18%: 18.0 in year one, then +3% of the base rate each year.
#[test]
fn mining_ten_year_timeline() {
    let engine = ImpactEngine::build_test();

    let roi = engine.roi.compute(100.0, "MIN", 10).unwrap();

    assert_eq!(roi.points.len(), 10);
    assert_approx(roi.points[0].annual_return, 18.0);
    assert_approx(roi.points[0].cumulative_return, 18.0);

    for w in roi.points.windows(2) {
        let y = w[1].year;
        let expected_step = 18.0 * (1.0 + f64::from(y - 1) * 0.03);
        assert_approx(w[1].cumulative_return - w[0].cumulative_return, expected_step);
        assert!(w[1].cumulative_return > w[0].cumulative_return);
    }

    // 18 + 18.54 + 19.08 + 19.62 + 20.16 = 95.4 after five years; 116.1 after six.
    assert_eq!(roi.payback_year, 6);
    assert!(roi.payback_reached);
    assert!(roi.points[4].cumulative_return < 100.0);
    assert!(roi.points[5].cumulative_return >= 100.0);

    assert_approx(roi.nominal_return_rate, 18.0);
    let last = roi.points.last().unwrap();
    assert_approx(roi.terminal_net_cash_flow, last.net_cash_flow);
    assert_approx(last.net_cash_flow, last.cumulative_return - 100.0);
}

#[test]
fn every_point_carries_the_investment() {
    let engine = ImpactEngine::build_test();

    let roi = engine.roi.compute(250.0, "ICT", 7).unwrap();

    assert!(roi.points.iter().all(|p| p.cumulative_investment == 250.0));
    assert_eq!(
        roi.points.iter().map(|p| p.year).collect::<Vec<_>>(),
        (1..=7).collect::<Vec<_>>()
    );
}

#[test]
fn payback_not_reached_uses_horizon_sentinel() {
    let engine = ImpactEngine::build_test();

    // INF returns 8%: cumulative after ten years is 90.8 on 100.
    let roi = engine.roi.compute(100.0, "INF", 10).unwrap();

    assert!(!roi.payback_reached);
    assert_eq!(roi.payback_year, 10);
    assert!(roi.terminal_net_cash_flow < 0.0);
}

#[test]
fn single_year_horizon() {
    let engine = ImpactEngine::build_test();

    let roi = engine.roi.compute(10.0, "MIN", 1).unwrap();

    assert_eq!(roi.points.len(), 1);
    assert_eq!(roi.payback_year, 1);
    assert!(!roi.payback_reached);
}

#[test]
fn horizon_out_of_range_rejected() {
    let engine = ImpactEngine::build_test();

    for years in [0, 31, 100] {
        match engine.roi.compute(100.0, "MIN", years) {
            Err(ImpactError::Validation { field, .. }) => assert_eq!(field, "horizon_years"),
            other => panic!("expected validation error for {years}, got {other:?}"),
        }
    }
    assert!(engine.roi.compute(100.0, "MIN", 30).is_ok());
}

#[test]
fn discounted_metrics_follow_cash_flows() {
    let engine = ImpactEngine::build_test();
    let roi = engine.roi.compute(100.0, "MIN", 10).unwrap();

    let flows = roi.cash_flows();
    assert_eq!(flows.len(), 11);
    assert_approx(flows[0], -100.0);
    assert_approx(flows[1], 18.0);

    // Undiscounted NPV is the terminal net cash flow.
    assert_approx(roi.discounted_npv(0.0), roi.terminal_net_cash_flow);

    let table = roi.npv_table();
    assert_eq!(table.len(), 4);
    assert!(table.windows(2).all(|w| w[1].npv < w[0].npv), "NPV must fall as the rate rises");

    let irr = roi.irr().expect("flows change sign");
    assert!(roi.discounted_npv(irr).abs() < 1e-6);
    assert!(irr > 0.14 && irr < 0.16, "irr {irr}");
}

/// Thirty years of returns on a huge amount run past f64::MAX.
#[test]
fn cumulative_overflow_is_reported() {
    let engine = ImpactEngine::build_test();

    let err = engine.roi.compute(f64::MAX / 2.0, "MIN", 30).unwrap_err();

    assert!(matches!(err, ImpactError::NumericOverflow { .. }));
    assert_eq!(err.code(), "numeric_overflow");
    assert_eq!(err.field(), Some("cumulative_return"));
}
