//! Job creation model tests.

use impact_core::{
    engine::ImpactEngine,
    error::{ImpactError, ValidationReason},
    types::InvestmentScenario,
};

/// Mining, $100M: the calibrated reference case.
#[test]
fn mining_reference_case() {
    let engine = ImpactEngine::build_test();

    let jobs = engine.jobs.compute(100.0, "MIN").unwrap();

    assert_eq!(jobs.direct, 210);
    assert_eq!(jobs.indirect, 180);
    assert_eq!(jobs.induced, 130);
    assert_eq!(jobs.total, 520);
    assert_eq!(jobs.cost_per_job, 192_308);
    assert!(!jobs.sez_uplift_applied);
}

#[test]
fn components_always_sum_to_total() {
    let engine = ImpactEngine::build_test();

    for code in engine.sectors().codes() {
        for amount in [0.7, 1.0, 12.5, 99.9, 250.0, 3_333.3] {
            let j = engine.jobs.compute(amount, code).unwrap();
            assert_eq!(
                j.direct + j.indirect + j.induced,
                j.total,
                "{code} @ {amount}: parts do not sum to total"
            );
            assert_eq!(j.construction_phase + j.operational_phase, j.total);
        }
    }
}

#[test]
fn construction_phase_is_thirty_percent_floor() {
    let engine = ImpactEngine::build_test();

    let j = engine.jobs.compute(100.0, "MIN").unwrap();

    assert_eq!(j.construction_phase, 156);
    assert_eq!(j.operational_phase, 364);
}

#[test]
fn sector_lookup_is_case_insensitive() {
    let engine = ImpactEngine::build_test();

    let upper = engine.jobs.compute(50.0, "AGR").unwrap();
    let lower = engine.jobs.compute(50.0, " agr ").unwrap();

    assert_eq!(upper, lower);
}

#[test]
fn sez_uplift_keeps_invariant() {
    let engine = ImpactEngine::build_test();
    let scenario = InvestmentScenario::new(100.0, "MIN", 10).with_sez(true);

    let j = engine.jobs.compute_for(&scenario).unwrap();

    assert!(j.sez_uplift_applied);
    assert_eq!(j.direct, 231);
    assert_eq!(j.indirect, 198);
    assert_eq!(j.induced, 143);
    assert_eq!(j.total, 572);
    assert_eq!(j.direct + j.indirect + j.induced, j.total);
}

#[test]
fn non_sez_scenario_matches_plain_compute() {
    let engine = ImpactEngine::build_test();
    let scenario = InvestmentScenario::new(80.0, "ICT", 10);

    assert_eq!(
        engine.jobs.compute_for(&scenario).unwrap(),
        engine.jobs.compute(80.0, "ICT").unwrap()
    );
}

#[test]
fn non_positive_amount_rejected() {
    let engine = ImpactEngine::build_test();

    for amount in [0.0, -5.0] {
        match engine.jobs.compute(amount, "MIN") {
            Err(ImpactError::Validation { field, reason }) => {
                assert_eq!(field, "amount");
                assert_eq!(reason, ValidationReason::NotPositive);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}

#[test]
fn nan_amount_rejected() {
    let engine = ImpactEngine::build_test();

    let err = engine.jobs.compute(f64::NAN, "MIN").unwrap_err();

    assert_eq!(err.code(), "not_finite");
    assert_eq!(err.field(), Some("amount"));
}

#[test]
fn unknown_sector_rejected() {
    let engine = ImpactEngine::build_test();

    let err = engine.jobs.compute(100.0, "XYZ").unwrap_err();

    assert!(matches!(err, ImpactError::UnknownSector { ref code } if code == "XYZ"));
    assert_eq!(err.code(), "unknown_sector");
}

/// Tiny amounts round every component to zero jobs; cost per job is undefined.
#[test]
fn zero_total_jobs_is_division_by_zero() {
    let engine = ImpactEngine::build_test();

    let err = engine.jobs.compute(0.1, "MIN").unwrap_err();

    assert!(matches!(err, ImpactError::DivisionByZero { .. }));
    assert_eq!(err.field(), Some("cost_per_job"));
}

#[test]
fn summed_job_count_overflow_is_an_error() {
    let engine = ImpactEngine::build_test();

    // Each component fits a u64; their sum does not.
    let err = engine.jobs.compute(1.5e18, "AGR").unwrap_err();

    assert!(matches!(err, ImpactError::NumericOverflow { .. }));
    assert_eq!(err.code(), "numeric_overflow");
    assert_eq!(err.field(), Some("total"));
}

#[test]
fn single_component_overflow_names_the_component() {
    let engine = ImpactEngine::build_test();

    let err = engine.jobs.compute(1e19, "MIN").unwrap_err();

    assert_eq!(err.code(), "numeric_overflow");
    assert_eq!(err.field(), Some("direct"));
}

#[test]
fn skills_mix_comes_from_the_sector() {
    let engine = ImpactEngine::build_test();

    let ict = engine.jobs.compute(100.0, "ICT").unwrap();
    let agr = engine.jobs.compute(100.0, "AGR").unwrap();

    assert_eq!(ict.skills_distribution.professional, 35.0);
    assert_eq!(ict.skills_distribution.unskilled, 5.0);
    assert_eq!(agr.skills_distribution.unskilled, 45.0);
    for j in [&ict, &agr] {
        assert_eq!(j.skills_distribution.total(), 100.0);
    }
}

#[test]
fn gender_split_follows_sector_female_share() {
    let engine = ImpactEngine::build_test();

    let agr = engine.jobs.compute(100.0, "AGR").unwrap();
    let min = engine.jobs.compute(100.0, "MIN").unwrap();

    assert_eq!(agr.gender_split.female, 40.0);
    assert_eq!(agr.gender_split.male, 60.0);
    assert_eq!(min.gender_split.female, 30.0);
    assert_eq!(min.gender_split.male, 70.0);
}
