//! The impact engine: runs every model for one scenario.
//!
//! EXECUTION ORDER (fixed, documented):
//!   1. Job creation
//!   2. GDP contribution (+ year-by-year projection)
//!   3. Multiplier effect
//!   4. ROI timeline
//!   5. Monte Carlo
//!
//! RULES:
//!   - The scenario is validated once, before any model runs.
//!   - No model reads another model's output; they only share the
//!     read-only sector table.
//!   - Any model failure fails the whole report. No partial reports.

use crate::{
    config::EngineConfig,
    error::ImpactResult,
    gdp_contribution_model::{GdpContributionModel, GdpImpact, GdpProjection},
    job_creation_model::{JobCreationModel, JobImpact},
    model::ImpactModel,
    monte_carlo_engine::{MonteCarloDistribution, MonteCarloEngine},
    multiplier_effect_model::{MultiplierEffectModel, MultiplierFlow},
    roi_timeline_model::{RoiTimeline, RoiTimelineModel},
    sector_table::SectorTable,
    types::InvestmentScenario,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImpactReport {
    pub scenario: InvestmentScenario,
    pub jobs: JobImpact,
    pub gdp: GdpImpact,
    pub gdp_projection: GdpProjection,
    pub multiplier: MultiplierFlow,
    pub roi: RoiTimeline,
    pub monte_carlo: MonteCarloDistribution,
}

pub struct ImpactEngine {
    sectors:     Arc<SectorTable>,
    pub jobs:        JobCreationModel,
    pub gdp:         GdpContributionModel,
    pub multiplier:  MultiplierEffectModel,
    pub roi:         RoiTimelineModel,
    pub monte_carlo: MonteCarloEngine,
}

impl ImpactEngine {
    /// Build a fully wired engine with every model sharing one sector table.
    pub fn build(config: EngineConfig) -> Self {
        let sectors = Arc::new(config.sectors);
        Self {
            jobs:        JobCreationModel::new(Arc::clone(&sectors), config.policy.sez_job_uplift),
            gdp:         GdpContributionModel::new(Arc::clone(&sectors), config.policy.reference_gdp),
            multiplier:  MultiplierEffectModel::new(Arc::clone(&sectors)),
            roi:         RoiTimelineModel::new(Arc::clone(&sectors)),
            monte_carlo: MonteCarloEngine::new(
                Arc::clone(&sectors),
                config.scenarios,
                config.monte_carlo,
            ),
            sectors,
        }
    }

    /// Engine over EngineConfig::default_test().
    pub fn build_test() -> Self {
        Self::build(EngineConfig::default_test())
    }

    pub fn sectors(&self) -> &SectorTable {
        &self.sectors
    }

    /// Run every model for one scenario and assemble the combined report.
    pub fn run(&self, scenario: &InvestmentScenario) -> ImpactResult<ImpactReport> {
        scenario.validate()?;
        self.sectors.lookup(&scenario.sector_code)?;

        let jobs = self.jobs.evaluate(scenario)?;
        let gdp = self.gdp.evaluate(scenario)?;
        let gdp_projection =
            self.gdp
                .project(scenario.amount, &scenario.sector_code, scenario.horizon_years)?;
        let multiplier = self.multiplier.evaluate(scenario)?;
        let roi = self.roi.evaluate(scenario)?;
        let monte_carlo = self.monte_carlo.evaluate(scenario)?;

        log::info!(
            "report: sector={} amount={} horizon={} scenario={} jobs={} gdp={:.2} payback={} mc_mean={:.2}",
            scenario.sector_code,
            scenario.amount,
            scenario.horizon_years,
            scenario.scenario,
            jobs.total,
            gdp.total,
            roi.payback_year,
            monte_carlo.mean
        );

        Ok(ImpactReport {
            scenario: scenario.clone(),
            jobs,
            gdp,
            gdp_projection,
            multiplier,
            roi,
            monte_carlo,
        })
    }
}
