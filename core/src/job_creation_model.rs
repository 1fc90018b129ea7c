//! Job creation: direct, supply-chain and household-spending employment.

use crate::{
    error::{ensure_finite, ImpactError, ImpactResult},
    model::{ImpactModel, CONSTRUCTION_PHASE_SHARE},
    sector_table::{JobMultipliers, SectorTable, SkillsDistribution},
    types::{validate_amount, InvestmentScenario},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobImpact {
    pub direct: u64,
    pub indirect: u64,
    pub induced: u64,
    pub total: u64,
    /// Investment per job created, in currency units (not millions).
    pub cost_per_job: u64,
    pub construction_phase: u64,
    pub operational_phase: u64,
    pub sez_uplift_applied: bool,
    /// Sector workforce mix, in percent of jobs.
    pub skills_distribution: SkillsDistribution,
    pub gender_split: GenderSplit,
}

/// Share of jobs by gender, in percent (one decimal place).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GenderSplit {
    pub male: f64,
    pub female: f64,
}

impl GenderSplit {
    fn from_female_share(share: f64) -> Self {
        let female = (share * 1000.0).round() / 10.0;
        Self { male: 100.0 - female, female }
    }
}

pub struct JobCreationModel {
    sectors: Arc<SectorTable>,
    sez_job_uplift: f64,
}

impl JobCreationModel {
    pub fn new(sectors: Arc<SectorTable>, sez_job_uplift: f64) -> Self {
        Self { sectors, sez_job_uplift }
    }

    pub fn compute(&self, amount: f64, sector_code: &str) -> ImpactResult<JobImpact> {
        self.compute_with_uplift(amount, sector_code, None)
    }

    /// Like compute(), but applies the SEZ uplift when the scenario asks for it.
    pub fn compute_for(&self, scenario: &InvestmentScenario) -> ImpactResult<JobImpact> {
        let uplift = scenario.is_sez.then_some(self.sez_job_uplift);
        self.compute_with_uplift(scenario.amount, &scenario.sector_code, uplift)
    }

    fn compute_with_uplift(
        &self,
        amount: f64,
        sector_code: &str,
        uplift: Option<f64>,
    ) -> ImpactResult<JobImpact> {
        validate_amount(amount)?;
        let profile = self.sectors.lookup(sector_code)?;
        let JobMultipliers { direct, indirect, induced } = profile.job_multipliers;
        let factor = uplift.unwrap_or(1.0);

        // Each component is rounded on its own so the parts always sum to the total.
        let direct = jobs("direct", amount * direct * factor)?;
        let indirect = jobs("indirect", amount * indirect * factor)?;
        let induced = jobs("induced", amount * induced * factor)?;
        let total = direct
            .checked_add(indirect)
            .and_then(|s| s.checked_add(induced))
            .ok_or_else(|| ImpactError::NumericOverflow { field: "total".into() })?;

        if total == 0 {
            return Err(ImpactError::DivisionByZero { field: "cost_per_job".into() });
        }
        let cost_per_job = jobs("cost_per_job", amount * 1e6 / total as f64)?;

        let construction_phase = (total as f64 * CONSTRUCTION_PHASE_SHARE).floor() as u64;

        log::debug!(
            "jobs: sector={sector_code} amount={amount} direct={direct} indirect={indirect} \
             induced={induced} total={total} sez={}",
            uplift.is_some()
        );

        Ok(JobImpact {
            direct,
            indirect,
            induced,
            total,
            cost_per_job,
            construction_phase,
            operational_phase: total - construction_phase,
            sez_uplift_applied: uplift.is_some(),
            skills_distribution: profile.skills,
            gender_split: GenderSplit::from_female_share(profile.female_share),
        })
    }
}

impl ImpactModel for JobCreationModel {
    type Output = JobImpact;

    fn name(&self) -> &'static str { "job_creation" }

    fn evaluate(&self, scenario: &InvestmentScenario) -> ImpactResult<JobImpact> {
        self.compute_for(scenario)
    }
}

/// Round a non-negative job figure, refusing values that do not fit a u64.
fn jobs(field: &str, value: f64) -> ImpactResult<u64> {
    let rounded = ensure_finite(field, value)?.round();
    if rounded >= u64::MAX as f64 {
        return Err(ImpactError::NumericOverflow { field: field.to_string() });
    }
    Ok(rounded.max(0.0) as u64)
}
