//! Multiplier flow: how one investment spreads through the economy.

use crate::{
    error::{ensure_finite, ImpactError, ImpactResult},
    model::{
        ImpactModel, DIRECT_CAPTURE_RATIO, INDIRECT_SHARE, INDUCED_SHARE,
        JOBS_PER_EMPLOYMENT_UNIT, TAX_RATE,
    },
    sector_table::SectorTable,
    types::{validate_amount, InvestmentScenario},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MultiplierFlow {
    pub direct: f64,
    pub indirect: f64,
    pub induced: f64,
    /// direct + indirect + induced
    pub total: f64,
    pub total_jobs: u64,
    pub tax_revenue: f64,
}

pub struct MultiplierEffectModel {
    sectors: Arc<SectorTable>,
}

impl MultiplierEffectModel {
    pub fn new(sectors: Arc<SectorTable>) -> Self {
        Self { sectors }
    }

    pub fn compute(&self, amount: f64, sector_code: &str) -> ImpactResult<MultiplierFlow> {
        validate_amount(amount)?;
        let profile = self.sectors.lookup(sector_code)?;
        let effect = profile.multiplier_effect;

        let excess = effect.output - 1.0;
        let direct = amount * DIRECT_CAPTURE_RATIO;
        let indirect = amount * excess * INDIRECT_SHARE;
        let induced = amount * excess * INDUCED_SHARE;
        let total = ensure_finite("total", direct + indirect + induced)?;

        let jobs = ensure_finite("total_jobs", amount * effect.employment * JOBS_PER_EMPLOYMENT_UNIT)?
            .round();
        if jobs >= u64::MAX as f64 {
            return Err(ImpactError::NumericOverflow { field: "total_jobs".into() });
        }

        log::debug!(
            "multiplier: sector={sector_code} amount={amount} total={total:.2} jobs={jobs}"
        );

        Ok(MultiplierFlow {
            direct,
            indirect,
            induced,
            total,
            total_jobs: jobs as u64,
            tax_revenue: total * TAX_RATE,
        })
    }
}

impl ImpactModel for MultiplierEffectModel {
    type Output = MultiplierFlow;

    fn name(&self) -> &'static str { "multiplier_effect" }

    fn evaluate(&self, scenario: &InvestmentScenario) -> ImpactResult<MultiplierFlow> {
        self.compute(scenario.amount, &scenario.sector_code)
    }
}
