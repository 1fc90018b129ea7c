//! GDP contribution: value added, share of national GDP and tax take.

use crate::{
    error::{ensure_finite, ImpactResult},
    model::{ImpactModel, ANNUAL_GDP_SHARE, DIRECT_CAPTURE_RATIO, FOREX_SHARE, TAX_RATE},
    sector_table::SectorTable,
    types::{validate_amount, validate_horizon, InvestmentScenario},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GdpImpact {
    pub direct: f64,
    pub indirect: f64,
    pub total: f64,
    /// Total as a percentage of the reference GDP.
    pub gdp_percentage: f64,
    pub tax_revenue: f64,
    pub forex_generation: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GdpYear {
    pub year: u32,
    pub gdp: f64,
    pub cumulative: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GdpProjection {
    pub years: Vec<GdpYear>,
}

pub struct GdpContributionModel {
    sectors: Arc<SectorTable>,
    reference_gdp: f64,
}

impl GdpContributionModel {
    pub fn new(sectors: Arc<SectorTable>, reference_gdp: f64) -> Self {
        Self { sectors, reference_gdp }
    }

    pub fn reference_gdp(&self) -> f64 {
        self.reference_gdp
    }

    pub fn compute(&self, amount: f64, sector_code: &str) -> ImpactResult<GdpImpact> {
        validate_amount(amount)?;
        let profile = self.sectors.lookup(sector_code)?;

        let direct = amount * DIRECT_CAPTURE_RATIO;
        let indirect = amount * (profile.gdp_output_multiplier - 1.0);
        let total = ensure_finite("total", direct + indirect)?;
        let gdp_percentage = ensure_finite("gdp_percentage", total / self.reference_gdp * 100.0)?;
        let tax_revenue = total * TAX_RATE;
        let forex_generation = amount * FOREX_SHARE;

        log::debug!(
            "gdp: sector={sector_code} amount={amount} total={total:.2} pct={gdp_percentage:.4}"
        );

        Ok(GdpImpact {
            direct,
            indirect,
            total,
            gdp_percentage,
            tax_revenue,
            forex_generation,
        })
    }

    /// Year-by-year GDP contribution as the project ramps up and grows.
    ///
    /// Year y contributes `total * 0.1 * min(y / ramp_years, 1) * (1 + growth)^y`.
    pub fn project(&self, amount: f64, sector_code: &str, years: u32) -> ImpactResult<GdpProjection> {
        validate_horizon(years)?;
        let impact = self.compute(amount, sector_code)?;
        let revenue = self.sectors.lookup(sector_code)?.revenue;

        let mut cumulative = 0.0;
        let mut out = Vec::with_capacity(years as usize);
        for y in 1..=years {
            let ramp = (f64::from(y) / f64::from(revenue.ramp_years)).min(1.0);
            let gdp = impact.total * ANNUAL_GDP_SHARE * ramp * (1.0 + revenue.growth).powi(y as i32);
            let gdp = ensure_finite("gdp_projection.gdp", gdp)?;
            cumulative += gdp;
            out.push(GdpYear { year: y, gdp, cumulative });
        }
        ensure_finite("gdp_projection.cumulative", cumulative)?;

        Ok(GdpProjection { years: out })
    }
}

impl ImpactModel for GdpContributionModel {
    type Output = GdpImpact;

    fn name(&self) -> &'static str { "gdp_contribution" }

    fn evaluate(&self, scenario: &InvestmentScenario) -> ImpactResult<GdpImpact> {
        self.compute(scenario.amount, &scenario.sector_code)
    }
}
