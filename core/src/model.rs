//! Model trait and fixed policy constants.
//!
//! RULE: Every model implements ImpactModel.
//! Models are pure: the same scenario against the same sector table
//! always produces the same result, and no model holds mutable state.

use crate::{error::ImpactResult, types::InvestmentScenario};

/// Share of the investment captured directly as domestic value.
pub const DIRECT_CAPTURE_RATIO: f64 = 0.85;
/// Flat tax take applied to total economic activity.
pub const TAX_RATE: f64 = 0.18;
/// Split of the output multiplier's excess between supply chain and households.
pub const INDIRECT_SHARE: f64 = 0.6;
pub const INDUCED_SHARE: f64 = 0.4;
/// Jobs per $1M per unit of employment multiplier.
pub const JOBS_PER_EMPLOYMENT_UNIT: f64 = 5.0;
/// Linear (not compounded) yearly growth of the nominal return.
pub const ROI_ANNUAL_STEP: f64 = 0.03;
/// Fraction of total jobs attributed to the construction phase.
pub const CONSTRUCTION_PHASE_SHARE: f64 = 0.3;
/// Foreign exchange earned per unit invested.
pub const FOREX_SHARE: f64 = 0.3;
/// Fraction of total GDP contribution realised per year at full ramp.
pub const ANNUAL_GDP_SHARE: f64 = 0.1;

/// The contract every model must fulfill.
pub trait ImpactModel: Send + Sync {
    type Output;

    /// Unique stable name for this model.
    fn name(&self) -> &'static str;

    /// Compute this model's result for a whole scenario.
    ///
    /// Either returns a fully populated result or an error;
    /// never a partial one.
    fn evaluate(&self, scenario: &InvestmentScenario) -> ImpactResult<Self::Output>;
}
