//! Calibrated per-sector coefficients.
//!
//! RULE: the table is built once (from config files or test defaults)
//! and is read-only afterwards. Models share it through an Arc and only
//! ever call lookup().

use crate::{
    error::{ImpactError, ImpactResult, ValidationReason},
    types::SectorCode,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Jobs created per $1M invested.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct JobMultipliers {
    pub direct:   f64,
    pub indirect: f64,
    pub induced:  f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MultiplierEffect {
    pub output:     f64,
    pub employment: f64,
    pub income:     f64,
}

/// Revenue ramp used by the year-by-year GDP projection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RevenueAssumptions {
    pub growth:     f64,
    pub ramp_years: u32,
}

/// Workforce composition of the jobs a sector creates, in percent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SkillsDistribution {
    pub unskilled:    f64,
    pub semi_skilled: f64,
    pub skilled:      f64,
    pub professional: f64,
}

/// Manufacturing mix, used when a profile does not specify one.
impl Default for SkillsDistribution {
    fn default() -> Self {
        Self { unskilled: 25.0, semi_skilled: 40.0, skilled: 25.0, professional: 10.0 }
    }
}

impl SkillsDistribution {
    pub fn total(&self) -> f64 {
        self.unskilled + self.semi_skilled + self.skilled + self.professional
    }
}

/// Share of jobs held by women when a profile does not specify one.
pub const DEFAULT_FEMALE_SHARE: f64 = 0.30;

fn default_female_share() -> f64 {
    DEFAULT_FEMALE_SHARE
}

/// Shift applied on top of the scenario's return distribution.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct RiskAdjustment {
    pub return_adj: f64,
    pub vol_adj:    f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SectorProfile {
    pub code: SectorCode,
    #[serde(default)]
    pub label: String,
    pub job_multipliers: JobMultipliers,
    pub gdp_output_multiplier: f64,
    pub multiplier_effect: MultiplierEffect,
    pub annual_return_rate: f64,
    pub revenue: RevenueAssumptions,
    #[serde(default)]
    pub skills: SkillsDistribution,
    /// Fraction of jobs held by women, in [0, 1].
    #[serde(default = "default_female_share")]
    pub female_share: f64,
    #[serde(default)]
    pub risk: RiskAdjustment,
}

impl SectorProfile {
    /// Reject coefficients that would make a model produce nonsense.
    fn validate(&self) -> ImpactResult<()> {
        let field = |name: &str| format!("sectors.{}.{name}", self.code);

        if self.code.trim().is_empty() {
            return Err(ImpactError::validation("sectors.code", ValidationReason::Empty));
        }

        let positives = [
            ("job_multipliers.direct",   self.job_multipliers.direct),
            ("job_multipliers.indirect", self.job_multipliers.indirect),
            ("job_multipliers.induced",  self.job_multipliers.induced),
        ];
        for (name, value) in positives {
            if !value.is_finite() {
                return Err(ImpactError::validation(field(name), ValidationReason::NotFinite));
            }
            if value <= 0.0 {
                return Err(ImpactError::validation(field(name), ValidationReason::NotPositive));
            }
        }

        let at_least_one = [
            ("gdp_output_multiplier",        self.gdp_output_multiplier),
            ("multiplier_effect.output",     self.multiplier_effect.output),
            ("multiplier_effect.employment", self.multiplier_effect.employment),
            ("multiplier_effect.income",     self.multiplier_effect.income),
        ];
        for (name, value) in at_least_one {
            if !value.is_finite() || value < 1.0 {
                return Err(ImpactError::validation(
                    field(name),
                    ValidationReason::BelowMinimum { min: 1.0 },
                ));
            }
        }

        if !(0.0..=1.0).contains(&self.annual_return_rate) {
            return Err(ImpactError::validation(
                field("annual_return_rate"),
                ValidationReason::OutOfRange { min: 0.0, max: 1.0 },
            ));
        }

        if !self.revenue.growth.is_finite() {
            return Err(ImpactError::validation(field("revenue.growth"), ValidationReason::NotFinite));
        }
        if self.revenue.ramp_years == 0 {
            return Err(ImpactError::validation(
                field("revenue.ramp_years"),
                ValidationReason::BelowMinimum { min: 1.0 },
            ));
        }

        let skills = [
            ("skills.unskilled",    self.skills.unskilled),
            ("skills.semi_skilled", self.skills.semi_skilled),
            ("skills.skilled",      self.skills.skilled),
            ("skills.professional", self.skills.professional),
        ];
        for (name, value) in skills {
            if !value.is_finite() || value < 0.0 {
                return Err(ImpactError::validation(
                    field(name),
                    ValidationReason::BelowMinimum { min: 0.0 },
                ));
            }
        }
        if (self.skills.total() - 100.0).abs() > 1e-6 {
            return Err(ImpactError::validation(
                field("skills"),
                ValidationReason::OutOfRange { min: 100.0, max: 100.0 },
            ));
        }
        if !(0.0..=1.0).contains(&self.female_share) {
            return Err(ImpactError::validation(
                field("female_share"),
                ValidationReason::OutOfRange { min: 0.0, max: 1.0 },
            ));
        }

        if !self.risk.return_adj.is_finite() || !self.risk.vol_adj.is_finite() {
            return Err(ImpactError::validation(field("risk"), ValidationReason::NotFinite));
        }
        Ok(())
    }
}

/// All sector profiles keyed by normalised (upper-case) code.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorTable {
    profiles: BTreeMap<SectorCode, SectorProfile>,
}

impl SectorTable {
    /// Build a table, validating every profile and rejecting duplicates.
    pub fn from_profiles(profiles: Vec<SectorProfile>) -> ImpactResult<Self> {
        if profiles.is_empty() {
            return Err(ImpactError::validation("sectors", ValidationReason::Empty));
        }

        let mut map = BTreeMap::new();
        for mut profile in profiles {
            profile.validate()?;
            let key = normalise(&profile.code);
            profile.code = key.clone();
            if map.contains_key(&key) {
                return Err(ImpactError::validation(
                    format!("sectors.{key}"),
                    ValidationReason::Duplicate,
                ));
            }
            map.insert(key, profile);
        }
        Ok(Self { profiles: map })
    }

    pub fn lookup(&self, code: &str) -> ImpactResult<&SectorProfile> {
        self.profiles
            .get(&normalise(code))
            .ok_or_else(|| ImpactError::UnknownSector { code: code.to_string() })
    }

    pub fn contains(&self, code: &str) -> bool {
        self.profiles.contains_key(&normalise(code))
    }

    /// Configured codes in sorted order.
    pub fn codes(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    pub fn profiles(&self) -> impl Iterator<Item = &SectorProfile> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Table with hardcoded calibration for use in unit tests.
    /// Goes through from_profiles() so it obeys the same rules as loaded data.
    pub fn default_test() -> Self {
        let profiles = vec![
            SectorProfile {
                code: "MIN".into(),
                label: "Mining & Quarrying".into(),
                job_multipliers: JobMultipliers { direct: 2.1, indirect: 1.8, induced: 1.3 },
                gdp_output_multiplier: 1.45,
                multiplier_effect: MultiplierEffect { output: 1.45, employment: 1.35, income: 1.30 },
                annual_return_rate: 0.18,
                revenue: RevenueAssumptions { growth: 0.08, ramp_years: 3 },
                skills: SkillsDistribution { unskilled: 30.0, semi_skilled: 35.0, skilled: 25.0, professional: 10.0 },
                female_share: 0.30,
                risk: RiskAdjustment { return_adj: 0.03, vol_adj: 0.05 },
            },
            SectorProfile {
                code: "AGR".into(),
                label: "Agriculture".into(),
                job_multipliers: JobMultipliers { direct: 8.5, indirect: 4.2, induced: 3.1 },
                gdp_output_multiplier: 1.65,
                multiplier_effect: MultiplierEffect { output: 1.65, employment: 2.10, income: 1.55 },
                annual_return_rate: 0.12,
                revenue: RevenueAssumptions { growth: 0.06, ramp_years: 2 },
                skills: SkillsDistribution { unskilled: 45.0, semi_skilled: 30.0, skilled: 18.0, professional: 7.0 },
                female_share: 0.40,
                risk: RiskAdjustment { return_adj: -0.02, vol_adj: 0.08 },
            },
            SectorProfile {
                code: "ICT".into(),
                label: "ICT".into(),
                job_multipliers: JobMultipliers { direct: 3.5, indirect: 2.8, induced: 2.0 },
                gdp_output_multiplier: 1.80,
                multiplier_effect: MultiplierEffect { output: 1.80, employment: 1.60, income: 1.70 },
                annual_return_rate: 0.22,
                revenue: RevenueAssumptions { growth: 0.15, ramp_years: 1 },
                skills: SkillsDistribution { unskilled: 5.0, semi_skilled: 15.0, skilled: 45.0, professional: 35.0 },
                female_share: 0.30,
                risk: RiskAdjustment { return_adj: 0.05, vol_adj: 0.04 },
            },
            SectorProfile {
                code: "INF".into(),
                label: "Infrastructure".into(),
                job_multipliers: JobMultipliers { direct: 5.5, indirect: 3.8, induced: 2.5 },
                gdp_output_multiplier: 1.75,
                multiplier_effect: MultiplierEffect { output: 1.75, employment: 2.00, income: 1.55 },
                annual_return_rate: 0.08,
                revenue: RevenueAssumptions { growth: 0.06, ramp_years: 3 },
                skills: SkillsDistribution { unskilled: 40.0, semi_skilled: 30.0, skilled: 20.0, professional: 10.0 },
                female_share: 0.30,
                risk: RiskAdjustment { return_adj: -0.02, vol_adj: 0.02 },
            },
        ];
        Self::from_profiles(profiles)
            .unwrap_or_else(|e| panic!("built-in test calibration is invalid: {e}"))
    }
}

fn normalise(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
