//! Shared value types passed into every model.

use crate::error::{ImpactError, ImpactResult, ValidationReason};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A sector key such as "MIN" or "ICT".
pub type SectorCode = String;

/// Shortest and longest supported projection horizon, in years.
pub const MIN_HORIZON_YEARS: u32 = 1;
pub const MAX_HORIZON_YEARS: u32 = 30;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    #[default]
    Base,
    Optimistic,
    Pessimistic,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 3] = [Self::Base, Self::Optimistic, Self::Pessimistic];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Base        => "base",
            Self::Optimistic  => "optimistic",
            Self::Pessimistic => "pessimistic",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScenarioKind {
    type Err = ImpactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ImpactError::validation("scenario", ValidationReason::Unrecognized))
    }
}

/// One prospective investment, as supplied by a caller.
///
/// Built once and passed by reference; models never mutate it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvestmentScenario {
    /// Capital amount in millions.
    pub amount: f64,
    pub sector_code: SectorCode,
    #[serde(default = "default_horizon")]
    pub horizon_years: u32,
    #[serde(default)]
    pub scenario: ScenarioKind,
    #[serde(default)]
    pub is_sez: bool,
    #[serde(default)]
    pub num_simulations: Option<u64>,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_horizon() -> u32 {
    10
}

impl InvestmentScenario {
    pub fn new(amount: f64, sector_code: impl Into<SectorCode>, horizon_years: u32) -> Self {
        Self {
            amount,
            sector_code: sector_code.into(),
            horizon_years,
            scenario: ScenarioKind::Base,
            is_sez: false,
            num_simulations: None,
            seed: None,
        }
    }

    pub fn with_scenario(mut self, scenario: ScenarioKind) -> Self {
        self.scenario = scenario;
        self
    }

    pub fn with_sez(mut self, is_sez: bool) -> Self {
        self.is_sez = is_sez;
        self
    }

    pub fn with_simulations(mut self, n: u64) -> Self {
        self.num_simulations = Some(n);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check every field that does not need the sector table.
    /// Sector existence is checked at lookup time.
    pub fn validate(&self) -> ImpactResult<()> {
        validate_amount(self.amount)?;
        if self.sector_code.trim().is_empty() {
            return Err(ImpactError::validation("sector_code", ValidationReason::Empty));
        }
        validate_horizon(self.horizon_years)?;
        if let Some(n) = self.num_simulations {
            validate_simulations(n)?;
        }
        Ok(())
    }
}

pub(crate) fn validate_amount(amount: f64) -> ImpactResult<()> {
    if !amount.is_finite() {
        return Err(ImpactError::validation("amount", ValidationReason::NotFinite));
    }
    if amount <= 0.0 {
        return Err(ImpactError::validation("amount", ValidationReason::NotPositive));
    }
    Ok(())
}

pub(crate) fn validate_horizon(years: u32) -> ImpactResult<()> {
    if !(MIN_HORIZON_YEARS..=MAX_HORIZON_YEARS).contains(&years) {
        return Err(ImpactError::validation("horizon_years", ValidationReason::OutOfRange {
            min: MIN_HORIZON_YEARS as f64,
            max: MAX_HORIZON_YEARS as f64,
        }));
    }
    Ok(())
}

pub(crate) fn validate_simulations(n: u64) -> ImpactResult<()> {
    if n < 1 {
        return Err(ImpactError::validation(
            "num_simulations",
            ValidationReason::BelowMinimum { min: 1.0 },
        ));
    }
    Ok(())
}
