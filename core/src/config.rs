use crate::{
    error::{ImpactError, ImpactResult, ValidationReason},
    sector_table::{SectorProfile, SectorTable},
    types::ScenarioKind,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Centre and spread of the simulated annual return for one scenario.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScenarioParams {
    pub return_mean: f64,
    pub return_std:  f64,
    pub fx_vol:      f64,
    pub demand_var:  f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonteCarloConfig {
    /// Years compounded per sample.
    pub years: u32,
    /// Histogram bin count.
    pub bins: usize,
    /// Samples per parallel work unit. Does not affect results.
    pub block_size: usize,
    pub parallel: bool,
    pub default_simulations: u64,
    /// Used when the caller supplies no seed.
    pub default_seed: u64,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            years: 5,
            bins: 20,
            block_size: 1024,
            parallel: true,
            default_simulations: 10_000,
            default_seed: 0x5EED_1A7E_0F1C_2024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PolicyConfig {
    /// National GDP in $M used for the percentage-of-GDP figure.
    pub reference_gdp: f64,
    /// Job uplift factor for Special Economic Zone investments.
    pub sez_job_uplift: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            reference_gdp: 28_400.0,
            sez_job_uplift: 1.10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SectorProfilesFile {
    sectors: Vec<SectorProfile>,
}

#[derive(Debug, Clone, Deserialize)]
struct MonteCarloFile {
    settings: MonteCarloConfig,
    scenarios: HashMap<ScenarioKind, ScenarioParams>,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub sectors: SectorTable,
    pub scenarios: HashMap<ScenarioKind, ScenarioParams>,
    pub monte_carlo: MonteCarloConfig,
    pub policy: PolicyConfig,
}

impl EngineConfig {
    /// Load from the data/ directory.
    /// In tests, use EngineConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let sector_path = format!("{data_dir}/sectors/sector_profiles.json");
        let sector_content = std::fs::read_to_string(&sector_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {sector_path}: {e}"))?;
        let sectors = sector_table_from_json(&sector_content)
            .map_err(|e| anyhow::anyhow!("Invalid {sector_path}: {e}"))?;

        let mc_path = format!("{data_dir}/scenarios/monte_carlo.json");
        let mc_content = std::fs::read_to_string(&mc_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {mc_path}: {e}"))?;
        let mc_file: MonteCarloFile = serde_json::from_str(&mc_content)
            .map_err(|e| anyhow::anyhow!("Invalid {mc_path}: {e}"))?;

        let policy_path = format!("{data_dir}/policy/policy.json");
        let policy_content = std::fs::read_to_string(&policy_path)
            .map_err(|e| anyhow::anyhow!("Cannot read {policy_path}: {e}"))?;
        let policy: PolicyConfig = serde_json::from_str(&policy_content)
            .map_err(|e| anyhow::anyhow!("Invalid {policy_path}: {e}"))?;

        let config = Self {
            sectors,
            scenarios: mc_file.scenarios,
            monte_carlo: mc_file.settings,
            policy,
        };
        config.validate()?;

        log::info!(
            "loaded {} sector profiles and {} scenarios from {data_dir}",
            config.sectors.len(),
            config.scenarios.len()
        );
        Ok(config)
    }

    /// Cross-field checks that serde cannot express.
    pub fn validate(&self) -> ImpactResult<()> {
        for kind in ScenarioKind::ALL {
            let params = self.scenario(kind)?;
            let fields = [
                ("return_mean", params.return_mean),
                ("return_std", params.return_std),
                ("fx_vol", params.fx_vol),
                ("demand_var", params.demand_var),
            ];
            for (name, value) in fields {
                if !value.is_finite() {
                    return Err(ImpactError::validation(
                        format!("scenarios.{kind}.{name}"),
                        ValidationReason::NotFinite,
                    ));
                }
            }
            for (name, value) in &fields[1..] {
                if *value < 0.0 {
                    return Err(ImpactError::validation(
                        format!("scenarios.{kind}.{name}"),
                        ValidationReason::BelowMinimum { min: 0.0 },
                    ));
                }
            }
        }

        if self.monte_carlo.years == 0 {
            return Err(ImpactError::validation(
                "monte_carlo.years",
                ValidationReason::BelowMinimum { min: 1.0 },
            ));
        }
        if self.monte_carlo.bins == 0 {
            return Err(ImpactError::validation(
                "monte_carlo.bins",
                ValidationReason::BelowMinimum { min: 1.0 },
            ));
        }
        if self.monte_carlo.block_size == 0 {
            return Err(ImpactError::validation(
                "monte_carlo.block_size",
                ValidationReason::BelowMinimum { min: 1.0 },
            ));
        }
        if self.monte_carlo.default_simulations == 0 {
            return Err(ImpactError::validation(
                "monte_carlo.default_simulations",
                ValidationReason::BelowMinimum { min: 1.0 },
            ));
        }

        if !self.policy.reference_gdp.is_finite() || self.policy.reference_gdp <= 0.0 {
            return Err(ImpactError::validation(
                "policy.reference_gdp",
                ValidationReason::NotPositive,
            ));
        }
        if !self.policy.sez_job_uplift.is_finite() || self.policy.sez_job_uplift < 1.0 {
            return Err(ImpactError::validation(
                "policy.sez_job_uplift",
                ValidationReason::BelowMinimum { min: 1.0 },
            ));
        }
        Ok(())
    }

    pub fn scenario(&self, kind: ScenarioKind) -> ImpactResult<&ScenarioParams> {
        self.scenarios.get(&kind).ok_or_else(|| {
            ImpactError::validation(format!("scenarios.{kind}"), ValidationReason::Empty)
        })
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self {
            sectors: SectorTable::default_test(),
            scenarios: default_scenarios(),
            monte_carlo: MonteCarloConfig::default(),
            policy: PolicyConfig::default(),
        }
    }
}

/// Parse a `{"sectors": [...]}` document into a validated table.
pub fn sector_table_from_json(content: &str) -> ImpactResult<SectorTable> {
    let file: SectorProfilesFile = serde_json::from_str(content)?;
    SectorTable::from_profiles(file.sectors)
}

pub fn default_scenarios() -> HashMap<ScenarioKind, ScenarioParams> {
    [
        (
            ScenarioKind::Base,
            ScenarioParams { return_mean: 0.12, return_std: 0.05, fx_vol: 0.15, demand_var: 0.10 },
        ),
        (
            ScenarioKind::Optimistic,
            ScenarioParams { return_mean: 0.18, return_std: 0.04, fx_vol: 0.10, demand_var: 0.05 },
        ),
        (
            ScenarioKind::Pessimistic,
            ScenarioParams { return_mean: 0.06, return_std: 0.08, fx_vol: 0.25, demand_var: 0.20 },
        ),
    ]
    .into()
}
