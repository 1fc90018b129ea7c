//! Monte Carlo engine: probabilistic outcome of an investment.
//!
//! Each sample compounds `years` annual returns. A year's return is a
//! normal draw around the scenario mean (shifted by the sector's risk
//! adjustment), dragged down by the absolute size of an FX shock and a
//! demand shock:
//!
//!   e = r - 0.3|fx| - 0.2|d|,   outcome = amount * Π(1 + e)
//!
//! DETERMINISM: sample i always draws from stream i of the master seed.
//! Samples are grouped into blocks of `block_size` only to size the
//! parallel work; blocks may run on any thread and are gathered back in
//! order before any statistic is computed. The result is bit-identical
//! for any block size, thread count or serial/parallel setting.

use crate::{
    config::{MonteCarloConfig, ScenarioParams},
    error::{ensure_finite, ImpactError, ImpactResult, ValidationReason},
    model::ImpactModel,
    rng::StreamRng,
    sector_table::{SectorProfile, SectorTable},
    stats::{self, HistogramBin},
    types::{validate_amount, validate_simulations, InvestmentScenario, ScenarioKind},
};
use rand_distr::Normal;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

const FX_DRAG: f64 = 0.3;
const DEMAND_DRAG: f64 = 0.2;
const VAR_CONFIDENCE_PERCENTILE: f64 = 5.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonteCarloDistribution {
    pub scenario: ScenarioKind,
    pub num_simulations: u64,
    pub seed: u64,
    pub bins: Vec<HistogramBin>,
    pub mean: f64,
    pub median: f64,
    pub stddev: f64,
    pub p5: f64,
    pub p25: f64,
    pub p75: f64,
    pub p95: f64,
    pub min: f64,
    pub max: f64,
    /// Loss at the 5th percentile relative to the amount invested.
    /// Negative when even that outcome is a gain.
    pub var95: f64,
    /// Mean outcome among samples at or below the 5th percentile.
    pub expected_shortfall: f64,
}

/// Per-year return distribution after sector adjustment.
#[derive(Debug, Clone, Copy)]
struct ReturnDistribution {
    annual_return: Normal<f64>,
    fx_shock: Normal<f64>,
    demand_shock: Normal<f64>,
}

impl ReturnDistribution {
    fn new(params: &ScenarioParams, profile: &SectorProfile) -> ImpactResult<Self> {
        let std_dev = params.return_std + profile.risk.vol_adj;
        let normal = |field: String, mean: f64, sd: f64| {
            Normal::new(mean, sd).map_err(|_| {
                ImpactError::validation(field, ValidationReason::BelowMinimum { min: 0.0 })
            })
        };
        Ok(Self {
            annual_return: normal(
                format!("sectors.{}.risk.vol_adj", profile.code),
                params.return_mean + profile.risk.return_adj,
                std_dev,
            )?,
            fx_shock: normal("fx_vol".into(), 0.0, params.fx_vol)?,
            demand_shock: normal("demand_var".into(), 0.0, params.demand_var)?,
        })
    }

    fn sample_outcome(&self, rng: &mut StreamRng, amount: f64, years: u32) -> f64 {
        let mut growth = 1.0;
        for _ in 0..years {
            let r = rng.sample(&self.annual_return);
            let fx = rng.sample(&self.fx_shock);
            let demand = rng.sample(&self.demand_shock);
            growth *= 1.0 + r - FX_DRAG * fx.abs() - DEMAND_DRAG * demand.abs();
        }
        amount * growth
    }
}

pub struct MonteCarloEngine {
    sectors: Arc<SectorTable>,
    scenarios: HashMap<ScenarioKind, ScenarioParams>,
    config: MonteCarloConfig,
}

impl MonteCarloEngine {
    pub fn new(
        sectors: Arc<SectorTable>,
        scenarios: HashMap<ScenarioKind, ScenarioParams>,
        config: MonteCarloConfig,
    ) -> Self {
        Self { sectors, scenarios, config }
    }

    pub fn config(&self) -> &MonteCarloConfig {
        &self.config
    }

    /// Run a simulation. `seed` falls back to the configured default seed.
    pub fn compute(
        &self,
        amount: f64,
        sector_code: &str,
        scenario: ScenarioKind,
        num_simulations: u64,
        seed: Option<u64>,
    ) -> ImpactResult<MonteCarloDistribution> {
        validate_amount(amount)?;
        validate_simulations(num_simulations)?;
        let profile = self.sectors.lookup(sector_code)?;
        let params = self.scenarios.get(&scenario).ok_or_else(|| {
            ImpactError::validation(format!("scenarios.{scenario}"), ValidationReason::Empty)
        })?;

        let dist = ReturnDistribution::new(params, profile)?;

        let n = usize::try_from(num_simulations)
            .map_err(|_| ImpactError::NumericOverflow { field: "num_simulations".into() })?;
        let seed = seed.unwrap_or(self.config.default_seed);

        let samples = self.draw_samples(&dist, amount, n, seed);
        let result = summarise(samples, amount, scenario, num_simulations, seed, self.config.bins)?;

        log::info!(
            "monte carlo: sector={sector_code} scenario={scenario} n={num_simulations} seed={seed} \
             mean={:.2} p5={:.2} p95={:.2}",
            result.mean,
            result.p5,
            result.p95
        );
        Ok(result)
    }

    fn draw_samples(&self, dist: &ReturnDistribution, amount: f64, n: usize, seed: u64) -> Vec<f64> {
        let block_size = self.config.block_size.max(1);
        let years = self.config.years;
        let n_blocks = n.div_ceil(block_size);

        let draw_block = |block: usize| -> Vec<f64> {
            let start = block * block_size;
            let end = (start + block_size).min(n);
            (start..end)
                .map(|i| {
                    let mut rng = StreamRng::new(seed, i as u64);
                    dist.sample_outcome(&mut rng, amount, years)
                })
                .collect()
        };

        let blocks: Vec<Vec<f64>> = if self.config.parallel {
            (0..n_blocks).into_par_iter().map(draw_block).collect()
        } else {
            (0..n_blocks).map(draw_block).collect()
        };
        blocks.concat()
    }
}

fn summarise(
    samples: Vec<f64>,
    amount: f64,
    scenario: ScenarioKind,
    num_simulations: u64,
    seed: u64,
    bins: usize,
) -> ImpactResult<MonteCarloDistribution> {
    let mean = ensure_finite("mean", stats::mean(&samples))?;
    let stddev = ensure_finite("stddev", stats::std_dev(&samples, mean))?;

    let mut sorted = samples;
    sorted.sort_by(|a, b| a.total_cmp(b));
    let min = ensure_finite("min", sorted.first().copied().unwrap_or(0.0))?;
    let max = ensure_finite("max", sorted.last().copied().unwrap_or(0.0))?;

    let p5 = stats::percentile_sorted(&sorted, VAR_CONFIDENCE_PERCENTILE);
    let p25 = stats::percentile_sorted(&sorted, 25.0);
    let median = stats::percentile_sorted(&sorted, 50.0);
    let p75 = stats::percentile_sorted(&sorted, 75.0);
    let p95 = stats::percentile_sorted(&sorted, 95.0);

    let tail: Vec<f64> = sorted.iter().copied().take_while(|&x| x <= p5).collect();
    let expected_shortfall = if tail.is_empty() { p5 } else { stats::mean(&tail) };

    Ok(MonteCarloDistribution {
        scenario,
        num_simulations,
        seed,
        bins: stats::histogram(&sorted, min, max, bins),
        mean,
        median,
        stddev,
        p5,
        p25,
        p75,
        p95,
        min,
        max,
        var95: amount - p5,
        expected_shortfall,
    })
}

impl ImpactModel for MonteCarloEngine {
    type Output = MonteCarloDistribution;

    fn name(&self) -> &'static str { "monte_carlo" }

    fn evaluate(&self, scenario: &InvestmentScenario) -> ImpactResult<MonteCarloDistribution> {
        self.compute(
            scenario.amount,
            &scenario.sector_code,
            scenario.scenario,
            scenario.num_simulations.unwrap_or(self.config.default_simulations),
            scenario.seed,
        )
    }
}
