//! ROI timeline: cumulative nominal return year by year.
//!
//! The headline figures are deliberately simple: the nominal sector
//! return rate and the undiscounted final-year net cash flow. True
//! discounted NPV and IRR over the same cash-flow series are available
//! as methods on RoiTimeline.

use crate::{
    error::{ensure_finite, ImpactResult},
    model::{ImpactModel, ROI_ANNUAL_STEP},
    sector_table::SectorTable,
    types::{validate_amount, validate_horizon, InvestmentScenario},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Discount rates reported by RoiTimeline::npv_table().
pub const NPV_RATES: [f64; 4] = [0.08, 0.10, 0.12, 0.15];

const IRR_INITIAL_GUESS: f64 = 0.1;
const IRR_MAX_ITERATIONS: usize = 100;
const IRR_MIN: f64 = -0.5;
const IRR_MAX: f64 = 1.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoiPoint {
    pub year: u32,
    pub annual_return: f64,
    pub cumulative_return: f64,
    pub cumulative_investment: f64,
    pub net_cash_flow: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoiTimeline {
    pub points: Vec<RoiPoint>,
    /// Sector return rate as a percentage. Not an IRR.
    pub nominal_return_rate: f64,
    /// First year cumulative return covers the investment,
    /// or the horizon itself when that never happens.
    pub payback_year: u32,
    pub payback_reached: bool,
    /// Final year's undiscounted net cash flow. Not an NPV.
    pub terminal_net_cash_flow: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscountedValue {
    pub rate: f64,
    pub npv: f64,
}

impl RoiTimeline {
    /// The investment as a year-0 outflow followed by each year's return.
    pub fn cash_flows(&self) -> Vec<f64> {
        let investment = self.points.first().map_or(0.0, |p| p.cumulative_investment);
        std::iter::once(-investment)
            .chain(self.points.iter().map(|p| p.annual_return))
            .collect()
    }

    pub fn discounted_npv(&self, rate: f64) -> f64 {
        npv(&self.cash_flows(), rate)
    }

    pub fn npv_table(&self) -> Vec<DiscountedValue> {
        let flows = self.cash_flows();
        NPV_RATES
            .iter()
            .map(|&rate| DiscountedValue { rate, npv: npv(&flows, rate) })
            .collect()
    }

    /// Internal rate of return by Newton-Raphson, clamped to [-0.5, 1.0].
    ///
    /// None when the cash flows never change sign, since no root exists.
    pub fn irr(&self) -> Option<f64> {
        irr(&self.cash_flows())
    }
}

fn npv(flows: &[f64], rate: f64) -> f64 {
    flows
        .iter()
        .enumerate()
        .map(|(t, cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

fn irr(flows: &[f64]) -> Option<f64> {
    let has_outflow = flows.iter().any(|&cf| cf < 0.0);
    let has_inflow = flows.iter().any(|&cf| cf > 0.0);
    if !has_outflow || !has_inflow {
        return None;
    }

    let mut rate = IRR_INITIAL_GUESS;
    for _ in 0..IRR_MAX_ITERATIONS {
        let value = npv(flows, rate);
        let slope: f64 = flows
            .iter()
            .enumerate()
            .map(|(t, cf)| -(t as f64) * cf / (1.0 + rate).powi(t as i32 + 1))
            .sum();
        if slope.abs() < 1e-10 {
            break;
        }
        let step = value / slope;
        rate -= step;
        if !rate.is_finite() {
            return None;
        }
        // Keep the iterate where (1 + rate) stays positive.
        rate = rate.clamp(IRR_MIN, IRR_MAX);
        if step.abs() < 1e-12 {
            break;
        }
    }
    Some(rate.clamp(IRR_MIN, IRR_MAX))
}

pub struct RoiTimelineModel {
    sectors: Arc<SectorTable>,
}

impl RoiTimelineModel {
    pub fn new(sectors: Arc<SectorTable>) -> Self {
        Self { sectors }
    }

    pub fn compute(
        &self,
        amount: f64,
        sector_code: &str,
        horizon_years: u32,
    ) -> ImpactResult<RoiTimeline> {
        validate_amount(amount)?;
        validate_horizon(horizon_years)?;
        let rate = self.sectors.lookup(sector_code)?.annual_return_rate;

        let mut points = Vec::with_capacity(horizon_years as usize);
        let mut cumulative = 0.0;
        let mut payback = None;

        for y in 1..=horizon_years {
            let annual = amount * rate * (1.0 + f64::from(y - 1) * ROI_ANNUAL_STEP);
            cumulative += annual;
            ensure_finite("cumulative_return", cumulative)?;

            if payback.is_none() && cumulative >= amount {
                payback = Some(y);
            }
            points.push(RoiPoint {
                year: y,
                annual_return: annual,
                cumulative_return: cumulative,
                cumulative_investment: amount,
                net_cash_flow: cumulative - amount,
            });
        }

        let terminal_net_cash_flow = cumulative - amount;

        log::debug!(
            "roi: sector={sector_code} amount={amount} horizon={horizon_years} \
             payback={payback:?} terminal={terminal_net_cash_flow:.2}"
        );

        Ok(RoiTimeline {
            points,
            nominal_return_rate: rate * 100.0,
            payback_year: payback.unwrap_or(horizon_years),
            payback_reached: payback.is_some(),
            terminal_net_cash_flow,
        })
    }
}

impl ImpactModel for RoiTimelineModel {
    type Output = RoiTimeline;

    fn name(&self) -> &'static str { "roi_timeline" }

    fn evaluate(&self, scenario: &InvestmentScenario) -> ImpactResult<RoiTimeline> {
        self.compute(scenario.amount, &scenario.sector_code, scenario.horizon_years)
    }
}
