//! Economic impact calculation engine.
//!
//! Estimates what a capital investment in a sector does to employment,
//! GDP and tax revenue, how its return accumulates over time, and how
//! uncertain that return is.

pub mod config;
pub mod engine;
pub mod error;
pub mod gdp_contribution_model;
pub mod job_creation_model;
pub mod model;
pub mod monte_carlo_engine;
pub mod multiplier_effect_model;
pub mod rng;
pub mod roi_timeline_model;
pub mod sector_table;
pub mod stats;
pub mod types;
