//! impact-runner: headless front end for the impact engine.
//!
//! Usage:
//!   impact-runner --sector MIN --amount 100 --years 10 --scenario base --seed 42
//!   impact-runner --ipc-mode --data-dir ./data

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use impact_core::{
    config::EngineConfig,
    engine::{ImpactEngine, ImpactReport},
    error::{ImpactError, ImpactResult},
    model::ImpactModel,
    roi_timeline_model::{DiscountedValue, RoiTimeline},
    types::{InvestmentScenario, ScenarioKind},
};
use std::env;
use std::io::{self, BufRead, Write};
use uuid::Uuid;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    JobCreation(InvestmentScenario),
    GdpContribution(InvestmentScenario),
    GdpProjection(InvestmentScenario),
    MultiplierEffect(InvestmentScenario),
    RoiTimeline(InvestmentScenario),
    MonteCarlo(InvestmentScenario),
    Report(InvestmentScenario),
    Sectors,
    Quit,
}

#[derive(serde::Serialize)]
struct IpcResponse {
    request_id: String,
    generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<IpcError>,
}

#[derive(serde::Serialize)]
struct IpcError {
    code: String,
    field: Option<String>,
    message: String,
}

impl From<&ImpactError> for IpcError {
    fn from(e: &ImpactError) -> Self {
        Self {
            code: e.code().to_string(),
            field: e.field().map(str::to_string),
            message: e.to_string(),
        }
    }
}

#[derive(serde::Serialize)]
struct RoiResponse<'a> {
    #[serde(flatten)]
    timeline: &'a RoiTimeline,
    discounted_npv: Vec<DiscountedValue>,
    irr: Option<f64>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let data_dir = parse_arg(&args, "--data-dir", "./data".to_string())?;

    let config = EngineConfig::load(&data_dir)?;
    let engine = ImpactEngine::build(config);

    if ipc_mode {
        run_ipc_loop(&engine)
    } else {
        let scenario = scenario_from_args(&args)?;
        let report = engine.run(&scenario)?;
        print_summary(&report);
        Ok(())
    }
}

fn scenario_from_args(args: &[String]) -> Result<InvestmentScenario> {
    let sector = parse_arg(args, "--sector", "MIN".to_string())?;
    let scenario_kind = parse_arg(args, "--scenario", ScenarioKind::default())?;

    let mut scenario = InvestmentScenario::new(
        parse_arg(args, "--amount", 100.0f64)?,
        sector,
        parse_arg(args, "--years", 10u32)?,
    )
    .with_scenario(scenario_kind)
    .with_sez(args.iter().any(|a| a == "--sez"));

    if let Some(n) = parse_opt(args, "--simulations")? {
        scenario = scenario.with_simulations(n);
    }
    if let Some(seed) = parse_opt(args, "--seed")? {
        scenario = scenario.with_seed(seed);
    }
    Ok(scenario)
}

fn run_ipc_loop(engine: &ImpactEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let (request_id, parsed) = parse_request(&buffer);
        let outcome = match parsed {
            Ok(IpcCommand::Quit) => break,
            Ok(cmd) => handle_command(engine, cmd),
            Err(e) => Err(e),
        };

        let response = match outcome {
            Ok(result) => IpcResponse {
                request_id,
                generated_at: Utc::now(),
                result: Some(result),
                error: None,
            },
            Err(e) => {
                log::warn!("request {request_id} failed: {e}");
                IpcResponse {
                    request_id,
                    generated_at: Utc::now(),
                    result: None,
                    error: Some(IpcError::from(&e)),
                }
            }
        };
        writeln!(stdout, "{}", serde_json::to_string(&response)?)?;
        stdout.flush()?;
    }
    Ok(())
}

/// Split a request line into its id (client supplied or generated) and command.
fn parse_request(line: &str) -> (String, ImpactResult<IpcCommand>) {
    let value: serde_json::Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => return (Uuid::new_v4().to_string(), Err(e.into())),
    };
    let request_id = value
        .get("request_id")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let cmd = serde_json::from_value(value).map_err(ImpactError::from);
    (request_id, cmd)
}

fn handle_command(engine: &ImpactEngine, cmd: IpcCommand) -> ImpactResult<serde_json::Value> {
    let value = match cmd {
        IpcCommand::JobCreation(s) => serde_json::to_value(engine.jobs.evaluate(&s)?)?,
        IpcCommand::GdpContribution(s) => serde_json::to_value(engine.gdp.evaluate(&s)?)?,
        IpcCommand::GdpProjection(s) => {
            serde_json::to_value(engine.gdp.project(s.amount, &s.sector_code, s.horizon_years)?)?
        }
        IpcCommand::MultiplierEffect(s) => serde_json::to_value(engine.multiplier.evaluate(&s)?)?,
        IpcCommand::RoiTimeline(s) => {
            let timeline = engine.roi.evaluate(&s)?;
            serde_json::to_value(RoiResponse {
                timeline: &timeline,
                discounted_npv: timeline.npv_table(),
                irr: timeline.irr(),
            })?
        }
        IpcCommand::MonteCarlo(s) => serde_json::to_value(engine.monte_carlo.evaluate(&s)?)?,
        IpcCommand::Report(s) => serde_json::to_value(engine.run(&s)?)?,
        IpcCommand::Sectors => serde_json::to_value(engine.sectors().codes())?,
        IpcCommand::Quit => serde_json::Value::Null,
    };
    Ok(value)
}

fn print_summary(report: &ImpactReport) {
    let s = &report.scenario;
    println!("=== INVESTMENT ===");
    println!("  sector:       {}", s.sector_code);
    println!("  amount:       ${:.1}M", s.amount);
    println!("  horizon:      {} years", s.horizon_years);
    println!("  scenario:     {}", s.scenario);
    println!("  SEZ:          {}", s.is_sez);

    let j = &report.jobs;
    println!();
    println!("=== JOB CREATION ===");
    println!("  direct:       {}", j.direct);
    println!("  indirect:     {}", j.indirect);
    println!("  induced:      {}", j.induced);
    println!("  total:        {}", j.total);
    println!("  cost per job: ${}", j.cost_per_job);
    let skills = &j.skills_distribution;
    println!(
        "  skills:       {:.0}% unskilled, {:.0}% semi-skilled, {:.0}% skilled, {:.0}% professional",
        skills.unskilled, skills.semi_skilled, skills.skilled, skills.professional
    );
    println!(
        "  gender:       {:.1}% male / {:.1}% female",
        j.gender_split.male, j.gender_split.female
    );

    let g = &report.gdp;
    println!();
    println!("=== GDP CONTRIBUTION ===");
    println!("  direct:       ${:.1}M", g.direct);
    println!("  indirect:     ${:.1}M", g.indirect);
    println!("  total:        ${:.1}M ({:.4}% of GDP)", g.total, g.gdp_percentage);
    println!("  tax revenue:  ${:.1}M", g.tax_revenue);
    println!("  forex:        ${:.1}M", g.forex_generation);
    if let Some(last) = report.gdp_projection.years.last() {
        println!("  cumulative over {} years: ${:.1}M", last.year, last.cumulative);
    }

    let m = &report.multiplier;
    println!();
    println!("=== MULTIPLIER EFFECT ===");
    println!("  direct:       ${:.1}M", m.direct);
    println!("  indirect:     ${:.1}M", m.indirect);
    println!("  induced:      ${:.1}M", m.induced);
    println!("  jobs:         {}", m.total_jobs);
    println!("  tax revenue:  ${:.1}M", m.tax_revenue);

    let r = &report.roi;
    println!();
    println!("=== ROI TIMELINE ===");
    for p in &r.points {
        println!(
            "  Y{:<2} | Return: ${:>8.1}M | Net: ${:>8.1}M",
            p.year, p.cumulative_return, p.net_cash_flow
        );
    }
    println!("  nominal return rate:    {:.1}%", r.nominal_return_rate);
    if r.payback_reached {
        println!("  payback year:           {}", r.payback_year);
    } else {
        println!("  payback year:           not within {} years", r.payback_year);
    }
    println!("  terminal net cash flow: ${:.1}M", r.terminal_net_cash_flow);
    for d in r.npv_table() {
        println!("  NPV @ {:>4.1}%:            ${:.1}M", d.rate * 100.0, d.npv);
    }
    match r.irr() {
        Some(irr) => println!("  IRR:                    {:.2}%", irr * 100.0),
        None => println!("  IRR:                    n/a"),
    }

    let mc = &report.monte_carlo;
    println!();
    println!("=== MONTE CARLO ({} runs, seed {}) ===", mc.num_simulations, mc.seed);
    println!("  mean:         ${:.1}M", mc.mean);
    println!("  median:       ${:.1}M", mc.median);
    println!("  std dev:      ${:.1}M", mc.stddev);
    println!("  p5 / p95:     ${:.1}M / ${:.1}M", mc.p5, mc.p95);
    println!("  VaR 95%:      ${:.1}M", mc.var95);
    println!("  exp. shortfall: ${:.1}M", mc.expected_shortfall);
}

fn parse_arg<T>(args: &[String], flag: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    Ok(parse_opt(args, flag)?.unwrap_or(default))
}

/// Value of `flag`, if given. A flag with a missing or unparseable value is an error.
fn parse_opt<T>(args: &[String], flag: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    if args.last().is_some_and(|a| a == flag) {
        return Err(anyhow!("{flag} requires a value"));
    }
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| {
            w[1].parse::<T>()
                .map_err(|e| anyhow!("invalid value '{}' for {flag}: {e}", w[1]))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("impact-runner")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn flags_build_the_scenario() {
        let s = scenario_from_args(&args(&[
            "--sector", "ict", "--amount", "42.5", "--years", "7",
            "--scenario", "pessimistic", "--sez", "--simulations", "500", "--seed", "9",
        ]))
        .unwrap();

        assert_eq!(s.sector_code, "ict");
        assert_eq!(s.amount, 42.5);
        assert_eq!(s.horizon_years, 7);
        assert_eq!(s.scenario, ScenarioKind::Pessimistic);
        assert!(s.is_sez);
        assert_eq!(s.num_simulations, Some(500));
        assert_eq!(s.seed, Some(9));
    }

    #[test]
    fn absent_flags_take_defaults() {
        let s = scenario_from_args(&args(&[])).unwrap();

        assert_eq!(s.sector_code, "MIN");
        assert_eq!(s.amount, 100.0);
        assert_eq!(s.horizon_years, 10);
        assert_eq!(s.num_simulations, None);
        assert_eq!(s.seed, None);
    }

    #[test]
    fn unparseable_values_are_errors() {
        for (flag, value) in [
            ("--amount", "abc"),
            ("--years", "foo"),
            ("--seed", "x"),
            ("--simulations", "-1"),
            ("--scenario", "bogus"),
        ] {
            let err = scenario_from_args(&args(&[flag, value])).unwrap_err();
            let msg = err.to_string();
            assert!(msg.contains(flag), "{flag}: {msg}");
        }
    }

    #[test]
    fn trailing_flag_without_value_is_an_error() {
        let err = scenario_from_args(&args(&["--amount"])).unwrap_err();

        assert!(err.to_string().contains("--amount requires a value"));
    }
}
