#![deny(warnings)]

//! Headless CLI for running duopoly price-war simulations and the static equilibrium.

mod args;
mod output;

use anyhow::{Context, Result};
use args::{BatchArgs, Command, EquilibriumArgs, Format, SimulateArgs};
use duopoly_core::Scenario;
use duopoly_econ::equilibrium::{LinearDuopoly, DEFAULT_CURVE_HI, DEFAULT_CURVE_LO};
use duopoly_runtime::RunSummary;
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Log filter from `RUST_LOG`, falling back to `info` when unset or unparsable.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn load_scenario(path: Option<&Path>) -> Result<Scenario> {
    match path {
        Some(p) => load_yaml(p),
        None => Ok(Scenario::baseline()),
    }
}

fn run_simulate(args: SimulateArgs) -> Result<()> {
    let mut scenario = load_scenario(args.scenario.as_deref())?;
    if let Some(n) = args.periods {
        scenario.run.num_periods = n;
    }
    if let Some(seed) = args.seed {
        scenario.run.rng_seed = seed;
    }
    if let Some(p1) = args.p1 {
        scenario.initial_prices.p1 = p1;
    }
    if let Some(p2) = args.p2 {
        scenario.initial_prices.p2 = p2;
    }
    scenario.validate()?;

    let run = duopoly_runtime::simulate_scenario(&scenario)?;
    let summary = RunSummary::from_run(&run, &scenario.model)
        .context("simulation produced no periods")?;

    let sink = output::open_sink(args.out.as_deref())?;
    match args.format {
        Format::Summary => {
            let mut sink = sink;
            writeln!(sink, "{}", output::summary_line(&summary))?;
            sink.flush()?;
        }
        Format::Json => output::write_json(
            sink,
            &output::RunReport {
                scenario: &scenario,
                summary: &summary,
                series: &run,
            },
        )?,
        Format::Csv => output::write_csv(sink, &run)?,
    }
    Ok(())
}

fn run_batch(args: BatchArgs) -> Result<()> {
    let mut scenario = load_scenario(args.scenario.as_deref())?;
    if let Some(n) = args.periods {
        scenario.run.num_periods = n;
    }
    let base = args.seed.unwrap_or(scenario.run.rng_seed);
    let seeds: Vec<u64> = (0..args.runs as u64).map(|i| base.wrapping_add(i)).collect();

    let runs = duopoly_runtime::simulate_batch(
        scenario.initial_prices,
        scenario.run.num_periods,
        &scenario.model,
        &seeds,
    )?;
    let mut floored = 0usize;
    for (seed, run) in seeds.iter().zip(&runs) {
        if let Some(summary) = RunSummary::from_run(run, &scenario.model) {
            if summary.floor_reached_at.is_some() {
                floored += 1;
            }
            println!("seed {seed} | {}", output::summary_line(&summary));
        }
    }
    println!(
        "Batch OK | runs: {} | reached marginal cost: {}",
        runs.len(),
        floored
    );
    Ok(())
}

fn run_equilibrium(args: EquilibriumArgs) -> Result<()> {
    let model: LinearDuopoly = match args.params.as_deref() {
        Some(p) => load_yaml(p)?,
        None => LinearDuopoly::default(),
    };
    let eq = model.equilibrium()?;
    info!(p1 = eq.p1, p2 = eq.p2, "equilibrium solved");

    let sink = output::open_sink(args.out.as_deref())?;
    let Some(samples) = args.curves else {
        return output::write_equilibrium(sink, eq);
    };
    let curves = model.reaction_curves(DEFAULT_CURVE_LO, DEFAULT_CURVE_HI, samples)?;
    output::write_json(
        sink,
        &output::EquilibriumReport {
            equilibrium: eq,
            curves: &curves,
        },
    )
}

fn main() -> Result<()> {
    // Logging setup; stderr keeps stdout clean for JSON/CSV.
    let filter = log_filter(std::env::var("RUST_LOG").ok().as_deref());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cmd = args::parse_args(std::env::args().skip(1))?;
    info!(?cmd, "starting CLI");

    match cmd {
        Command::Simulate(a) => run_simulate(a),
        Command::Batch(a) => run_batch(a),
        Command::Equilibrium(a) => run_equilibrium(a),
        Command::Version => {
            println!(
                "duopoly {} ({} built {})",
                env!("CARGO_PKG_VERSION"),
                env!("GIT_SHA"),
                env!("BUILD_DATE")
            );
            Ok(())
        }
    }
}
