//! Command-line parsing.

use anyhow::{anyhow, bail, Context, Result};
use std::path::PathBuf;
use std::str::FromStr;

/// Output format of `simulate`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    /// One KPI line.
    #[default]
    Summary,
    /// Scenario, full series and summary as JSON.
    Json,
    /// One CSV row per period.
    Csv,
}

impl FromStr for Format {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "summary" => Ok(Format::Summary),
            "json" => Ok(Format::Json),
            "csv" => Ok(Format::Csv),
            other => Err(anyhow!("unknown format '{other}' (expected summary, json or csv)")),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimulateArgs {
    pub scenario: Option<PathBuf>,
    pub periods: Option<usize>,
    pub seed: Option<u64>,
    pub p1: Option<f64>,
    pub p2: Option<f64>,
    pub format: Format,
    pub out: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BatchArgs {
    pub scenario: Option<PathBuf>,
    pub periods: Option<usize>,
    /// First seed; run `i` uses `seed + i`.
    pub seed: Option<u64>,
    pub runs: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EquilibriumArgs {
    pub params: Option<PathBuf>,
    /// Number of reaction-curve samples to emit, if any.
    pub curves: Option<usize>,
    pub out: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Simulate(SimulateArgs),
    Batch(BatchArgs),
    Equilibrium(EquilibriumArgs),
    Version,
}

fn value<T, I>(flag: &str, it: &mut I) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    I: Iterator<Item = String>,
{
    let raw = it.next().ok_or_else(|| anyhow!("{flag} needs a value"))?;
    raw.parse::<T>()
        .map_err(|e| anyhow!("{e}"))
        .with_context(|| format!("invalid value '{raw}' for {flag}"))
}

fn parse_simulate<I: Iterator<Item = String>>(mut it: I) -> Result<SimulateArgs> {
    let mut args = SimulateArgs::default();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--scenario" => args.scenario = Some(value(&arg, &mut it)?),
            "--periods" => args.periods = Some(value(&arg, &mut it)?),
            "--seed" => args.seed = Some(value(&arg, &mut it)?),
            "--p1" => args.p1 = Some(value(&arg, &mut it)?),
            "--p2" => args.p2 = Some(value(&arg, &mut it)?),
            "--format" => args.format = value(&arg, &mut it)?,
            "--out" => args.out = Some(value(&arg, &mut it)?),
            other => bail!("unknown argument for simulate: {other}"),
        }
    }
    Ok(args)
}

fn parse_batch<I: Iterator<Item = String>>(mut it: I) -> Result<BatchArgs> {
    let mut scenario = None;
    let mut periods = None;
    let mut seed = None;
    let mut runs = None;
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--scenario" => scenario = Some(value(&arg, &mut it)?),
            "--periods" => periods = Some(value(&arg, &mut it)?),
            "--seed" => seed = Some(value(&arg, &mut it)?),
            "--runs" => runs = Some(value(&arg, &mut it)?),
            other => bail!("unknown argument for batch: {other}"),
        }
    }
    let runs = runs.ok_or_else(|| anyhow!("batch needs --runs"))?;
    Ok(BatchArgs {
        scenario,
        periods,
        seed,
        runs,
    })
}

fn parse_equilibrium<I: Iterator<Item = String>>(mut it: I) -> Result<EquilibriumArgs> {
    let mut args = EquilibriumArgs::default();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--params" => args.params = Some(value(&arg, &mut it)?),
            "--curves" => args.curves = Some(value(&arg, &mut it)?),
            "--out" => args.out = Some(value(&arg, &mut it)?),
            other => bail!("unknown argument for equilibrium: {other}"),
        }
    }
    Ok(args)
}

/// Parse arguments (without the program name). Bare flags imply `simulate`.
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command> {
    let mut it = args.into_iter().peekable();
    let Some(first) = it.peek().cloned() else {
        return Ok(Command::Simulate(SimulateArgs::default()));
    };
    if first == "--version" || first == "-V" {
        return Ok(Command::Version);
    }
    let cmd = if first.starts_with("--") {
        "simulate"
    } else {
        it.next();
        first.as_str()
    };
    match cmd {
        "simulate" => Ok(Command::Simulate(parse_simulate(it)?)),
        "batch" => Ok(Command::Batch(parse_batch(it)?)),
        "equilibrium" => Ok(Command::Equilibrium(parse_equilibrium(it)?)),
        other => bail!("unknown command: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(s: &str) -> Vec<String> {
        s.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn no_args_runs_default_simulation() {
        assert_eq!(
            parse_args(Vec::<String>::new()).unwrap(),
            Command::Simulate(SimulateArgs::default())
        );
    }

    #[test]
    fn bare_flags_imply_simulate() {
        let cmd = parse_args(argv("--periods 200 --seed 7 --format csv")).unwrap();
        let Command::Simulate(args) = cmd else {
            panic!("expected simulate");
        };
        assert_eq!(args.periods, Some(200));
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.format, Format::Csv);
    }

    #[test]
    fn simulate_price_overrides() {
        let cmd =
            parse_args(argv("simulate --p1 30.5 --p2 25 --out run.json --format json")).unwrap();
        let Command::Simulate(args) = cmd else {
            panic!("expected simulate");
        };
        assert_eq!(args.p1, Some(30.5));
        assert_eq!(args.p2, Some(25.0));
        assert_eq!(args.out, Some(PathBuf::from("run.json")));
    }

    #[test]
    fn batch_requires_runs() {
        assert!(parse_args(argv("batch --seed 3")).is_err());
        let cmd = parse_args(argv("batch --runs 8 --seed 3")).unwrap();
        assert_eq!(
            cmd,
            Command::Batch(BatchArgs {
                scenario: None,
                periods: None,
                seed: Some(3),
                runs: 8,
            })
        );
    }

    #[test]
    fn equilibrium_and_version() {
        let cmd = parse_args(argv("equilibrium --curves 500")).unwrap();
        assert_eq!(
            cmd,
            Command::Equilibrium(EquilibriumArgs {
                curves: Some(500),
                ..EquilibriumArgs::default()
            })
        );
        assert_eq!(parse_args(argv("--version")).unwrap(), Command::Version);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(argv("simulate --periods many")).is_err());
        assert!(parse_args(argv("simulate --format xml")).is_err());
        assert!(parse_args(argv("simulate --seed")).is_err());
        assert!(parse_args(argv("plot")).is_err());
        assert!(parse_args(argv("simulate --bogus 1")).is_err());
    }
}
