//! Writers for run and equilibrium output.

use anyhow::{Context, Result};
use duopoly_core::{PricePair, Scenario, SimulationRun};
use duopoly_econ::equilibrium::ReactionCurves;
use duopoly_runtime::RunSummary;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Everything a plotting tool needs for one run.
#[derive(Serialize)]
pub struct RunReport<'a> {
    pub scenario: &'a Scenario,
    pub summary: &'a RunSummary,
    pub series: &'a SimulationRun,
}

#[derive(Serialize)]
pub struct EquilibriumReport<'a> {
    pub equilibrium: PricePair,
    pub curves: &'a ReactionCurves,
}

/// Buffered writer to `out`, or stdout when no path is given.
pub fn open_sink(out: Option<&Path>) -> Result<Box<dyn Write>> {
    match out {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating output file {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

pub fn write_json<W: Write, T: Serialize>(mut w: W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut w, value).context("serializing JSON")?;
    writeln!(w)?;
    w.flush()?;
    Ok(())
}

/// Plain-text equilibrium report, prices to two decimals.
pub fn write_equilibrium<W: Write>(mut w: W, eq: PricePair) -> Result<()> {
    writeln!(w, "Nash equilibrium:")?;
    writeln!(w, "p1* = {:.2}", eq.p1)?;
    writeln!(w, "p2* = {:.2}", eq.p2)?;
    w.flush()?;
    Ok(())
}

/// One header row, then one row per period.
pub fn write_csv<W: Write>(w: W, run: &SimulationRun) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(true).from_writer(w);
    for row in run.periods() {
        wtr.serialize(row).context("writing CSV row")?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn summary_line(summary: &RunSummary) -> String {
    let floor = summary
        .floor_reached_at
        .map(|t| t.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "KPI | periods: {} | final prices: {:.2} / {:.2} | profit: {:.2} / {:.2} | mean share: {:.1}% / {:.1}% | moves: {} / {} | floor at: {}",
        summary.periods,
        summary.final_prices.p1,
        summary.final_prices.p2,
        summary.total_profit_1,
        summary.total_profit_2,
        summary.mean_share_1 * 100.0,
        summary.mean_share_2 * 100.0,
        summary.moves_1,
        summary.moves_2,
        floor
    )
}
