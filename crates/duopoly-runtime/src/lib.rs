#![deny(warnings)]

//! Simulation runtime for the dynamic Bertrand duopoly.
//!
//! Each period both firms' shares and profits are evaluated, then the pricier
//! firm undercuts its competitor by a random fraction. Runs own their random
//! source, so independent runs never share state and a fixed seed reproduces a
//! run exactly.

pub mod adjust;
pub mod summary;

pub use adjust::{adjust_prices, mover, PriceAdjustment};
pub use summary::RunSummary;

use duopoly_core::{
    validate_invocation, InvocationError, ModelConfig, PricePair, RunConfig, RunError, Scenario,
    SimulationRun,
};
use duopoly_econ::evaluate_period;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Errors produced by the simulation runtime.
#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    /// Arguments rejected before the first period.
    #[error(transparent)]
    Invocation(#[from] InvocationError),
    /// Series could not be assembled.
    #[error(transparent)]
    Run(#[from] RunError),
}

/// Simulate `num_periods` periods starting from `initial` prices.
///
/// Period `t` is evaluated at the prices in force, then the adjustment rule
/// produces the prices of `t + 1`; the last period is evaluated without a
/// successor. All randomness comes from `rng`.
pub fn simulate<R: Rng>(
    initial: PricePair,
    num_periods: usize,
    config: &ModelConfig,
    rng: &mut R,
) -> Result<SimulationRun, SimError> {
    validate_invocation(initial, num_periods, config)?;
    info!(
        p1 = initial.p1,
        p2 = initial.p2,
        num_periods,
        marginal_cost = config.marginal_cost(),
        "starting simulation"
    );

    let mut run = SimulationRun::with_capacity(num_periods);
    let mut prices = initial;
    for t in 0..num_periods - 1 {
        run.push_period(&evaluate_period(t, prices, config))?;
        let step = adjust_prices(prices, config, rng);
        debug!(
            period = t,
            mover = %step.mover,
            underbid = step.underbid,
            p1 = step.next.p1,
            p2 = step.next.p2,
            "price adjustment"
        );
        run.push_transition(step.mover, step.underbid);
        prices = step.next;
    }
    run.push_period(&evaluate_period(num_periods - 1, prices, config))?;

    info!(p1 = prices.p1, p2 = prices.p2, "simulation finished");
    Ok(run)
}

/// Simulate with a `ChaCha8Rng` seeded from `run.rng_seed`.
pub fn simulate_seeded(
    initial: PricePair,
    run: &RunConfig,
    config: &ModelConfig,
) -> Result<SimulationRun, SimError> {
    let mut rng = ChaCha8Rng::seed_from_u64(run.rng_seed);
    simulate(initial, run.num_periods, config, &mut rng)
}

pub fn simulate_scenario(scenario: &Scenario) -> Result<SimulationRun, SimError> {
    simulate_seeded(scenario.initial_prices, &scenario.run, &scenario.model)
}

/// Run one independent seeded simulation per entry of `seeds`.
///
/// Output order matches `seeds`. With the `parallel` feature the runs are
/// spread over the rayon pool; results are identical either way.
pub fn simulate_batch(
    initial: PricePair,
    num_periods: usize,
    config: &ModelConfig,
    seeds: &[u64],
) -> Result<Vec<SimulationRun>, SimError> {
    validate_invocation(initial, num_periods, config)?;
    info!(runs = seeds.len(), num_periods, "starting batch");
    let run_one = |seed: u64| {
        let run = RunConfig {
            num_periods,
            rng_seed: seed,
        };
        simulate_seeded(initial, &run, config)
    };

    #[cfg(feature = "parallel")]
    let results: Vec<_> = seeds.par_iter().map(|&s| run_one(s)).collect();
    #[cfg(not(feature = "parallel"))]
    let results: Vec<_> = seeds.iter().map(|&s| run_one(s)).collect();

    results.into_iter().collect()
}
