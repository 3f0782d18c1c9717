#![deny(warnings)]

//! Core domain models and invariants for the Bertrand duopoly simulator.
//!
//! This crate defines the serializable types shared by the economic functions,
//! the simulation runtime and the CLI, together with the validation that
//! guarantees their basic invariants. A [`ModelConfig`] can only be obtained
//! through validation, so downstream code never re-checks parameter ranges.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::warn;

/// Default upper bound on the proportional price cut per period (8%).
pub const DEFAULT_MAX_UNDERBID: f64 = 0.08;
/// Default steepness of the logistic market-share response.
pub const DEFAULT_PRICE_SENSITIVITY: f64 = 2.0;
/// Default number of simulated periods.
pub const DEFAULT_NUM_PERIODS: usize = 50;
/// Default seed for the deterministic RNG.
pub const DEFAULT_RNG_SEED: u64 = 42;

/// One of the two competing firms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Firm {
    /// Firm 1
    One,
    /// Firm 2
    Two,
}

impl Firm {
    /// The competitor of this firm.
    pub fn other(self) -> Firm {
        match self {
            Firm::One => Firm::Two,
            Firm::Two => Firm::One,
        }
    }

    /// 1-based firm number, as used in reports.
    pub fn number(self) -> u8 {
        match self {
            Firm::One => 1,
            Firm::Two => 2,
        }
    }
}

impl fmt::Display for Firm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "firm {}", self.number())
    }
}

/// Prices of both firms in a single period.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PricePair {
    /// Price of firm 1.
    pub p1: f64,
    /// Price of firm 2.
    pub p2: f64,
}

impl PricePair {
    pub fn new(p1: f64, p2: f64) -> Self {
        Self { p1, p2 }
    }

    /// Price charged by `firm`.
    pub fn get(&self, firm: Firm) -> f64 {
        match firm {
            Firm::One => self.p1,
            Firm::Two => self.p2,
        }
    }

    /// `(own, other)` prices from the point of view of `firm`.
    pub fn own_and_other(&self, firm: Firm) -> (f64, f64) {
        (self.get(firm), self.get(firm.other()))
    }

    /// Copy of this pair with `firm`'s price replaced.
    pub fn with(self, firm: Firm, price: f64) -> Self {
        match firm {
            Firm::One => Self { p1: price, ..self },
            Firm::Two => Self { p2: price, ..self },
        }
    }
}

/// Configuration errors, raised when a [`ModelConfig`] is constructed.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A parameter was NaN or infinite.
    #[error("non-finite value for {0}")]
    NonFinite(&'static str),
    /// Marginal cost must be >= 0.
    #[error("marginal cost must be >= 0")]
    NegativeMarginalCost,
    /// Market size must be > 0.
    #[error("market size must be > 0")]
    NonPositiveMarketSize,
    /// Maximum price must be > 0.
    #[error("max price must be > 0")]
    NonPositiveMaxPrice,
    /// Maximum underbid fraction must lie in [0, 1].
    #[error("max underbid {0} is outside [0, 1]")]
    UnderbidOutOfRange(f64),
    /// Price sensitivity must be > 0.
    #[error("price sensitivity must be > 0")]
    NonPositiveSensitivity,
}

/// Errors in the arguments of a simulation call, raised before the first period.
#[derive(Debug, Error, PartialEq)]
pub enum InvocationError {
    /// At least one period is needed to seed the run.
    #[error("number of periods must be >= 1")]
    ZeroPeriods,
    /// Initial prices must be finite and non-negative.
    #[error("invalid initial price {price} for {firm}")]
    InvalidInitialPrice { firm: Firm, price: f64 },
    /// Initial prices may not start below the marginal-cost floor.
    #[error("initial price {price} for {firm} is below marginal cost {marginal_cost}")]
    BelowMarginalCost {
        firm: Firm,
        price: f64,
        marginal_cost: f64,
    },
}

/// Errors while assembling a [`SimulationRun`].
#[derive(Debug, Error, PartialEq)]
pub enum RunError {
    /// Periods are append-only and must be pushed in index order.
    #[error("period {got} pushed out of order; expected period {expected}")]
    OutOfOrder { expected: usize, got: usize },
}

fn default_max_underbid() -> f64 {
    DEFAULT_MAX_UNDERBID
}

fn default_price_sensitivity() -> f64 {
    DEFAULT_PRICE_SENSITIVITY
}

/// Unvalidated wire form of [`ModelConfig`].
#[derive(Deserialize)]
struct RawModelConfig {
    marginal_cost: f64,
    market_size: f64,
    max_price: f64,
    #[serde(default = "default_max_underbid")]
    max_underbid: f64,
    #[serde(default = "default_price_sensitivity")]
    price_sensitivity: f64,
}

impl TryFrom<RawModelConfig> for ModelConfig {
    type Error = ConfigError;

    fn try_from(raw: RawModelConfig) -> Result<Self, Self::Error> {
        ModelConfig::new(
            raw.marginal_cost,
            raw.market_size,
            raw.max_price,
            raw.max_underbid,
            raw.price_sensitivity,
        )
    }
}

/// Immutable market parameters of a duopoly simulation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawModelConfig")]
pub struct ModelConfig {
    /// Marginal production cost; the floor for every simulated price.
    marginal_cost: f64,
    /// Quantity demanded at price zero (upper bound on quantity).
    market_size: f64,
    /// Price ceiling at which demand vanishes.
    max_price: f64,
    /// Upper bound on the proportional price cut per period.
    max_underbid: f64,
    /// Logistic steepness of the market-share response.
    price_sensitivity: f64,
}

impl ModelConfig {
    /// Build a validated configuration.
    pub fn new(
        marginal_cost: f64,
        market_size: f64,
        max_price: f64,
        max_underbid: f64,
        price_sensitivity: f64,
    ) -> Result<Self, ConfigError> {
        for (name, v) in [
            ("marginal_cost", marginal_cost),
            ("market_size", market_size),
            ("max_price", max_price),
            ("max_underbid", max_underbid),
            ("price_sensitivity", price_sensitivity),
        ] {
            if !v.is_finite() {
                return Err(ConfigError::NonFinite(name));
            }
        }
        if marginal_cost < 0.0 {
            return Err(ConfigError::NegativeMarginalCost);
        }
        if market_size <= 0.0 {
            return Err(ConfigError::NonPositiveMarketSize);
        }
        if max_price <= 0.0 {
            return Err(ConfigError::NonPositiveMaxPrice);
        }
        if !(0.0..=1.0).contains(&max_underbid) {
            return Err(ConfigError::UnderbidOutOfRange(max_underbid));
        }
        if price_sensitivity <= 0.0 {
            return Err(ConfigError::NonPositiveSensitivity);
        }
        if marginal_cost >= max_price {
            warn!(
                marginal_cost,
                max_price, "marginal cost at or above the price ceiling; every share will be 0"
            );
        }
        Ok(Self {
            marginal_cost,
            market_size,
            max_price,
            max_underbid,
            price_sensitivity,
        })
    }

    /// Configuration with the default underbid bound and price sensitivity.
    pub fn with_defaults(
        marginal_cost: f64,
        market_size: f64,
        max_price: f64,
    ) -> Result<Self, ConfigError> {
        Self::new(
            marginal_cost,
            market_size,
            max_price,
            DEFAULT_MAX_UNDERBID,
            DEFAULT_PRICE_SENSITIVITY,
        )
    }

    pub fn marginal_cost(&self) -> f64 {
        self.marginal_cost
    }

    pub fn market_size(&self) -> f64 {
        self.market_size
    }

    pub fn max_price(&self) -> f64 {
        self.max_price
    }

    pub fn max_underbid(&self) -> f64 {
        self.max_underbid
    }

    pub fn price_sensitivity(&self) -> f64 {
        self.price_sensitivity
    }
}

/// Run-level parameters: how long to simulate and how to seed the RNG.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of periods to simulate (>= 1).
    #[serde(default = "default_num_periods")]
    pub num_periods: usize,
    /// Seed for deterministic RNG.
    #[serde(default = "default_rng_seed")]
    pub rng_seed: u64,
}

fn default_num_periods() -> usize {
    DEFAULT_NUM_PERIODS
}

fn default_rng_seed() -> u64 {
    DEFAULT_RNG_SEED
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            num_periods: DEFAULT_NUM_PERIODS,
            rng_seed: DEFAULT_RNG_SEED,
        }
    }
}

/// Validate the arguments of a simulation call.
pub fn validate_invocation(
    initial: PricePair,
    num_periods: usize,
    config: &ModelConfig,
) -> Result<(), InvocationError> {
    if num_periods == 0 {
        return Err(InvocationError::ZeroPeriods);
    }
    for firm in [Firm::One, Firm::Two] {
        let price = initial.get(firm);
        if !price.is_finite() || price < 0.0 {
            return Err(InvocationError::InvalidInitialPrice { firm, price });
        }
        if price < config.marginal_cost() {
            return Err(InvocationError::BelowMarginalCost {
                firm,
                price,
                marginal_cost: config.marginal_cost(),
            });
        }
    }
    Ok(())
}

/// A complete, loadable simulation setup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Market parameters.
    pub model: ModelConfig,
    /// Prices of both firms in period 0.
    pub initial_prices: PricePair,
    /// Period count and seed.
    #[serde(default)]
    pub run: RunConfig,
}

impl Scenario {
    /// Built-in baseline: cost 10, market size 1000, ceiling 50, prices (45, 40).
    pub fn baseline() -> Self {
        Self {
            model: ModelConfig {
                marginal_cost: 10.0,
                market_size: 1000.0,
                max_price: 50.0,
                max_underbid: DEFAULT_MAX_UNDERBID,
                price_sensitivity: DEFAULT_PRICE_SENSITIVITY,
            },
            initial_prices: PricePair::new(45.0, 40.0),
            run: RunConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), InvocationError> {
        validate_invocation(self.initial_prices, self.run.num_periods, &self.model)
    }
}

/// Outcome of a single period for both firms.
///
/// Shares need not sum to 1: both are 0 when either price reaches the ceiling.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeriodState {
    /// Period index, starting at 0.
    pub period: usize,
    pub price_1: f64,
    pub price_2: f64,
    pub share_1: f64,
    pub share_2: f64,
    pub profit_1: f64,
    pub profit_2: f64,
}

impl PeriodState {
    pub fn prices(&self) -> PricePair {
        PricePair::new(self.price_1, self.price_2)
    }
}

/// Time series of a full simulation, stored column-wise for plotting.
///
/// Columns are append-only and always of equal length; `movers[t]` and
/// `underbids[t]` describe the transition from period `t` to `t + 1`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SimulationRun {
    prices_1: Vec<f64>,
    prices_2: Vec<f64>,
    profits_1: Vec<f64>,
    profits_2: Vec<f64>,
    shares_1: Vec<f64>,
    shares_2: Vec<f64>,
    movers: Vec<Firm>,
    underbids: Vec<f64>,
}

impl SimulationRun {
    pub fn with_capacity(num_periods: usize) -> Self {
        Self {
            prices_1: Vec::with_capacity(num_periods),
            prices_2: Vec::with_capacity(num_periods),
            profits_1: Vec::with_capacity(num_periods),
            profits_2: Vec::with_capacity(num_periods),
            shares_1: Vec::with_capacity(num_periods),
            shares_2: Vec::with_capacity(num_periods),
            movers: Vec::with_capacity(num_periods.saturating_sub(1)),
            underbids: Vec::with_capacity(num_periods.saturating_sub(1)),
        }
    }

    /// Append the next period. Periods must arrive in order, starting at 0.
    pub fn push_period(&mut self, state: &PeriodState) -> Result<(), RunError> {
        if state.period != self.len() {
            return Err(RunError::OutOfOrder {
                expected: self.len(),
                got: state.period,
            });
        }
        self.prices_1.push(state.price_1);
        self.prices_2.push(state.price_2);
        self.profits_1.push(state.profit_1);
        self.profits_2.push(state.profit_2);
        self.shares_1.push(state.share_1);
        self.shares_2.push(state.share_2);
        Ok(())
    }

    /// Record which firm moved into the next period and the fraction it drew.
    pub fn push_transition(&mut self, mover: Firm, underbid: f64) {
        self.movers.push(mover);
        self.underbids.push(underbid);
    }

    pub fn len(&self) -> usize {
        self.prices_1.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices_1.is_empty()
    }

    pub fn prices_1(&self) -> &[f64] {
        &self.prices_1
    }

    pub fn prices_2(&self) -> &[f64] {
        &self.prices_2
    }

    pub fn profits_1(&self) -> &[f64] {
        &self.profits_1
    }

    pub fn profits_2(&self) -> &[f64] {
        &self.profits_2
    }

    pub fn shares_1(&self) -> &[f64] {
        &self.shares_1
    }

    pub fn shares_2(&self) -> &[f64] {
        &self.shares_2
    }

    pub fn movers(&self) -> &[Firm] {
        &self.movers
    }

    pub fn underbids(&self) -> &[f64] {
        &self.underbids
    }

    /// Row view of period `t`.
    pub fn period(&self, t: usize) -> Option<PeriodState> {
        if t >= self.len() {
            return None;
        }
        Some(PeriodState {
            period: t,
            price_1: self.prices_1[t],
            price_2: self.prices_2[t],
            share_1: self.shares_1[t],
            share_2: self.shares_2[t],
            profit_1: self.profits_1[t],
            profit_2: self.profits_2[t],
        })
    }

    pub fn periods(&self) -> impl Iterator<Item = PeriodState> + '_ {
        (0..self.len()).filter_map(move |t| self.period(t))
    }

    pub fn final_period(&self) -> Option<PeriodState> {
        self.len().checked_sub(1).and_then(|t| self.period(t))
    }

    /// The six series `(prices_1, prices_2, profits_1, profits_2, shares_1, shares_2)`.
    #[allow(clippy::type_complexity)]
    pub fn into_columns(self) -> (Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>, Vec<f64>) {
        (
            self.prices_1,
            self.prices_2,
            self.profits_1,
            self.profits_2,
            self.shares_1,
            self.shares_2,
        )
    }
}
