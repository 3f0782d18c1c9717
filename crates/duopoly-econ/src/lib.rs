#![deny(warnings)]

//! Economic models: market share, demand and profit for the Bertrand duopoly.
//!
//! This module provides the per-period building blocks used by the runtime:
//! - Logistic market share driven by the relative price gap
//! - Linear demand that vanishes at the price ceiling
//! - Period profit composed from the two
//!
//! The static linear-reaction equilibrium lives in [`equilibrium`].

pub mod equilibrium;

use duopoly_core::{Firm, ModelConfig, PeriodState, PricePair};

/// Relative price gap `(other - own) / mean(own, other)`.
///
/// Defined as 0 when the mean price is not strictly positive, which only
/// happens for a zero price pair.
pub fn relative_price_gap(own_price: f64, other_price: f64) -> f64 {
    let mean = (own_price + other_price) / 2.0;
    if mean <= 0.0 || !mean.is_finite() {
        return 0.0;
    }
    (other_price - own_price) / mean
}

/// Share of total demand captured at `own_price` against `other_price`.
///
/// Returns 0 when either price is at or above the ceiling, so both firms can
/// be at 0 simultaneously. Otherwise applies the logistic transform
/// `1 / (1 + exp(-k * gap))`.
///
/// Example:
/// let cfg = ModelConfig::with_defaults(10.0, 1000.0, 50.0).unwrap();
/// assert_eq!(market_share(30.0, 30.0, &cfg), 0.5);
pub fn market_share(own_price: f64, other_price: f64, config: &ModelConfig) -> f64 {
    if !(own_price.is_finite() && other_price.is_finite()) {
        return 0.0;
    }
    let ceiling = config.max_price();
    if own_price >= ceiling || other_price >= ceiling {
        return 0.0;
    }
    let gap = relative_price_gap(own_price, other_price);
    let share = 1.0 / (1.0 + (-config.price_sensitivity() * gap).exp());
    share.clamp(0.0, 1.0)
}

/// Market-wide quantity at `price`: `market_size * (1 - price / max_price)`, floored at 0.
pub fn base_demand(price: f64, config: &ModelConfig) -> f64 {
    (config.market_size() * (1.0 - price / config.max_price())).max(0.0)
}

/// Quantity sold by a firm charging `price` with share `own_share`.
///
/// The share is clamped to [0, 1], so the result is never negative.
pub fn demand(price: f64, own_share: f64, config: &ModelConfig) -> f64 {
    base_demand(price, config) * own_share.clamp(0.0, 1.0)
}

/// Period profit `(own_price - marginal_cost) * quantity`.
///
/// Negative only when `own_price` is below marginal cost.
pub fn profit(own_price: f64, other_price: f64, config: &ModelConfig) -> f64 {
    let share = market_share(own_price, other_price, config);
    let quantity = demand(own_price, share, config);
    (own_price - config.marginal_cost()) * quantity
}

/// Shares and profits of both firms for one period.
pub fn evaluate_period(period: usize, prices: PricePair, config: &ModelConfig) -> PeriodState {
    let (own_1, other_1) = prices.own_and_other(Firm::One);
    let (own_2, other_2) = prices.own_and_other(Firm::Two);
    PeriodState {
        period,
        price_1: prices.p1,
        price_2: prices.p2,
        share_1: market_share(own_1, other_1, config),
        share_2: market_share(own_2, other_2, config),
        profit_1: profit(own_1, other_1, config),
        profit_2: profit(own_2, other_2, config),
    }
}
