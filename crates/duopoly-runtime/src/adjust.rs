//! Price-adjustment rule: the pricier firm undercuts its competitor.

use duopoly_core::{Firm, ModelConfig, PricePair};
use rand::Rng;

/// Result of one price transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PriceAdjustment {
    /// Prices for the next period.
    pub next: PricePair,
    /// The firm that changed its price.
    pub mover: Firm,
    /// Fraction drawn from `[0, max_underbid]`.
    pub underbid: f64,
}

/// The firm that adjusts: firm 1 only if strictly pricier, firm 2 otherwise (ties included).
pub fn mover(prices: PricePair) -> Firm {
    if prices.p1 > prices.p2 {
        Firm::One
    } else {
        Firm::Two
    }
}

/// Price that undercuts `other_price` by `underbid`, floored at marginal cost.
pub fn undercut(other_price: f64, underbid: f64, config: &ModelConfig) -> f64 {
    (other_price * (1.0 - underbid)).max(config.marginal_cost())
}

pub fn draw_underbid<R: Rng>(config: &ModelConfig, rng: &mut R) -> f64 {
    rng.gen_range(0.0..=config.max_underbid())
}

/// Apply one period of the rule. Exactly one random draw is consumed; the
/// non-mover keeps its price, so prices never rise.
pub fn adjust_prices<R: Rng>(
    prices: PricePair,
    config: &ModelConfig,
    rng: &mut R,
) -> PriceAdjustment {
    let mover = mover(prices);
    let underbid = draw_underbid(config, rng);
    let other_price = prices.get(mover.other());
    let next = prices.with(mover, undercut(other_price, underbid, config));
    PriceAdjustment {
        next,
        mover,
        underbid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn cfg() -> ModelConfig {
        ModelConfig::new(10.0, 1000.0, 50.0, 0.08, 2.0).unwrap()
    }

    #[test]
    fn tie_goes_to_firm_two() {
        assert_eq!(mover(PricePair::new(30.0, 30.0)), Firm::Two);
        assert_eq!(mover(PricePair::new(30.0, 29.0)), Firm::One);
        assert_eq!(mover(PricePair::new(29.0, 30.0)), Firm::Two);
    }

    #[test]
    fn undercut_respects_floor() {
        let c = cfg();
        assert_eq!(undercut(40.0, 0.0, &c), 40.0);
        assert!((undercut(40.0, 0.05, &c) - 38.0).abs() < 1e-12);
        assert_eq!(undercut(10.5, 0.08, &c), 10.0);
    }

    #[test]
    fn tie_adjusts_firm_two_only() {
        let c = cfg();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let step = adjust_prices(PricePair::new(30.0, 30.0), &c, &mut rng);
        assert_eq!(step.mover, Firm::Two);
        assert_eq!(step.next.p1, 30.0);
        assert!(step.next.p2 <= 30.0);
    }

    #[test]
    fn zero_underbid_matches_competitor() {
        let c = ModelConfig::new(10.0, 1000.0, 50.0, 0.0, 2.0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let step = adjust_prices(PricePair::new(45.0, 40.0), &c, &mut rng);
        assert_eq!(step.underbid, 0.0);
        assert_eq!(step.next, PricePair::new(40.0, 40.0));
    }

    proptest! {
        #[test]
        fn one_mover_never_raises(p1 in 10.0f64..60.0, p2 in 10.0f64..60.0, seed in any::<u64>()) {
            let c = cfg();
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let prices = PricePair::new(p1, p2);
            let step = adjust_prices(prices, &c, &mut rng);
            let other = step.mover.other();
            prop_assert_eq!(step.next.get(other), prices.get(other));
            prop_assert!(step.next.get(step.mover) <= prices.get(other));
            prop_assert!(step.next.get(step.mover) <= prices.get(step.mover));
            prop_assert!(step.next.get(step.mover) >= c.marginal_cost());
            prop_assert!((0.0..=c.max_underbid()).contains(&step.underbid));
        }
    }
}
