//! KPI summary of a finished run.

use duopoly_core::{Firm, ModelConfig, PricePair, SimulationRun};
use serde::Serialize;

/// Headline figures of a simulation run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunSummary {
    /// Number of simulated periods.
    pub periods: usize,
    /// Prices in the last period.
    pub final_prices: PricePair,
    /// Sum of firm 1's profits over all periods.
    pub total_profit_1: f64,
    /// Sum of firm 2's profits over all periods.
    pub total_profit_2: f64,
    pub mean_share_1: f64,
    pub mean_share_2: f64,
    /// First period in which both prices sit on the marginal-cost floor.
    pub floor_reached_at: Option<usize>,
    /// Number of transitions in which firm 1 moved.
    pub moves_1: usize,
    /// Number of transitions in which firm 2 moved.
    pub moves_2: usize,
}

impl RunSummary {
    /// Summarize `run`. Returns None for an empty run.
    pub fn from_run(run: &SimulationRun, config: &ModelConfig) -> Option<Self> {
        let last = run.final_period()?;
        let n = run.len() as f64;
        let mc = config.marginal_cost();
        let floor_reached_at = run
            .prices_1()
            .iter()
            .zip(run.prices_2())
            .position(|(&p1, &p2)| p1 <= mc && p2 <= mc);
        let moves_1 = run.movers().iter().filter(|&&m| m == Firm::One).count();
        Some(Self {
            periods: run.len(),
            final_prices: last.prices(),
            total_profit_1: run.profits_1().iter().sum(),
            total_profit_2: run.profits_2().iter().sum(),
            mean_share_1: run.shares_1().iter().sum::<f64>() / n,
            mean_share_2: run.shares_2().iter().sum::<f64>() / n,
            floor_reached_at,
            moves_1,
            moves_2: run.movers().len() - moves_1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duopoly_core::PeriodState;

    fn row(period: usize, p1: f64, p2: f64) -> PeriodState {
        PeriodState {
            period,
            price_1: p1,
            price_2: p2,
            share_1: 0.25,
            share_2: 0.75,
            profit_1: 10.0,
            profit_2: 30.0,
        }
    }

    #[test]
    fn summarizes_columns() {
        let cfg = ModelConfig::with_defaults(10.0, 1000.0, 50.0).unwrap();
        let mut run = SimulationRun::with_capacity(3);
        run.push_period(&row(0, 12.0, 11.0)).unwrap();
        run.push_transition(Firm::One, 0.08);
        run.push_period(&row(1, 10.0, 11.0)).unwrap();
        run.push_transition(Firm::Two, 0.05);
        run.push_period(&row(2, 10.0, 10.0)).unwrap();

        let s = RunSummary::from_run(&run, &cfg).unwrap();
        assert_eq!(s.periods, 3);
        assert_eq!(s.final_prices, PricePair::new(10.0, 10.0));
        assert_eq!(s.total_profit_1, 30.0);
        assert_eq!(s.total_profit_2, 90.0);
        assert_eq!(s.mean_share_2, 0.75);
        assert_eq!(s.floor_reached_at, Some(2));
        assert_eq!((s.moves_1, s.moves_2), (1, 1));
    }

    #[test]
    fn empty_run_has_no_summary() {
        let cfg = ModelConfig::with_defaults(10.0, 1000.0, 50.0).unwrap();
        assert!(RunSummary::from_run(&SimulationRun::default(), &cfg).is_none());
    }
}
