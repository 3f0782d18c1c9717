//! Static Bertrand equilibrium for linear demand with differentiated goods.
//!
//! Firm `i` faces demand `q_i = alpha_i - beta_i * p_i + gamma_ij * p_j`.
//! Maximizing `(p_i - c_i) * q_i` gives the linear best response
//! `p_i = (alpha_i + beta_i * c_i + gamma_ij * p_j) / (2 * beta_i)`.
//! The equilibrium is where both best responses hold, a 2x2 linear system.
//!
//! This is a reference point for where the dynamic model comes to rest, not
//! part of the simulation itself.

use duopoly_core::PricePair;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Lower end of the default price grid for reaction curves.
pub const DEFAULT_CURVE_LO: f64 = 0.0;
/// Upper end of the default price grid for reaction curves.
pub const DEFAULT_CURVE_HI: f64 = 50.0;
/// Default number of grid points for reaction curves.
pub const DEFAULT_CURVE_SAMPLES: usize = 500;

const SINGULAR_EPS: f64 = 1e-12;

/// Errors from the static equilibrium solve.
#[derive(Debug, Error, PartialEq)]
pub enum EquilibriumError {
    /// Own-price slopes must be strictly positive.
    #[error("own-price slope must be > 0")]
    NonPositiveSlope,
    /// Best responses are parallel; no unique equilibrium.
    #[error("reaction functions are parallel; no unique equilibrium")]
    Singular,
    /// A parameter or result was NaN or infinite.
    #[error("non-finite parameter or result")]
    NonFinite,
    /// Grid needs at least two samples over a non-empty finite range.
    #[error("invalid price grid")]
    InvalidGrid,
}

/// Linear duopoly parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearDuopoly {
    /// Demand intercept of firm 1.
    pub alpha1: f64,
    /// Demand intercept of firm 2.
    pub alpha2: f64,
    /// Own-price slope of firm 1 (> 0).
    pub beta1: f64,
    /// Own-price slope of firm 2 (> 0).
    pub beta2: f64,
    /// Sensitivity of firm 1's demand to firm 2's price.
    pub gamma12: f64,
    /// Sensitivity of firm 2's demand to firm 1's price.
    pub gamma21: f64,
    /// Unit cost of firm 1.
    pub c1: f64,
    /// Unit cost of firm 2.
    pub c2: f64,
}

impl Default for LinearDuopoly {
    fn default() -> Self {
        Self {
            alpha1: 100.0,
            alpha2: 100.0,
            beta1: 10.0,
            beta2: 10.0,
            gamma12: 5.0,
            gamma21: 5.0,
            c1: 20.0,
            c2: 20.0,
        }
    }
}

/// Best responses of both firms sampled over a common price grid.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReactionCurves {
    /// Competitor prices the responses were evaluated at.
    pub grid: Vec<f64>,
    /// `reaction_1(grid[i])`: firm 1's best price given firm 2 charges `grid[i]`.
    pub firm_1: Vec<f64>,
    /// `reaction_2(grid[i])`: firm 2's best price given firm 1 charges `grid[i]`.
    pub firm_2: Vec<f64>,
}

impl LinearDuopoly {
    pub fn validate(&self) -> Result<(), EquilibriumError> {
        let all = [
            self.alpha1,
            self.alpha2,
            self.beta1,
            self.beta2,
            self.gamma12,
            self.gamma21,
            self.c1,
            self.c2,
        ];
        if all.iter().any(|v| !v.is_finite()) {
            return Err(EquilibriumError::NonFinite);
        }
        if self.beta1 <= 0.0 || self.beta2 <= 0.0 {
            return Err(EquilibriumError::NonPositiveSlope);
        }
        Ok(())
    }

    /// Firm 1's profit-maximizing price given firm 2's price.
    pub fn reaction_1(&self, p2: f64) -> f64 {
        (self.alpha1 + self.beta1 * self.c1 + self.gamma12 * p2) / (2.0 * self.beta1)
    }

    /// Firm 2's profit-maximizing price given firm 1's price.
    pub fn reaction_2(&self, p1: f64) -> f64 {
        (self.alpha2 + self.beta2 * self.c2 + self.gamma21 * p1) / (2.0 * self.beta2)
    }

    /// Solve both best responses simultaneously (Cramer's rule).
    ///
    /// Example:
    /// let eq = LinearDuopoly::default().equilibrium().unwrap();
    /// assert!((eq.p1 - 20.0).abs() < 1e-9);
    pub fn equilibrium(&self) -> Result<PricePair, EquilibriumError> {
        self.validate()?;
        // [[1, a12], [a21, 1]] * [p1, p2] = [b1, b2]
        let a12 = -self.gamma12 / (2.0 * self.beta1);
        let a21 = -self.gamma21 / (2.0 * self.beta2);
        let b1 = (self.alpha1 + self.beta1 * self.c1) / (2.0 * self.beta1);
        let b2 = (self.alpha2 + self.beta2 * self.c2) / (2.0 * self.beta2);

        let det = 1.0 - a12 * a21;
        if !det.is_finite() {
            return Err(EquilibriumError::NonFinite);
        }
        if det.abs() < SINGULAR_EPS {
            return Err(EquilibriumError::Singular);
        }
        let p1 = (b1 - a12 * b2) / det;
        let p2 = (b2 - a21 * b1) / det;
        if !(p1.is_finite() && p2.is_finite()) {
            return Err(EquilibriumError::NonFinite);
        }
        debug!(p1, p2, det, "solved linear equilibrium");
        Ok(PricePair::new(p1, p2))
    }

    /// Evaluate both reaction functions on `samples` evenly spaced points in `[lo, hi]`.
    pub fn reaction_curves(
        &self,
        lo: f64,
        hi: f64,
        samples: usize,
    ) -> Result<ReactionCurves, EquilibriumError> {
        self.validate()?;
        if samples < 2 || !(lo.is_finite() && hi.is_finite()) || lo >= hi {
            return Err(EquilibriumError::InvalidGrid);
        }
        let step = (hi - lo) / (samples - 1) as f64;
        let grid: Vec<f64> = (0..samples)
            .map(|i| if i == samples - 1 { hi } else { lo + step * i as f64 })
            .collect();
        let firm_1 = grid.iter().map(|&p| self.reaction_1(p)).collect();
        let firm_2 = grid.iter().map(|&p| self.reaction_2(p)).collect();
        Ok(ReactionCurves {
            grid,
            firm_1,
            firm_2,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_equilibrium_is_symmetric() {
        let eq = LinearDuopoly::default().equilibrium().unwrap();
        assert!((eq.p1 - 20.0).abs() < 1e-9);
        assert!((eq.p2 - 20.0).abs() < 1e-9);
    }

    #[test]
    fn equilibrium_lies_on_both_curves() {
        let m = LinearDuopoly {
            alpha1: 120.0,
            c2: 15.0,
            gamma21: 3.0,
            ..LinearDuopoly::default()
        };
        let eq = m.equilibrium().unwrap();
        assert!((m.reaction_1(eq.p2) - eq.p1).abs() < 1e-9);
        assert!((m.reaction_2(eq.p1) - eq.p2).abs() < 1e-9);
    }

    #[test]
    fn parallel_responses_are_singular() {
        // a12 * a21 == 1 when gamma12 * gamma21 == 4 * beta1 * beta2.
        let m = LinearDuopoly {
            gamma12: 20.0,
            gamma21: 20.0,
            ..LinearDuopoly::default()
        };
        assert_eq!(m.equilibrium(), Err(EquilibriumError::Singular));
    }

    #[test]
    fn rejects_bad_parameters() {
        let flat = LinearDuopoly {
            beta1: 0.0,
            ..LinearDuopoly::default()
        };
        assert_eq!(flat.equilibrium(), Err(EquilibriumError::NonPositiveSlope));
        let nan = LinearDuopoly {
            c1: f64::NAN,
            ..LinearDuopoly::default()
        };
        assert_eq!(nan.equilibrium(), Err(EquilibriumError::NonFinite));
    }

    #[test]
    fn curves_cover_grid() {
        let m = LinearDuopoly::default();
        let curves = m
            .reaction_curves(DEFAULT_CURVE_LO, DEFAULT_CURVE_HI, DEFAULT_CURVE_SAMPLES)
            .unwrap();
        assert_eq!(curves.grid.len(), DEFAULT_CURVE_SAMPLES);
        assert_eq!(curves.grid[0], 0.0);
        assert_eq!(curves.grid[DEFAULT_CURVE_SAMPLES - 1], 50.0);
        assert_eq!(curves.firm_1[0], m.reaction_1(0.0));
        assert_eq!(curves.firm_2[0], 15.0);
        assert!(m.reaction_curves(5.0, 5.0, 10).is_err());
        assert!(m.reaction_curves(0.0, 1.0, 1).is_err());
    }

    #[test]
    fn params_from_yaml_with_defaults() {
        let m: LinearDuopoly = serde_yaml::from_str(
            "alpha1: 100\nalpha2: 100\nbeta1: 10\nbeta2: 10\ngamma12: 5\ngamma21: 5\nc1: 20\nc2: 20\n",
        )
        .unwrap();
        assert_eq!(m, LinearDuopoly::default());
    }

    proptest! {
        #[test]
        fn equilibrium_monotonic_in_own_cost(c in 0.0f64..100.0) {
            let lo = LinearDuopoly { c1: c, ..LinearDuopoly::default() }.equilibrium().unwrap();
            let hi = LinearDuopoly { c1: c + 1.0, ..LinearDuopoly::default() }.equilibrium().unwrap();
            prop_assert!(hi.p1 > lo.p1);
        }
    }
}
