//! Solver output.

use crate::types::{Fraction, Order};

/// The result of one solver invocation: a single uniform clearing price and
/// the maximal admissible subset of each side, every admitted order filling
/// completely at that price.
///
/// "No solution" is the empty sentinel (`Fraction {0, 0}`, both sides empty)
/// rather than an error: it is an expected outcome telling the caller not to
/// attempt settlement. A `Solution` is created once, never mutated, and can
/// be re-derived deterministically from the same inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Uniform exchange rate: side-B asset per unit of side-A asset.
    pub clearing_price: Fraction,

    /// Admitted orders selling the side-A asset, in input order.
    pub admitted_side_a: Vec<Order>,

    /// Admitted orders selling the side-B asset, in input order.
    pub admitted_side_b: Vec<Order>,
}

impl Solution {
    /// The "no solution" sentinel.
    pub fn empty() -> Self {
        Self {
            clearing_price: Fraction::empty(),
            admitted_side_a: Vec::new(),
            admitted_side_b: Vec::new(),
        }
    }

    /// True when this is the "no solution" sentinel.
    pub fn is_empty(&self) -> bool {
        self.clearing_price.is_empty()
            && self.admitted_side_a.is_empty()
            && self.admitted_side_b.is_empty()
    }
}
