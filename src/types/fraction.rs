//! Exact rational prices.
//!
//! ## Why cross-multiplication?
//!
//! Prices are ratios of 256-bit amounts. Dividing them would lose precision
//! and diverge from the on-chain checker, so every comparison multiplies
//! across instead: `a/b < c/d` iff `a*d < c*b`. The products can exceed 256
//! bits; when they do the comparison fails loudly with
//! [`ClearingError::ArithmeticOverflow`] rather than wrapping, because a
//! wrapped comparison would corrupt sortedness and limit-price checks.
//!
//! ## Example
//!
//! ```
//! use batch_clearing::types::Fraction;
//! use ethers::types::U256;
//! use std::cmp::Ordering;
//!
//! let half = Fraction::new(U256::from(1u8), U256::from(2u8));
//! let third = Fraction::new(U256::from(1u8), U256::from(3u8));
//!
//! assert_eq!(half.cross_cmp(&third).unwrap(), Ordering::Greater);
//! assert_eq!(half.invert(), Fraction::new(U256::from(2u8), U256::from(1u8)));
//! ```

use std::cmp::Ordering;

use ethers::types::U256;

use crate::error::ClearingError;

/// A price expressed as an exact ratio: `numerator / denominator` units of
/// the side-B asset per unit of the side-A asset.
///
/// `{0, 0}` is reserved as the "no solution" sentinel and never compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fraction {
    pub numerator: U256,
    pub denominator: U256,
}

impl Fraction {
    /// Create a fraction from raw parts.
    pub fn new(numerator: U256, denominator: U256) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// The `{0, 0}` sentinel used by the empty [`Solution`](crate::types::Solution).
    pub fn empty() -> Self {
        Self::default()
    }

    /// True for the `{0, 0}` sentinel.
    pub fn is_empty(&self) -> bool {
        self.numerator.is_zero() && self.denominator.is_zero()
    }

    /// Swap numerator and denominator.
    ///
    /// Purely mechanical, zero components included: `0/2` inverts to `2/0`
    /// and `1/0` to `0/1`. Callers comparing an inverted fraction are
    /// responsible for the side convention, not this function.
    pub fn invert(self) -> Self {
        Self {
            numerator: self.denominator,
            denominator: self.numerator,
        }
    }

    /// Compare against `other` by cross-multiplication.
    ///
    /// Returns the ordering of `self` relative to `other`, or
    /// [`ClearingError::ArithmeticOverflow`] if either cross product exceeds
    /// 256 bits. Never divides.
    pub fn cross_cmp(&self, other: &Fraction) -> Result<Ordering, ClearingError> {
        let lhs = self
            .numerator
            .checked_mul(other.denominator)
            .ok_or(ClearingError::ArithmeticOverflow)?;
        let rhs = other
            .numerator
            .checked_mul(self.denominator)
            .ok_or(ClearingError::ArithmeticOverflow)?;
        Ok(lhs.cmp(&rhs))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
