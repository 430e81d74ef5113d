//! Deterministic integer math shared with the on-chain checker.
//!
//! ## Why a hand-rolled square root?
//!
//! The settlement verifier recomputes every reserve the solver proposes, so
//! the square root used in price discovery must match the checker's Babylonian
//! loop bit-for-bit: same seed, same floor divisions, same stopping rule. A
//! library routine with a different iteration scheme could land one unit away
//! and invalidate an otherwise correct solution.
//!
//! ## Example
//!
//! ```
//! use batch_clearing::math::isqrt;
//! use ethers::types::U256;
//!
//! assert_eq!(isqrt(U256::from(4u8)), U256::from(2u8));
//! assert_eq!(isqrt(U256::from(8u8)), U256::from(2u8));
//! assert_eq!(isqrt(U256::exp10(36)), U256::exp10(18));
//! ```

use ethers::types::U256;

/// Floor of the square root of `y`, over the full 256-bit range.
///
/// For `y <= 3` the result is `1` when `y != 0` and `0` otherwise. For larger
/// inputs this is Newton's method seeded with `y/2 + 1`, iterating
/// `x' = (y/x + x) / 2` with floor division until the iterate stops
/// decreasing. Total function; never panics.
pub fn isqrt(y: U256) -> U256 {
    if y.is_zero() {
        return U256::zero();
    }
    if y <= U256::from(3u8) {
        return U256::one();
    }

    let two = U256::from(2u8);
    let mut z = y;
    let mut x = y / two + U256::one();
    while x < z {
        z = x;
        x = (y / x + x) / two;
    }
    z
}

// ============================================================================
// Unit Tests
// ============================================================================
