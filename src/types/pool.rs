//! External AMM reserve snapshot.

use ethers::types::U256;

/// Reserves of the external constant-product pool, read-only from this
/// crate's perspective.
///
/// The solver computes hypothetical post-trade reserves as a price candidate
/// but never mutates the real pool; `reserve_a * reserve_b` is the pool's
/// invariant `k` (fees ignored at this boundary).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolState {
    /// Reserve of the side-A asset.
    pub reserve_a: U256,

    /// Reserve of the side-B asset.
    pub reserve_b: U256,
}

impl PoolState {
    pub fn new(reserve_a: U256, reserve_b: U256) -> Self {
        Self {
            reserve_a,
            reserve_b,
        }
    }

    /// The same pool with the roles of the two assets exchanged.
    pub fn swapped(self) -> Self {
        Self {
            reserve_a: self.reserve_b,
            reserve_b: self.reserve_a,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swapped_exchanges_roles() {
        let pool = PoolState::new(U256::from(10u8), U256::from(5u8));
        let swapped = pool.swapped();
        assert_eq!(swapped.reserve_a, U256::from(5u8));
        assert_eq!(swapped.reserve_b, U256::from(10u8));
        assert_eq!(swapped.swapped(), pool);
    }
}
