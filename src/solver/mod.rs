//! Clearing-price solver.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: identical inputs yield bit-identical solutions
//! 2. **Exact arithmetic**: 256-bit integers and cross-multiplied rationals,
//!    no floating point, no silent wraparound
//! 3. **Pure**: no shared state, no I/O; safe to invoke concurrently
//! 4. **Bounded**: every restart prunes an order or performs one role
//!    exchange, so the search is linear in the total order count
//!
//! ## Components
//!
//! - [`is_sorted`]: checked sortedness precondition over limit prices
//! - [`ClearingSolver`]: the iterative fixed-point price search
//!
//! ## Example
//!
//! ```
//! use batch_clearing::solver::ClearingSolver;
//! use batch_clearing::types::{Order, PoolState};
//! use ethers::types::{Address, U256};
//!
//! let eth = Address::repeat_byte(0xaa);
//! let dai = Address::repeat_byte(0xbb);
//! let pool = PoolState::new(U256::exp10(19), U256::exp10(19));
//!
//! let side_a = vec![Order::new(
//!     U256::exp10(18),
//!     U256::exp10(18) * 9 / 10,
//!     eth, dai, Address::repeat_byte(0x01), 0,
//! )];
//! let side_b = vec![Order::new(
//!     U256::exp10(18) * 9 / 10,
//!     U256::from(901_110_000_000_000_000u64),
//!     dai, eth, Address::repeat_byte(0x02), 0,
//! )];
//!
//! let solution = ClearingSolver::new().solve(&pool, &side_a, &side_b).unwrap();
//! assert_eq!(solution.admitted_side_a.len(), 1);
//! assert_eq!(solution.admitted_side_b.len(), 1);
//! ```

pub mod clearing;
pub mod sorted;

pub use clearing::ClearingSolver;
pub use sorted::is_sorted;
