//! Core data types for the batch clearing engine.
//!
//! All amounts are 256-bit unsigned integers (`ethers::types::U256`) and all
//! prices are exact rationals — no floating point anywhere, so every result
//! is reproducible bit-for-bit by the on-chain checker.
//!
//! ## Types
//!
//! - [`Order`]: a signed fill-or-kill limit order
//! - [`Fraction`]: an exact rational price compared by cross-multiplication
//! - [`PoolState`]: reserve snapshot of the external constant-product AMM
//! - [`Solution`]: clearing price plus the admitted subset of each side

mod fraction;
mod order;
mod pool;
mod solution;

// Re-export all types at module level
pub use fraction::Fraction;
pub use order::Order;
pub use pool::PoolState;
pub use solution::Solution;

/// An ordered sequence of orders; the solver requires it monotonic in limit
/// price with the worst (most restrictive) limit at the tail.
pub type OrderSide = Vec<Order>;
