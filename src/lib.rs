//! # Batch Clearing
//!
//! Uniform-price batch clearing backed by constant-product AMM liquidity.
//!
//! Two opposing lists of off-chain signed limit orders are matched against
//! each other and against an external pool so that every admitted order
//! fills completely (fill-or-kill) at one clearing price at least as good
//! as its limit; the unmatched residual is absorbed by the pool.
//!
//! ## Architecture
//!
//! - **Types**: `Order`, `Fraction`, `PoolState`, `Solution`
//! - **Math**: the integer square root shared with the on-chain checker
//! - **Codec**: fixed-width signed order records and the signing digest
//! - **Solver**: the iterative clearing-price search
//! - **Settlement**: the decode/validate/solve/apply boundary
//!
//! ## Design Principles
//!
//! 1. **Determinism**: identical inputs produce bit-identical solutions,
//!    reproducible by an independent on-chain verifier
//! 2. **Exact arithmetic**: 256-bit integers and cross-multiplied rationals;
//!    no floating point, and overflow always fails loudly
//! 3. **Purity**: the solver owns private working copies and never mutates
//!    caller state; it is safe to run concurrently
//! 4. **Fill-or-kill**: an admitted order executes in full or not at all

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, Fraction, PoolState, Solution
pub mod types;

/// Deterministic integer math (Newton integer square root)
pub mod math;

/// Canonical binary codec for signed order records
pub mod codec;

/// Clearing-price solver and sortedness validator
pub mod solver;

/// Settlement boundary: decode, validate, solve, apply
pub mod settlement;

/// Error taxonomy
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use codec::{decode_all, encode, RECORD_WIDTH};
pub use error::ClearingError;
pub use settlement::{AssetTransfer, BatchSettler, SettlementEvent};
pub use solver::{is_sorted, ClearingSolver};
pub use types::{Fraction, Order, OrderSide, PoolState, Solution};
