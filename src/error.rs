//! Error taxonomy for the clearing pipeline.
//!
//! Every variant here is fatal for the settlement attempt it occurs in:
//! nothing is partially applied, and the caller is expected to re-submit a
//! corrected or smaller batch. The one deliberate exception is
//! [`ClearingError::NoSolutionFound`], which only appears at the settlement
//! boundary when the solver's empty sentinel leaves nothing to apply — the
//! solver itself reports "no solution" as a normal value, not an error.

use ethers::types::Address;
use thiserror::Error;

use crate::codec::RECORD_WIDTH;

/// Errors produced while decoding, validating, solving, or applying a batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClearingError {
    /// The encoded buffer cannot be split into whole order records,
    /// or a record carries a structurally invalid field.
    #[error("malformed encoding: {0} (record width is {RECORD_WIDTH} bytes)")]
    MalformedEncoding(String),

    /// The signature recovered a signer different from the claimed owner.
    #[error("signature does not recover to claimed owner {0:?}")]
    InvalidSignature(Address),

    /// `now` is before the order's `valid_from`.
    #[error("order not valid before timestamp {0}")]
    OrderNotYetValid(u64),

    /// `now` is past the order's `valid_until`.
    #[error("order expired at timestamp {0}")]
    OrderExpired(u64),

    /// The two sides do not reference one token pair in opposite directions.
    #[error("order sides do not form a consistent token pair")]
    MismatchedTokenPairing,

    /// An order side violates the sorted-by-limit-price precondition.
    #[error("order side is not sorted by limit price")]
    Unsorted,

    /// A cross-multiplication or reserve computation exceeded 256 bits.
    /// Distinct from `Unsorted`: a wrapped comparison would silently corrupt
    /// price checks, so overflow always aborts loudly.
    #[error("arithmetic overflow during cross-multiplication")]
    ArithmeticOverflow,

    /// The solver exhausted both sides; there is nothing to settle.
    #[error("no clearing solution found for this batch")]
    NoSolutionFound,

    /// The asset-transfer collaborator rejected a pull; the whole
    /// settlement aborts.
    #[error("asset transfer from {0:?} failed")]
    TransferFailed(Address),
}
