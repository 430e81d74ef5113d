//! Settlement boundary: decode, validate, solve, apply.
//!
//! The solver itself only *decides* a price and an admitted order set; this
//! module is the boundary where encoded batches enter and where a decided
//! [`Solution`] is handed to the asset-transfer collaborator. Everything
//! here is all-or-nothing: any fatal error aborts the attempt with nothing
//! partially applied, and the caller re-submits a corrected batch.

use ethers::types::{Address, H256, U256};
use log::{debug, info};

use crate::codec;
use crate::error::ClearingError;
use crate::solver::ClearingSolver;
use crate::types::{Order, PoolState, Solution};

/// Payload of the settlement event emitted on a successful clear: the two
/// sell tokens and the clearing price as `(denominator, numerator)` — the
/// hypothetical post-trade reserves of assets A and B.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementEvent {
    pub sell_token_a: Address,
    pub sell_token_b: Address,
    pub price_denominator: U256,
    pub price_numerator: U256,
}

/// Opaque asset-movement collaborator.
///
/// `transfer_from` pulls `amount` of `token` from `owner` into `recipient`
/// and reports success; a `false` is final for this settlement attempt —
/// the engine never retries, it aborts.
pub trait AssetTransfer {
    fn transfer_from(
        &mut self,
        owner: Address,
        recipient: Address,
        token: Address,
        amount: U256,
    ) -> bool;
}

/// Decodes submitted batches, enforces the boundary invariants the solver
/// does not own (validity windows, token pairing), and runs the solver.
#[derive(Debug)]
pub struct BatchSettler {
    domain_separator: H256,
    solver: ClearingSolver,
}

impl BatchSettler {
    pub fn new(domain_separator: H256) -> Self {
        Self {
            domain_separator,
            solver: ClearingSolver::new(),
        }
    }

    /// Decode both encoded sides, validate them, and solve.
    ///
    /// Returns the solver's result, which may be the empty sentinel; turning
    /// that into [`ClearingError::NoSolutionFound`] is left to the caller
    /// that actually needs something to apply (see [`Self::execute`]).
    pub fn clear(
        &self,
        pool: &PoolState,
        encoded_side_a: &[u8],
        encoded_side_b: &[u8],
        now: u64,
    ) -> Result<Solution, ClearingError> {
        let side_a = codec::decode_all(encoded_side_a, self.domain_separator)?;
        let side_b = codec::decode_all(encoded_side_b, self.domain_separator)?;
        debug!(
            "decoded batch: {} side A orders, {} side B orders",
            side_a.len(),
            side_b.len()
        );
        self.clear_orders(pool, &side_a, &side_b, now)
    }

    /// Validate already-decoded sides and solve.
    ///
    /// The wire record carries no validity window, so windowed orders reach
    /// this entry point directly from the submission channel.
    pub fn clear_orders(
        &self,
        pool: &PoolState,
        side_a: &[Order],
        side_b: &[Order],
        now: u64,
    ) -> Result<Solution, ClearingError> {
        for order in side_a.iter().chain(side_b.iter()) {
            order.ensure_valid_at(now)?;
        }
        ensure_consistent_pairing(side_a, side_b)?;

        let solution = self.solver.solve(pool, side_a, side_b)?;
        if solution.is_empty() {
            info!("batch cleared with no solution");
        } else {
            info!(
                "batch cleared at {}/{} with {}+{} admitted orders",
                solution.clearing_price.numerator,
                solution.clearing_price.denominator,
                solution.admitted_side_a.len(),
                solution.admitted_side_b.len(),
            );
        }
        Ok(solution)
    }

    /// Pull every admitted order's sell amount into `vault` through the
    /// transfer collaborator and return the settlement event.
    ///
    /// An empty solution has nothing to apply and maps to
    /// [`ClearingError::NoSolutionFound`]. The first failed transfer aborts
    /// with [`ClearingError::TransferFailed`]; the collaborator's journaling
    /// makes the abort atomic, nothing is retried here.
    pub fn execute<T: AssetTransfer>(
        &self,
        solution: &Solution,
        vault: Address,
        transfers: &mut T,
    ) -> Result<SettlementEvent, ClearingError> {
        let (first_a, first_b) = match (
            solution.admitted_side_a.first(),
            solution.admitted_side_b.first(),
        ) {
            (Some(a), Some(b)) => (a, b),
            _ => return Err(ClearingError::NoSolutionFound),
        };
        let sell_token_a = first_a.sell_token;
        let sell_token_b = first_b.sell_token;

        for order in solution
            .admitted_side_a
            .iter()
            .chain(solution.admitted_side_b.iter())
        {
            let pulled =
                transfers.transfer_from(order.owner, vault, order.sell_token, order.sell_amount);
            if !pulled {
                return Err(ClearingError::TransferFailed(order.owner));
            }
        }

        Ok(SettlementEvent {
            sell_token_a,
            sell_token_b,
            price_denominator: solution.clearing_price.denominator,
            price_numerator: solution.clearing_price.numerator,
        })
    }
}

/// All side A orders must sell one token and buy the other, and side B the
/// exact mirror; a self-trading order or a stray token fails the batch.
fn ensure_consistent_pairing(side_a: &[Order], side_b: &[Order]) -> Result<(), ClearingError> {
    let pair = match (side_a.first(), side_b.first()) {
        (Some(a), _) => (a.sell_token, a.buy_token),
        (None, Some(b)) => (b.buy_token, b.sell_token),
        (None, None) => return Ok(()),
    };
    if pair.0 == pair.1 {
        return Err(ClearingError::MismatchedTokenPairing);
    }

    for order in side_a {
        if (order.sell_token, order.buy_token) != pair {
            return Err(ClearingError::MismatchedTokenPairing);
        }
    }
    for order in side_b {
        if (order.sell_token, order.buy_token) != (pair.1, pair.0) {
            return Err(ClearingError::MismatchedTokenPairing);
        }
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================
