//! Iterative fixed-point search for the uniform clearing price.
//!
//! ## Algorithm
//!
//! Side A sells the pool's asset A, side B sells asset B, both sorted
//! ascending by limit price so the worst (most restrictive) order sits at
//! the tail. Each round:
//!
//! 1. sum each side's sell amounts; an empty side means no solution;
//! 2. if the rate implied by aggregate demand falls below side B's tail
//!    limit, the structural excess sits on the other side: exchange the
//!    roles of the reserves and the sides and restart (a pure role
//!    exchange — the pricing formula is never duplicated);
//! 3. price the batch against the pool: with `k = reserve_a * reserve_b`
//!    and `depth = reserve_b + supply_b`, the post-trade reserve of asset A
//!    solves a quadratic whose positive root is
//!    `p + sqrt(p^2 + k * demand_a / depth)` for `p = k / (2 * depth)`;
//!    the candidate price is the ratio of the post-trade reserves;
//! 4. if the candidate violates a tail order's limit, drop that order from
//!    the private working copy and restart.
//!
//! Every restart removes an order or performs exactly one role exchange, so
//! the search terminates after a number of rounds linear in the total order
//! count. Pruning operates on working copies only and is never visible to
//! the caller's slices.

use std::cmp::Ordering;

use ethers::types::U256;
use log::debug;

use crate::error::ClearingError;
use crate::math::isqrt;
use crate::solver::is_sorted;
use crate::types::{Fraction, Order, PoolState, Solution};

/// Deterministic batch clearing solver.
///
/// Stateless and pure: holds no caches and may be shared freely across
/// threads computing competing candidate solutions.
#[derive(Debug, Default)]
pub struct ClearingSolver;

/// Working state of one search: reserves plus private copies of both sides.
struct SearchState {
    reserve_a: U256,
    reserve_b: U256,
    side_a: Vec<Order>,
    side_b: Vec<Order>,
}

impl SearchState {
    /// Exchange the roles of the two assets: reserves and sides swap
    /// together so the fixed "side A has the excess" assumption holds.
    fn exchange_roles(&mut self) {
        std::mem::swap(&mut self.reserve_a, &mut self.reserve_b);
        std::mem::swap(&mut self.side_a, &mut self.side_b);
    }
}

impl ClearingSolver {
    pub fn new() -> Self {
        Self
    }

    /// Find a uniform clearing price for two opposing order sides against
    /// the pool, or the empty sentinel when no admissible batch exists.
    ///
    /// Both sides must be sorted ascending by limit price; an unsorted side
    /// is a caller error ([`ClearingError::Unsorted`]), checked here rather
    /// than trusted. Any cross-multiplication overflow aborts the whole
    /// solve with [`ClearingError::ArithmeticOverflow`].
    pub fn solve(
        &self,
        pool: &PoolState,
        side_a: &[Order],
        side_b: &[Order],
    ) -> Result<Solution, ClearingError> {
        if !is_sorted(side_a, false)? || !is_sorted(side_b, false)? {
            return Err(ClearingError::Unsorted);
        }
        if pool.reserve_a.is_zero() || pool.reserve_b.is_zero() {
            return Ok(Solution::empty());
        }

        let mut state = SearchState {
            reserve_a: pool.reserve_a,
            reserve_b: pool.reserve_b,
            side_a: side_a.to_vec(),
            side_b: side_b.to_vec(),
        };
        let mut just_swapped = false;
        // Every round prunes an order or is a single role exchange, and an
        // exchange is never answered by another exchange, so the round count
        // is bounded by twice the total order count plus the final round.
        let max_rounds = 2 * (side_a.len() + side_b.len()) + 2;

        for _ in 0..=max_rounds {
            let demand_a = sum_sell_amounts(&state.side_a)?;
            let supply_b = sum_sell_amounts(&state.side_b)?;
            if demand_a.is_zero() || supply_b.is_zero() {
                return Ok(Solution::empty());
            }

            // Both sides are non-empty here; keep the tail limits by value
            // so the working copies stay free to shrink.
            let (tail_a_limit, tail_b_limit) =
                match (state.side_a.last(), state.side_b.last()) {
                    (Some(a), Some(b)) => (a.limit_price(), b.limit_price()),
                    _ => return Ok(Solution::empty()),
                };

            // Orientation: the pricing formula assumes side A carries the
            // structural excess. A role exchange must not be answered by
            // another role exchange, or the search would oscillate.
            let implied_rate = Fraction::new(demand_a, supply_b);
            if implied_rate.cross_cmp(&tail_b_limit)? == Ordering::Less {
                if just_swapped {
                    debug!("orientation check fired twice in a row; no solution");
                    return Ok(Solution::empty());
                }
                debug!("exchanging side roles");
                state.exchange_roles();
                just_swapped = true;
                continue;
            }

            let candidate =
                candidate_price(state.reserve_a, state.reserve_b, demand_a, supply_b)?;
            if candidate.is_empty() {
                // Pool too shallow to quote a non-zero post-trade reserve.
                return Ok(Solution::empty());
            }

            if candidate.cross_cmp(&tail_a_limit)? == Ordering::Less {
                debug!(
                    "candidate price violates side A tail limit; pruning ({} left)",
                    state.side_a.len() - 1
                );
                state.side_a.pop();
                just_swapped = false;
                continue;
            }
            if candidate.invert().cross_cmp(&tail_b_limit)? == Ordering::Less {
                debug!(
                    "candidate price violates side B tail limit; pruning ({} left)",
                    state.side_b.len() - 1
                );
                state.side_b.pop();
                just_swapped = false;
                continue;
            }

            return Ok(Solution {
                clearing_price: candidate,
                admitted_side_a: state.side_a,
                admitted_side_b: state.side_b,
            });
        }

        // Unreachable with the restart bound above; kept as a safety net so
        // the solver is total.
        Ok(Solution::empty())
    }
}

/// Aggregate sell volume of a side, with overflow detection.
fn sum_sell_amounts(orders: &[Order]) -> Result<U256, ClearingError> {
    let mut total = U256::zero();
    for order in orders {
        total = total
            .checked_add(order.sell_amount)
            .ok_or(ClearingError::ArithmeticOverflow)?;
    }
    Ok(total)
}

/// Hypothetical post-trade reserves when all of `demand_a` and `supply_b`
/// trade through the pool at one price, as a `Fraction { new_reserve_b,
/// new_reserve_a }`. Returns the empty fraction when the post-trade reserve
/// collapses to zero.
fn candidate_price(
    reserve_a: U256,
    reserve_b: U256,
    demand_a: U256,
    supply_b: U256,
) -> Result<Fraction, ClearingError> {
    let overflow = || ClearingError::ArithmeticOverflow;
    let two = U256::from(2u8);

    let k = reserve_a.checked_mul(reserve_b).ok_or_else(overflow)?;
    let depth = reserve_b.checked_add(supply_b).ok_or_else(overflow)?;

    let p = k / depth.checked_mul(two).ok_or_else(overflow)?;
    let radicand = p
        .checked_mul(p)
        .ok_or_else(overflow)?
        .checked_add(k.checked_mul(demand_a).ok_or_else(overflow)? / depth)
        .ok_or_else(overflow)?;
    let new_reserve_a = p.checked_add(isqrt(radicand)).ok_or_else(overflow)?;
    if new_reserve_a.is_zero() {
        return Ok(Fraction::empty());
    }
    let new_reserve_b = k / new_reserve_a;

    Ok(Fraction::new(new_reserve_b, new_reserve_a))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::Address;

    fn eth() -> Address {
        Address::repeat_byte(0xaa)
    }

    fn dai() -> Address {
        Address::repeat_byte(0xbb)
    }

    /// Order selling `sell` of token A for at least `buy` of token B.
    fn order_a(sell: U256, buy: U256) -> Order {
        Order::new(sell, buy, eth(), dai(), Address::repeat_byte(0x01), 0)
    }

    /// Order selling `sell` of token B for at least `buy` of token A.
    fn order_b(sell: U256, buy: U256) -> Order {
        Order::new(sell, buy, dai(), eth(), Address::repeat_byte(0x02), 0)
    }

    fn e18(value: u64) -> U256 {
        // `value` scaled as hundredths: e18(90) == 0.9 * 10^18
        U256::from(value) * U256::exp10(16)
    }

    fn assert_admissible(solution: &Solution) {
        let price = solution.clearing_price;
        for order in &solution.admitted_side_a {
            assert_ne!(
                price.cross_cmp(&order.limit_price()).unwrap(),
                Ordering::Less,
                "side A order executes worse than its limit"
            );
        }
        for order in &solution.admitted_side_b {
            assert_ne!(
                price.invert().cross_cmp(&order.limit_price()).unwrap(),
                Ordering::Less,
                "side B order executes worse than its limit"
            );
        }
    }

    #[test]
    fn test_end_to_end_reference_batch() {
        let pool = PoolState::new(U256::exp10(19), U256::exp10(19));
        let side_a = vec![order_a(e18(100), e18(90))];
        let side_b = vec![order_b(e18(90), U256::from(901_110_000_000_000_000u64))];

        let solution = ClearingSolver::new().solve(&pool, &side_a, &side_b).unwrap();

        assert_eq!(solution.admitted_side_a, side_a);
        assert_eq!(solution.admitted_side_b, side_b);
        assert_eq!(
            solution.clearing_price,
            Fraction::new(
                U256::from(9_916_608_715_780_969_175u64),
                U256::from(10_084_092_542_732_199_005u64),
            )
        );
        assert_admissible(&solution);
    }

    #[test]
    fn test_empty_side_yields_empty_sentinel() {
        let pool = PoolState::new(U256::exp10(19), U256::exp10(19));
        let side_a = vec![order_a(e18(100), e18(90))];

        let solver = ClearingSolver::new();
        assert!(solver.solve(&pool, &side_a, &[]).unwrap().is_empty());
        assert!(solver.solve(&pool, &[], &side_a).unwrap().is_empty());
        assert!(solver.solve(&pool, &[], &[]).unwrap().is_empty());
    }

    #[test]
    fn test_determinism() {
        let pool = PoolState::new(U256::exp10(19), U256::exp10(19));
        let side_a = vec![order_a(e18(100), e18(80)), order_a(e18(50), e18(45))];
        let side_b = vec![order_b(e18(50), e18(50)), order_b(e18(30), e18(33))];

        let solver = ClearingSolver::new();
        let first = solver.solve(&pool, &side_a, &side_b).unwrap();
        let second = solver.solve(&pool, &side_a, &side_b).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_restrictive_tails_are_pruned() {
        let pool = PoolState::new(U256::exp10(19), U256::exp10(19));
        // Limits 0.8 then 0.9 on side A; 1.0 then 1.1 on side B.
        let side_a = vec![order_a(e18(100), e18(80)), order_a(e18(50), e18(45))];
        let side_b = vec![order_b(e18(50), e18(50)), order_b(e18(30), e18(33))];

        let solution = ClearingSolver::new().solve(&pool, &side_a, &side_b).unwrap();

        assert_eq!(solution.admitted_side_a, vec![side_a[0].clone()]);
        assert_eq!(solution.admitted_side_b, vec![side_b[0].clone()]);
        assert_eq!(
            solution.clearing_price,
            Fraction::new(
                U256::from(9_581_876_439_064_924_772u64),
                U256::from(10_436_369_184_672_849_976u64),
            )
        );
        assert_admissible(&solution);
    }

    #[test]
    fn test_caller_slices_are_untouched_by_pruning() {
        let pool = PoolState::new(U256::exp10(19), U256::exp10(19));
        let side_a = vec![order_a(e18(100), e18(80)), order_a(e18(50), e18(45))];
        let side_b = vec![order_b(e18(50), e18(50)), order_b(e18(30), e18(33))];
        let side_a_before = side_a.clone();
        let side_b_before = side_b.clone();

        let _ = ClearingSolver::new().solve(&pool, &side_a, &side_b).unwrap();

        assert_eq!(side_a, side_a_before);
        assert_eq!(side_b, side_b_before);
    }

    #[test]
    fn test_orientation_swap_matches_preswapped_inputs() {
        // A tiny side A against a large side B forces the role exchange.
        let pool = PoolState::new(U256::exp10(19), U256::exp10(19) / 2);
        let side_a = vec![order_a(e18(10), e18(5))];
        let side_b = vec![order_b(e18(100), e18(90))];

        let solver = ClearingSolver::new();
        let direct = solver.solve(&pool, &side_a, &side_b).unwrap();
        let preswapped = solver
            .solve(&pool.swapped(), &side_b, &side_a)
            .unwrap();

        assert_eq!(direct, preswapped);
        assert!(!direct.is_empty());
        assert_eq!(
            direct.clearing_price,
            Fraction::new(
                U256::from(8_615_472_627_943_222_184u64),
                U256::from(5_803_512_141_380_517_046u64),
            )
        );
        // After the exchange, side A of the solution sells token B.
        assert_eq!(direct.admitted_side_a, side_b);
        assert_eq!(direct.admitted_side_b, side_a);
        assert_admissible(&direct);
    }

    #[test]
    fn test_double_swap_request_yields_empty_sentinel() {
        // Both sides demand double the implied rate; the orientation check
        // would fire forever, so the solver must bail out instead.
        let pool = PoolState::new(U256::exp10(19), U256::exp10(19));
        let side_a = vec![order_a(e18(100), e18(200))];
        let side_b = vec![order_b(e18(100), e18(200))];

        let solution = ClearingSolver::new().solve(&pool, &side_a, &side_b).unwrap();
        assert!(solution.is_empty());
    }

    #[test]
    fn test_unsorted_side_is_rejected() {
        let pool = PoolState::new(U256::exp10(19), U256::exp10(19));
        // Limits 0.9 then 0.8: descending, so the ascending precondition fails.
        let side_a = vec![order_a(e18(100), e18(90)), order_a(e18(100), e18(80))];
        let side_b = vec![order_b(e18(90), e18(90))];

        assert_eq!(
            ClearingSolver::new().solve(&pool, &side_a, &side_b),
            Err(ClearingError::Unsorted)
        );
    }

    #[test]
    fn test_overflowing_volumes_abort_the_solve() {
        let pool = PoolState::new(U256::exp10(19), U256::exp10(19));
        // Two max-sized sell amounts make the aggregate sum overflow.
        let side_a = vec![order_a(U256::MAX, U256::one()), order_a(U256::MAX, U256::one())];
        let side_b = vec![order_b(e18(90), e18(90))];

        assert_eq!(
            ClearingSolver::new().solve(&pool, &side_a, &side_b),
            Err(ClearingError::ArithmeticOverflow)
        );
    }

    #[test]
    fn test_zero_reserve_pool_yields_empty_sentinel() {
        let pool = PoolState::new(U256::zero(), U256::exp10(19));
        let side_a = vec![order_a(e18(100), e18(90))];
        let side_b = vec![order_b(e18(90), e18(80))];

        let solution = ClearingSolver::new().solve(&pool, &side_a, &side_b).unwrap();
        assert!(solution.is_empty());
    }
}
