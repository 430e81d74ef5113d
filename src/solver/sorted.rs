//! Sortedness precondition over limit prices.

use std::cmp::Ordering;

use crate::error::ClearingError;
use crate::types::Order;

/// Check that `orders` is monotonic in limit price.
///
/// Ascending when `descending` is false, descending otherwise; duplicate
/// limit prices count as in order either way. Empty and singleton lists are
/// vacuously sorted in both directions.
///
/// A comparison whose cross products exceed 256 bits fails with
/// [`ClearingError::ArithmeticOverflow`] instead of returning `false`:
/// overflow is a louder failure mode than "unsorted" and callers must not
/// conflate the two.
pub fn is_sorted(orders: &[Order], descending: bool) -> Result<bool, ClearingError> {
    for pair in orders.windows(2) {
        let ordering = pair[0].limit_price().cross_cmp(&pair[1].limit_price())?;
        let out_of_order = if descending {
            ordering == Ordering::Less
        } else {
            ordering == Ordering::Greater
        };
        if out_of_order {
            return Ok(false);
        }
    }
    Ok(true)
}

// ============================================================================
// Unit Tests
// ============================================================================
