//! Signed limit orders and their signing digest.
//!
//! ## Digest layout
//!
//! The digest is keccak-256 over the domain separator followed by every order
//! field in declared order, each at a fixed width:
//!
//! | Field         | Width | Encoding        |
//! |---------------|-------|-----------------|
//! | domain        | 32    | raw             |
//! | `sell_amount` | 32    | big-endian      |
//! | `buy_amount`  | 32    | big-endian      |
//! | `sell_token`  | 20    | raw             |
//! | `buy_token`   | 20    | raw             |
//! | `owner`       | 20    | raw             |
//! | `valid_from`  | 8     | big-endian      |
//! | `valid_until` | 8     | big-endian      |
//! | `nonce`       | 1     | raw             |
//!
//! The owner signs this digest once; the settlement verifier recomputes it
//! byte-for-byte from the same field values on any platform.

use ethers::types::{Address, H256, U256};
use ethers::utils::keccak256;

use crate::error::ClearingError;
use crate::types::Fraction;

/// Number of bytes hashed for an order digest (domain separator included).
const DIGEST_PREIMAGE_LEN: usize = 32 + 32 + 32 + 20 + 20 + 20 + 8 + 8 + 1;

/// A fill-or-kill limit order: sell exactly `sell_amount` of `sell_token`
/// for at least `buy_amount` of `buy_token`.
///
/// Invariants: `sell_amount > 0` and `sell_token != buy_token`. The limit
/// price is the ratio `buy_amount / sell_amount` — the minimum acceptable
/// amount of buy token per unit of sell token. Orders are immutable once
/// signed; the solver only ever prunes its own private copies.
///
/// ## Example
///
/// ```
/// use batch_clearing::types::Order;
/// use ethers::types::{Address, U256};
///
/// let order = Order::new(
///     U256::exp10(18),                 // sell 1.0
///     U256::exp10(18) * 9 / 10,        // for at least 0.9
///     Address::repeat_byte(0xaa),
///     Address::repeat_byte(0xbb),
///     Address::repeat_byte(0x01),
///     7,
/// );
/// assert_eq!(order.limit_price().numerator, order.buy_amount);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Amount of `sell_token` the owner commits in full (fill-or-kill).
    pub sell_amount: U256,

    /// Minimum total amount of `buy_token` acceptable in return.
    pub buy_amount: U256,

    /// Token the owner is selling.
    pub sell_token: Address,

    /// Token the owner is buying.
    pub buy_token: Address,

    /// Account whose signature must cover the digest.
    pub owner: Address,

    /// Unix timestamp before which the order must not settle.
    pub valid_from: u64,

    /// Unix timestamp after which the order must not settle.
    /// Zero means "no expiry" (see DESIGN.md).
    pub valid_until: u64,

    /// Replay-protection counter, one byte on the wire.
    pub nonce: u8,
}

impl Order {
    /// Create an order with an unbounded validity window.
    pub fn new(
        sell_amount: U256,
        buy_amount: U256,
        sell_token: Address,
        buy_token: Address,
        owner: Address,
        nonce: u8,
    ) -> Self {
        Self {
            sell_amount,
            buy_amount,
            sell_token,
            buy_token,
            owner,
            valid_from: 0,
            valid_until: 0,
            nonce,
        }
    }

    /// The worst exchange rate the owner accepts, as buy token per sell token.
    pub fn limit_price(&self) -> Fraction {
        Fraction::new(self.buy_amount, self.sell_amount)
    }

    /// Check the validity window against `now`.
    ///
    /// A zero `valid_until` never expires.
    pub fn ensure_valid_at(&self, now: u64) -> Result<(), ClearingError> {
        if now < self.valid_from {
            return Err(ClearingError::OrderNotYetValid(self.valid_from));
        }
        if self.valid_until != 0 && now > self.valid_until {
            return Err(ClearingError::OrderExpired(self.valid_until));
        }
        Ok(())
    }

    /// The deterministic signing digest binding `domain_separator` and every
    /// field of this order.
    pub fn digest(&self, domain_separator: H256) -> H256 {
        let mut preimage = [0u8; DIGEST_PREIMAGE_LEN];
        let mut at = 0;

        preimage[at..at + 32].copy_from_slice(domain_separator.as_bytes());
        at += 32;
        self.sell_amount.to_big_endian(&mut preimage[at..at + 32]);
        at += 32;
        self.buy_amount.to_big_endian(&mut preimage[at..at + 32]);
        at += 32;
        preimage[at..at + 20].copy_from_slice(self.sell_token.as_bytes());
        at += 20;
        preimage[at..at + 20].copy_from_slice(self.buy_token.as_bytes());
        at += 20;
        preimage[at..at + 20].copy_from_slice(self.owner.as_bytes());
        at += 20;
        preimage[at..at + 8].copy_from_slice(&self.valid_from.to_be_bytes());
        at += 8;
        preimage[at..at + 8].copy_from_slice(&self.valid_until.to_be_bytes());
        at += 8;
        preimage[at] = self.nonce;

        H256::from(keccak256(preimage))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
