//! Canonical binary codec for signed order records.
//!
//! ## Wire layout
//!
//! A side travels as the concatenation of fixed-width records with no
//! separators, so offsets are knowable without parsing:
//!
//! | Offset | Width | Field         |
//! |--------|-------|---------------|
//! | 0      | 32    | `sell_amount` (big-endian) |
//! | 32     | 32    | `buy_amount` (big-endian)  |
//! | 64     | 20    | `sell_token`  |
//! | 84     | 20    | `buy_token`   |
//! | 104    | 20    | `owner`       |
//! | 124    | 1     | `nonce`       |
//! | 125    | 1     | `v` (recovery id) |
//! | 126    | 32    | `r` (big-endian)  |
//! | 158    | 32    | `s` (big-endian)  |
//!
//! The record carries no validity window; decoded orders get an unbounded
//! window and the submission channel enforces timing out of band.
//!
//! Decoding re-derives each order's digest and recovers the signer from
//! `(digest, signature)`; a record whose recovered signer differs from the
//! claimed owner is rejected outright.

use ethers::types::{Address, RecoveryMessage, Signature, H256, U256};

use crate::error::ClearingError;
use crate::types::{Order, OrderSide};

/// Width of one encoded order record in bytes.
pub const RECORD_WIDTH: usize = 32 + 32 + 20 + 20 + 20 + 1 + 1 + 32 + 32;

/// Serialize an order and its signature into one fixed-width record.
pub fn encode(order: &Order, signature: &Signature) -> [u8; RECORD_WIDTH] {
    let mut record = [0u8; RECORD_WIDTH];

    order.sell_amount.to_big_endian(&mut record[0..32]);
    order.buy_amount.to_big_endian(&mut record[32..64]);
    record[64..84].copy_from_slice(order.sell_token.as_bytes());
    record[84..104].copy_from_slice(order.buy_token.as_bytes());
    record[104..124].copy_from_slice(order.owner.as_bytes());
    record[124] = order.nonce;
    record[125] = signature.v as u8;
    signature.r.to_big_endian(&mut record[126..158]);
    signature.s.to_big_endian(&mut record[158..190]);

    record
}

/// Split `buffer` into records, verify every signature, and return the
/// decoded side in wire order.
///
/// Fails with [`ClearingError::MalformedEncoding`] when the buffer length is
/// not an exact multiple of [`RECORD_WIDTH`] or a record carries a zero sell
/// amount, and with [`ClearingError::InvalidSignature`] when a record's
/// recovered signer is not its claimed owner.
pub fn decode_all(buffer: &[u8], domain_separator: H256) -> Result<OrderSide, ClearingError> {
    if buffer.len() % RECORD_WIDTH != 0 {
        return Err(ClearingError::MalformedEncoding(format!(
            "buffer length {} is not a multiple of the record width",
            buffer.len()
        )));
    }

    let mut orders = Vec::with_capacity(buffer.len() / RECORD_WIDTH);
    for (index, record) in buffer.chunks_exact(RECORD_WIDTH).enumerate() {
        let order = decode_record(record, index)?;

        let signature = Signature {
            r: U256::from_big_endian(&record[126..158]),
            s: U256::from_big_endian(&record[158..190]),
            v: u64::from(record[125]),
        };
        let digest = order.digest(domain_separator);
        let recovered = signature
            .recover(RecoveryMessage::Hash(digest))
            .map_err(|_| ClearingError::InvalidSignature(order.owner))?;
        if recovered != order.owner {
            return Err(ClearingError::InvalidSignature(order.owner));
        }

        orders.push(order);
    }
    Ok(orders)
}

fn decode_record(record: &[u8], index: usize) -> Result<Order, ClearingError> {
    let sell_amount = U256::from_big_endian(&record[0..32]);
    if sell_amount.is_zero() {
        return Err(ClearingError::MalformedEncoding(format!(
            "record {index} has a zero sell amount"
        )));
    }

    Ok(Order::new(
        sell_amount,
        U256::from_big_endian(&record[32..64]),
        Address::from_slice(&record[64..84]),
        Address::from_slice(&record[84..104]),
        Address::from_slice(&record[104..124]),
        record[124],
    ))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::signers::{LocalWallet, Signer};

    const DOMAIN: H256 = H256::repeat_byte(0x11);

    fn wallet() -> LocalWallet {
        // Throwaway key, deterministic across test runs.
        "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318"
            .parse()
            .unwrap()
    }

    fn signed_order(wallet: &LocalWallet, nonce: u8) -> (Order, Signature) {
        let order = Order::new(
            U256::exp10(18),
            U256::exp10(18) * 9 / 10,
            Address::repeat_byte(0xaa),
            Address::repeat_byte(0xbb),
            wallet.address(),
            nonce,
        );
        let signature = wallet.sign_hash(order.digest(DOMAIN)).unwrap();
        (order, signature)
    }

    #[test]
    fn test_roundtrip_single_record() {
        let wallet = wallet();
        let (order, signature) = signed_order(&wallet, 7);

        let record = encode(&order, &signature);
        assert_eq!(record.len(), RECORD_WIDTH);

        let decoded = decode_all(&record, DOMAIN).unwrap();
        assert_eq!(decoded, vec![order]);
    }

    #[test]
    fn test_roundtrip_concatenated_records() {
        let wallet = wallet();
        let mut buffer = Vec::new();
        let mut expected = Vec::new();
        for nonce in 0..3u8 {
            let (order, signature) = signed_order(&wallet, nonce);
            buffer.extend_from_slice(&encode(&order, &signature));
            expected.push(order);
        }

        assert_eq!(decode_all(&buffer, DOMAIN).unwrap(), expected);
    }

    #[test]
    fn test_empty_buffer_decodes_to_empty_side() {
        assert_eq!(decode_all(&[], DOMAIN).unwrap(), Vec::new());
    }

    #[test]
    fn test_ragged_length_is_malformed() {
        let wallet = wallet();
        let (order, signature) = signed_order(&wallet, 1);
        let mut buffer = encode(&order, &signature).to_vec();
        buffer.pop();

        assert!(matches!(
            decode_all(&buffer, DOMAIN),
            Err(ClearingError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn test_zero_sell_amount_is_malformed() {
        let wallet = wallet();
        let (mut order, _) = signed_order(&wallet, 1);
        order.sell_amount = U256::zero();
        let signature = wallet.sign_hash(order.digest(DOMAIN)).unwrap();
        let buffer = encode(&order, &signature);

        assert!(matches!(
            decode_all(&buffer, DOMAIN),
            Err(ClearingError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn test_forged_owner_is_rejected() {
        let wallet = wallet();
        let (mut order, _) = signed_order(&wallet, 1);
        // Claim someone else's address but keep the real signature.
        let signature = wallet.sign_hash(order.digest(DOMAIN)).unwrap();
        order.owner = Address::repeat_byte(0x99);
        let buffer = encode(&order, &signature);

        assert_eq!(
            decode_all(&buffer, DOMAIN),
            Err(ClearingError::InvalidSignature(Address::repeat_byte(0x99)))
        );
    }

    #[test]
    fn test_tampered_amount_is_rejected() {
        let wallet = wallet();
        let (order, signature) = signed_order(&wallet, 1);
        let mut buffer = encode(&order, &signature).to_vec();
        // Flip the low byte of buy_amount after signing.
        buffer[63] ^= 0x01;

        assert!(matches!(
            decode_all(&buffer, DOMAIN),
            Err(ClearingError::InvalidSignature(_))
        ));
    }

    #[test]
    fn test_wrong_domain_separator_is_rejected() {
        let wallet = wallet();
        let (order, signature) = signed_order(&wallet, 1);
        let buffer = encode(&order, &signature);

        assert!(matches!(
            decode_all(&buffer, H256::repeat_byte(0x22)),
            Err(ClearingError::InvalidSignature(_))
        ));
    }
}
