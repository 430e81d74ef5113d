//! Batch Clearing - Binary Entry Point
//!
//! Walks the reference batch through the full pipeline: sign two opposing
//! orders, encode them, clear against a pool, and print the event payload.

use batch_clearing::{BatchSettler, ClearingSolver, Order, PoolState};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, H256, U256};

fn main() {
    env_logger::init();

    println!("===========================================");
    println!("  Batch Clearing - Uniform Price Solver");
    println!("===========================================");
    println!();

    let domain = H256::repeat_byte(0x11);
    let token_a = Address::repeat_byte(0xaa);
    let token_b = Address::repeat_byte(0xbb);

    // Throwaway demo keys, one per order owner.
    let alice: LocalWallet = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318"
        .parse()
        .expect("static demo key");
    let bob: LocalWallet = "6c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318"
        .parse()
        .expect("static demo key");

    // Side A sells 1.0 of token A for at least 0.9 of token B;
    // side B sells 0.9 of token B for at least 0.90111 of token A.
    let order_a = Order::new(
        U256::exp10(18),
        U256::exp10(18) * 9 / 10,
        token_a,
        token_b,
        alice.address(),
        0,
    );
    let order_b = Order::new(
        U256::exp10(18) * 9 / 10,
        U256::from(901_110_000_000_000_000u64),
        token_b,
        token_a,
        bob.address(),
        0,
    );

    println!("Signing and encoding the batch...");
    let sig_a = alice
        .sign_hash(order_a.digest(domain))
        .expect("demo signing cannot fail");
    let sig_b = bob
        .sign_hash(order_b.digest(domain))
        .expect("demo signing cannot fail");
    let encoded_a = batch_clearing::encode(&order_a, &sig_a);
    let encoded_b = batch_clearing::encode(&order_b, &sig_b);
    println!("  side A record: 0x{}...", &hex::encode(encoded_a)[..32]);
    println!("  side B record: 0x{}...", &hex::encode(encoded_b)[..32]);
    println!();

    // Pool with 10.0 of each asset.
    let pool = PoolState::new(U256::exp10(19), U256::exp10(19));
    println!(
        "Clearing against pool reserves ({}, {})...",
        pool.reserve_a, pool.reserve_b
    );

    let settler = BatchSettler::new(domain);
    match settler.clear(&pool, &encoded_a, &encoded_b, 0) {
        Ok(solution) if solution.is_empty() => {
            println!("No clearing solution for this batch.");
        }
        Ok(solution) => {
            println!("Solution found:");
            println!(
                "  clearing price: {} / {}",
                solution.clearing_price.numerator, solution.clearing_price.denominator
            );
            println!(
                "  admitted orders: {} on side A, {} on side B",
                solution.admitted_side_a.len(),
                solution.admitted_side_b.len()
            );

            // The solver is pure; a second run must agree bit-for-bit.
            let side_a = vec![order_a];
            let side_b = vec![order_b];
            let recheck = ClearingSolver::new()
                .solve(&pool, &side_a, &side_b)
                .expect("validated inputs");
            println!(
                "  deterministic recheck: {}",
                if recheck == solution { "ok" } else { "MISMATCH" }
            );
        }
        Err(err) => {
            println!("Batch rejected: {err}");
        }
    }
}
