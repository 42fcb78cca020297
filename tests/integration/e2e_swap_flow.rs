//! End-to-end swap tests.

use passkey_wallet::domain::tx_record::{TxKind, TxStatus};
use passkey_wallet::infra::simulated::SimulatedWallet;

use super::{OWNER, TestEnv};

#[test]
fn test_quote_uses_stored_prices() {
    let env = TestEnv::new();

    let quote = env.session.quote_swap("SOL", "usdc", "1").unwrap();

    assert_eq!(quote.receive_amount, 150.0);
    assert_eq!(quote.rate_display(), "1 SOL ≈ 150.0000 USDC");
    assert!(env.session.quote_swap("sol", "eth", "1").is_err());
}

#[tokio::test]
async fn test_swap_moves_both_balances() {
    let env = TestEnv::new();
    let scope = env.session.scope().unwrap();

    let receipt = env.session.swap("sol", "usdc", "1").await.unwrap();

    let tokens = env.session.tokens().get_all(Some(&scope));
    assert_eq!(receipt.tokens, tokens);
    assert!((tokens[0].balance - 0.24).abs() < 1e-9);
    assert_eq!(tokens[1].balance, 150.0);
    assert_eq!(tokens[2].balance, 500_000.0);

    let record = receipt.record.unwrap();
    assert_eq!(record.kind, TxKind::Swapped);
    assert_eq!(record.amount, "1");
    assert_eq!(record.token, "SOL");
    assert_eq!(record.status, TxStatus::Success);
    assert!(record.signature.is_some());
    assert_eq!(record.description, "Swapped 1 SOL for 150.000000 USDC");
}

#[tokio::test]
async fn test_swap_insufficient_balance_writes_nothing() {
    let env = TestEnv::new();
    let scope = env.session.scope().unwrap();

    assert!(env.session.swap("usdc", "sol", "10").await.is_err());

    assert!(!env.session.tokens().is_persisted(&scope));
    assert!(env.session.history().get_all(Some(&scope)).is_empty());
}

#[tokio::test]
async fn test_swap_same_token_rejected() {
    let env = TestEnv::new();
    assert!(env.session.swap("sol", "SOL", "0.1").await.is_err());
}

#[tokio::test]
async fn test_swap_without_message_signing_is_simulated() {
    let env = TestEnv::with_wallet(SimulatedWallet::connected(OWNER).without_message_signing());

    let receipt = env.session.swap("bonk", "usdc", "100000").await.unwrap();

    let record = receipt.record.unwrap();
    assert_eq!(record.status, TxStatus::Simulated);
    assert_eq!(record.signature, None);
    assert!((receipt.tokens[1].balance - 1.2).abs() < 1e-9);
}

#[tokio::test]
async fn test_rejected_swap_writes_nothing() {
    let env = TestEnv::new();
    let scope = env.session.scope().unwrap();
    env.wallet.set_reject_signing(true);

    assert!(env.session.swap("sol", "usdc", "0.1").await.is_err());

    assert!(!env.session.tokens().is_persisted(&scope));
    assert!(env.session.history().get_all(Some(&scope)).is_empty());
}
