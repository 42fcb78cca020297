//! Cross-view synchronisation and durability tests.
//!
//! Views subscribe to store events instead of polling; data must also
//! survive reopening the LMDB environment.

use tokio::sync::broadcast::error::TryRecvError;

use passkey_wallet::domain::scope::Scope;
use passkey_wallet::domain::token::default_tokens;
use passkey_wallet::domain::tx_record::{TransactionDraft, TxKind, TxStatus};
use passkey_wallet::infra::collaborators::FeeMode;
use passkey_wallet::infra::events::StoreEvent;
use passkey_wallet::infra::simulated::SimulatedWallet;
use passkey_wallet::infra::store::Store;

use super::{OWNER, RECIPIENT, TestEnv};

#[tokio::test]
async fn test_swap_is_observed_by_subscriber() {
    let env = TestEnv::new();
    let mut transfer_view = env.session.subscribe();

    env.session.swap("sol", "usdc", "0.5").await.unwrap();

    // Debit and credit arrive together, then the history entry.
    match transfer_view.recv().await.unwrap() {
        StoreEvent::TokensUpdated { tokens, .. } => {
            assert!((tokens[0].balance - 0.74).abs() < 1e-9);
            assert!((tokens[1].balance - 75.0).abs() < 1e-9);
        }
        other => panic!("unexpected event {other:?}"),
    }

    match transfer_view.recv().await.unwrap() {
        StoreEvent::TransactionAdded { scope, record } => {
            assert_eq!(scope.address(), OWNER);
            assert_eq!(record.kind, TxKind::Swapped);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!(matches!(transfer_view.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_reset_and_clear_are_published() {
    let env = TestEnv::new();
    let scope = env.session.scope().unwrap();
    let mut rx = env.session.subscribe();

    env.session.tokens().reset(Some(&scope));
    env.session.history().clear(Some(&scope));

    assert_eq!(
        rx.recv().await.unwrap(),
        StoreEvent::TokensReset {
            scope: scope.clone()
        }
    );
    assert_eq!(rx.recv().await.unwrap(), StoreEvent::HistoryCleared { scope });
}

#[test]
fn test_no_scope_publishes_nothing() {
    let env = TestEnv::new();
    let mut rx = env.session.subscribe();

    env.session.tokens().update_balance(None, "sol", 1.0);
    env.session.tokens().reset(None);
    env.session.history().clear(None);

    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_data_survives_reopen() {
    let env = TestEnv::new();
    env.session
        .transfer(RECIPIENT, "0.04", FeeMode::Paymaster)
        .await
        .unwrap();
    let tokens = env.session.balances();
    let history = env.session.history().get_all(env.session.scope().as_ref());

    let TestEnv {
        session,
        store,
        wallet,
        ledger,
        temp_dir,
    } = env;
    drop(session);
    drop(store);
    drop(wallet);
    drop(ledger);

    let store = Store::with_path(temp_dir.path().to_path_buf()).unwrap();
    let reopened = TestEnv::with_store(store, temp_dir, SimulatedWallet::connected(OWNER));

    assert_eq!(reopened.session.balances(), tokens);
    assert_eq!(
        reopened
            .session
            .history()
            .get_all(reopened.session.scope().as_ref()),
        history
    );
}

#[test]
fn test_reset_matches_fresh_scope() {
    let env = TestEnv::new();
    let used = Scope::parse(OWNER).unwrap();
    let fresh = Scope::parse(RECIPIENT).unwrap();
    let tokens = env.session.tokens();

    tokens.update_balance(Some(&used), "sol", 5.0);
    tokens.update_balance(Some(&used), "bonk", 7.0);
    tokens.reset(Some(&used));

    assert_eq!(tokens.get_all(Some(&used)), tokens.get_all(Some(&fresh)));
    assert_eq!(tokens.get_all(Some(&used)), default_tokens());
}

#[tokio::test]
async fn test_concurrent_transfer_and_swap_both_land() {
    let env = TestEnv::new();
    let scope = env.session.scope().unwrap();

    // Both flows read 1.24 SOL before either one writes.
    let (transfer, swap) = tokio::join!(
        env.session.transfer(RECIPIENT, "0.1", FeeMode::Paymaster),
        env.session.swap("sol", "usdc", "0.5"),
    );
    let transfer = transfer.unwrap();
    let swap = swap.unwrap();

    let tokens = env.session.tokens().get_all(Some(&scope));
    assert!((tokens[0].balance - 0.64).abs() < 1e-9);
    assert!((tokens[1].balance - 75.0).abs() < 1e-9);
    assert_eq!(env.session.history().get_all(Some(&scope)).len(), 2);

    // Whichever flow wrote last reports the combined result.
    let last_sol = transfer.new_balance.min(swap.tokens[0].balance);
    assert!((last_sol - 0.64).abs() < 1e-9);
}

#[test]
fn test_sequential_writers_both_land() {
    // Two views holding their own handles over the same store.
    let env = TestEnv::new();
    let scope = env.session.scope().unwrap();
    let swap_view = env.session.tokens().clone();
    let transfer_view = env.session.tokens().clone();

    swap_view.update_balance(Some(&scope), "usdc", 10.0);
    transfer_view.update_balance(Some(&scope), "sol", 0.5);

    // Both land because each update re-reads the stored set.
    let tokens = env.session.tokens().get_all(Some(&scope));
    assert_eq!(tokens[0].balance, 0.5);
    assert_eq!(tokens[1].balance, 10.0);

    let history = env.session.history();
    history.add(
        Some(&scope),
        TransactionDraft::new(TxKind::Sent, "1", "SOL", "a", TxStatus::Failed),
    );
    assert_eq!(history.get_all(Some(&scope))[0].status, TxStatus::Failed);
}
