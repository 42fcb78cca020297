//! End-to-end transaction history tests.
//!
//! Covers the capped, newest-first log as written by the wallet flows and
//! directly through the store.

use passkey_wallet::domain::scope::Scope;
use passkey_wallet::domain::tx_record::{
    MAX_HISTORY, TransactionDraft, TxKind, TxStatus, is_well_formed_id,
};
use passkey_wallet::infra::collaborators::FeeMode;

use super::{OWNER, RECIPIENT, TestEnv};

fn received(amount: &str) -> TransactionDraft {
    TransactionDraft::new(
        TxKind::Received,
        amount,
        "USDC",
        format!("Received {amount} USDC"),
        TxStatus::Simulated,
    )
}

#[test]
fn test_history_starts_empty() {
    let env = TestEnv::new();
    let scope = env.session.scope();

    assert!(env.session.history().get_all(scope.as_ref()).is_empty());
}

#[test]
fn test_history_capped_after_51_additions() {
    let env = TestEnv::new();
    let scope = env.session.scope().unwrap();

    let mut records = Vec::new();
    for i in 1..=51 {
        records.push(
            env.session
                .history()
                .add(Some(&scope), received(&i.to_string()))
                .unwrap(),
        );
    }

    let history = env.session.history().get_all(Some(&scope));
    assert_eq!(history.len(), MAX_HISTORY);
    assert_eq!(history[0], records[50]);
    // The very first addition fell off the end.
    assert!(history.iter().all(|r| r.id != records[0].id));
    assert!(history.windows(2).all(|w| w[0].date >= w[1].date));
    assert!(history.iter().all(|r| is_well_formed_id(&r.id)));
}

#[test]
fn test_clear_history_only_affects_own_scope() {
    let env = TestEnv::new();
    let owner = Scope::parse(OWNER).unwrap();
    let other = Scope::parse(RECIPIENT).unwrap();
    let history = env.session.history();

    history.add(Some(&owner), received("1"));
    history.add(Some(&other), received("2"));

    history.clear(Some(&owner));

    assert!(history.get_all(Some(&owner)).is_empty());
    assert_eq!(history.get_all(Some(&other)).len(), 1);
}

#[tokio::test]
async fn test_flows_write_history_newest_first() {
    let env = TestEnv::new();
    let scope = env.session.scope().unwrap();

    env.session
        .transfer(RECIPIENT, "0.1", FeeMode::Paymaster)
        .await
        .unwrap();
    env.session.swap("sol", "usdc", "0.5").await.unwrap();

    let history = env.session.history().get_all(Some(&scope));
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].kind, TxKind::Swapped);
    assert_eq!(history[1].kind, TxKind::Sent);
    assert_eq!(history[1].description, "Sent SOL to HN7c...YWrH");
}
