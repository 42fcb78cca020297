//! Integration tests for passkey-wallet.
//!
//! Each test opens its own LMDB environment in a temporary directory and
//! drives the stores through a `WalletSession` with simulated collaborators.

mod e2e_history;
mod e2e_store_sync;
mod e2e_swap_flow;

use std::sync::Arc;

use tempfile::TempDir;

use passkey_wallet::config::Config;
use passkey_wallet::domain::wallet::WalletSession;
use passkey_wallet::infra::simulated::{SimulatedIndexer, SimulatedLedger, SimulatedWallet};
use passkey_wallet::infra::store::Store;

pub const OWNER: &str = "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";
pub const RECIPIENT: &str = "HN7cABqLq46Es1jh92dQQisAq662SmxELLLsHHe4YWrH";

/// Test environment around one wallet session.
pub struct TestEnv {
    pub session: WalletSession,
    pub store: Store,
    pub wallet: Arc<SimulatedWallet>,
    pub ledger: Arc<SimulatedLedger>,
    /// Keeps the LMDB directory alive for the test's duration.
    pub temp_dir: TempDir,
}

impl TestEnv {
    /// Session for a connected owner on devnet.
    pub fn new() -> Self {
        Self::with_wallet(SimulatedWallet::connected(OWNER))
    }

    pub fn with_wallet(wallet: SimulatedWallet) -> Self {
        let (store, temp_dir) = create_temp_store();
        Self::with_store(store, temp_dir, wallet)
    }

    /// Session over an existing store, e.g. to reopen after a restart.
    pub fn with_store(store: Store, temp_dir: TempDir, wallet: SimulatedWallet) -> Self {
        let wallet = Arc::new(wallet);
        let ledger = Arc::new(SimulatedLedger::new());
        let session = WalletSession::new(
            Config::devnet(),
            store.clone(),
            wallet.clone(),
            ledger.clone(),
            Arc::new(SimulatedIndexer::new()),
        );
        Self {
            session,
            store,
            wallet,
            ledger,
            temp_dir,
        }
    }
}

/// Create a temporary store for testing.
pub fn create_temp_store() -> (Store, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let store = Store::with_path(temp_dir.path().to_path_buf()).expect("Failed to create store");
    (store, temp_dir)
}
