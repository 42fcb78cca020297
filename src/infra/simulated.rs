//! In-memory stand-ins for the external services, used by the command-line
//! demo and tests.

use std::collections::HashMap;
use std::sync::{
    Mutex,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use async_trait::async_trait;
use color_eyre::eyre::{Result, bail, eyre};
use tracing::info;

use super::collaborators::{
    Asset, AssetIndexer, ConnectOptions, FeeMode, LedgerClient, TransferRequest, WalletConnector, lamports_to_sol,
    sol_to_lamports,
};

/// Wallet that "signs" by hashing into a counter-based signature.
pub struct SimulatedWallet {
    address: String,
    connected: AtomicBool,
    counter: AtomicU64,
    rejection: Mutex<Option<String>>,
    message_signing: bool,
    last_connect: Mutex<Option<ConnectOptions>>,
    last_transfer: Mutex<Option<(TransferRequest, FeeMode)>>,
}

impl SimulatedWallet {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            connected: AtomicBool::new(false),
            counter: AtomicU64::new(0),
            rejection: Mutex::new(None),
            message_signing: true,
            last_connect: Mutex::new(None),
            last_transfer: Mutex::new(None),
        }
    }

    /// A wallet already connected.
    pub fn connected(address: impl Into<String>) -> Self {
        let wallet = Self::new(address);
        wallet.connected.store(true, Ordering::SeqCst);
        wallet
    }

    /// Disable message signing, as some wallets do.
    pub fn without_message_signing(mut self) -> Self {
        self.message_signing = false;
        self
    }

    /// Make every signing request fail, as a user cancelling the passkey prompt would.
    pub fn set_reject_signing(&self, reject: bool) {
        self.set_rejection(reject.then(|| "User rejected the request".to_string()));
    }

    /// Make every signing request fail with `message`, e.g. a program error
    /// returned by the network.
    pub fn set_reject_with(&self, message: impl Into<String>) {
        self.set_rejection(Some(message.into()));
    }

    fn set_rejection(&self, rejection: Option<String>) {
        match self.rejection.lock() {
            Ok(mut current) => *current = rejection,
            Err(poisoned) => *poisoned.into_inner() = rejection,
        }
    }

    /// Options passed to the last successful `connect`.
    pub fn last_connect(&self) -> Option<ConnectOptions> {
        self.last_connect.lock().ok().and_then(|c| c.clone())
    }

    /// The last transfer submitted and its fee mode.
    pub fn last_transfer(&self) -> Option<(TransferRequest, FeeMode)> {
        self.last_transfer.lock().ok().and_then(|t| t.clone())
    }

    fn next_signature(&self, tag: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let prefix: String = self.address.chars().take(8).collect();
        format!("sim{}{:06}{}", tag, n, prefix)
    }

    fn check_signing(&self) -> Result<()> {
        if !self.is_connected() {
            bail!("Wallet not connected");
        }
        let rejection = self
            .rejection
            .lock()
            .map_err(|_| eyre!("wallet lock poisoned"))?;
        if let Some(message) = rejection.as_ref() {
            bail!("{}", message);
        }
        Ok(())
    }
}

#[async_trait]
impl WalletConnector for SimulatedWallet {
    async fn connect(&self, options: &ConnectOptions) -> Result<String> {
        *self
            .last_connect
            .lock()
            .map_err(|_| eyre!("wallet lock poisoned"))? = Some(options.clone());
        self.connected.store(true, Ordering::SeqCst);
        info!(
            "Connected simulated wallet {} via {} for {}",
            self.address, options.portal_url, options.app_name
        );
        Ok(self.address.clone())
    }

    async fn disconnect(&self) -> Result<()> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    fn owner_address(&self) -> Option<String> {
        self.is_connected().then(|| self.address.clone())
    }

    fn can_sign_messages(&self) -> bool {
        self.message_signing
    }

    async fn sign_message(&self, _message: &str) -> Result<String> {
        if !self.message_signing {
            bail!("signMessage not supported by this wallet");
        }
        // Approval is asynchronous in a real wallet.
        tokio::task::yield_now().await;
        self.check_signing()?;
        Ok(self.next_signature("msg"))
    }

    async fn sign_and_send(&self, request: TransferRequest, fee_mode: FeeMode) -> Result<String> {
        tokio::task::yield_now().await;
        self.check_signing()?;
        let signature = self.next_signature("tx");
        info!(
            "Simulated transfer of {} lamports to {} ({:?} fees): {}",
            request.lamports, request.to, fee_mode, signature
        );
        *self
            .last_transfer
            .lock()
            .map_err(|_| eyre!("wallet lock poisoned"))? = Some((request, fee_mode));
        Ok(signature)
    }
}

/// Ledger holding balances in memory; airdrops credit immediately.
#[derive(Default)]
pub struct SimulatedLedger {
    balances: Mutex<HashMap<String, u64>>,
    airdrop_limit_reached: AtomicBool,
}

impl SimulatedLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_balance(&self, address: &str, sol: f64) -> Result<()> {
        let mut balances = self.balances.lock().map_err(|_| eyre!("ledger lock poisoned"))?;
        balances.insert(address.to_string(), sol_to_lamports(sol));
        Ok(())
    }

    /// Make airdrops fail, as a rate-limited faucet does.
    pub fn set_airdrop_limited(&self, limited: bool) {
        self.airdrop_limit_reached.store(limited, Ordering::SeqCst);
    }
}

#[async_trait]
impl LedgerClient for SimulatedLedger {
    async fn get_balance(&self, address: &str) -> Result<f64> {
        let balances = self.balances.lock().map_err(|_| eyre!("ledger lock poisoned"))?;
        Ok(lamports_to_sol(balances.get(address).copied().unwrap_or(0)))
    }

    async fn request_airdrop(&self, address: &str, sol: f64) -> Result<String> {
        if self.airdrop_limit_reached.load(Ordering::SeqCst) {
            bail!("429 Too Many Requests: airdrop limit reached");
        }
        let mut balances = self.balances.lock().map_err(|_| eyre!("ledger lock poisoned"))?;
        let entry = balances.entry(address.to_string()).or_insert(0);
        *entry += sol_to_lamports(sol);
        Ok(format!("airdrop{}", *entry))
    }

    async fn confirm(&self, _signature: &str) -> Result<()> {
        Ok(())
    }
}

/// Indexer serving a fixed asset list per owner.
#[derive(Default)]
pub struct SimulatedIndexer {
    assets: HashMap<String, Vec<Asset>>,
}

impl SimulatedIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_assets(mut self, owner: &str, assets: Vec<Asset>) -> Self {
        self.assets.insert(owner.to_string(), assets);
        self
    }
}

#[async_trait]
impl AssetIndexer for SimulatedIndexer {
    async fn assets_by_owner(&self, owner: &str) -> Result<Vec<Asset>> {
        Ok(self.assets.get(owner).cloned().unwrap_or_default())
    }
}
