//! Interfaces of the external services the wallet relies on.
//!
//! Passkey authentication, signing and fee sponsorship live behind
//! [`WalletConnector`]; network reads and the test faucet behind
//! [`LedgerClient`]; NFT lookups behind [`AssetIndexer`].

use async_trait::async_trait;
use color_eyre::eyre::Result;
use serde::{Deserialize, Serialize};

/// Lamports per SOL.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Who pays the network fee for a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeMode {
    /// Sponsored by the paymaster.
    #[default]
    Paymaster,
    /// Paid from the wallet's own SOL.
    User,
}

/// What the passkey portal is told about the app asking to connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    pub portal_url: String,
    pub app_name: String,
    pub app_icon: String,
}

/// A native transfer to submit through the wallet.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
    pub lamports: u64,
    pub compute_unit_limit: u32,
    pub cluster: String,
    /// Fee sponsor endpoint; set only for [`FeeMode::Paymaster`].
    pub paymaster_url: Option<String>,
}

/// An NFT held by an owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub image: String,
    pub collection: Option<String>,
}

#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Authenticate through the portal; returns the smart-wallet address.
    async fn connect(&self, options: &ConnectOptions) -> Result<String>;

    async fn disconnect(&self) -> Result<()>;

    fn is_connected(&self) -> bool;

    /// Smart-wallet address of the connected owner.
    fn owner_address(&self) -> Option<String>;

    /// Whether [`WalletConnector::sign_message`] is available.
    fn can_sign_messages(&self) -> bool {
        true
    }

    async fn sign_message(&self, message: &str) -> Result<String>;

    /// Sign and submit; returns the transaction signature.
    async fn sign_and_send(&self, request: TransferRequest, fee_mode: FeeMode) -> Result<String>;
}

#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Balance in SOL.
    async fn get_balance(&self, address: &str) -> Result<f64>;

    async fn request_airdrop(&self, address: &str, sol: f64) -> Result<String>;

    async fn confirm(&self, signature: &str) -> Result<()>;
}

#[async_trait]
pub trait AssetIndexer: Send + Sync {
    async fn assets_by_owner(&self, owner: &str) -> Result<Vec<Asset>>;
}

/// Convert SOL to lamports, rounding to the nearest lamport.
pub fn sol_to_lamports(sol: f64) -> u64 {
    (sol * LAMPORTS_PER_SOL as f64).round() as u64
}

pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / LAMPORTS_PER_SOL as f64
}
