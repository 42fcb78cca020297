use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// Get the data directory for the application.
pub fn get_data_dir() -> PathBuf {
    if let Ok(s) = std::env::var("PASSKEY_WALLET_DATA") {
        PathBuf::from(s)
    } else if let Some(proj_dirs) = ProjectDirs::from("com", "lazorkit", "passkey-wallet") {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub name: String,
    pub rpc_url: String,
    /// Cluster label used for explorer links and transaction simulation.
    pub cluster: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymasterConfig {
    pub url: String,
}

/// Metadata shown by the authentication portal when creating a passkey.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppMetadata {
    pub name: String,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub network: NetworkConfig,
    pub portal_url: String,
    pub paymaster: PaymasterConfig,
    pub metadata: AppMetadata,
}

impl Default for Config {
    fn default() -> Self {
        Self::devnet()
    }
}

impl Config {
    /// Create config from CLI args.
    ///
    /// Environment overrides are applied first, the explicit `rpc_url` last.
    pub fn new(network: &str, rpc_url: Option<&str>) -> Self {
        let mut config = Self::from_network(network);
        config.apply_env_overrides();
        if let Some(url) = rpc_url {
            config.network.rpc_url = url.to_string();
        }
        config
    }

    pub fn devnet() -> Self {
        Self {
            network: NetworkConfig {
                name: "devnet".to_string(),
                rpc_url: "https://api.devnet.solana.com".to_string(),
                cluster: "devnet".to_string(),
            },
            portal_url: "https://portal.lazor.sh".to_string(),
            paymaster: PaymasterConfig {
                url: "https://kora.devnet.lazorkit.com".to_string(),
            },
            metadata: AppMetadata::default(),
        }
    }

    pub fn mainnet() -> Self {
        Self {
            network: NetworkConfig {
                name: "mainnet".to_string(),
                rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
                cluster: "mainnet-beta".to_string(),
            },
            portal_url: "https://portal.lazor.sh".to_string(),
            paymaster: PaymasterConfig {
                url: "https://kora.lazorkit.com".to_string(),
            },
            metadata: AppMetadata::default(),
        }
    }

    pub fn from_network(network: &str) -> Self {
        match network {
            "mainnet" | "mainnet-beta" => Self::mainnet(),
            _ => Self::devnet(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("PASSKEY_WALLET_RPC_URL") {
            self.network.rpc_url = url;
        }
        if let Ok(url) = std::env::var("PASSKEY_WALLET_PORTAL_URL") {
            self.portal_url = url;
        }
        if let Ok(url) = std::env::var("PASSKEY_WALLET_PAYMASTER_URL") {
            self.paymaster.url = url;
        }
    }

    /// Explorer page for an address on the configured cluster.
    pub fn explorer_address_url(&self, address: &str) -> String {
        format!(
            "https://explorer.solana.com/address/{}?cluster={}",
            address, self.network.cluster
        )
    }
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "LazorKit Starter".to_string(),
            icon: "https://lazorkit.com/favicon.ico".to_string(),
        }
    }
}
