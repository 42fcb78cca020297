use clap::{Parser, Subcommand, ValueEnum};

use passkey_wallet::infra::collaborators::FeeMode;

#[derive(Parser, Debug)]
#[command(name = "passkey-wallet")]
#[command(author = "lazorkit")]
#[command(version)]
#[command(about = "Passkey smart-wallet demo: balances, history, transfers and swaps")]
pub struct Args {
    /// Network to connect to (devnet, mainnet)
    #[arg(short, long, default_value = "devnet")]
    pub network: String,

    /// Custom RPC URL (overrides network default)
    #[arg(long)]
    pub rpc_url: Option<String>,

    /// Data directory path
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Owner (smart-wallet) address whose data to use
    #[arg(short, long, env = "PASSKEY_WALLET_OWNER")]
    pub owner: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List token balances
    Tokens,
    /// Set a token balance
    SetBalance { token: String, amount: f64 },
    /// Forget stored balances and return to the defaults
    ResetTokens,
    /// Show transaction history
    History {
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },
    /// Delete transaction history
    ClearHistory,
    /// Quote a swap without executing it
    Quote {
        pay: String,
        receive: String,
        amount: String,
    },
    /// Swap tokens at the quoted rate
    Swap {
        pay: String,
        receive: String,
        amount: String,
    },
    /// Send SOL
    Transfer {
        recipient: String,
        amount: String,
        #[arg(long, value_enum, default_value_t = FeeModeArg::Paymaster)]
        fee_mode: FeeModeArg,
    },
    /// Request devnet SOL from the faucet
    Airdrop,
    /// Show the receive address and explorer link
    Receive,
    /// List NFTs held by the owner
    Nfts,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum FeeModeArg {
    Paymaster,
    User,
}

impl From<FeeModeArg> for FeeMode {
    fn from(arg: FeeModeArg) -> Self {
        match arg {
            FeeModeArg::Paymaster => FeeMode::Paymaster,
            FeeModeArg::User => FeeMode::User,
        }
    }
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
