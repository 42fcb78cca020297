use std::{path::Path, sync::Arc};

use color_eyre::eyre::Result;
use tracing::{debug, info};

use passkey_wallet::{
    config::Config,
    domain::{token::portfolio_value, wallet::WalletSession},
    infra::{
        simulated::{SimulatedIndexer, SimulatedLedger, SimulatedWallet},
        store::Store,
    },
};

use crate::cli::{Args, Command};

/// Command-line front-end over a wallet session.
pub struct App {
    session: WalletSession,
}

impl App {
    pub fn new(args: &Args, data_dir: &Path) -> Result<Self> {
        let config = Config::new(&args.network, args.rpc_url.as_deref());
        info!(
            "Starting on {} ({}) for {}",
            config.network.name, config.network.rpc_url, args.owner
        );

        let store = Store::with_path(data_dir.join("wallet.mdb"))?;
        let wallet = Arc::new(SimulatedWallet::new(args.owner.clone()));
        let session = WalletSession::new(
            config,
            store,
            wallet,
            Arc::new(SimulatedLedger::new()),
            Arc::new(SimulatedIndexer::new()),
        );

        Ok(Self { session })
    }

    pub async fn run(&mut self, command: &Command) -> Result<()> {
        debug!("Running {:?}", command);
        let scope = self.session.connect().await?;
        let scope = Some(&scope);

        match command {
            Command::Tokens => {
                let tokens = self.session.tokens().get_all(scope);
                for t in &tokens {
                    println!(
                        "{:<6} {:<10} {:>18.4}  ~${:.2}",
                        t.symbol,
                        t.name,
                        t.balance,
                        t.value()
                    );
                }
                println!("Total: ${:.2}", portfolio_value(&tokens));
            }
            Command::SetBalance { token, amount } => {
                let tokens = self.session.tokens().update_balance(scope, token, *amount);
                if !tokens.iter().any(|t| &t.id == token) {
                    println!("No token with id {token}; balances unchanged");
                }
            }
            Command::ResetTokens => self.session.tokens().reset(scope),
            Command::History { limit } => {
                let history = self.session.history().recent(scope, *limit);
                if history.is_empty() {
                    println!("No transactions yet");
                }
                for tx in &history {
                    println!(
                        "{} {:>8} {:<12} {:<6} {}  {}",
                        tx.id,
                        tx.kind.to_string(),
                        tx.amount,
                        tx.token,
                        tx.status,
                        tx.description
                    );
                }
            }
            Command::ClearHistory => self.session.history().clear(scope),
            Command::Quote {
                pay,
                receive,
                amount,
            } => {
                let quote = self.session.quote_swap(pay, receive, amount)?;
                println!(
                    "{} {} -> {} {} (~${:.2})",
                    quote.pay_amount,
                    quote.pay_token,
                    quote.receive_amount_display(),
                    quote.receive_token,
                    quote.pay_value
                );
                println!("{}", quote.rate_display());
            }
            Command::Swap {
                pay,
                receive,
                amount,
            } => {
                let receipt = self.session.swap(pay, receive, amount).await?;
                println!(
                    "Swapped {} {} for {} {}",
                    receipt.quote.pay_amount,
                    receipt.quote.pay_token,
                    receipt.quote.receive_amount_display(),
                    receipt.quote.receive_token
                );
            }
            Command::Transfer {
                recipient,
                amount,
                fee_mode,
            } => {
                let receipt = self
                    .session
                    .transfer(recipient, amount, (*fee_mode).into())
                    .await?;
                println!("Signature: {}", receipt.signature);
                println!("Balance: {:.4} SOL", receipt.new_balance);
            }
            Command::Airdrop => {
                let balance = self.session.request_airdrop().await?;
                println!("Balance: {:.4} SOL", balance);
            }
            Command::Nfts => {
                let assets = self.session.nfts().await?;
                if assets.is_empty() {
                    println!("No NFTs found");
                }
                for asset in &assets {
                    println!(
                        "{}  {}  {}",
                        asset.id,
                        asset.name,
                        asset.collection.as_deref().unwrap_or("-")
                    );
                }
            }
            Command::Receive => {
                let info = self.session.receive_info()?;
                println!("{}", info.address);
                println!("{}", info.explorer_url);
            }
        }

        Ok(())
    }
}
