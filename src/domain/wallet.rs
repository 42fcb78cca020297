//! Wallet session: the flows behind the Transfer, Swap, Receive and NFT views.
//!
//! A session ties the connected wallet to its owner scope in both stores.
//! Store writes publish [`StoreEvent`]s, so views that hold a receiver from
//! [`WalletSession::subscribe`] see balance and history changes made by any
//! other view.

use std::sync::Arc;

use color_eyre::eyre::{Result, WrapErr, bail, eyre};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::{
    config::Config,
    infra::{
        collaborators::{
            Asset, AssetIndexer, ConnectOptions, FeeMode, LedgerClient, TransferRequest,
            WalletConnector, sol_to_lamports,
        },
        events::{EventBus, StoreEvent},
        store::Store,
        token_ledger::TokenLedger,
        tx_log::TransactionLog,
    },
};

use super::{
    scope::Scope,
    swap::{SwapQuote, quote},
    token::{NATIVE_TOKEN_ID, TokenRecord, find_token},
    tx_record::{TransactionDraft, TransactionRecord, TxKind, TxStatus},
};

/// Destination used when a transfer has no recipient.
pub const SYSTEM_PROGRAM_ADDRESS: &str = "11111111111111111111111111111111";

/// SOL requested per faucet call.
pub const AIRDROP_SOL: f64 = 1.0;

const TRANSFER_COMPUTE_UNIT_LIMIT: u32 = 500_000;

/// Outcome of a completed transfer.
#[derive(Debug, Clone)]
pub struct TransferReceipt {
    pub signature: String,
    pub new_balance: f64,
    pub record: Option<TransactionRecord>,
}

/// Outcome of a completed swap.
#[derive(Debug, Clone)]
pub struct SwapReceipt {
    pub quote: SwapQuote,
    pub tokens: Vec<TokenRecord>,
    pub record: Option<TransactionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiveInfo {
    pub address: String,
    pub explorer_url: String,
}

pub struct WalletSession {
    config: Config,
    tokens: TokenLedger,
    history: TransactionLog,
    events: EventBus,
    wallet: Arc<dyn WalletConnector>,
    ledger: Arc<dyn LedgerClient>,
    indexer: Arc<dyn AssetIndexer>,
}

impl WalletSession {
    pub fn new(
        config: Config,
        store: Store,
        wallet: Arc<dyn WalletConnector>,
        ledger: Arc<dyn LedgerClient>,
        indexer: Arc<dyn AssetIndexer>,
    ) -> Self {
        let events = EventBus::new();
        Self {
            config,
            tokens: TokenLedger::new(store.clone(), events.clone()),
            history: TransactionLog::new(store, events.clone()),
            events,
            wallet,
            ledger,
            indexer,
        }
    }

    pub fn tokens(&self) -> &TokenLedger {
        &self.tokens
    }

    pub fn history(&self) -> &TransactionLog {
        &self.history
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    /// Scope of the connected owner, if any.
    pub fn scope(&self) -> Option<Scope> {
        self.wallet
            .owner_address()
            .and_then(|address| Scope::parse(&address))
    }

    fn require_scope(&self) -> Result<Scope> {
        self.scope().ok_or_else(|| eyre!("Wallet not connected"))
    }

    /// Current token set for the connected owner (defaults when disconnected).
    pub fn balances(&self) -> Vec<TokenRecord> {
        self.tokens.get_all(self.scope().as_ref())
    }

    fn native_balance(&self, scope: &Scope) -> f64 {
        self.tokens
            .get(Some(scope), NATIVE_TOKEN_ID)
            .map(|t| t.balance)
            .unwrap_or(0.0)
    }

    /// Connect through the passkey portal and seed the owner's SOL balance.
    ///
    /// A failed balance lookup does not fail the connection; the stored or
    /// default balance stays in place.
    pub async fn connect(&self) -> Result<Scope> {
        let options = ConnectOptions {
            portal_url: self.config.portal_url.clone(),
            app_name: self.config.metadata.name.clone(),
            app_icon: self.config.metadata.icon.clone(),
        };
        let address = self
            .wallet
            .connect(&options)
            .await
            .wrap_err("Failed to connect wallet")?;
        let scope = Scope::parse(&address)
            .ok_or_else(|| eyre!("Wallet returned an unusable address: {:?}", address))?;
        info!("Connected {} on {}", scope, self.config.network.name);

        if let Err(e) = self.hydrate_native_balance().await {
            warn!("Could not load SOL balance for {}: {:?}", scope, e);
        }
        Ok(scope)
    }

    /// Seed the stored SOL balance from the network the first time an owner
    /// is seen. Once the owner has a persisted token set it is trusted as is.
    ///
    /// Returns the network balance when it was applied.
    pub async fn hydrate_native_balance(&self) -> Result<Option<f64>> {
        let scope = self.require_scope()?;
        if self.tokens.is_persisted(&scope) {
            return Ok(None);
        }
        let real = self.ledger.get_balance(scope.address()).await?;
        self.tokens.update_balance(Some(&scope), NATIVE_TOKEN_ID, real);
        info!("Hydrated SOL balance for {} from network: {}", scope, real);
        Ok(Some(real))
    }

    /// Overwrite the stored SOL balance with the network balance.
    pub async fn sync_native_balance(&self) -> Result<f64> {
        let scope = self.require_scope()?;
        let real = self.ledger.get_balance(scope.address()).await?;
        self.tokens.update_balance(Some(&scope), NATIVE_TOKEN_ID, real);
        Ok(real)
    }

    /// Request faucet funds, wait for confirmation and store the new balance.
    pub async fn request_airdrop(&self) -> Result<f64> {
        let scope = self.require_scope()?;
        let signature = self
            .ledger
            .request_airdrop(scope.address(), AIRDROP_SOL)
            .await
            .wrap_err("Airdrop failed, the faucet may be rate-limited")?;
        self.ledger.confirm(&signature).await?;
        self.sync_native_balance().await
    }

    /// Send SOL through the wallet and record it.
    ///
    /// With [`FeeMode::User`] the stored balance must cover the amount. The
    /// stored balance is debited eagerly once the network accepts the
    /// transaction. Paymaster transfers carry the configured sponsor URL.
    pub async fn transfer(
        &self,
        recipient: &str,
        amount: &str,
        fee_mode: FeeMode,
    ) -> Result<TransferReceipt> {
        let scope = self.require_scope()?;
        let value = parse_amount(amount)?;

        let balance = self.native_balance(&scope);
        if fee_mode == FeeMode::User && value > balance {
            bail!("Insufficient funds (simulated)");
        }

        let to = match recipient.trim() {
            "" => SYSTEM_PROGRAM_ADDRESS,
            r => r,
        };
        let request = TransferRequest {
            from: scope.address().to_string(),
            to: to.to_string(),
            lamports: sol_to_lamports(value),
            compute_unit_limit: TRANSFER_COMPUTE_UNIT_LIMIT,
            cluster: self.config.network.cluster.clone(),
            paymaster_url: (fee_mode == FeeMode::Paymaster)
                .then(|| self.config.paymaster.url.clone()),
        };

        let signature = match self.wallet.sign_and_send(request, fee_mode).await {
            Ok(sig) => sig,
            Err(e) => {
                warn!("Transfer failed: {:?}", e);
                if e.to_string().contains("0x1") {
                    return Err(e.wrap_err("Insufficient funds"));
                }
                return Err(e);
            }
        };

        let new_balance = self
            .tokens
            .adjust_balances(Some(&scope), &[(NATIVE_TOKEN_ID, -value)])
            .iter()
            .find(|t| t.id == NATIVE_TOKEN_ID)
            .map(|t| t.balance)
            .unwrap_or(balance - value);
        let record = self.history.add(
            Some(&scope),
            TransactionDraft::new(
                TxKind::Sent,
                amount.trim(),
                "SOL",
                format!("Sent SOL to {}", shorten_address(to)),
                TxStatus::Success,
            )
            .with_signature(signature.clone()),
        );

        info!("Transfer {} SOL to {} confirmed: {}", value, to, signature);
        Ok(TransferReceipt {
            signature,
            new_balance,
            record,
        })
    }

    /// Quote a swap between two held tokens, by id or symbol.
    pub fn quote_swap(&self, pay: &str, receive: &str, amount: &str) -> Result<SwapQuote> {
        let tokens = self.balances();
        let (pay, receive) = lookup_pair(&tokens, pay, receive)?;
        quote(pay, receive, parse_amount(amount)?)
    }

    /// Swap at the quoted price ratio.
    ///
    /// The user approves by signing a message describing the swap; wallets
    /// that cannot sign messages get a simulated swap instead. The debit and
    /// credit land in a single store write.
    pub async fn swap(&self, pay: &str, receive: &str, amount: &str) -> Result<SwapReceipt> {
        let scope = self.require_scope()?;
        let tokens = self.tokens.get_all(Some(&scope));
        let (pay, receive) = lookup_pair(&tokens, pay, receive)?;
        let quote = quote(pay, receive, parse_amount(amount)?)?;

        if quote.pay_amount > pay.balance {
            bail!("Insufficient {} balance", pay.symbol);
        }

        let (status, signature) = if self.wallet.can_sign_messages() {
            let message = format!(
                "Swapping {} {} to {} {}",
                quote.pay_amount,
                quote.pay_token,
                quote.receive_amount_display(),
                quote.receive_token
            );
            let sig = self
                .wallet
                .sign_message(&message)
                .await
                .wrap_err("Swap failed")?;
            (TxStatus::Success, Some(sig))
        } else {
            (TxStatus::Simulated, None)
        };

        let tokens = self.tokens.adjust_balances(
            Some(&scope),
            &[
                (pay.id.as_str(), -quote.pay_amount),
                (receive.id.as_str(), quote.receive_amount),
            ],
        );

        let mut draft = TransactionDraft::new(
            TxKind::Swapped,
            amount.trim(),
            quote.pay_token.clone(),
            format!(
                "Swapped {} {} for {} {}",
                quote.pay_amount,
                quote.pay_token,
                quote.receive_amount_display(),
                quote.receive_token
            ),
            status,
        );
        if let Some(sig) = signature {
            draft = draft.with_signature(sig);
        }
        let record = self.history.add(Some(&scope), draft);

        Ok(SwapReceipt {
            quote,
            tokens,
            record,
        })
    }

    /// Address and explorer link shown on the Receive view.
    pub fn receive_info(&self) -> Result<ReceiveInfo> {
        let scope = self.require_scope()?;
        Ok(ReceiveInfo {
            address: scope.address().to_string(),
            explorer_url: self.config.explorer_address_url(scope.address()),
        })
    }

    /// NFTs held by the connected owner.
    pub async fn nfts(&self) -> Result<Vec<Asset>> {
        let scope = self.require_scope()?;
        self.indexer.assets_by_owner(scope.address()).await
    }

    /// Disconnect the wallet. Stored data for the owner is kept.
    pub async fn disconnect(&self) -> Result<()> {
        self.wallet.disconnect().await
    }
}

fn lookup_pair<'a>(
    tokens: &'a [TokenRecord],
    pay: &str,
    receive: &str,
) -> Result<(&'a TokenRecord, &'a TokenRecord)> {
    let pay = find_token(tokens, pay).ok_or_else(|| eyre!("Unknown token {}", pay))?;
    let receive = find_token(tokens, receive).ok_or_else(|| eyre!("Unknown token {}", receive))?;
    Ok((pay, receive))
}

fn parse_amount(amount: &str) -> Result<f64> {
    let value: f64 = amount
        .trim()
        .parse()
        .wrap_err_with(|| format!("Invalid amount: {:?}", amount))?;
    if !value.is_finite() || value <= 0.0 {
        bail!("Amount must be positive");
    }
    Ok(value)
}

/// `ABCD...WXYZ` form of an address.
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 8 {
        return address.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
