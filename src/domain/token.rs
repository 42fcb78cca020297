//! Token records and the default seed set.

use serde::{Deserialize, Serialize};

/// Id of the native token; transfers and airdrops move this balance.
pub const NATIVE_TOKEN_ID: &str = "sol";

const SOL_ICON: &str = "https://raw.githubusercontent.com/solana-labs/token-list/main/assets/mainnet/So11111111111111111111111111111111111111112/logo.png";
const USDC_ICON: &str = "https://raw.githubusercontent.com/solana-labs/token-list/main/assets/mainnet/EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v/logo.png";
const BONK_ICON: &str = "https://arweave.net/hQiPZOsRZXGXBJd_82PhVdlM_hACsT_q6wqwf5cSY7I";

/// A token balance held by a wallet, with static display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub id: String,
    pub symbol: String,
    pub name: String,
    /// Not enforced to be non-negative.
    pub balance: f64,
    /// Unit price in USD.
    pub price: f64,
    pub icon: String,
}

impl TokenRecord {
    pub fn new(id: &str, symbol: &str, name: &str, balance: f64, price: f64, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            symbol: symbol.to_string(),
            name: name.to_string(),
            balance,
            price,
            icon: icon.to_string(),
        }
    }

    /// Balance valued in USD.
    pub fn value(&self) -> f64 {
        self.balance * self.price
    }
}

/// The fixed fallback set returned for scopes with nothing persisted.
pub fn default_tokens() -> Vec<TokenRecord> {
    vec![
        TokenRecord::new("sol", "SOL", "Solana", 1.24, 150.0, SOL_ICON),
        TokenRecord::new("usdc", "USDC", "USD Coin", 0.0, 1.0, USDC_ICON),
        TokenRecord::new("bonk", "BONK", "Bonk", 500_000.0, 0.000012, BONK_ICON),
    ]
}

/// Replace the balance of the record matching `token_id`.
///
/// Returns false when no record matches; the set is left untouched and no
/// record is inserted.
pub fn apply_balance(tokens: &mut [TokenRecord], token_id: &str, balance: f64) -> bool {
    match tokens.iter_mut().find(|t| t.id == token_id) {
        Some(token) => {
            token.balance = balance;
            true
        }
        None => false,
    }
}

/// Add `delta` to the balance of `token_id`. Same no-insert rule as
/// [`apply_balance`].
pub fn adjust_balance(tokens: &mut [TokenRecord], token_id: &str, delta: f64) -> bool {
    match tokens.iter_mut().find(|t| t.id == token_id) {
        Some(token) => {
            token.balance += delta;
            true
        }
        None => false,
    }
}

/// Total USD value of a token set.
pub fn portfolio_value(tokens: &[TokenRecord]) -> f64 {
    tokens.iter().map(TokenRecord::value).sum()
}

/// Look up a token by id or, failing that, by case-insensitive symbol.
pub fn find_token<'a>(tokens: &'a [TokenRecord], key: &str) -> Option<&'a TokenRecord> {
    tokens
        .iter()
        .find(|t| t.id == key)
        .or_else(|| tokens.iter().find(|t| t.symbol.eq_ignore_ascii_case(key)))
}
