//! Per-owner token balances.
//!
//! Reads never fail: a scope with nothing persisted, or with a blob that no
//! longer decodes, yields the default seed set. Storage errors are logged and
//! swallowed so callers always get a usable token list back.

use color_eyre::eyre::Result;
use tracing::{debug, error, warn};

use crate::domain::{
    scope::Scope,
    token::{TokenRecord, adjust_balance, apply_balance, default_tokens},
};

use super::{
    events::{EventBus, StoreEvent},
    store::Store,
};

/// Storage key prefix; bump the suffix when the record layout changes.
pub const TOKENS_PREFIX: &str = "passkey_wallet_tokens_v1";

#[derive(Clone)]
pub struct TokenLedger {
    store: Store,
    events: EventBus,
}

impl TokenLedger {
    pub fn new(store: Store, events: EventBus) -> Self {
        Self { store, events }
    }

    /// All tokens for the scope, or the default set when nothing is stored.
    /// Defaults are not persisted by this call.
    pub fn get_all(&self, scope: Option<&Scope>) -> Vec<TokenRecord> {
        let Some(scope) = scope else {
            return default_tokens();
        };

        match self.store.load_blob(&scope.storage_key(TOKENS_PREFIX)) {
            Ok(Some(bytes)) => decode_tokens(scope, &bytes),
            Ok(None) => default_tokens(),
            Err(e) => {
                error!("Failed to load tokens for {}: {}", scope, e);
                default_tokens()
            }
        }
    }

    pub fn get(&self, scope: Option<&Scope>, token_id: &str) -> Option<TokenRecord> {
        self.get_all(scope).into_iter().find(|t| t.id == token_id)
    }

    /// Whether the scope has its own persisted token set.
    pub fn is_persisted(&self, scope: &Scope) -> bool {
        match self.store.contains(&scope.storage_key(TOKENS_PREFIX)) {
            Ok(found) => found,
            Err(e) => {
                error!("Failed to check tokens for {}: {}", scope, e);
                false
            }
        }
    }

    /// Set the balance of `token_id` and persist the whole set.
    ///
    /// An unknown `token_id` leaves the set as it was (it is still persisted).
    /// Without a scope nothing happens and an empty list is returned.
    pub fn update_balance(
        &self,
        scope: Option<&Scope>,
        token_id: &str,
        balance: f64,
    ) -> Vec<TokenRecord> {
        let Some(scope) = scope else {
            debug!("update_balance({}) without a scope, ignoring", token_id);
            return Vec::new();
        };

        self.modify(scope, |tokens| {
            if !apply_balance(tokens, token_id, balance) {
                warn!("Token {} not held by {}, balance not changed", token_id, scope);
            }
        })
        .inspect(|_| debug!("Set {} balance for {} to {}", token_id, scope, balance))
        .unwrap_or_else(|e| {
            error!("Failed to persist {} balance for {}: {}", token_id, scope, e);
            let mut tokens = self.get_all(Some(scope));
            apply_balance(&mut tokens, token_id, balance);
            tokens
        })
    }

    /// Add each `(token_id, delta)` to the stored balances in one write.
    ///
    /// The current set is read inside the same write transaction, so flows
    /// running at the same time cannot overwrite each other's debits and
    /// credits. Unknown ids are skipped. Without a scope nothing happens and
    /// an empty list is returned.
    pub fn adjust_balances(
        &self,
        scope: Option<&Scope>,
        deltas: &[(&str, f64)],
    ) -> Vec<TokenRecord> {
        let Some(scope) = scope else {
            debug!("adjust_balances without a scope, ignoring");
            return Vec::new();
        };

        let apply = |tokens: &mut Vec<TokenRecord>| {
            for (token_id, delta) in deltas {
                if !adjust_balance(tokens, token_id, *delta) {
                    warn!("Token {} not held by {}, balance not changed", token_id, scope);
                }
            }
        };

        self.modify(scope, apply)
            .inspect(|_| debug!("Adjusted balances for {}: {:?}", scope, deltas))
            .unwrap_or_else(|e| {
                error!("Failed to persist balance changes for {}: {}", scope, e);
                let mut tokens = self.get_all(Some(scope));
                apply(&mut tokens);
                tokens
            })
    }

    /// Read-modify-write the scope's token set and publish the result.
    fn modify<F>(&self, scope: &Scope, f: F) -> Result<Vec<TokenRecord>>
    where
        F: FnOnce(&mut Vec<TokenRecord>),
    {
        let tokens = self
            .store
            .update_blob(&scope.storage_key(TOKENS_PREFIX), |current| {
                let mut tokens = current
                    .map(|bytes| decode_tokens(scope, bytes))
                    .unwrap_or_else(default_tokens);
                f(&mut tokens);
                let bytes = rmp_serde::to_vec_named(&tokens)?;
                Ok((bytes, tokens))
            })?;

        self.events.publish(StoreEvent::TokensUpdated {
            scope: scope.clone(),
            tokens: tokens.clone(),
        });
        Ok(tokens)
    }

    /// Drop the scope's persisted tokens so reads fall back to defaults.
    pub fn reset(&self, scope: Option<&Scope>) {
        let Some(scope) = scope else {
            return;
        };

        match self.store.delete_blob(&scope.storage_key(TOKENS_PREFIX)) {
            Ok(()) => {
                debug!("Reset tokens for {}", scope);
                self.events.publish(StoreEvent::TokensReset {
                    scope: scope.clone(),
                });
            }
            Err(e) => error!("Failed to reset tokens for {}: {}", scope, e),
        }
    }
}

fn decode_tokens(scope: &Scope, bytes: &[u8]) -> Vec<TokenRecord> {
    match rmp_serde::from_slice(bytes) {
        Ok(tokens) => tokens,
        Err(e) => {
            warn!("Failed to parse tokens for {}, using defaults: {}", scope, e);
            default_tokens()
        }
    }
}
