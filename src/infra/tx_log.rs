//! Per-owner transaction history, newest first, capped at [`MAX_HISTORY`].

use tracing::{debug, error, warn};

use crate::domain::{
    scope::Scope,
    tx_record::{
        MAX_HISTORY, TransactionDraft, TransactionRecord, generate_id, next_timestamp, now_millis,
        push_front_capped,
    },
};

use super::{
    events::{EventBus, StoreEvent},
    store::Store,
};

/// Storage key prefix; bump the suffix when the record layout changes.
pub const TRANSACTIONS_PREFIX: &str = "passkey_wallet_transactions_v1";

#[derive(Clone)]
pub struct TransactionLog {
    store: Store,
    events: EventBus,
}

impl TransactionLog {
    pub fn new(store: Store, events: EventBus) -> Self {
        Self { store, events }
    }

    /// History for the scope, most recent first. Empty when nothing is stored.
    pub fn get_all(&self, scope: Option<&Scope>) -> Vec<TransactionRecord> {
        let Some(scope) = scope else {
            return Vec::new();
        };

        match self.store.load_blob(&scope.storage_key(TRANSACTIONS_PREFIX)) {
            Ok(Some(bytes)) => decode_history(scope, &bytes),
            Ok(None) => Vec::new(),
            Err(e) => {
                error!("Failed to load history for {}: {}", scope, e);
                Vec::new()
            }
        }
    }

    /// The `n` most recent records.
    pub fn recent(&self, scope: Option<&Scope>, n: usize) -> Vec<TransactionRecord> {
        let mut history = self.get_all(scope);
        history.truncate(n);
        history
    }

    /// Record a new action at the head of the scope's history.
    ///
    /// Returns `None` without a scope.
    pub fn add(&self, scope: Option<&Scope>, draft: TransactionDraft) -> Option<TransactionRecord> {
        let Some(scope) = scope else {
            debug!("add({}) without a scope, ignoring", draft.kind);
            return None;
        };

        let key = scope.storage_key(TRANSACTIONS_PREFIX);
        let result = self.store.update_blob(&key, |current| {
            let mut history = current
                .map(|bytes| decode_history(scope, bytes))
                .unwrap_or_default();
            let record = realise(&history, draft.clone());
            push_front_capped(&mut history, record.clone());
            let bytes = rmp_serde::to_vec_named(&history)?;
            Ok((bytes, record))
        });

        match result {
            Ok(record) => {
                debug!(
                    "Recorded {} {} {} for {} ({})",
                    record.kind, record.amount, record.token, scope, record.id
                );
                self.events.publish(StoreEvent::TransactionAdded {
                    scope: scope.clone(),
                    record: record.clone(),
                });
                Some(record)
            }
            Err(e) => {
                error!("Failed to persist transaction for {}: {}", scope, e);
                Some(realise(&self.get_all(Some(scope)), draft))
            }
        }
    }

    /// Delete the scope's history.
    pub fn clear(&self, scope: Option<&Scope>) {
        let Some(scope) = scope else {
            return;
        };

        match self.store.delete_blob(&scope.storage_key(TRANSACTIONS_PREFIX)) {
            Ok(()) => {
                debug!("Cleared history for {}", scope);
                self.events.publish(StoreEvent::HistoryCleared {
                    scope: scope.clone(),
                });
            }
            Err(e) => error!("Failed to clear history for {}: {}", scope, e),
        }
    }
}

fn realise(history: &[TransactionRecord], draft: TransactionDraft) -> TransactionRecord {
    let id = generate_id(&mut rand::thread_rng(), history);
    let date = next_timestamp(history, now_millis());
    draft.into_record(id, date)
}

fn decode_history(scope: &Scope, bytes: &[u8]) -> Vec<TransactionRecord> {
    match rmp_serde::from_slice::<Vec<TransactionRecord>>(bytes) {
        Ok(mut history) => {
            history.truncate(MAX_HISTORY);
            history
        }
        Err(e) => {
            warn!("Failed to parse history for {}, treating as empty: {}", scope, e);
            Vec::new()
        }
    }
}
