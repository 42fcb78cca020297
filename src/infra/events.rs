//! Change notifications published by the stores.

use tokio::sync::broadcast;
use tracing::trace;

use crate::domain::{scope::Scope, token::TokenRecord, tx_record::TransactionRecord};

/// Capacity of the broadcast ring; slow subscribers see `Lagged` past this.
const EVENT_CAPACITY: usize = 64;

/// Emitted after a store mutation has been persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    TokensUpdated {
        scope: Scope,
        tokens: Vec<TokenRecord>,
    },
    TokensReset {
        scope: Scope,
    },
    TransactionAdded {
        scope: Scope,
        record: TransactionRecord,
    },
    HistoryCleared {
        scope: Scope,
    },
}

impl StoreEvent {
    pub fn scope(&self) -> &Scope {
        match self {
            StoreEvent::TokensUpdated { scope, .. }
            | StoreEvent::TokensReset { scope }
            | StoreEvent::TransactionAdded { scope, .. }
            | StoreEvent::HistoryCleared { scope } => scope,
        }
    }
}

/// Shared publisher; clones publish to the same subscribers.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn publish(&self, event: StoreEvent) {
        if self.tx.send(event).is_err() {
            trace!("Store event dropped, no subscribers");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
