pub mod collaborators;
pub mod events;
pub mod simulated;
pub mod store;
pub mod token_ledger;
pub mod tx_log;
