//! Passkey Wallet - persisted state for a passkey smart-wallet demo.
//!
//! This library provides:
//! - A per-owner token ledger with a default seed set
//! - A per-owner, capped transaction history
//! - Change notifications for views sharing the stores
//! - Transfer, swap and airdrop flows over external wallet/network services

pub mod config;
pub mod domain;
pub mod infra;
