//! Owner scopes for persisted wallet data.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Longest accepted owner address, in bytes.
///
/// Storage keys are `<prefix>_<address>` and LMDB rejects keys over 511
/// bytes, so the address leaves room for the store prefixes. Solana
/// addresses are at most 44 characters.
pub const MAX_ADDRESS_LEN: usize = 256;

/// The owner address under which a store partitions its records.
///
/// A blank address is not a scope; use [`Scope::parse`] to get `None` for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope(String);

impl Scope {
    /// Build a scope from an owner address, trimming surrounding whitespace.
    /// Returns `None` for an empty address or one longer than
    /// [`MAX_ADDRESS_LEN`] bytes.
    pub fn parse(address: &str) -> Option<Self> {
        let trimmed = address.trim();
        if trimmed.is_empty() || trimmed.len() > MAX_ADDRESS_LEN {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn address(&self) -> &str {
        &self.0
    }

    /// Composite storage key: `<prefix>_<owner address>`.
    pub fn storage_key(&self, prefix: &str) -> String {
        format!("{}_{}", prefix, self.0)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
