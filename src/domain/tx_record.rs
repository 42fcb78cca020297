//! Transaction history records.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Maximum number of records kept per scope; older ones are discarded.
pub const MAX_HISTORY: usize = 50;

const ID_LEN: usize = 7;
const ID_CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxKind {
    Swapped,
    Sent,
    Received,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    Success,
    Failed,
    Simulated,
}

impl fmt::Display for TxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TxKind::Swapped => "swapped",
            TxKind::Sent => "sent",
            TxKind::Received => "received",
        };
        f.write_str(s)
    }
}

impl fmt::Display for TxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TxStatus::Success => "success",
            TxStatus::Failed => "failed",
            TxStatus::Simulated => "simulated",
        };
        f.write_str(s)
    }
}

/// A user-initiated action as shown in the history list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub kind: TxKind,
    /// Decimal amount kept as entered.
    pub amount: String,
    pub token: String,
    pub description: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub date: u64,
    /// Settlement reference from the network, when there is one.
    pub signature: Option<String>,
    pub status: TxStatus,
}

/// A record payload before the log assigns its id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub kind: TxKind,
    pub amount: String,
    pub token: String,
    pub description: String,
    pub signature: Option<String>,
    pub status: TxStatus,
}

impl TransactionDraft {
    pub fn new(
        kind: TxKind,
        amount: impl Into<String>,
        token: impl Into<String>,
        description: impl Into<String>,
        status: TxStatus,
    ) -> Self {
        Self {
            kind,
            amount: amount.into(),
            token: token.into(),
            description: description.into(),
            signature: None,
            status,
        }
    }

    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    /// Realise the draft with store-assigned fields.
    pub fn into_record(self, id: String, date: u64) -> TransactionRecord {
        TransactionRecord {
            id,
            kind: self.kind,
            amount: self.amount,
            token: self.token,
            description: self.description,
            date,
            signature: self.signature,
            status: self.status,
        }
    }
}

/// Current wall-clock time in milliseconds.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Generate a short id not used by any record in `existing`.
pub fn generate_id<R: Rng + ?Sized>(rng: &mut R, existing: &[TransactionRecord]) -> String {
    loop {
        let id: String = (0..ID_LEN)
            .map(|_| ID_CHARSET[rng.gen_range(0..ID_CHARSET.len())] as char)
            .collect();
        if !existing.iter().any(|r| r.id == id) {
            return id;
        }
    }
}

/// Whether `id` has the shape produced by [`generate_id`].
pub fn is_well_formed_id(id: &str) -> bool {
    id.len() == ID_LEN && id.bytes().all(|b| ID_CHARSET.contains(&b))
}

/// Insert `record` at the head and drop anything beyond [`MAX_HISTORY`].
pub fn push_front_capped(history: &mut Vec<TransactionRecord>, record: TransactionRecord) {
    history.insert(0, record);
    history.truncate(MAX_HISTORY);
}

/// Timestamp for a new head record, never earlier than the current head.
pub fn next_timestamp(history: &[TransactionRecord], now: u64) -> u64 {
    match history.first() {
        Some(head) => now.max(head.date),
        None => now,
    }
}
