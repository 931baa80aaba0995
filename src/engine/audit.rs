//! Append-only audit trail of applied events

use crate::orderbook::{Price, Side, UpsertOutcome};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What an applied event did to its price level, for the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    /// A level was created
    Add,
    /// A level's size was replaced
    Update,
    /// A level was removed (including the idempotent remove-of-absent case)
    Remove,
}

impl From<UpsertOutcome> for AuditAction {
    fn from(outcome: UpsertOutcome) -> Self {
        match outcome {
            UpsertOutcome::Added => AuditAction::Add,
            UpsertOutcome::Updated => AuditAction::Update,
            UpsertOutcome::Removed | UpsertOutcome::Noop => AuditAction::Remove,
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditAction::Add => write!(f, "add"),
            AuditAction::Update => write!(f, "update"),
            AuditAction::Remove => write!(f, "remove"),
        }
    }
}

/// One applied event, immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Engine-wide arrival sequence number
    pub sequence: u64,
    /// Symbol the event targeted
    pub symbol: String,
    /// Side the event targeted
    pub side: Side,
    /// Price level that was set
    pub price: Price,
    /// Absolute size carried by the event
    pub size: u64,
    /// What the event did to the level
    pub action: AuditAction,
    /// Arrival timestamp, milliseconds since epoch
    pub received_at: u64,
}

/// Append-only sequence of applied events.
///
/// Ordering is call order and nothing is ever reordered, deduplicated or
/// deleted: two identical events append two records, since idempotency is a
/// property of book state, not of the log. External tooling reads the log
/// for replay and debugging; records are serde-ready for persistence owned
/// by that tooling.
#[derive(Debug, Default)]
pub struct AuditLog {
    records: RwLock<Vec<AuditRecord>>,
}

impl AuditLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Append a record. O(1) amortized.
    pub fn append(&self, record: AuditRecord) {
        self.records.write().push(record);
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// A point-in-time copy of every record, in append order.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.read().clone()
    }

    /// A point-in-time copy of the records for one symbol, in append order.
    ///
    /// The copy is finite and restartable: a fresh call re-derives from
    /// current state, and iterating it never holds the log's lock, so
    /// replay cannot stall appends.
    pub fn replay(&self, symbol: &str) -> Vec<AuditRecord> {
        self.records
            .read()
            .iter()
            .filter(|record| record.symbol == symbol)
            .cloned()
            .collect()
    }
}
