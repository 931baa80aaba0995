//! A single price level: aggregate size plus time-priority metadata

use super::snapshot::LevelSnapshot;
use super::types::Price;

/// Aggregate state at one price point on one side of a book.
///
/// Levels only exist while their size is positive; `apply_size` reports when
/// a level has emptied so the owning side book can remove it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceLevel {
    price: Price,
    size: u64,
    last_update_sequence: u64,
}

impl PriceLevel {
    /// Create a level with its first non-zero size.
    pub fn new(price: Price, size: u64, sequence: u64) -> Self {
        Self {
            price,
            size,
            last_update_sequence: sequence,
        }
    }

    /// Set the absolute size at this level (MBO semantics, not a delta).
    ///
    /// Returns `true` when the level is now empty and must be removed by the
    /// caller. Negative sizes are rejected upstream at the boundary, so the
    /// size here is already known to be valid.
    pub fn apply_size(&mut self, size: u64, sequence: u64) -> bool {
        self.size = size;
        self.last_update_sequence = sequence;
        self.size == 0
    }

    /// The price of this level
    pub fn price(&self) -> Price {
        self.price
    }

    /// Current aggregate size
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Sequence number of the most recent update, the time-priority tie-break
    pub fn last_update_sequence(&self) -> u64 {
        self.last_update_sequence
    }

    /// Copy the level out as snapshot data.
    pub fn snapshot(&self) -> LevelSnapshot {
        LevelSnapshot {
            price: self.price,
            size: self.size,
            last_update_sequence: self.last_update_sequence,
        }
    }
}
