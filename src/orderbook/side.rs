//! One side of a book: an ordered map from price to level

use super::level::PriceLevel;
use super::types::{Price, Side};
use std::collections::BTreeMap;
use tracing::trace;

/// What an upsert did to the side book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// A new level was created
    Added,
    /// An existing level's size was replaced
    Updated,
    /// An existing level emptied and was removed
    Removed,
    /// Size zero for a price with no level; nothing to do
    Noop,
}

/// The ordered collection of price levels for one side of a symbol's book.
///
/// Levels live in a `BTreeMap` keyed by price, so priority order is a
/// property of the structure rather than a sort step: bids iterate from the
/// back (highest first), asks from the front (lowest first), and every
/// mutation lands in sorted position for free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideBook {
    side: Side,
    levels: BTreeMap<Price, PriceLevel>,
}

impl SideBook {
    /// Create an empty side book.
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    /// Which side this book holds
    pub fn side(&self) -> Side {
        self.side
    }

    /// Set the absolute size at `price`.
    ///
    /// Size zero removes the level; removing an absent level is a no-op, not
    /// an error, which makes repeated removals idempotent.
    pub fn upsert(&mut self, price: Price, size: u64, sequence: u64) -> UpsertOutcome {
        let outcome = if size == 0 {
            if self.levels.remove(&price).is_some() {
                UpsertOutcome::Removed
            } else {
                UpsertOutcome::Noop
            }
        } else if let Some(level) = self.levels.get_mut(&price) {
            level.apply_size(size, sequence);
            UpsertOutcome::Updated
        } else {
            self.levels.insert(price, PriceLevel::new(price, size, sequence));
            UpsertOutcome::Added
        };
        trace!(
            side = %self.side,
            %price,
            size,
            sequence,
            ?outcome,
            "side book upsert"
        );
        outcome
    }

    /// The best level in priority order: highest price for bids, lowest for
    /// asks. `None` when the side is empty.
    pub fn best(&self) -> Option<&PriceLevel> {
        match self.side {
            Side::Bid => self.levels.values().next_back(),
            Side::Ask => self.levels.values().next(),
        }
    }

    /// Iterate all levels in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &PriceLevel> + '_ {
        let levels: Box<dyn Iterator<Item = &PriceLevel> + '_> = match self.side {
            Side::Bid => Box::new(self.levels.values().rev()),
            Side::Ask => Box::new(self.levels.values()),
        };
        levels
    }

    /// The top `n` levels in priority order. Each call re-derives from
    /// current state; there is no cursor to invalidate.
    pub fn depth(&self, n: usize) -> impl Iterator<Item = &PriceLevel> + '_ {
        self.iter().take(n)
    }

    /// Number of populated levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Whether the side has no levels
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Total size across all levels
    pub fn total_size(&self) -> u64 {
        self.levels.values().map(PriceLevel::size).sum()
    }
}
