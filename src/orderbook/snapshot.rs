//! Order book snapshots for market data consumers

use super::types::Price;
use crate::utils::current_time_millis;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A single price level copied out of the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    /// The level's price
    pub price: Price,
    /// Aggregate size at the level
    pub size: u64,
    /// Sequence number of the level's most recent update
    pub last_update_sequence: u64,
}

/// An immutable view of one symbol's book at a point in time.
///
/// Levels are in priority order: `bids` descending by price, `asks`
/// ascending, so index 0 on each side is top-of-book. The snapshot carries
/// the book `version` at capture time; two reads returning different
/// versions bracket at least one mutation, which gives callers an optimistic
/// staleness signal without holding any lock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSnapshot {
    /// The symbol this snapshot describes
    pub symbol: String,

    /// Book version at capture time (0 for a book that never saw an event)
    pub version: u64,

    /// Capture timestamp, milliseconds since epoch
    pub timestamp: u64,

    /// Bid levels, best (highest) first
    pub bids: Vec<LevelSnapshot>,

    /// Ask levels, best (lowest) first
    pub asks: Vec<LevelSnapshot>,
}

impl BookSnapshot {
    /// An empty snapshot for a symbol with no book yet.
    pub fn empty(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            version: 0,
            timestamp: current_time_millis(),
            bids: Vec::new(),
            asks: Vec::new(),
        }
    }

    /// Best bid price and size, if the bid side is non-empty.
    pub fn best_bid(&self) -> Option<(Price, u64)> {
        let best = self.bids.first().map(|level| (level.price, level.size));
        trace!("best_bid: {:?}", best);
        best
    }

    /// Best ask price and size, if the ask side is non-empty.
    pub fn best_ask(&self) -> Option<(Price, u64)> {
        let best = self.asks.first().map(|level| (level.price, level.size));
        trace!("best_ask: {:?}", best);
        best
    }

    /// Mid price (average of best bid and best ask).
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => Some((bid.as_f64() + ask.as_f64()) / 2.0),
            _ => None,
        }
    }

    /// Spread in ticks (best ask - best bid). `None` when either side is
    /// empty; saturates instead of going negative for a crossed book.
    pub fn spread_ticks(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => Some(ask.ticks().saturating_sub(bid.ticks())),
            _ => None,
        }
    }

    /// Total size on the bid side.
    pub fn total_bid_size(&self) -> u64 {
        self.bids.iter().map(|level| level.size).sum()
    }

    /// Total size on the ask side.
    pub fn total_ask_size(&self) -> u64 {
        self.asks.iter().map(|level| level.size).sum()
    }

    /// Whether both sides are empty.
    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}
