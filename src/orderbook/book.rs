//! Core OrderBook implementation pairing the two sides of one symbol

use super::error::Violation;
use super::side::{SideBook, UpsertOutcome};
use super::snapshot::BookSnapshot;
use super::types::{BookEvent, Price, Side};
use crate::utils::current_time_millis;
use tracing::{trace, warn};

/// What an applied event did to the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Book version after the mutation
    pub version: u64,
    /// What the upsert did on the targeted side
    pub upsert: UpsertOutcome,
    /// Set when the book is crossed after this event: (best bid, best ask)
    pub crossed: Option<(Price, Price)>,
}

/// One symbol's limit order book, reconstructed from MBO events.
///
/// The book applies events faithfully even when they leave the market in an
/// inconsistent state: a crossing event is recorded and flagged, never
/// rejected or rolled back, because reconstruction must reflect what the
/// feed actually said. `verify` reports the damage separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBook {
    symbol: String,
    bids: SideBook,
    asks: SideBook,
    version: u64,
}

impl OrderBook {
    /// Create an empty book for the given symbol.
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            bids: SideBook::new(Side::Bid),
            asks: SideBook::new(Side::Ask),
            version: 0,
        }
    }

    /// The symbol of this order book
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Version counter, incremented on every applied event
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The side book for `side`
    pub fn side(&self, side: Side) -> &SideBook {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    /// Best bid price, if any
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.best().map(|level| level.price())
    }

    /// Best ask price, if any
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.best().map(|level| level.price())
    }

    /// Mid price (average of best bid and best ask)
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid.as_f64() + ask.as_f64()) / 2.0),
            _ => None,
        }
    }

    /// Spread in ticks (best ask - best bid), saturating for a crossed book
    pub fn spread_ticks(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.ticks().saturating_sub(bid.ticks())),
            _ => None,
        }
    }

    /// Apply a validated event: upsert the targeted side, bump the version
    /// and check for crossing.
    ///
    /// A crossing result is reported in the outcome and logged, but the
    /// mutation stands; the feed said it, so the book shows it.
    pub fn apply(&mut self, event: &BookEvent) -> ApplyOutcome {
        let book_side = match event.side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        };
        let upsert = book_side.upsert(event.price, event.size, event.sequence);
        self.version += 1;

        let crossed = self.crossed();
        if let Some((bid, ask)) = crossed {
            warn!(
                symbol = %self.symbol,
                best_bid = %bid,
                best_ask = %ask,
                sequence = event.sequence,
                "book crossed after applied event"
            );
        }
        trace!(
            symbol = %self.symbol,
            side = %event.side,
            price = %event.price,
            size = event.size,
            version = self.version,
            "applied event"
        );

        ApplyOutcome {
            version: self.version,
            upsert,
            crossed,
        }
    }

    /// Best bid/ask pair when the book is currently crossed.
    fn crossed(&self) -> Option<(Price, Price)> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) if bid >= ask => Some((bid, ask)),
            _ => None,
        }
    }

    /// Copy out an immutable view of the top `depth` levels per side,
    /// tagged with the current version.
    pub fn snapshot(&self, depth: usize) -> BookSnapshot {
        BookSnapshot {
            symbol: self.symbol.clone(),
            version: self.version,
            timestamp: current_time_millis(),
            bids: self.bids.depth(depth).map(|level| level.snapshot()).collect(),
            asks: self.asks.depth(depth).map(|level| level.snapshot()).collect(),
        }
    }

    /// Re-check every invariant over current state and return the
    /// violations found. Read-only; an empty result means a clean book.
    pub fn verify(&self) -> Vec<Violation> {
        let mut violations = Vec::new();

        if let Some((best_bid, best_ask)) = self.crossed() {
            violations.push(Violation::CrossedBook { best_bid, best_ask });
        }
        self.verify_side(&self.bids, &mut violations);
        self.verify_side(&self.asks, &mut violations);

        trace!(
            symbol = %self.symbol,
            violations = violations.len(),
            "verification sweep"
        );
        violations
    }

    /// Walk one side in priority order checking positive sizes and strict
    /// price ordering. The BTreeMap makes misordering unreachable in
    /// practice; the sweep proves it from observed state rather than from
    /// the data structure's contract.
    fn verify_side(&self, book_side: &SideBook, violations: &mut Vec<Violation>) {
        let side = book_side.side();
        let mut prev: Option<Price> = None;
        for level in book_side.iter() {
            if level.size() == 0 {
                violations.push(Violation::NonPositiveSize {
                    side,
                    price: level.price(),
                });
            }
            if let Some(prev_price) = prev {
                let ordered = match side {
                    Side::Bid => prev_price > level.price(),
                    Side::Ask => prev_price < level.price(),
                };
                if !ordered {
                    violations.push(Violation::MisorderedLevels {
                        side,
                        prev: prev_price,
                        next: level.price(),
                    });
                }
            }
            prev = Some(level.price());
        }
    }
}
