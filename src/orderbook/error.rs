//! Order book error types and invariant violations

use super::types::{Price, Side};
use serde::Serialize;
use std::fmt;

/// Errors that reject an individual event at the boundary.
///
/// A rejected event degrades only itself: the engine and every other book
/// are untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum BookError {
    /// Negative size on an incoming event
    InvalidQuantity {
        /// The size that was rejected
        size: i64,
    },

    /// Non-positive or non-finite price
    InvalidPrice {
        /// The price that was rejected
        price: f64,
    },

    /// Empty or malformed symbol identifier
    InvalidSymbol {
        /// The symbol that was rejected
        symbol: String,
    },
}

impl fmt::Display for BookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookError::InvalidQuantity { size } => {
                write!(f, "Invalid quantity: size must be non-negative, got {}", size)
            }
            BookError::InvalidPrice { price } => {
                write!(f, "Invalid price: must be finite and positive, got {}", price)
            }
            BookError::InvalidSymbol { symbol } => {
                write!(f, "Invalid symbol: {:?}", symbol)
            }
        }
    }
}

impl std::error::Error for BookError {}

/// An invariant violation found by a verification sweep.
///
/// Violations are data, not errors: an upstream feed that produces a crossed
/// book is a fact to report, so ingestion never fails or rolls back because
/// of one. They are collected by `OrderBook::verify` and serialized for the
/// caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Violation {
    /// Best bid is at or above best ask
    CrossedBook {
        /// Best bid at the time of the sweep
        best_bid: Price,
        /// Best ask at the time of the sweep
        best_ask: Price,
    },

    /// A retained level with size zero, which should have been removed
    NonPositiveSize {
        /// Side holding the level
        side: Side,
        /// Price of the offending level
        price: Price,
    },

    /// Two adjacent levels out of priority order
    MisorderedLevels {
        /// Side holding the levels
        side: Side,
        /// The earlier level in iteration order
        prev: Price,
        /// The later level that breaks the ordering
        next: Price,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::CrossedBook { best_bid, best_ask } => {
                write!(f, "Crossing: best bid {} >= best ask {}", best_bid, best_ask)
            }
            Violation::NonPositiveSize { side, price } => {
                write!(f, "Non-positive size retained at {} level {}", side, price)
            }
            Violation::MisorderedLevels { side, prev, next } => {
                write!(f, "{} levels out of order: {} before {}", side, prev, next)
            }
        }
    }
}
