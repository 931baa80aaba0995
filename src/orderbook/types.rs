//! Core market data types: side, fixed-point price and the validated event record

use super::error::BookError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of price ticks per whole unit (4 decimal places).
pub const PRICE_SCALE: u64 = 10_000;

/// The side of the book an event or level belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy side, best price is the highest
    Bid,
    /// Sell side, best price is the lowest
    Ask,
}

impl Side {
    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "bid"),
            Side::Ask => write!(f, "ask"),
        }
    }
}

/// A price expressed in fixed-point ticks.
///
/// Prices arrive at the boundary as `f64` but are converted once, through
/// [`Price::from_f64`], into integer ticks. All ordering and equality inside
/// the book is integer comparison, so two levels can never be conflated or
/// reordered by floating-point rounding.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Price(u64);

impl Price {
    /// Convert a raw price into ticks, rejecting values that cannot
    /// represent a valid quote: NaN, infinities, zero and negatives.
    pub fn from_f64(value: f64) -> Result<Self, BookError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(BookError::InvalidPrice { price: value });
        }
        let ticks = (value * PRICE_SCALE as f64).round();
        // Beyond this the conversion back to u64 is no longer exact.
        if ticks < 1.0 || ticks >= 9.0e18 {
            return Err(BookError::InvalidPrice { price: value });
        }
        Ok(Price(ticks as u64))
    }

    /// Build a price directly from ticks.
    pub fn from_ticks(ticks: u64) -> Self {
        Price(ticks)
    }

    /// The raw tick count.
    pub fn ticks(self) -> u64 {
        self.0
    }

    /// The price as a float, for display and reporting only.
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / PRICE_SCALE as f64
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_f64())
    }
}

/// A fully validated market-by-order event, ready to be applied to a book.
///
/// `size` is the absolute resulting size at `price`, not a delta: size zero
/// means the level is gone. `sequence` is the engine-wide arrival counter
/// used for time-priority tie-breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookEvent {
    /// Which side of the book the event targets
    pub side: Side,
    /// The price level being set
    pub price: Price,
    /// Absolute size at the level after this event
    pub size: u64,
    /// Monotonic arrival sequence number
    pub sequence: u64,
}
