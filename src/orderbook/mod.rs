//! Order book reconstruction: price levels, per-side ordering and the
//! per-symbol book with apply / snapshot / verify operations.

pub mod book;
mod error;
mod level;
mod side;
mod snapshot;
mod types;


pub use book::{ApplyOutcome, OrderBook};
pub use error::{BookError, Violation};
pub use level::PriceLevel;
pub use side::{SideBook, UpsertOutcome};
pub use snapshot::{BookSnapshot, LevelSnapshot};
pub use types::{BookEvent, PRICE_SCALE, Price, Side};
