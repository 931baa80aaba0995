//! # In-Memory MBO Order Book Engine
//!
//! A thread-safe, in-memory limit order book engine for market-by-order
//! (MBO) feeds. The engine ingests already-parsed events (symbol, side,
//! price, absolute size at that price) and maintains a consistent,
//! queryable view of top-of-book and full depth per symbol, while checking
//! exchange-level correctness invariants on the reconstructed state.
//!
//! ## Key Features
//!
//! - **Faithful reconstruction**: events are applied exactly as received.
//!   A feed that crosses its own book produces a crossed book; the anomaly
//!   is flagged through a separate verification query, never silently
//!   corrected and never rolled back.
//!
//! - **Ordered price levels**: each side of a book is an ordered map keyed
//!   by fixed-point price, so priority order (highest bid first, lowest ask
//!   first) holds after every mutation without a sort step, and floating
//!   point can never reorder or conflate levels.
//!
//! - **Concurrent by symbol**: a lock-free registry maps symbols to books
//!   created on first touch. Mutations on the same symbol are serialized by
//!   that book's write lock; unrelated symbols proceed fully in parallel,
//!   and reads copy out a version-tagged snapshot instead of holding locks.
//!
//! - **Audit trail**: every applied event lands in an append-only log in
//!   arrival order, replayable per symbol for reconstruction and debugging.
//!
//! - **Built-in metrics**: bounded latency sampling with interpolated
//!   percentiles, sliding-window throughput and error rate.
//!
//! ## Non-Goals
//!
//! The engine does not match or execute orders, does not persist state
//! across restarts, and speaks no network protocol. Transports, request
//! validation formats and on-disk persistence belong to the caller; the
//! contract is the [`Engine`] API and its failure conditions.
//!
//! ## Example
//!
//! ```
//! use mbo_orderbook::{Engine, Side};
//!
//! let engine = Engine::new();
//! engine.ingest("TST", Side::Bid, 100.0, 10).unwrap();
//! engine.ingest("TST", Side::Ask, 101.0, 5).unwrap();
//!
//! let snapshot = engine.get_book("TST", 10);
//! assert_eq!(snapshot.best_bid().map(|(p, s)| (p.as_f64(), s)), Some((100.0, 10)));
//! assert!(engine.verify("TST").is_empty());
//! ```

pub mod engine;
pub mod orderbook;

mod utils;

pub use engine::{
    Applied, AuditAction, AuditLog, AuditRecord, BookRegistry, Engine, Health, MetricsCollector,
    MetricsReport, Operation, SharedBook,
};
pub use orderbook::{
    ApplyOutcome, BookError, BookEvent, BookSnapshot, LevelSnapshot, OrderBook, Price, PriceLevel,
    Side, SideBook, UpsertOutcome, Violation,
};
pub use utils::current_time_millis;
