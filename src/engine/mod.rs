//! Engine facade: the boundary between an external transport layer and the
//! order book core. Validates raw inputs into typed events, routes them to
//! per-symbol books, and exposes snapshot, verification, metrics and
//! liveness queries.

mod audit;
mod metrics;
mod registry;


pub use audit::{AuditAction, AuditLog, AuditRecord};
pub use metrics::{DEFAULT_SAMPLE_CAPACITY, MetricsCollector, MetricsReport, Operation};
pub use registry::{BookRegistry, SharedBook};

use crate::orderbook::{BookError, BookEvent, BookSnapshot, Price, Side, Violation};
use crate::utils::current_time_millis;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, warn};

/// Longest symbol identifier accepted at the boundary.
pub const MAX_SYMBOL_LEN: usize = 32;

/// Result of a successful ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Applied {
    /// Book version after the event was applied
    pub version: u64,
    /// Engine-wide sequence number assigned to the event
    pub sequence: u64,
}

/// Pure liveness signal; touches no book state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Health {
    /// Always `"ok"` for a running engine
    pub status: &'static str,
}

/// The order book engine.
///
/// Owns the registry, audit log, metrics and the global event sequence.
/// Explicitly constructed and passed by reference rather than living in a
/// process-wide singleton, so tests and embedders build isolated instances.
///
/// All methods take `&self`: callers on different symbols mutate fully in
/// parallel, callers on the same symbol are serialized by that book's write
/// lock, and reads take a point-in-time copy without blocking writers for
/// longer than the copy takes.
#[derive(Debug, Default)]
pub struct Engine {
    registry: BookRegistry,
    audit: AuditLog,
    metrics: MetricsCollector,
    sequence: AtomicU64,
}

impl Engine {
    /// Create an engine with no books.
    pub fn new() -> Self {
        Self {
            registry: BookRegistry::new(),
            audit: AuditLog::new(),
            metrics: MetricsCollector::new(),
            sequence: AtomicU64::new(0),
        }
    }

    /// Ingest a raw event: validate, apply to the symbol's book, audit, and
    /// record the latency sample.
    ///
    /// Validation runs before any mutation, so a rejected event touches
    /// nothing: the price-level update and the audit record happen together
    /// or not at all. A crossing book never fails ingest; it is surfaced by
    /// [`Engine::verify`].
    pub fn ingest(
        &self,
        symbol: &str,
        side: Side,
        price: f64,
        size: i64,
    ) -> Result<Applied, BookError> {
        let start = Instant::now();
        let result = self.apply_validated(symbol, side, price, size);
        match &result {
            Ok(applied) => {
                self.metrics.record_apply(start.elapsed());
                debug!(
                    symbol,
                    %side,
                    price,
                    size,
                    version = applied.version,
                    sequence = applied.sequence,
                    "ingested event"
                );
            }
            Err(err) => {
                self.metrics.record_failure();
                warn!(symbol, %side, price, size, %err, "rejected event");
            }
        }
        result
    }

    fn apply_validated(
        &self,
        symbol: &str,
        side: Side,
        price: f64,
        size: i64,
    ) -> Result<Applied, BookError> {
        validate_symbol(symbol)?;
        let size = validate_size(size)?;
        let price = Price::from_f64(price)?;

        let book = self.registry.get_or_create(symbol);
        let mut guard = book.write();
        // Assigned under the write guard: within a symbol, sequence order
        // and application order must agree, or a level's
        // `last_update_sequence` could name an event that lost the race.
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let event = BookEvent {
            side,
            price,
            size,
            sequence,
        };
        let outcome = guard.apply(&event);
        // Appended under the book's write guard so per-symbol audit order
        // always matches application order.
        self.audit.append(AuditRecord {
            sequence,
            symbol: symbol.to_string(),
            side,
            price,
            size,
            action: outcome.upsert.into(),
            received_at: current_time_millis(),
        });
        drop(guard);

        Ok(Applied {
            version: outcome.version,
            sequence,
        })
    }

    /// Snapshot the top `depth` levels per side for `symbol`.
    ///
    /// An unknown symbol yields an empty snapshot (version 0) rather than
    /// an error, and the read never creates a book.
    pub fn get_book(&self, symbol: &str, depth: usize) -> BookSnapshot {
        let start = Instant::now();
        let snapshot = match self.registry.get(symbol) {
            Some(book) => book.read().snapshot(depth),
            None => BookSnapshot::empty(symbol),
        };
        self.metrics.record(Operation::Snapshot, start.elapsed());
        snapshot
    }

    /// Run a verification sweep over `symbol`'s book. Unknown symbols and
    /// clean books both return no violations.
    pub fn verify(&self, symbol: &str) -> Vec<Violation> {
        let start = Instant::now();
        let violations = match self.registry.get(symbol) {
            Some(book) => book.read().verify(),
            None => Vec::new(),
        };
        self.metrics.record(Operation::Verify, start.elapsed());
        violations
    }

    /// Aggregated latency percentiles, throughput, error rate and uptime.
    pub fn get_metrics(&self) -> MetricsReport {
        self.metrics.report()
    }

    /// Liveness signal with no book access.
    pub fn health(&self) -> Health {
        Health { status: "ok" }
    }

    /// The audit trail, for replay and external persistence tooling.
    pub fn audit(&self) -> &AuditLog {
        &self.audit
    }

    /// The symbol registry.
    pub fn registry(&self) -> &BookRegistry {
        &self.registry
    }

    /// The metrics collector.
    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }
}

fn validate_symbol(symbol: &str) -> Result<(), BookError> {
    if symbol.is_empty()
        || symbol.len() > MAX_SYMBOL_LEN
        || symbol.chars().any(char::is_whitespace)
    {
        return Err(BookError::InvalidSymbol {
            symbol: symbol.to_string(),
        });
    }
    Ok(())
}

fn validate_size(size: i64) -> Result<u64, BookError> {
    if size < 0 {
        return Err(BookError::InvalidQuantity { size });
    }
    Ok(size as u64)
}
