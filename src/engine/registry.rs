//! Process-wide mapping from symbol to shared order book

use crate::orderbook::OrderBook;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// A book shared across callers: the `RwLock` serializes mutation per
/// symbol while snapshots and verification take the read side.
pub type SharedBook = Arc<RwLock<OrderBook>>;

/// Symbol to order book mapping, created lazily on first touch.
///
/// Books are never removed; a symbol lives for the registry's lifetime.
/// The concurrent map's entry API guarantees that two first-touches racing
/// on the same symbol converge on a single book instance, so no events can
/// land on a discarded copy.
#[derive(Debug, Default)]
pub struct BookRegistry {
    books: DashMap<String, SharedBook>,
}

impl BookRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            books: DashMap::new(),
        }
    }

    /// The book for `symbol`, creating it if absent.
    pub fn get_or_create(&self, symbol: &str) -> SharedBook {
        // Fast path for the overwhelmingly common case of an existing book.
        if let Some(book) = self.books.get(symbol) {
            return Arc::clone(book.value());
        }
        let book = self
            .books
            .entry(symbol.to_string())
            .or_insert_with(|| {
                info!(symbol, "created order book");
                Arc::new(RwLock::new(OrderBook::new(symbol)))
            });
        Arc::clone(book.value())
    }

    /// The book for `symbol` if one exists. Read paths use this so a
    /// query for an unknown symbol does not materialize a book.
    pub fn get(&self, symbol: &str) -> Option<SharedBook> {
        self.books.get(symbol).map(|book| Arc::clone(book.value()))
    }

    /// All symbols currently managed, in no particular order.
    pub fn symbols(&self) -> Vec<String> {
        self.books.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Number of books
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether no books exist yet
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}
