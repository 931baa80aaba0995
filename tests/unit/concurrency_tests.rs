//! Concurrent ingestion properties: per-symbol serialization and
//! cross-symbol parallelism

use mbo_orderbook::{Engine, Side};
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;

fn symbol_events(seed: u64) -> Vec<(Side, f64, i64)> {
    // Deterministic per-symbol event stream, bids kept under asks
    (0..200)
        .map(|i| {
            let side = if i % 2 == 0 { Side::Bid } else { Side::Ask };
            let price = match side {
                Side::Bid => 100.0 - ((i + seed) % 7) as f64 * 0.25,
                Side::Ask => 101.0 + ((i + seed) % 7) as f64 * 0.25,
            };
            let size = if i % 13 == 12 { 0 } else { 1 + (i % 50) as i64 };
            (side, price, size)
        })
        .collect()
}

#[test]
fn test_concurrent_symbols_match_serial_application() {
    crate::init_tracing();
    let symbols = ["AAA", "BBB", "CCC", "DDD", "EEE", "FFF", "GGG", "HHH"];

    // Serial reference: one engine, events applied symbol by symbol
    let serial = Engine::new();
    for (seed, symbol) in symbols.iter().enumerate() {
        for (side, price, size) in symbol_events(seed as u64) {
            serial.ingest(symbol, side, price, size).unwrap();
        }
    }

    // Concurrent run: one thread per symbol, all hammering one engine
    let concurrent = Arc::new(Engine::new());
    let handles: Vec<_> = symbols
        .iter()
        .enumerate()
        .map(|(seed, symbol)| {
            let engine = Arc::clone(&concurrent);
            let symbol = symbol.to_string();
            thread::spawn(move || {
                for (side, price, size) in symbol_events(seed as u64) {
                    engine.ingest(&symbol, side, price, size).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    for symbol in symbols {
        let expected = serial.get_book(symbol, 1000);
        let actual = concurrent.get_book(symbol, 1000);

        // Level prices and sizes must match exactly; update sequences are
        // engine-global and differ across interleavings
        let shape = |snap: &mbo_orderbook::BookSnapshot| {
            let bids: Vec<(u64, u64)> = snap.bids.iter().map(|l| (l.price.ticks(), l.size)).collect();
            let asks: Vec<(u64, u64)> = snap.asks.iter().map(|l| (l.price.ticks(), l.size)).collect();
            (bids, asks)
        };
        assert_eq!(shape(&expected), shape(&actual), "mismatch for {symbol}");
        assert_eq!(expected.version, actual.version, "version mismatch for {symbol}");
        assert!(concurrent.verify(symbol).is_empty());
    }
}

#[test]
fn test_same_symbol_writers_never_lose_updates() {
    let engine = Arc::new(Engine::new());
    let threads = 8;
    let events_per_thread = 100;

    // Each thread owns a disjoint set of bid prices, so the final book is
    // deterministic regardless of interleaving
    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for i in 0..events_per_thread {
                    let price = 50.0 + t as f64 + i as f64 * 0.0001;
                    engine.ingest("HOT", Side::Bid, price, 7).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let snap = engine.get_book("HOT", 10_000);
    assert_eq!(snap.bids.len(), threads * events_per_thread);
    assert!(snap.bids.iter().all(|l| l.size == 7));
    assert_eq!(snap.version as usize, threads * events_per_thread);
    assert_eq!(engine.audit().replay("HOT").len(), threads * events_per_thread);
}

#[test]
fn test_same_price_races_keep_sequence_and_size_consistent() {
    crate::init_tracing();
    let engine = Arc::new(Engine::new());

    // Every thread hammers the same price with distinct nonzero sizes and
    // reports the sequence it was assigned for each event
    let handles: Vec<_> = (0..8i64)
        .map(|worker| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                (0..100)
                    .map(|i| {
                        let size = 1 + worker * 1000 + i;
                        let applied = engine.ingest("RACE", Side::Bid, 100.0, size).unwrap();
                        (applied.sequence, size as u64)
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut size_by_sequence = HashMap::new();
    for handle in handles {
        for (sequence, size) in handle.join().unwrap() {
            size_by_sequence.insert(sequence, size);
        }
    }

    // The surviving level must show the size of the event holding the
    // highest sequence: sequence order and application order agree even
    // when writers collide on one price
    let snap = engine.get_book("RACE", 10);
    let level = &snap.bids[0];
    let last_sequence = *size_by_sequence.keys().max().unwrap();
    assert_eq!(level.last_update_sequence, last_sequence);
    assert_eq!(level.size, size_by_sequence[&last_sequence]);
}

#[test]
fn test_readers_run_alongside_writers() {
    let engine = Arc::new(Engine::new());
    engine.ingest("LIVE", Side::Bid, 100.0, 10).unwrap();
    engine.ingest("LIVE", Side::Ask, 101.0, 10).unwrap();

    let writer = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for i in 0..2000 {
                let size = 1 + (i % 40);
                engine.ingest("LIVE", Side::Bid, 100.0, size).unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let mut last_version = 0;
                for _ in 0..500 {
                    let snap = engine.get_book("LIVE", 10);
                    // Versions observed by a reader never go backwards
                    assert!(snap.version >= last_version);
                    last_version = snap.version;
                    let _ = engine.verify("LIVE");
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }

    // Writer applied every event; final size is the last one written
    let snap = engine.get_book("LIVE", 10);
    assert_eq!(snap.best_bid().map(|(_, s)| s), Some(40));
}
