//! Concurrent ingestion against one shared engine.
//!
//! Writers stamp through the injected clock; a reader drains the
//! suspicion queue at the same time. No update may be lost.

mod common;

use common::{build, manual_clock};
use std::sync::Arc;
use std::thread;
use txrisk_core::FraudEngine;

const WRITERS: usize = 8;
const PER_WRITER: usize = 200;

#[test]
fn concurrent_writers_lose_no_updates() {
    let clock = manual_clock();
    let engine = Arc::new(build(clock.clone()));

    let handles: Vec<_> = (0..WRITERS)
        .map(|w| {
            let engine = Arc::clone(&engine);
            let clock = Arc::clone(&clock);
            thread::spawn(move || {
                let user = format!("writer_{w}");
                let peer = format!("writer_{}", (w + 1) % WRITERS);
                let mut flagged = 0usize;
                for i in 0..PER_WRITER {
                    // Every tenth transaction crosses the threshold.
                    let amount = if i % 10 == 0 { 15_000.0 } else { 10.0 };
                    let result = engine
                        .process_now(&user, amount, "X", Some(peer.as_str()))
                        .expect("clock-stamped ingestion never violates order");
                    if result.flagged_suspicious {
                        flagged += 1;
                    }
                    clock.advance_secs(1);
                }
                flagged
            })
        })
        .collect();

    let flagged: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

    for w in 0..WRITERS {
        assert_eq!(engine.history_len(&format!("writer_{w}")), PER_WRITER);
    }
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.history_entries, WRITERS * PER_WRITER);
    assert_eq!(snapshot.queued_suspicions, flagged);
    assert_eq!(snapshot.graph_edges, WRITERS);
    assert!(engine.has_cycle_through("writer_0"), "writers form one ring");
}

#[test]
fn reader_drains_while_writers_push() {
    let clock = manual_clock();
    let engine: Arc<FraudEngine> = Arc::new(build(clock.clone()));

    let writer = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for i in 0..500 {
                engine
                    .process_now(&format!("u{}", i % 25), 20_000.0 + i as f64, "X", None)
                    .unwrap();
            }
        })
    };
    let reader = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            let mut popped = 0usize;
            for _ in 0..2_000 {
                if engine.pop_max().is_ok() {
                    popped += 1;
                }
            }
            popped
        })
    };

    writer.join().unwrap();
    let popped = reader.join().unwrap();

    assert_eq!(popped + engine.suspicion_count(), 500, "every flagged record is popped or queued");
}
