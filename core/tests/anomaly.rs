//! History and anomaly tests: average spend, the strict 2× rule,
//! risk-score bonus, and input validation.

mod common;

use common::{at, build_default};
use txrisk_core::{
    error::EngineError,
    event::{FlagReason, Notification},
    history::HistoryStore,
    types::Transaction,
};

fn seed_history(engine: &txrisk_core::FraudEngine, user: &str, amounts: &[f64]) -> i64 {
    for (i, amount) in amounts.iter().enumerate() {
        engine
            .process_transaction(user, *amount, "Home", None, at(i as i64))
            .unwrap();
    }
    amounts.len() as i64
}

#[test]
fn average_has_no_history_sentinel() {
    let store = HistoryStore::new();
    assert_eq!(store.average_amount("nobody"), None);
    assert!(store.entries("nobody").is_empty());
}

#[test]
fn average_is_arithmetic_mean() {
    let mut store = HistoryStore::new();
    store.record("u", 100.0, "A", at(0)).unwrap();
    store.record("u", 300.0, "B", at(1)).unwrap();
    assert_eq!(store.average_amount("u"), Some(200.0));
    assert_eq!(store.entries("u").len(), 2);
    assert_eq!(store.entries("u")[1].location, "B");
}

#[test]
fn negative_amount_rejected() {
    let mut store = HistoryStore::new();
    let err = store.record("u", -1.0, "A", at(0)).unwrap_err();
    assert!(matches!(err, EngineError::Validation { field: "amount", .. }), "got {err:?}");
    assert_eq!(store.user_count(), 0);
}

/// History [100, 100, 100]: 201 is anomalous, 200 is not.
#[test]
fn anomaly_ratio_is_strict() {
    let engine = build_default();
    let next = seed_history(&engine, "U", &[100.0, 100.0, 100.0]);

    let at_limit = engine
        .process_transaction("U", 200.0, "Home", None, at(next))
        .unwrap();
    assert!(!at_limit.flagged_suspicious, "200 is exactly 2× the average");

    let engine = build_default();
    let next = seed_history(&engine, "U", &[100.0, 100.0, 100.0]);
    let over = engine
        .process_transaction("U", 201.0, "Home", None, at(next))
        .unwrap();
    assert!(over.flagged_suspicious, "201 exceeds 2× the average");
    assert_eq!(over.risk_score, Some(0.201 + 10.0));

    match &over.notifications[0] {
        Notification::Suspicious { reasons, .. } => {
            assert_eq!(reasons, &vec![FlagReason::AnomalousSpend]);
        }
        other => panic!("expected suspicious notification, got {other:?}"),
    }
}

/// The first transaction for a user is never anomalous, however large.
#[test]
fn first_transaction_is_not_anomalous() {
    let engine = build_default();
    let result = engine
        .process_transaction("fresh", 9_999.0, "Home", None, at(0))
        .unwrap();
    assert!(!result.flagged_suspicious);
    assert_eq!(engine.average_amount("fresh"), Some(9_999.0));
}

/// Store-backed queries read the history as it stands now.
#[test]
fn engine_queries_use_current_history() {
    let engine = build_default();
    let next = seed_history(&engine, "U", &[100.0, 100.0, 100.0]);

    let candidate = Transaction::new("U", 250.0, "Home", None, at(next));
    assert!(engine.is_anomalous(&candidate, "U"));
    assert_eq!(engine.score(&candidate, "U"), 0.25 + 10.0);
    assert!(!engine.is_anomalous(&candidate, "stranger"));
    assert_eq!(engine.score(&candidate, "stranger"), 0.25);
    assert!(!engine.is_suspicious_by_threshold(&candidate));
}

#[test]
fn empty_user_rejected_before_any_store() {
    let engine = build_default();
    let err = engine
        .process_transaction("  ", 10.0, "Home", Some("x"), at(0))
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation { field: "user_id", .. }), "got {err:?}");
    assert_eq!(engine.snapshot().history_entries, 0);
    assert_eq!(engine.snapshot().graph_nodes, 0);
}

#[test]
fn non_finite_amount_rejected() {
    let engine = build_default();
    assert!(engine
        .process_transaction("u", f64::NAN, "Home", None, at(0))
        .is_err());
    assert!(engine
        .process_transaction("u", f64::INFINITY, "Home", None, at(0))
        .is_err());
    assert_eq!(engine.history_len("u"), 0);
}
