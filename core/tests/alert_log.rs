//! Alert sinks: notifications flow from engine results into SQLite.

mod common;

use common::{at, build_default};
use txrisk_core::{
    alert::{AlertSink, LogSink, StoreSink},
    event::Notification,
    store::AlertStore,
};

fn migrated_store() -> AlertStore {
    let store = AlertStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

#[test]
fn store_sink_persists_engine_notifications() {
    let engine = build_default();
    let mut sink = StoreSink::new(migrated_store(), "alert-test".into());

    for i in 0..6 {
        let amount = if i == 2 { 25_000.0 } else { 40.0 };
        let result = engine
            .process_transaction("hot", amount, "X", None, at(i * 30))
            .unwrap();
        for notification in &result.notifications {
            sink.deliver(notification).unwrap();
        }
    }

    assert_eq!(sink.store().count_by_kind("alert-test", "suspicious").unwrap(), 1);
    assert_eq!(sink.store().count_by_kind("alert-test", "frequent").unwrap(), 1);

    let entries = sink.store().notifications_for_run("alert-test").unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].seq, 1);
    assert_eq!(entries[0].kind, "suspicious");
    // Threshold plus anomaly: 25 000 is far above the 40.0 average.
    assert_eq!(entries[0].risk_score, Some(35.0));
    assert_eq!(entries[1].kind, "frequent");
    assert_eq!(entries[1].risk_score, None);
    assert!(matches!(
        entries[1].notification,
        Notification::Frequent { window_count: 6, .. }
    ));
}

#[test]
fn runs_are_isolated() {
    let store = migrated_store();
    let notification = Notification::Frequent {
        user_id:      "u".into(),
        amount:       1.0,
        window_count: 9,
    };
    store.append_notification("run-a", 1, &notification).unwrap();

    assert_eq!(store.notifications_for_run("run-a").unwrap().len(), 1);
    assert!(store.notifications_for_run("run-b").unwrap().is_empty());
}

#[test]
fn duplicate_sequence_rejected() {
    let store = migrated_store();
    let notification = Notification::Frequent {
        user_id:      "u".into(),
        amount:       1.0,
        window_count: 9,
    };
    store.append_notification("run", 1, &notification).unwrap();
    assert!(store.append_notification("run", 1, &notification).is_err());
}

#[test]
fn log_sink_accepts_everything() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut sink = LogSink;
    let notification = Notification::Suspicious {
        user_id:    "u".into(),
        amount:     12_000.0,
        risk_score: 12.0,
        reasons:    vec![],
    };
    assert!(sink.deliver(&notification).is_ok());
}
