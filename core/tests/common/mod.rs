//! Shared builders for integration tests.

#![allow(dead_code)]

use chrono::{Duration, TimeZone, Utc};
use std::sync::Arc;
use txrisk_core::{
    clock::ManualClock,
    config::EngineConfig,
    types::Timestamp,
    FraudEngine,
};

/// Fixed origin so every test sees the same timeline.
pub fn origin() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

/// `origin() + secs`.
pub fn at(secs: i64) -> Timestamp {
    origin() + Duration::seconds(secs)
}

pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(origin()))
}

pub fn build(clock: Arc<ManualClock>) -> FraudEngine {
    FraudEngine::new(EngineConfig::default(), clock)
}

pub fn build_default() -> FraudEngine {
    build(manual_clock())
}
