//! Engine clock, the single source of "now".
//!
//! RULE: Nothing in the engine reads wall-clock time directly.
//! Callers inject a Clock so window arithmetic is reproducible in tests.

use crate::types::Timestamp;
use chrono::{Duration, Utc};
use parking_lot::Mutex;

/// Supplies the current instant. Readings must be non-decreasing.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time. Used by the runner when transactions carry no timestamp.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}

/// A hand-driven clock for tests and replays.
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self { current: Mutex::new(start) }
    }

    /// Move forward by `by`. Returns the new instant.
    /// Panics on a negative step; a manual clock must stay monotonic.
    pub fn advance(&self, by: Duration) -> Timestamp {
        assert!(by >= Duration::zero(), "ManualClock cannot move backwards");
        let mut current = self.current.lock();
        *current += by;
        *current
    }

    pub fn advance_secs(&self, secs: i64) -> Timestamp {
        self.advance(Duration::seconds(secs))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.current.lock()
    }
}
