//! Alert delivery seam.
//!
//! The engine returns notifications; a driving program hands them to
//! one or more sinks.

use crate::{
    error::EngineResult,
    event::Notification,
    store::AlertStore,
    types::RunId,
};

pub trait AlertSink {
    fn deliver(&mut self, notification: &Notification) -> EngineResult<()>;
}

/// Writes notifications through the `log` facade.
#[derive(Debug, Default)]
pub struct LogSink;

impl AlertSink for LogSink {
    fn deliver(&mut self, notification: &Notification) -> EngineResult<()> {
        match notification {
            Notification::Suspicious { user_id, amount, risk_score, reasons } => log::warn!(
                "ALERT suspicious user={user_id} amount={amount:.2} risk={risk_score:.2} reasons={reasons:?}"
            ),
            Notification::Frequent { user_id, amount, window_count } => log::warn!(
                "ALERT frequent user={user_id} amount={amount:.2} window_count={window_count}"
            ),
        }
        Ok(())
    }
}

/// Persists notifications into the SQLite alert log under one run.
pub struct StoreSink {
    store:  AlertStore,
    run_id: RunId,
    seq:    u64,
}

impl StoreSink {
    pub fn new(store: AlertStore, run_id: RunId) -> Self {
        Self { store, run_id, seq: 0 }
    }

    pub fn store(&self) -> &AlertStore {
        &self.store
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}

impl AlertSink for StoreSink {
    fn deliver(&mut self, notification: &Notification) -> EngineResult<()> {
        self.seq += 1;
        self.store
            .append_notification(&self.run_id, self.seq, notification)
    }
}
