//! The scoring engine: owns every store and runs the write path.
//!
//! PROCESSING ORDER (fixed, documented, never reordered):
//!   1. Validate the transaction
//!   2. Record into HistoryStore      (prior profile captured first)
//!   3. Insert into WindowTracker     (evicts aged-out entries inline)
//!   4. Add counterparty edge          (RelationshipGraph)
//!   5. Screen, score, queue           (SuspicionQueue)
//!   6. Frequency check                (WindowTracker)
//!
//! RULES:
//!   - Each store sits behind its own lock; one store update is atomic,
//!     the four updates for one transaction are not.
//!   - Lock order on the write path is window → history → graph → queue.
//!   - Screening uses the user's history *before* this transaction.
//!   - Nothing is printed or delivered; outcomes are returned.

use crate::{
    clock::{Clock, SystemClock},
    config::EngineConfig,
    detector,
    error::EngineResult,
    event::{Notification, ProcessingResult},
    graph::RelationshipGraph,
    history::{HistoryStore, SpendProfile},
    pattern::PatternDetector,
    queue::{SuspicionQueue, SuspicionRecord},
    snapshot::EngineSnapshot,
    types::{Timestamp, Transaction, UserId},
    window::WindowTracker,
};
use parking_lot::{Mutex, MutexGuard, RwLock};
use std::collections::BTreeSet;
use std::sync::Arc;

pub struct FraudEngine {
    config:  EngineConfig,
    clock:   Arc<dyn Clock>,
    history: Mutex<HistoryStore>,
    window:  Mutex<WindowTracker>,
    graph:   RwLock<RelationshipGraph>,
    queue:   Mutex<SuspicionQueue>,
}

impl FraudEngine {
    pub fn new(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        let window = WindowTracker::with_secs(config.window.duration_secs);
        Self {
            config,
            clock,
            history: Mutex::new(HistoryStore::new()),
            window:  Mutex::new(window),
            graph:   RwLock::new(RelationshipGraph::new()),
            queue:   Mutex::new(SuspicionQueue::new()),
        }
    }

    /// Validate `config` before building. Configuration problems come back
    /// as `EngineError::Other`.
    pub fn try_new(config: EngineConfig, clock: Arc<dyn Clock>) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self::new(config, clock))
    }

    /// Default configuration on wall-clock time.
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default(), Arc::new(SystemClock))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// The single ingestion entry point.
    pub fn process_transaction(
        &self,
        user_id: &str,
        amount: f64,
        location: &str,
        counterparty_id: Option<&str>,
        timestamp: Timestamp,
    ) -> EngineResult<ProcessingResult> {
        let txn = Transaction::new(
            user_id,
            amount,
            location,
            counterparty_id.map(str::to_string),
            timestamp,
        );
        self.process(&txn)
    }

    /// Same as `process_transaction`, stamped with the injected clock.
    ///
    /// The clock is read under the window lock, so concurrent callers
    /// are stamped in the order they reach the window.
    pub fn process_now(
        &self,
        user_id: &str,
        amount: f64,
        location: &str,
        counterparty_id: Option<&str>,
    ) -> EngineResult<ProcessingResult> {
        let window = self.window.lock();
        let txn = Transaction::new(
            user_id,
            amount,
            location,
            counterparty_id.map(str::to_string),
            self.clock.now(),
        );
        txn.validate()?;
        window.ensure_ordered(txn.timestamp)?;
        self.apply(&txn, window)
    }

    pub fn process(&self, txn: &Transaction) -> EngineResult<ProcessingResult> {
        txn.validate()?;
        let window = self.window.lock();
        window.ensure_ordered(txn.timestamp)?;
        self.apply(txn, window)
    }

    /// Steps 2–6. The window guard is held across the history append so a
    /// clock-order rejection can only happen before any store is touched.
    fn apply(
        &self,
        txn: &Transaction,
        mut window: MutexGuard<'_, WindowTracker>,
    ) -> EngineResult<ProcessingResult> {
        let prior = {
            let mut history = self.history.lock();
            let prior = history.profile(&txn.user_id);
            history.record(&txn.user_id, txn.amount, &txn.location, txn.timestamp)?;
            prior
        };

        window.insert(&txn.user_id, txn.amount, &txn.location, txn.timestamp)?;
        let window_count = window.count_in_window(&txn.user_id);
        drop(window);

        if let Some(counterparty) = &txn.counterparty_id {
            self.graph.write().add_edge(&txn.user_id, counterparty);
        }

        let mut result = ProcessingResult::default();

        let assessment = detector::assess(txn, prior.as_ref(), &self.config);
        if assessment.flagged() {
            self.queue
                .lock()
                .push(assessment.risk_score, &txn.user_id, txn.amount);

            log::warn!(
                "Suspicious transaction for {}: ${:.2} (risk {:.2}, {:?})",
                txn.user_id,
                txn.amount,
                assessment.risk_score,
                assessment.reasons
            );

            result.flagged_suspicious = true;
            result.risk_score = Some(assessment.risk_score);
            result.notifications.push(Notification::Suspicious {
                user_id:    txn.user_id.clone(),
                amount:     txn.amount,
                risk_score: assessment.risk_score,
                reasons:    assessment.reasons,
            });
        }

        if window_count > self.config.window.frequency_threshold {
            log::info!(
                "Frequent activity for {}: {} transactions in window",
                txn.user_id,
                window_count
            );
            result.frequent_activity = true;
            result.notifications.push(Notification::Frequent {
                user_id: txn.user_id.clone(),
                amount:  txn.amount,
                window_count,
            });
        }

        Ok(result)
    }

    // ── Detector queries against current history ──────────────────

    /// Anomaly check against everything recorded so far for `user_id`.
    pub fn is_anomalous(&self, txn: &Transaction, user_id: &str) -> bool {
        let prior = self.spend_profile(user_id);
        detector::is_anomalous(txn, prior.as_ref(), &self.config.anomaly)
    }

    pub fn score(&self, txn: &Transaction, user_id: &str) -> f64 {
        let anomalous = self.is_anomalous(txn, user_id);
        detector::risk_score(txn, anomalous, &self.config.scoring, &self.config.anomaly)
    }

    pub fn is_suspicious_by_threshold(&self, txn: &Transaction) -> bool {
        detector::screen_threshold(txn, &self.config.threshold)
    }

    // ── History ───────────────────────────────────────────────────

    pub fn average_amount(&self, user_id: &str) -> Option<f64> {
        self.history.lock().average_amount(user_id)
    }

    pub fn spend_profile(&self, user_id: &str) -> Option<SpendProfile> {
        self.history.lock().profile(user_id)
    }

    pub fn history_len(&self, user_id: &str) -> usize {
        self.history.lock().entries(user_id).len()
    }

    // ── Window ────────────────────────────────────────────────────

    /// Lock the window and age it out against the injected clock first,
    /// so queries never count entries older than the span.
    fn current_window(&self) -> MutexGuard<'_, WindowTracker> {
        let mut window = self.window.lock();
        window.evict_expired(self.clock.now());
        window
    }

    pub fn count_in_window(&self, user_id: &str) -> usize {
        self.current_window().count_in_window(user_id)
    }

    pub fn is_frequent(&self, user_id: &str) -> bool {
        self.current_window()
            .is_frequent(user_id, self.config.window.frequency_threshold)
    }

    /// Evict window entries that have aged out by the injected clock.
    pub fn expire_window(&self) -> usize {
        let mut window = self.window.lock();
        window.evict_expired(self.clock.now())
    }

    // ── Suspicion queue ───────────────────────────────────────────

    pub fn pop_max(&self) -> EngineResult<SuspicionRecord> {
        self.queue.lock().pop_max()
    }

    pub fn peek_max(&self) -> Option<SuspicionRecord> {
        self.queue.lock().peek_max().cloned()
    }

    pub fn suspicion_count(&self) -> usize {
        self.queue.lock().len()
    }

    // ── Relationship graph ────────────────────────────────────────

    pub fn neighbors(&self, user_id: &str) -> BTreeSet<UserId> {
        self.graph.read().neighbors(user_id)
    }

    pub fn has_cycle_through(&self, user_id: &str) -> bool {
        PatternDetector::new(&self.graph.read()).has_cycle_through(user_id)
    }

    pub fn cycle_through(&self, user_id: &str) -> Option<Vec<UserId>> {
        PatternDetector::new(&self.graph.read()).cycle_through(user_id)
    }

    pub fn has_any_cycle(&self) -> bool {
        PatternDetector::new(&self.graph.read()).has_any_cycle()
    }

    pub fn ring_members(&self) -> Vec<UserId> {
        PatternDetector::new(&self.graph.read()).ring_members()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let (tracked_users, history_entries) = {
            let history = self.history.lock();
            (history.user_count(), history.entry_count())
        };
        let window_entries = self.window.lock().len();
        let (graph_nodes, graph_edges) = {
            let graph = self.graph.read();
            (graph.node_count(), graph.edge_count())
        };
        EngineSnapshot {
            taken_at: self.clock.now(),
            tracked_users,
            history_entries,
            window_entries,
            graph_nodes,
            graph_edges,
            queued_suspicions: self.queue.lock().len(),
        }
    }
}
