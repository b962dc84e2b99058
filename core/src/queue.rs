//! Risk-ranked queue of flagged transactions.
//!
//! ORDER (total, highest first):
//!   1. risk_score descending
//!   2. user_id ascending
//!   3. amount ascending
//!
//! Records leave only through pop_max; nothing expires them.

use crate::{
    error::{EngineError, EngineResult},
    types::UserId,
};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspicionRecord {
    pub risk_score: f64,
    pub user_id:    UserId,
    pub amount:     f64,
}

impl SuspicionRecord {
    pub fn new(risk_score: f64, user_id: impl Into<UserId>, amount: f64) -> Self {
        Self { risk_score, user_id: user_id.into(), amount }
    }
}

// "Greater" means "pops first" in the max-heap.
impl Ord for SuspicionRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.risk_score
            .total_cmp(&other.risk_score)
            .then_with(|| other.user_id.cmp(&self.user_id))
            .then_with(|| other.amount.total_cmp(&self.amount))
    }
}

impl PartialOrd for SuspicionRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SuspicionRecord {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SuspicionRecord {}

#[derive(Debug, Default)]
pub struct SuspicionQueue {
    heap: BinaryHeap<SuspicionRecord>,
}

impl SuspicionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, risk_score: f64, user_id: &str, amount: f64) {
        self.heap.push(SuspicionRecord::new(risk_score, user_id, amount));
    }

    pub fn push_record(&mut self, record: SuspicionRecord) {
        self.heap.push(record);
    }

    pub fn pop_max(&mut self) -> EngineResult<SuspicionRecord> {
        self.heap.pop().ok_or(EngineError::EmptyQueue)
    }

    pub fn peek_max(&self) -> Option<&SuspicionRecord> {
        self.heap.peek()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
