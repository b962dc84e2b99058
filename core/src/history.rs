//! Append-only per-user transaction history.
//!
//! Entries are never removed. Retention is a deployment decision
//! and is not enforced here.

use crate::{
    error::EngineResult,
    types::{validate_amount, validate_user_id, Timestamp, UserId},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub amount:    f64,
    pub location:  String,
    pub timestamp: Timestamp,
}

/// Aggregate view of a user's recorded spend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpendProfile {
    pub count: usize,
    pub total: f64,
}

impl SpendProfile {
    pub fn mean(&self) -> f64 {
        self.total / self.count as f64
    }
}

#[derive(Debug, Default)]
pub struct HistoryStore {
    entries: HashMap<UserId, Vec<HistoryEntry>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        user_id: &str,
        amount: f64,
        location: &str,
        timestamp: Timestamp,
    ) -> EngineResult<()> {
        validate_user_id("user_id", user_id)?;
        validate_amount(amount)?;
        self.entries
            .entry(user_id.to_string())
            .or_default()
            .push(HistoryEntry {
                amount,
                location: location.to_string(),
                timestamp,
            });
        Ok(())
    }

    /// Mean recorded amount. `None` when the user has no history.
    pub fn average_amount(&self, user_id: &str) -> Option<f64> {
        self.profile(user_id).map(|p| p.mean())
    }

    pub fn profile(&self, user_id: &str) -> Option<SpendProfile> {
        let entries = self.entries.get(user_id).filter(|e| !e.is_empty())?;
        Some(SpendProfile {
            count: entries.len(),
            total: entries.iter().map(|e| e.amount).sum(),
        })
    }

    pub fn entries(&self, user_id: &str) -> &[HistoryEntry] {
        self.entries.get(user_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn user_count(&self) -> usize {
        self.entries.len()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}
