//! Sliding time window over all users' recent transactions.
//!
//! One shared FIFO buffer, not partitioned per user. Inserts must
//! arrive in non-decreasing timestamp order; eviction relies on it.

use crate::{
    error::{EngineError, EngineResult},
    types::{Timestamp, UserId},
};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowEntry {
    pub user_id:   UserId,
    pub amount:    f64,
    pub location:  String,
    pub timestamp: Timestamp,
}

#[derive(Debug)]
pub struct WindowTracker {
    span:    Duration,
    entries: VecDeque<WindowEntry>,
}

impl WindowTracker {
    pub fn new(span: Duration) -> Self {
        Self { span, entries: VecDeque::new() }
    }

    /// Span in seconds. Values past chrono's range saturate rather than panic.
    pub fn with_secs(secs: i64) -> Self {
        Self::new(Duration::try_seconds(secs).unwrap_or(Duration::MAX))
    }

    pub fn span(&self) -> Duration {
        self.span
    }

    /// Fails if `timestamp` precedes the newest resident entry.
    pub fn ensure_ordered(&self, timestamp: Timestamp) -> EngineResult<()> {
        match self.entries.back() {
            Some(last) if timestamp < last.timestamp => Err(EngineError::ClockOrderViolation {
                last:      last.timestamp,
                presented: timestamp,
            }),
            _ => Ok(()),
        }
    }

    /// Append an entry and evict everything that aged out relative to it.
    /// Returns the number of evicted entries.
    pub fn insert(
        &mut self,
        user_id: &str,
        amount: f64,
        location: &str,
        timestamp: Timestamp,
    ) -> EngineResult<usize> {
        self.ensure_ordered(timestamp)?;
        self.entries.push_back(WindowEntry {
            user_id: user_id.to_string(),
            amount,
            location: location.to_string(),
            timestamp,
        });
        Ok(self.evict_expired(timestamp))
    }

    /// Drop entries older than the span as seen from `now`.
    pub fn evict_expired(&mut self, now: Timestamp) -> usize {
        let mut evicted = 0;
        while let Some(front) = self.entries.front() {
            if now - front.timestamp <= self.span {
                break;
            }
            self.entries.pop_front();
            evicted += 1;
        }
        if evicted > 0 {
            log::debug!("window evicted {evicted} entries, {} resident", self.entries.len());
        }
        evicted
    }

    pub fn count_in_window(&self, user_id: &str) -> usize {
        self.entries.iter().filter(|e| e.user_id == user_id).count()
    }

    pub fn is_frequent(&self, user_id: &str, threshold_count: usize) -> bool {
        self.count_in_window(user_id) > threshold_count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn oldest(&self) -> Option<&WindowEntry> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WindowEntry> {
        self.entries.iter()
    }
}
