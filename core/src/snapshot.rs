//! Point-in-time summary of engine state.
//!
//! Sizes only. Each figure is read under its own store lock, so a
//! snapshot taken during ingestion may mix before/after counts.

use crate::types::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub taken_at:          Timestamp,
    pub tracked_users:     usize,
    pub history_entries:   usize,
    pub window_entries:    usize,
    pub graph_nodes:       usize,
    pub graph_edges:       usize,
    pub queued_suspicions: usize,
}
