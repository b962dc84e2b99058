//! Notifications emitted by the engine.
//!
//! RULE: The engine never delivers alerts itself.
//! Every outcome is returned to the caller as data; an AlertSink decides delivery.

use crate::types::UserId;
use serde::{Deserialize, Serialize};

/// Every notification the engine can emit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    Suspicious {
        user_id:    UserId,
        amount:     f64,
        risk_score: f64,
        reasons:    Vec<FlagReason>,
    },
    Frequent {
        user_id:      UserId,
        amount:       f64,
        window_count: usize,
    },
}

impl Notification {
    /// Stable name used for the `kind` column of the alert log.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Suspicious { .. } => "suspicious",
            Self::Frequent { .. }   => "frequent",
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            Self::Suspicious { user_id, .. } | Self::Frequent { user_id, .. } => user_id,
        }
    }

    pub fn amount(&self) -> f64 {
        match self {
            Self::Suspicious { amount, .. } | Self::Frequent { amount, .. } => *amount,
        }
    }

    pub fn risk_score(&self) -> Option<f64> {
        match self {
            Self::Suspicious { risk_score, .. } => Some(*risk_score),
            Self::Frequent { .. }               => None,
        }
    }
}

/// Why a transaction was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagReason {
    AmountThreshold,
    UnusualLocation,
    AnomalousSpend,
}

/// What `process_transaction` observed for one transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingResult {
    pub flagged_suspicious: bool,
    pub frequent_activity:  bool,
    pub risk_score:         Option<f64>,
    pub notifications:      Vec<Notification>,
}
