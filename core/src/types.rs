//! Shared primitive types used across the scoring engine.

use crate::error::{EngineError, EngineResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stable identifier for a user or counterparty.
pub type UserId = String;

/// An instant on the engine's timeline.
pub type Timestamp = DateTime<Utc>;

/// The identifier a driving program assigns to one ingestion run.
pub type RunId = String;

/// One financial transaction as presented by the ingestion collaborator.
/// Created once and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub user_id:   UserId,
    pub amount:    f64,
    pub location:  String,
    pub timestamp: Timestamp,
    #[serde(default)]
    pub counterparty_id: Option<UserId>,
}

impl Transaction {
    pub fn new(
        user_id: impl Into<UserId>,
        amount: f64,
        location: impl Into<String>,
        counterparty_id: Option<UserId>,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
            location: location.into(),
            timestamp,
            counterparty_id,
        }
    }

    /// Reject records the stores must never see.
    pub fn validate(&self) -> EngineResult<()> {
        validate_user_id("user_id", &self.user_id)?;
        validate_amount(self.amount)?;
        if let Some(counterparty) = &self.counterparty_id {
            validate_user_id("counterparty_id", counterparty)?;
        }
        Ok(())
    }
}

pub(crate) fn validate_user_id(field: &'static str, id: &str) -> EngineResult<()> {
    if id.trim().is_empty() {
        return Err(EngineError::Validation {
            field,
            reason: "must not be empty".into(),
        });
    }
    Ok(())
}

pub(crate) fn validate_amount(amount: f64) -> EngineResult<()> {
    if !amount.is_finite() {
        return Err(EngineError::Validation {
            field:  "amount",
            reason: format!("must be finite, got {amount}"),
        });
    }
    if amount < 0.0 {
        return Err(EngineError::Validation {
            field:  "amount",
            reason: format!("must be non-negative, got {amount}"),
        });
    }
    Ok(())
}
