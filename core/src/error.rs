use crate::types::Timestamp;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Suspicion queue is empty")]
    EmptyQueue,

    #[error("Clock order violation: {presented} precedes last window entry at {last}")]
    ClockOrderViolation { last: Timestamp, presented: Timestamp },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
