//! txrisk-core: stateful transaction risk scoring.
//!
//! A FraudEngine owns four stores (history, window, graph, suspicion
//! queue) and exposes one write path, `process_transaction`, plus
//! read-only queries over each store.

pub mod alert;
pub mod clock;
pub mod config;
pub mod detector;
pub mod engine;
pub mod error;
pub mod event;
pub mod generator;
pub mod graph;
pub mod history;
pub mod pattern;
pub mod queue;
pub mod rng;
pub mod snapshot;
pub mod store;
pub mod types;
pub mod window;

pub use engine::FraudEngine;
pub use error::{EngineError, EngineResult};
