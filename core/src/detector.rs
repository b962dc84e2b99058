//! Per-transaction screening and risk scoring.
//!
//! Everything here is a pure function of the transaction, the user's
//! prior spend profile, and configuration. No store is touched.

use crate::{
    config::{AnomalyConfig, EngineConfig, ScoringConfig, ThresholdConfig},
    event::FlagReason,
    history::SpendProfile,
    types::Transaction,
};

/// Fixed-threshold screen: large amount, or a location other than the
/// expected one when an expected location is configured.
pub fn is_suspicious_by_threshold(
    txn: &Transaction,
    threshold_amount: f64,
    unusual_location: &str,
) -> bool {
    threshold_reasons(txn, threshold_amount, unusual_location).next().is_some()
}

fn threshold_reasons<'a>(
    txn: &'a Transaction,
    threshold_amount: f64,
    unusual_location: &'a str,
) -> impl Iterator<Item = FlagReason> + 'a {
    let over_amount = txn.amount > threshold_amount;
    let off_location = !unusual_location.is_empty() && txn.location != unusual_location;
    [
        over_amount.then_some(FlagReason::AmountThreshold),
        off_location.then_some(FlagReason::UnusualLocation),
    ]
    .into_iter()
    .flatten()
}

/// Amount strictly above `multiplier ×` the user's prior average.
/// A user with no prior history is never anomalous.
pub fn is_anomalous(
    txn: &Transaction,
    prior: Option<&SpendProfile>,
    config: &AnomalyConfig,
) -> bool {
    match prior {
        Some(profile) if profile.count > 0 => txn.amount > config.multiplier * profile.mean(),
        _ => false,
    }
}

/// `amount / divisor`, plus the anomaly bonus when it applies.
pub fn risk_score(
    txn: &Transaction,
    anomalous: bool,
    scoring: &ScoringConfig,
    anomaly: &AnomalyConfig,
) -> f64 {
    let base = txn.amount / scoring.amount_divisor;
    if anomalous {
        base + anomaly.bonus
    } else {
        base
    }
}

/// Outcome of screening one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub reasons:    Vec<FlagReason>,
    pub anomalous:  bool,
    pub risk_score: f64,
}

impl Assessment {
    pub fn flagged(&self) -> bool {
        !self.reasons.is_empty()
    }
}

/// Run every screen and score the result.
pub fn assess(
    txn: &Transaction,
    prior: Option<&SpendProfile>,
    config: &EngineConfig,
) -> Assessment {
    let threshold = &config.threshold;
    let mut reasons: Vec<FlagReason> =
        threshold_reasons(txn, threshold.amount, &threshold.unusual_location).collect();
    let anomalous = is_anomalous(txn, prior, &config.anomaly);
    if anomalous {
        reasons.push(FlagReason::AnomalousSpend);
    }
    Assessment {
        reasons,
        anomalous,
        risk_score: risk_score(txn, anomalous, &config.scoring, &config.anomaly),
    }
}

/// Convenience over `is_suspicious_by_threshold` using configured limits.
pub fn screen_threshold(txn: &Transaction, config: &ThresholdConfig) -> bool {
    is_suspicious_by_threshold(txn, config.amount, &config.unusual_location)
}
