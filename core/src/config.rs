use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Sliding-window parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// How long an entry stays resident, in seconds.
    pub duration_secs: i64,
    /// A user is "frequent" when their window count exceeds this.
    pub frequency_threshold: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            duration_secs:       86_400, // 24h
            frequency_threshold: 5,
        }
    }
}

/// Fixed-threshold screening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub amount: f64,
    /// Expected location. Empty disables the location rule.
    pub unusual_location: String,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            amount:           10_000.0,
            unusual_location: String::new(),
        }
    }
}

/// Historical-average anomaly rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyConfig {
    /// Amount must exceed `multiplier × average` (strictly).
    pub multiplier: f64,
    /// Flat risk added when the anomaly rule fires.
    pub bonus: f64,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self { multiplier: 2.0, bonus: 10.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub amount_divisor: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self { amount_divisor: 1_000.0 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window:    WindowConfig,
    pub threshold: ThresholdConfig,
    pub anomaly:   AnomalyConfig,
    pub scoring:   ScoringConfig,
}

impl EngineConfig {
    /// Load from a JSON file. Missing sections fall back to defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: EngineConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.window.duration_secs <= 0 {
            anyhow::bail!(
                "window.duration_secs must be positive, got {}",
                self.window.duration_secs
            );
        }
        if Duration::try_seconds(self.window.duration_secs).is_none() {
            anyhow::bail!(
                "window.duration_secs out of range, got {}",
                self.window.duration_secs
            );
        }
        if !self.threshold.amount.is_finite() {
            anyhow::bail!("threshold.amount must be finite, got {}", self.threshold.amount);
        }
        if !(self.scoring.amount_divisor > 0.0) || !self.scoring.amount_divisor.is_finite() {
            anyhow::bail!(
                "scoring.amount_divisor must be positive and finite, got {}",
                self.scoring.amount_divisor
            );
        }
        if !(self.anomaly.multiplier > 0.0) || !self.anomaly.multiplier.is_finite() {
            anyhow::bail!(
                "anomaly.multiplier must be positive and finite, got {}",
                self.anomaly.multiplier
            );
        }
        if !self.anomaly.bonus.is_finite() {
            anyhow::bail!("anomaly.bonus must be finite, got {}", self.anomaly.bonus);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.window.duration_secs, 86_400);
        assert_eq!(config.window.frequency_threshold, 5);
        assert_eq!(config.threshold.amount, 10_000.0);
        assert!(config.threshold.unusual_location.is_empty());
        assert_eq!(config.anomaly.multiplier, 2.0);
        assert_eq!(config.anomaly.bonus, 10.0);
        assert_eq!(config.scoring.amount_divisor, 1_000.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "threshold": { "amount": 5000.0 } }"#).unwrap();
        assert_eq!(config.threshold.amount, 5_000.0);
        assert_eq!(config.window, WindowConfig::default());
        assert_eq!(config.anomaly, AnomalyConfig::default());
    }

    #[test]
    fn zero_window_rejected() {
        let mut config = EngineConfig::default();
        config.window.duration_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn oversized_window_rejected() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "window": { "duration_secs": 9223372036854775807 } }"#)
                .unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("out of range"), "unexpected error: {err}");
    }

    #[test]
    fn non_finite_amounts_rejected() {
        let mut config = EngineConfig::default();
        config.threshold.amount = f64::NAN;
        assert!(config.validate().is_err(), "NaN threshold would disable the amount rule");

        let mut config = EngineConfig::default();
        config.anomaly.bonus = f64::INFINITY;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.scoring.amount_divisor = f64::INFINITY;
        assert!(config.validate().is_err());
    }
}
