// ─────────────────────────────────────────────────────────────────────
// CBF Flight Kernel — Configuration
// ─────────────────────────────────────────────────────────────────────

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CbfError, CbfResult};

/// Thresholds and penalties applied by the trust scorer.
///
/// Every field defaults to the flight-qualified value; a JSON config
/// only needs to name the fields it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    /// Roll or pitch magnitude (degrees) above which attitude is unstable.
    /// Default: 30.
    pub attitude_limit_deg: f64,
    /// Default: 15.
    pub attitude_penalty: u8,

    /// Vibration level above which the airframe is considered shaking.
    /// Default: 70.
    pub vibration_limit: f64,
    /// Default: 10.
    pub vibration_penalty: u8,

    /// Sensor consistency index below which sensors disagree.
    /// Default: 95.
    pub consistency_floor: f64,
    /// Default: 20.
    pub consistency_penalty: u8,

    /// Link latency (ms) above which the datalink is degraded.
    /// Default: 200.
    pub latency_limit_ms: f64,
    /// Default: 15.
    pub latency_penalty: u8,

    /// Default: 50.
    pub replay_penalty: u8,

    /// Processor load above which the flight computer is saturated.
    /// Default: 90.
    pub processor_load_limit: f64,
    /// Default: 30.
    pub processor_load_penalty: u8,

    /// Default: 40.
    pub unauthenticated_penalty: u8,

    /// Battery percentage below which the pack is critical.
    /// Default: 20.
    pub battery_floor: f64,
    /// Default: 40.
    pub battery_penalty: u8,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            attitude_limit_deg: 30.0,
            attitude_penalty: 15,
            vibration_limit: 70.0,
            vibration_penalty: 10,
            consistency_floor: 95.0,
            consistency_penalty: 20,
            latency_limit_ms: 200.0,
            latency_penalty: 15,
            replay_penalty: 50,
            processor_load_limit: 90.0,
            processor_load_penalty: 30,
            unauthenticated_penalty: 40,
            battery_floor: 20.0,
            battery_penalty: 40,
        }
    }
}

impl ScorerConfig {
    pub fn validate(&self) -> CbfResult<()> {
        let thresholds = [
            ("attitude_limit_deg", self.attitude_limit_deg),
            ("vibration_limit", self.vibration_limit),
            ("consistency_floor", self.consistency_floor),
            ("latency_limit_ms", self.latency_limit_ms),
            ("processor_load_limit", self.processor_load_limit),
            ("battery_floor", self.battery_floor),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(CbfError::Config(format!(
                    "{name} must be finite and >= 0, got {value}"
                )));
            }
        }

        let penalties = [
            ("attitude_penalty", self.attitude_penalty),
            ("vibration_penalty", self.vibration_penalty),
            ("consistency_penalty", self.consistency_penalty),
            ("latency_penalty", self.latency_penalty),
            ("replay_penalty", self.replay_penalty),
            ("processor_load_penalty", self.processor_load_penalty),
            ("unauthenticated_penalty", self.unauthenticated_penalty),
            ("battery_penalty", self.battery_penalty),
        ];
        for (name, value) in penalties {
            if value > 100 {
                return Err(CbfError::Config(format!(
                    "{name} must be in [0, 100], got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Score thresholds that split the trust range into flight modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbiterConfig {
    /// Scores at or above this fly `Normal`. Default: 80.
    pub normal_at_or_above: u8,
    /// Scores strictly below this go `FailSafe`. Default: 50.
    pub fail_safe_below: u8,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            normal_at_or_above: 80,
            fail_safe_below: 50,
        }
    }
}

impl ArbiterConfig {
    pub fn validate(&self) -> CbfResult<()> {
        if self.normal_at_or_above > 100 {
            return Err(CbfError::Config(format!(
                "normal_at_or_above must be in [0, 100], got {}",
                self.normal_at_or_above
            )));
        }
        if self.fail_safe_below > self.normal_at_or_above {
            return Err(CbfError::Config(format!(
                "fail_safe_below ({}) must not exceed normal_at_or_above ({})",
                self.fail_safe_below, self.normal_at_or_above
            )));
        }
        Ok(())
    }
}

/// Runtime configuration for the flight kernel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CbfConfig {
    pub scorer: ScorerConfig,
    pub arbiter: ArbiterConfig,
}

impl CbfConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> CbfResult<()> {
        self.scorer.validate()?;
        self.arbiter.validate()
    }

    /// Load from JSON string. Does not validate.
    pub fn from_json(json: &str) -> CbfResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| CbfError::Config(format!("JSON parse error: {e}")))
    }

    /// Load from a JSON file and validate it.
    pub fn from_file(path: &Path) -> CbfResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(CbfConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_penalties_sum() {
        let c = ScorerConfig::default();
        let sum: u32 = [
            c.attitude_penalty,
            c.vibration_penalty,
            c.consistency_penalty,
            c.latency_penalty,
            c.replay_penalty,
            c.processor_load_penalty,
            c.unauthenticated_penalty,
            c.battery_penalty,
        ]
        .iter()
        .map(|&p| u32::from(p))
        .sum();
        assert_eq!(sum, 220);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = CbfConfig::from_json(r#"{"arbiter": {"fail_safe_below": 40}}"#).unwrap();
        assert_eq!(config.arbiter.fail_safe_below, 40);
        assert_eq!(config.arbiter.normal_at_or_above, 80);
        assert_eq!(config.scorer, ScorerConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = CbfConfig::default();
        config.scorer.battery_floor = 25.0;
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(CbfConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_bad_json() {
        let err = CbfConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, CbfError::Config(_)));
    }

    #[test]
    fn test_inverted_mode_thresholds_rejected() {
        let config = CbfConfig {
            arbiter: ArbiterConfig {
                normal_at_or_above: 40,
                fail_safe_below: 60,
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_penalty_above_100_rejected() {
        let mut config = CbfConfig::default();
        config.scorer.replay_penalty = 150;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("replay_penalty"));
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let mut config = CbfConfig::default();
        config.scorer.latency_limit_ms = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let mut config = CbfConfig::default();
        config.scorer.attitude_limit_deg = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_missing() {
        let err = CbfConfig::from_file(Path::new("/nonexistent/cbf.json")).unwrap_err();
        assert!(matches!(err, CbfError::Io(_)));
    }
}
