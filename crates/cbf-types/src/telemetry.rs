// ─────────────────────────────────────────────────────────────────────
// CBF Flight Kernel — Telemetry Snapshot
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::error::{CbfError, CbfResult};

/// One tick of onboard telemetry.
///
/// A flat value built by whoever owns the tick loop (simulator, sensor
/// bus adapter, replay reader). The scoring core reads it and keeps
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Roll attitude in degrees.
    pub roll_deg: f64,
    /// Pitch attitude in degrees.
    pub pitch_deg: f64,
    /// Yaw heading in degrees. Informational, not scored.
    #[serde(default)]
    pub yaw_deg: f64,
    /// Airframe vibration level, 0-100.
    pub vibration: f64,
    /// Remaining battery, percent. Non-increasing over a flight.
    pub battery_pct: f64,
    /// Datalink round-trip latency in milliseconds.
    pub latency_ms: f64,
    /// Flight computer processor load, percent.
    pub processor_load: f64,
    /// Agreement between redundant sensors, 0-100.
    pub sensor_consistency: f64,
    /// A replayed command frame was detected this tick.
    pub replay_attack: bool,
    /// The last command passed authentication.
    pub command_authenticated: bool,
}

impl Default for TelemetrySnapshot {
    /// Level, quiet, fully charged, authenticated.
    fn default() -> Self {
        Self {
            roll_deg: 0.0,
            pitch_deg: 0.0,
            yaw_deg: 0.0,
            vibration: 0.0,
            battery_pct: 100.0,
            latency_ms: 0.0,
            processor_load: 0.0,
            sensor_consistency: 100.0,
            replay_attack: false,
            command_authenticated: true,
        }
    }
}

impl TelemetrySnapshot {
    /// Derived cyber-incident flag recorded in the blackbox.
    #[inline]
    pub fn cyber_incident(&self) -> bool {
        self.replay_attack || !self.command_authenticated
    }

    /// Caller-side range check.
    ///
    /// The scoring core never calls this; sources that ingest untrusted
    /// data (replay files, bus adapters) should.
    pub fn validate(&self) -> CbfResult<()> {
        let finite = [
            ("roll_deg", self.roll_deg),
            ("pitch_deg", self.pitch_deg),
            ("yaw_deg", self.yaw_deg),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(CbfError::Validation(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }

        let percent = [
            ("vibration", self.vibration),
            ("battery_pct", self.battery_pct),
            ("processor_load", self.processor_load),
            ("sensor_consistency", self.sensor_consistency),
        ];
        for (name, value) in percent {
            if !(0.0..=100.0).contains(&value) {
                return Err(CbfError::Validation(format!(
                    "{name} must be in [0, 100], got {value}"
                )));
            }
        }

        if !self.latency_ms.is_finite() || self.latency_ms < 0.0 {
            return Err(CbfError::Validation(format!(
                "latency_ms must be finite and >= 0, got {}",
                self.latency_ms
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cyber_incident_truth_table() {
        let cases = [
            (false, true, false),
            (false, false, true),
            (true, true, true),
            (true, false, true),
        ];
        for (replay, auth, expected) in cases {
            let snap = TelemetrySnapshot {
                replay_attack: replay,
                command_authenticated: auth,
                ..Default::default()
            };
            assert_eq!(snap.cyber_incident(), expected, "replay={replay} auth={auth}");
        }
    }

    #[test]
    fn test_default_validates() {
        assert!(TelemetrySnapshot::default().validate().is_ok());
    }

    #[test]
    fn test_battery_over_100_rejected() {
        let snap = TelemetrySnapshot {
            battery_pct: 101.0,
            ..Default::default()
        };
        let err = snap.validate().unwrap_err();
        assert!(err.to_string().contains("battery_pct"));
    }

    #[test]
    fn test_negative_latency_rejected() {
        let snap = TelemetrySnapshot {
            latency_ms: -5.0,
            ..Default::default()
        };
        assert!(snap.validate().is_err());
    }

    #[test]
    fn test_nan_roll_rejected() {
        let snap = TelemetrySnapshot {
            roll_deg: f64::NAN,
            ..Default::default()
        };
        assert!(snap.validate().is_err());
    }

    #[test]
    fn test_large_attitude_is_valid() {
        // Attitude is physically unbounded; only the scorer cares.
        let snap = TelemetrySnapshot {
            roll_deg: 170.0,
            pitch_deg: -95.0,
            ..Default::default()
        };
        assert!(snap.validate().is_ok());
    }

    #[test]
    fn test_yaw_optional_in_json() {
        let json = r#"{"roll_deg":1.0,"pitch_deg":2.0,"vibration":15.0,"battery_pct":90.0,
            "latency_ms":20.0,"processor_load":15.0,"sensor_consistency":100.0,
            "replay_attack":false,"command_authenticated":true}"#;
        let snap: TelemetrySnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.yaw_deg, 0.0);
        assert_eq!(snap.battery_pct, 90.0);
    }
}
