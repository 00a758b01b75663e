// ─────────────────────────────────────────────────────────────────────
// CBF Flight Kernel — Score, Mode and Blackbox Types
// ─────────────────────────────────────────────────────────────────────

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::telemetry::TelemetrySnapshot;

pub const SCORE_MIN: u8 = 0;
pub const SCORE_MAX: u8 = 100;

/// Clamp a raw penalty total into the trust range [0, 100].
#[inline]
pub fn clamp_score(raw: i32) -> u8 {
    // Lossless: the clamp bounds fit in u8.
    raw.clamp(i32::from(SCORE_MIN), i32::from(SCORE_MAX)) as u8
}

/// Trust score for a single tick: 0 = no trust, 100 = full trust.
///
/// Always within [0, 100]; every constructor clamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct TrustScore(u8);

impl TrustScore {
    pub const FULL: TrustScore = TrustScore(SCORE_MAX);
    pub const ZERO: TrustScore = TrustScore(SCORE_MIN);

    pub fn new(value: u8) -> Self {
        Self(value.min(SCORE_MAX))
    }

    /// Build from an unclamped penalty total (may be negative).
    pub fn from_raw(raw: i32) -> Self {
        Self(clamp_score(raw))
    }

    #[inline]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<u8> for TrustScore {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl From<TrustScore> for u8 {
    fn from(score: TrustScore) -> Self {
        score.0
    }
}

impl fmt::Display for TrustScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Discrete flight behaviour selected from the current trust score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlightMode {
    Normal,
    Cautious,
    FailSafe,
}

impl FlightMode {
    pub const ALL: [FlightMode; 3] = [FlightMode::Normal, FlightMode::Cautious, FlightMode::FailSafe];

    /// Machine label, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            FlightMode::Normal => "normal",
            FlightMode::Cautious => "cautious",
            FlightMode::FailSafe => "fail_safe",
        }
    }

    /// Operator-facing label for console output.
    pub fn label(self) -> &'static str {
        match self {
            FlightMode::Normal => "NORMAL FLIGHT",
            FlightMode::Cautious => "CAUTIOUS MODE",
            FlightMode::FailSafe => "SAFE MODE (FAIL-SAFE)",
        }
    }
}

impl fmt::Display for FlightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One immutable forensic entry in the blackbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlackboxRecord {
    pub tick: u64,
    pub score: TrustScore,
    pub mode: FlightMode,
    /// Processor load at this tick, percent.
    pub cpu: f64,
    pub latency_ms: f64,
    /// `replay_attack || !command_authenticated`.
    pub cyber_incident: bool,
}

impl BlackboxRecord {
    pub fn new(tick: u64, score: TrustScore, mode: FlightMode, snapshot: &TelemetrySnapshot) -> Self {
        Self {
            tick,
            score,
            mode,
            cpu: snapshot.processor_load,
            latency_ms: snapshot.latency_ms,
            cyber_incident: snapshot.cyber_incident(),
        }
    }

    /// Serialize as a single JSON line (no trailing newline).
    pub fn to_jsonl(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            log::error!("blackbox record {} failed to serialize: {e}", self.tick);
            format!("{{\"tick\":{},\"error\":\"serialize\"}}", self.tick)
        })
    }
}
