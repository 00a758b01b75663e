// ─────────────────────────────────────────────────────────────────────
// CBF Flight Kernel — Trust Scorer
// ─────────────────────────────────────────────────────────────────────
//! Penalty-based trust scorer.
//!
//! Starts every tick at 100 and subtracts a fixed penalty for each
//! condition that holds. Conditions are independent: any subset may
//! fire together. The total is clamped to [0, 100].
//!
//! Nothing is carried between ticks; the same snapshot always yields
//! the same score.

use std::fmt;

use serde::{Deserialize, Serialize};

use cbf_types::score::{TrustScore, SCORE_MAX};
use cbf_types::{ScorerConfig, TelemetrySnapshot};

/// One penalised condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Penalty {
    /// |roll| or |pitch| beyond the attitude limit.
    Attitude,
    Vibration,
    SensorConsistency,
    Latency,
    ReplayAttack,
    ProcessorLoad,
    Unauthenticated,
    Battery,
}

impl Penalty {
    pub const ALL: [Penalty; 8] = [
        Penalty::Attitude,
        Penalty::Vibration,
        Penalty::SensorConsistency,
        Penalty::Latency,
        Penalty::ReplayAttack,
        Penalty::ProcessorLoad,
        Penalty::Unauthenticated,
        Penalty::Battery,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Penalty::Attitude => "attitude",
            Penalty::Vibration => "vibration",
            Penalty::SensorConsistency => "sensor_consistency",
            Penalty::Latency => "latency",
            Penalty::ReplayAttack => "replay_attack",
            Penalty::ProcessorLoad => "processor_load",
            Penalty::Unauthenticated => "unauthenticated",
            Penalty::Battery => "battery",
        }
    }

    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Set of penalties that fired on one tick. Fixed size, no allocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PenaltySet(u8);

impl PenaltySet {
    pub fn insert(&mut self, penalty: Penalty) {
        self.0 |= penalty.bit();
    }

    pub fn contains(&self, penalty: Penalty) -> bool {
        self.0 & penalty.bit() != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Penalty> + '_ {
        Penalty::ALL.into_iter().filter(|p| self.contains(*p))
    }
}

impl fmt::Display for PenaltySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        for (i, p) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(p.name())?;
        }
        Ok(())
    }
}

/// Result of scoring one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrustAssessment {
    /// Clamped score in [0, 100].
    pub score: TrustScore,
    /// `100 - sum(penalties)` before clamping. May be negative.
    pub raw: i32,
    pub penalties: PenaltySet,
}

/// Stateless trust scorer.
#[derive(Debug, Clone, Default)]
pub struct TrustScorer {
    config: ScorerConfig,
}

impl TrustScorer {
    pub fn new(config: ScorerConfig) -> Self {
        Self { config }
    }

    /// Penalty weight configured for `penalty`.
    pub fn penalty_for(&self, penalty: Penalty) -> u8 {
        let c = &self.config;
        match penalty {
            Penalty::Attitude => c.attitude_penalty,
            Penalty::Vibration => c.vibration_penalty,
            Penalty::SensorConsistency => c.consistency_penalty,
            Penalty::Latency => c.latency_penalty,
            Penalty::ReplayAttack => c.replay_penalty,
            Penalty::ProcessorLoad => c.processor_load_penalty,
            Penalty::Unauthenticated => c.unauthenticated_penalty,
            Penalty::Battery => c.battery_penalty,
        }
    }

    /// Which conditions hold for `snapshot`.
    ///
    /// Comparisons against NaN are false, so a NaN field never fires.
    pub fn triggered(&self, snapshot: &TelemetrySnapshot) -> PenaltySet {
        let c = &self.config;
        let mut set = PenaltySet::default();

        // Physical limits
        if snapshot.roll_deg.abs() > c.attitude_limit_deg
            || snapshot.pitch_deg.abs() > c.attitude_limit_deg
        {
            set.insert(Penalty::Attitude);
        }
        if snapshot.vibration > c.vibration_limit {
            set.insert(Penalty::Vibration);
        }

        // Link and sensor health
        if snapshot.sensor_consistency < c.consistency_floor {
            set.insert(Penalty::SensorConsistency);
        }
        if snapshot.latency_ms > c.latency_limit_ms {
            set.insert(Penalty::Latency);
        }

        // Cyber layer
        if snapshot.replay_attack {
            set.insert(Penalty::ReplayAttack);
        }
        if snapshot.processor_load > c.processor_load_limit {
            set.insert(Penalty::ProcessorLoad);
        }
        if !snapshot.command_authenticated {
            set.insert(Penalty::Unauthenticated);
        }

        // Hardware critical
        if snapshot.battery_pct < c.battery_floor {
            set.insert(Penalty::Battery);
        }

        set
    }

    /// Score a snapshot and report which penalties fired.
    pub fn evaluate(&self, snapshot: &TelemetrySnapshot) -> TrustAssessment {
        let penalties = self.triggered(snapshot);
        let deducted: i32 = penalties
            .iter()
            .map(|p| i32::from(self.penalty_for(p)))
            .sum();
        let raw = i32::from(SCORE_MAX) - deducted;
        let score = TrustScore::from_raw(raw);

        log::debug!("trust score {score} (raw {raw}), penalties: {penalties}");

        TrustAssessment {
            score,
            raw,
            penalties,
        }
    }

    /// Clamped trust score for `snapshot`.
    pub fn score(&self, snapshot: &TelemetrySnapshot) -> TrustScore {
        self.evaluate(snapshot).score
    }

    /// Read-only access to config.
    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }
}
