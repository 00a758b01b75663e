// ─────────────────────────────────────────────────────────────────────
// CBF Flight Kernel — Randomized Telemetry
// ─────────────────────────────────────────────────────────────────────
//! Demonstration telemetry source.
//!
//! Tick 0 is a clean calibration snapshot so every mission starts in
//! `Normal`. Later ticks draw attitude, vibration, link and load values
//! uniformly, inject replay attacks one tick in four and
//! authentication failures one tick in three. The battery drains one
//! percent per tick, including tick 0.

use cbf_core::TelemetrySource;
use cbf_types::TelemetrySnapshot;

use crate::rng::SimpleRng;

/// Draw ranges for non-calibration ticks.
#[derive(Debug, Clone)]
pub struct SimRanges {
    pub attitude_deg: f64,
    pub yaw_deg: f64,
    pub vibration: (f64, f64),
    pub latency_ms: (u32, u32),
    pub processor_load: (u32, u32),
    pub sensor_consistency: (u32, u32),
    /// (numerator, denominator)
    pub replay_chance: (u32, u32),
    pub auth_failure_chance: (u32, u32),
    pub battery_drain_per_tick: f64,
}

impl Default for SimRanges {
    fn default() -> Self {
        Self {
            attitude_deg: 35.0,
            yaw_deg: 180.0,
            vibration: (10.0, 80.0),
            latency_ms: (10, 300),
            processor_load: (10, 95),
            sensor_consistency: (90, 100),
            replay_chance: (1, 4),
            auth_failure_chance: (1, 3),
            battery_drain_per_tick: 1.0,
        }
    }
}

/// Seeded random telemetry for a fixed number of ticks.
pub struct RandomTelemetry {
    rng: SimpleRng,
    ranges: SimRanges,
    ticks: u64,
    battery_pct: f64,
}

impl RandomTelemetry {
    pub fn new(seed: u64, ticks: u64) -> Self {
        Self::with_ranges(seed, ticks, SimRanges::default())
    }

    pub fn with_ranges(seed: u64, ticks: u64, ranges: SimRanges) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            ranges,
            ticks,
            battery_pct: 100.0,
        }
    }

    fn drain_battery(&mut self) -> f64 {
        self.battery_pct = (self.battery_pct - self.ranges.battery_drain_per_tick).max(0.0);
        self.battery_pct
    }

    fn calibration(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            roll_deg: 0.0,
            pitch_deg: 0.0,
            yaw_deg: 0.0,
            vibration: 15.0,
            battery_pct: self.battery_pct,
            latency_ms: 20.0,
            processor_load: 15.0,
            sensor_consistency: 100.0,
            replay_attack: false,
            command_authenticated: true,
        }
    }

    fn draw(&mut self) -> TelemetrySnapshot {
        let r = self.ranges.clone();
        let rng = &mut self.rng;
        TelemetrySnapshot {
            roll_deg: rng.uniform(-r.attitude_deg, r.attitude_deg),
            pitch_deg: rng.uniform(-r.attitude_deg, r.attitude_deg),
            yaw_deg: rng.uniform(-r.yaw_deg, r.yaw_deg),
            vibration: rng.uniform(r.vibration.0, r.vibration.1),
            battery_pct: self.battery_pct,
            latency_ms: f64::from(rng.int_inclusive(r.latency_ms.0, r.latency_ms.1)),
            processor_load: f64::from(rng.int_inclusive(r.processor_load.0, r.processor_load.1)),
            sensor_consistency: f64::from(
                rng.int_inclusive(r.sensor_consistency.0, r.sensor_consistency.1),
            ),
            replay_attack: rng.chance(r.replay_chance.0, r.replay_chance.1),
            command_authenticated: !rng.chance(r.auth_failure_chance.0, r.auth_failure_chance.1),
        }
    }
}

impl TelemetrySource for RandomTelemetry {
    fn next_snapshot(&mut self, tick: u64) -> Option<TelemetrySnapshot> {
        if tick >= self.ticks {
            return None;
        }
        self.drain_battery();
        let snapshot = if tick == 0 {
            self.calibration()
        } else {
            self.draw()
        };
        Some(snapshot)
    }
}
