// ─────────────────────────────────────────────────────────────────────
// CBF Flight Kernel — Post-flight Analysis
// ─────────────────────────────────────────────────────────────────────
//! Forensic summary of a finished flight.
//!
//! Works from the blackbox record sequence alone, never from live
//! scorer state, so the same report can be produced in flight, after
//! landing, or from a persisted JSON Lines file.

use std::fmt;

use serde::Serialize;

use cbf_types::{BlackboxRecord, FlightMode, TrustScore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModeCounts {
    pub normal: usize,
    pub cautious: usize,
    pub fail_safe: usize,
}

impl ModeCounts {
    fn bump(&mut self, mode: FlightMode) {
        match mode {
            FlightMode::Normal => self.normal += 1,
            FlightMode::Cautious => self.cautious += 1,
            FlightMode::FailSafe => self.fail_safe += 1,
        }
    }

    pub fn get(&self, mode: FlightMode) -> usize {
        match mode {
            FlightMode::Normal => self.normal,
            FlightMode::Cautious => self.cautious,
            FlightMode::FailSafe => self.fail_safe,
        }
    }
}

/// Aggregate view over one flight's blackbox.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlightReport {
    pub ticks: usize,
    pub min_score: Option<TrustScore>,
    pub max_score: Option<TrustScore>,
    pub mean_score: f64,
    pub modes: ModeCounts,
    /// Ticks with a replay attack or an unauthenticated command.
    pub incident_ticks: Vec<u64>,
    /// Number of tick-to-tick mode changes. High values mean flapping.
    pub mode_transitions: usize,
    pub first_fail_safe: Option<u64>,
}

impl FlightReport {
    pub fn from_records(records: &[BlackboxRecord]) -> Self {
        let mut report = FlightReport {
            ticks: records.len(),
            ..Default::default()
        };
        if records.is_empty() {
            return report;
        }

        let mut sum = 0u64;
        let mut prev: Option<FlightMode> = None;
        for rec in records {
            sum += u64::from(rec.score.value());
            report.min_score = Some(report.min_score.map_or(rec.score, |m| m.min(rec.score)));
            report.max_score = Some(report.max_score.map_or(rec.score, |m| m.max(rec.score)));
            report.modes.bump(rec.mode);

            if rec.cyber_incident {
                report.incident_ticks.push(rec.tick);
            }
            if rec.mode == FlightMode::FailSafe && report.first_fail_safe.is_none() {
                report.first_fail_safe = Some(rec.tick);
            }
            if prev.is_some_and(|p| p != rec.mode) {
                report.mode_transitions += 1;
            }
            prev = Some(rec.mode);
        }
        report.mean_score = sum as f64 / records.len() as f64;
        report
    }

    /// Fraction of ticks flown in `mode`, in [0, 1].
    pub fn mode_share(&self, mode: FlightMode) -> f64 {
        if self.ticks == 0 {
            return 0.0;
        }
        self.modes.get(mode) as f64 / self.ticks as f64
    }
}

impl fmt::Display for FlightReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let opt = |s: Option<TrustScore>| s.map_or_else(|| "-".to_string(), |v| v.to_string());
        writeln!(f, "ticks flown      : {}", self.ticks)?;
        writeln!(
            f,
            "trust score      : min {} / mean {:.1} / max {}",
            opt(self.min_score),
            self.mean_score,
            opt(self.max_score)
        )?;
        writeln!(
            f,
            "modes            : normal {} | cautious {} | fail-safe {}",
            self.modes.normal, self.modes.cautious, self.modes.fail_safe
        )?;
        writeln!(f, "mode transitions : {}", self.mode_transitions)?;
        match self.first_fail_safe {
            Some(t) => writeln!(f, "first fail-safe  : tick {t}")?,
            None => writeln!(f, "first fail-safe  : never")?,
        }
        write!(f, "cyber incidents  : {}", self.incident_ticks.len())?;
        if !self.incident_ticks.is_empty() {
            let ticks: Vec<String> = self.incident_ticks.iter().map(u64::to_string).collect();
            write!(f, " at ticks [{}]", ticks.join(", "))?;
        }
        Ok(())
    }
}

/// ASCII chart of trust score over ticks.
///
/// One column per tick. `*` marks the score, `X` marks a tick with a
/// cyber incident, `-` draws the fail-safe threshold.
pub struct ScoreTrace {
    pub height: usize,
    pub threshold: u8,
}

impl Default for ScoreTrace {
    fn default() -> Self {
        Self {
            height: 10,
            threshold: 50,
        }
    }
}

impl ScoreTrace {
    fn row_of(&self, value: u8) -> usize {
        (usize::from(value) * self.height / 100).min(self.height - 1)
    }

    pub fn render(&self, records: &[BlackboxRecord]) -> String {
        if self.height == 0 || records.is_empty() {
            return String::new();
        }
        let threshold_row = self.row_of(self.threshold);
        let mut out = String::new();

        for row in (0..self.height).rev() {
            let lo = row * 100 / self.height;
            out.push_str(&format!("{lo:>3} |"));
            for rec in records {
                let c = if self.row_of(rec.score.value()) == row {
                    if rec.cyber_incident {
                        'X'
                    } else {
                        '*'
                    }
                } else if row == threshold_row {
                    '-'
                } else {
                    ' '
                };
                out.push(c);
            }
            out.push('\n');
        }
        out.push_str("    +");
        out.push_str(&"-".repeat(records.len()));
        out.push('\n');
        out
    }
}
