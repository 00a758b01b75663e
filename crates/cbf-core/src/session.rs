// ─────────────────────────────────────────────────────────────────────
// CBF Flight Kernel — Flight Session (tick loop)
// ─────────────────────────────────────────────────────────────────────
//! Drives one flight: snapshot → score → mode → blackbox append, one
//! tick at a time.
//!
//! The session owns only its tick counter. The blackbox is passed in by
//! the caller and outlives the session; the telemetry source is
//! borrowed for the duration of `fly`. No sleeping happens here; pacing
//! belongs to the host.

use cbf_types::{CbfConfig, FlightMode, TelemetrySnapshot};

use crate::arbiter::ModeArbiter;
use crate::recorder::Blackbox;
use crate::scorer::{TrustAssessment, TrustScorer};
use crate::source::TelemetrySource;

/// Everything decided on one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub tick: u64,
    pub assessment: TrustAssessment,
    pub mode: FlightMode,
}

pub struct FlightSession {
    scorer: TrustScorer,
    arbiter: ModeArbiter,
    tick: u64,
}

impl FlightSession {
    pub fn new(config: &CbfConfig) -> Self {
        Self::from_parts(
            TrustScorer::new(config.scorer.clone()),
            ModeArbiter::new(config.arbiter.clone()),
        )
    }

    pub fn from_parts(scorer: TrustScorer, arbiter: ModeArbiter) -> Self {
        Self {
            scorer,
            arbiter,
            tick: 0,
        }
    }

    /// Process one tick to completion.
    pub fn step(&mut self, snapshot: &TelemetrySnapshot, blackbox: &mut Blackbox) -> TickOutcome {
        let tick = self.tick;
        let assessment = self.scorer.evaluate(snapshot);
        let mode = self.arbiter.mode(assessment.score);
        blackbox.append(tick, assessment.score, mode, snapshot);
        self.tick += 1;

        TickOutcome {
            tick,
            assessment,
            mode,
        }
    }

    /// Fly until `source` runs dry. `on_tick` sees every outcome after it
    /// has been recorded. Returns the number of ticks flown by this call.
    pub fn fly<F>(
        &mut self,
        source: &mut dyn TelemetrySource,
        blackbox: &mut Blackbox,
        mut on_tick: F,
    ) -> u64
    where
        F: FnMut(&TickOutcome, &TelemetrySnapshot),
    {
        let start = self.tick;
        log::info!("mission start at tick {start}");

        while let Some(snapshot) = source.next_snapshot(self.tick) {
            let outcome = self.step(&snapshot, blackbox);
            on_tick(&outcome, &snapshot);
        }

        let flown = self.tick - start;
        log::info!("mission end: {flown} ticks, {} records", blackbox.len());
        flown
    }

    /// Ticks processed over the session lifetime.
    pub fn ticks_flown(&self) -> u64 {
        self.tick
    }

    pub fn scorer(&self) -> &TrustScorer {
        &self.scorer
    }

    pub fn arbiter(&self) -> &ModeArbiter {
        &self.arbiter
    }
}

impl Default for FlightSession {
    fn default() -> Self {
        Self::new(&CbfConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ScriptedSource;
    use cbf_types::TrustScore;

    #[test]
    fn test_step_records_once() {
        let mut session = FlightSession::default();
        let mut bb = Blackbox::new();
        let out = session.step(&TelemetrySnapshot::default(), &mut bb);
        assert_eq!(out.tick, 0);
        assert_eq!(out.assessment.score, TrustScore::FULL);
        assert_eq!(out.mode, FlightMode::Normal);
        assert_eq!(bb.len(), 1);
        assert_eq!(bb.records()[0].score, out.assessment.score);
        assert_eq!(bb.records()[0].mode, out.mode);
    }

    #[test]
    fn test_fly_runs_until_source_is_empty() {
        let mut session = FlightSession::default();
        let mut bb = Blackbox::new();
        let mut src = ScriptedSource::new(vec![TelemetrySnapshot::default(); 7]);
        let mut seen = Vec::new();
        let flown = session.fly(&mut src, &mut bb, |out, _| seen.push(out.tick));
        assert_eq!(flown, 7);
        assert_eq!(seen, (0..7).collect::<Vec<_>>());
        assert_eq!(bb.len(), 7);
        assert_eq!(session.ticks_flown(), 7);
    }

    #[test]
    fn test_fly_resumes_tick_numbering() {
        let mut session = FlightSession::default();
        let mut bb = Blackbox::new();
        session.fly(&mut ScriptedSource::new(vec![TelemetrySnapshot::default(); 2]), &mut bb, |_, _| {});
        session.fly(&mut ScriptedSource::new(vec![TelemetrySnapshot::default(); 3]), &mut bb, |_, _| {});
        let ticks: Vec<u64> = bb.records().iter().map(|r| r.tick).collect();
        assert_eq!(ticks, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_mode_follows_score_each_tick() {
        let mut session = FlightSession::default();
        let mut bb = Blackbox::new();
        let hostile = TelemetrySnapshot {
            replay_attack: true,
            ..Default::default()
        };
        let mut src = ScriptedSource::new([TelemetrySnapshot::default(), hostile, TelemetrySnapshot::default()]);
        session.fly(&mut src, &mut bb, |_, _| {});
        let modes: Vec<FlightMode> = bb.records().iter().map(|r| r.mode).collect();
        assert_eq!(modes, vec![FlightMode::Normal, FlightMode::Cautious, FlightMode::Normal]);
    }
}
