// ─────────────────────────────────────────────────────────────────────
// CBF Flight Kernel — Core Engine
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Trust scoring, flight-mode arbitration and blackbox recording for
//! an onboard drone trust evaluator.
//!
//! Each control tick runs, in order:
//!
//! ```text
//!   TelemetrySource ─► TrustScorer ─► ModeArbiter ─► Blackbox::append
//! ```
//!
//! # Invariants
//!
//! 1. **Score is bounded**: every `TrustScore` lies in [0, 100]. The
//!    penalty table can subtract 220, so the floor clamp is always live.
//!
//! 2. **Scoring and arbitration are pure**: neither keeps state between
//!    ticks. Equal snapshots give equal scores; equal scores give equal
//!    modes. No smoothing, no hysteresis.
//!
//! 3. **The blackbox is append-only**: one record per tick, in tick
//!    order, never modified after the append. Multi-threaded hosts go
//!    through `SharedBlackbox`, whose lock assigns tick indices.
//!
//! 4. **No clocks in the core**: nothing here reads wall time or
//!    sleeps. Pacing is the host's job.

pub mod analysis;
pub mod arbiter;
pub mod recorder;
pub mod scorer;
pub mod session;
pub mod sink;
pub mod source;

pub use analysis::{FlightReport, ModeCounts, ScoreTrace};
pub use arbiter::ModeArbiter;
pub use recorder::{Blackbox, SharedBlackbox};
pub use scorer::{Penalty, PenaltySet, TrustAssessment, TrustScorer};
pub use session::{FlightSession, TickOutcome};
pub use sink::{read_jsonl, JsonlSink, MemorySink, RecordSink};
pub use source::{ExternalSource, ReplaySource, ScriptedSource, TelemetrySource};
