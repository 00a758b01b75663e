// ─────────────────────────────────────────────────────────────────────
// CBF Flight Kernel — Telemetry Simulator
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Seeded random telemetry standing in for a sensor bus during
//! demonstrations and soak tests.

pub mod rng;
pub mod telemetry;

pub use rng::SimpleRng;
pub use telemetry::{RandomTelemetry, SimRanges};
