// ─────────────────────────────────────────────────────────────────────
// CBF Flight Kernel — Types
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Type definitions, configuration, and error hierarchy for the
//! CBF flight kernel — the onboard trust evaluator.

pub mod config;
pub mod error;
pub mod score;
pub mod telemetry;

pub use config::{ArbiterConfig, CbfConfig, ScorerConfig};
pub use error::{CbfError, CbfResult};
pub use score::{clamp_score, BlackboxRecord, FlightMode, TrustScore};
pub use telemetry::TelemetrySnapshot;
