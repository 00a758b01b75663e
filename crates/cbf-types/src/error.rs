// ─────────────────────────────────────────────────────────────────────
// CBF Flight Kernel — Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for everything around the scoring core.
///
/// The scorer and arbiter are total and never produce one of these;
/// they come from configuration, caller-side validation, replay input
/// and record sinks.
#[derive(Error, Debug)]
pub enum CbfError {
    /// Configuration rejected by `CbfConfig::validate()` or unparsable.
    #[error("config error: {0}")]
    Config(String),

    /// Telemetry snapshot outside its documented field ranges.
    #[error("validation error: {0}")]
    Validation(String),

    /// Underlying storage failed (replay file, blackbox sink).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON Lines record could not be decoded.
    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
}

pub type CbfResult<T> = Result<T, CbfError>;
