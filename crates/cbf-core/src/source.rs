// ─────────────────────────────────────────────────────────────────────
// CBF Flight Kernel — Telemetry Source Interface
// ─────────────────────────────────────────────────────────────────────
//! Where snapshots come from.
//!
//! The scorer, arbiter and recorder never see the origin of their
//! input. Anything that can produce one `TelemetrySnapshot` per tick
//! (sensor bus adapter, simulator, recorded replay, test fixture)
//! implements `TelemetrySource`.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use cbf_types::{CbfError, CbfResult, TelemetrySnapshot};

/// Trait for telemetry providers.
pub trait TelemetrySource {
    /// Snapshot for `tick`, or `None` when the mission is over.
    fn next_snapshot(&mut self, tick: u64) -> Option<TelemetrySnapshot>;
}

/// Fixed sequence of snapshots, consumed in order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    queue: VecDeque<TelemetrySnapshot>,
}

impl ScriptedSource {
    pub fn new(snapshots: impl IntoIterator<Item = TelemetrySnapshot>) -> Self {
        Self {
            queue: snapshots.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl TelemetrySource for ScriptedSource {
    fn next_snapshot(&mut self, _tick: u64) -> Option<TelemetrySnapshot> {
        self.queue.pop_front()
    }
}

/// Source that calls a function per tick.
///
/// Used to adapt a sensor bus or any other host-provided callback.
type SnapshotFn = Box<dyn FnMut(u64) -> Option<TelemetrySnapshot>>;

pub struct ExternalSource {
    next_fn: SnapshotFn,
}

impl ExternalSource {
    pub fn new(next_fn: impl FnMut(u64) -> Option<TelemetrySnapshot> + 'static) -> Self {
        Self {
            next_fn: Box::new(next_fn),
        }
    }
}

impl TelemetrySource for ExternalSource {
    fn next_snapshot(&mut self, tick: u64) -> Option<TelemetrySnapshot> {
        (self.next_fn)(tick)
    }
}

/// Recorded telemetry replayed from JSON Lines, one snapshot per line.
///
/// The whole file is parsed and range-checked up front so that a bad
/// line aborts before the first tick is flown.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    inner: ScriptedSource,
}

impl ReplaySource {
    pub fn from_reader<R: BufRead>(reader: R) -> CbfResult<Self> {
        let mut snapshots = Vec::new();
        for (i, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let snapshot: TelemetrySnapshot =
                serde_json::from_str(&line).map_err(|e| CbfError::Parse {
                    line: i + 1,
                    message: e.to_string(),
                })?;
            snapshot.validate().map_err(|e| CbfError::Parse {
                line: i + 1,
                message: e.to_string(),
            })?;
            snapshots.push(snapshot);
        }
        log::info!("replay loaded: {} snapshots", snapshots.len());
        Ok(Self {
            inner: ScriptedSource::new(snapshots),
        })
    }

    pub fn from_path(path: &Path) -> CbfResult<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn remaining(&self) -> usize {
        self.inner.remaining()
    }
}

impl TelemetrySource for ReplaySource {
    fn next_snapshot(&mut self, tick: u64) -> Option<TelemetrySnapshot> {
        self.inner.next_snapshot(tick)
    }
}
