// ─────────────────────────────────────────────────────────────────────
// CBF Flight Kernel — Blackbox Recorder
// ─────────────────────────────────────────────────────────────────────
//! Append-only forensic log for one flight session.
//!
//! The `Blackbox` is an ordinary owned value. The tick loop borrows it
//! mutably for each append; analysis borrows it immutably afterwards.
//! Records are never reordered, overwritten or removed.

use std::sync::Arc;

use parking_lot::Mutex;

use cbf_types::{BlackboxRecord, CbfResult, FlightMode, TelemetrySnapshot, TrustScore};

use crate::sink::RecordSink;

/// Ordered, append-only record sequence.
#[derive(Debug, Clone, Default)]
pub struct Blackbox {
    records: Vec<BlackboxRecord>,
}

impl Blackbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-allocate for a mission of `ticks` ticks.
    pub fn with_capacity(ticks: usize) -> Self {
        Self {
            records: Vec::with_capacity(ticks),
        }
    }

    /// Tick index the next append is expected to carry.
    pub fn next_tick(&self) -> u64 {
        self.records.last().map_or(0, |r| r.tick + 1)
    }

    /// Append one record. Must be called exactly once per tick, after
    /// scoring and arbitration.
    ///
    /// A tick other than `next_tick()` is a caller error; it is logged
    /// and recorded as given.
    pub fn append(
        &mut self,
        tick: u64,
        score: TrustScore,
        mode: FlightMode,
        snapshot: &TelemetrySnapshot,
    ) {
        let expected = self.next_tick();
        if tick != expected {
            log::warn!("blackbox: out-of-sequence tick {tick}, expected {expected}");
        }
        self.records
            .push(BlackboxRecord::new(tick, score, mode, snapshot));
    }

    /// Read-only ordered view.
    pub fn records(&self) -> &[BlackboxRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&BlackboxRecord> {
        self.records.last()
    }

    /// Write every record, in order, to `sink`.
    pub fn drain_to(&self, sink: &mut dyn RecordSink) -> CbfResult<()> {
        for record in &self.records {
            sink.write_record(record)?;
        }
        sink.flush()
    }

    /// End the session and hand the records to the analysis side.
    pub fn into_records(self) -> Vec<BlackboxRecord> {
        self.records
    }
}

/// Single-writer blackbox for hosts that drive ticks from several
/// threads. The lock assigns tick indices, so they stay monotonic.
#[derive(Debug, Clone, Default)]
pub struct SharedBlackbox {
    inner: Arc<Mutex<Blackbox>>,
}

impl SharedBlackbox {
    pub fn new(blackbox: Blackbox) -> Self {
        Self {
            inner: Arc::new(Mutex::new(blackbox)),
        }
    }

    /// Append under the lock with the next tick index; returns that index.
    pub fn append_next(
        &self,
        score: TrustScore,
        mode: FlightMode,
        snapshot: &TelemetrySnapshot,
    ) -> u64 {
        let mut bb = self.inner.lock();
        let tick = bb.next_tick();
        bb.append(tick, score, mode, snapshot);
        tick
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Copy of the current record sequence.
    pub fn snapshot(&self) -> Vec<BlackboxRecord> {
        self.inner.lock().records().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;

    fn append_n(bb: &mut Blackbox, n: u64) {
        let snap = TelemetrySnapshot::default();
        for tick in 0..n {
            bb.append(tick, TrustScore::FULL, FlightMode::Normal, &snap);
        }
    }

    #[test]
    fn test_empty() {
        let bb = Blackbox::new();
        assert!(bb.is_empty());
        assert_eq!(bb.next_tick(), 0);
        assert!(bb.last().is_none());
    }

    #[test]
    fn test_ordering_after_n_appends() {
        let mut bb = Blackbox::with_capacity(30);
        append_n(&mut bb, 30);
        assert_eq!(bb.len(), 30);
        for (i, rec) in bb.records().iter().enumerate() {
            assert_eq!(rec.tick, i as u64);
        }
        assert!(bb.records().windows(2).all(|w| w[0].tick < w[1].tick));
        assert_eq!(bb.next_tick(), 30);
    }

    #[test]
    fn test_append_does_not_touch_earlier_records() {
        let mut bb = Blackbox::new();
        let snap = TelemetrySnapshot::default();
        bb.append(0, TrustScore::new(90), FlightMode::Normal, &snap);
        let first = bb.records()[0].clone();
        bb.append(1, TrustScore::new(10), FlightMode::FailSafe, &snap);
        assert_eq!(bb.records()[0], first);
    }

    #[test]
    fn test_incident_flag_all_combinations() {
        let mut bb = Blackbox::new();
        let combos = [(false, true), (false, false), (true, true), (true, false)];
        for (tick, (replay, auth)) in combos.iter().enumerate() {
            let snap = TelemetrySnapshot {
                replay_attack: *replay,
                command_authenticated: *auth,
                ..Default::default()
            };
            bb.append(tick as u64, TrustScore::FULL, FlightMode::Normal, &snap);
        }
        let flags: Vec<bool> = bb.records().iter().map(|r| r.cyber_incident).collect();
        assert_eq!(flags, vec![false, true, true, true]);
    }

    #[test]
    fn test_out_of_sequence_tick_still_recorded() {
        let mut bb = Blackbox::new();
        let snap = TelemetrySnapshot::default();
        bb.append(5, TrustScore::FULL, FlightMode::Normal, &snap);
        assert_eq!(bb.len(), 1);
        assert_eq!(bb.records()[0].tick, 5);
        assert_eq!(bb.next_tick(), 6);
    }

    #[test]
    fn test_drain_to_sink_in_order() {
        let mut bb = Blackbox::new();
        append_n(&mut bb, 4);
        let mut sink = MemorySink::default();
        bb.drain_to(&mut sink).unwrap();
        let ticks: Vec<u64> = sink.records().iter().map(|r| r.tick).collect();
        assert_eq!(ticks, vec![0, 1, 2, 3]);
        // Draining does not consume.
        assert_eq!(bb.len(), 4);
    }

    #[test]
    fn test_shared_blackbox_threads_keep_ticks_monotonic() {
        let shared = SharedBlackbox::default();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                std::thread::spawn(move || {
                    let snap = TelemetrySnapshot::default();
                    for _ in 0..25 {
                        shared.append_next(TrustScore::FULL, FlightMode::Normal, &snap);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let records = shared.snapshot();
        assert_eq!(records.len(), 100);
        for (i, rec) in records.iter().enumerate() {
            assert_eq!(rec.tick, i as u64);
        }
    }
}
