// ─────────────────────────────────────────────────────────────────────
// CBF Flight Kernel — Record Sinks
// ─────────────────────────────────────────────────────────────────────
//! Destinations for blackbox records.
//!
//! The recorder does not know where records go. A sink may be a log
//! file, a terminal, a shipper, or a vector in a test.

use std::io::{BufRead, BufWriter, Write};

use cbf_types::{BlackboxRecord, CbfError, CbfResult};

/// Trait for blackbox record destinations.
pub trait RecordSink {
    fn write_record(&mut self, record: &BlackboxRecord) -> CbfResult<()>;

    fn flush(&mut self) -> CbfResult<()> {
        Ok(())
    }
}

/// JSON Lines sink: one self-describing record per line.
pub struct JsonlSink<W: Write> {
    writer: BufWriter<W>,
    written: u64,
}

impl<W: Write> JsonlSink<W> {
    pub fn new(inner: W) -> Self {
        Self {
            writer: BufWriter::new(inner),
            written: 0,
        }
    }

    /// Records written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> CbfResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| CbfError::Io(e.into_error()))
    }
}

impl<W: Write> RecordSink for JsonlSink<W> {
    fn write_record(&mut self, record: &BlackboxRecord) -> CbfResult<()> {
        serde_json::to_writer(&mut self.writer, record)
            .map_err(|e| CbfError::Io(e.into()))?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    fn flush(&mut self) -> CbfResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// In-memory sink for tests and in-process analysis.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Vec<BlackboxRecord>,
}

impl MemorySink {
    pub fn records(&self) -> &[BlackboxRecord] {
        &self.records
    }
}

impl RecordSink for MemorySink {
    fn write_record(&mut self, record: &BlackboxRecord) -> CbfResult<()> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// Read a JSON Lines blackbox back. Blank lines are skipped.
pub fn read_jsonl<R: BufRead>(reader: R) -> CbfResult<Vec<BlackboxRecord>> {
    let mut records = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| CbfError::Parse {
            line: i + 1,
            message: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cbf_types::{FlightMode, TelemetrySnapshot, TrustScore};

    fn record(tick: u64) -> BlackboxRecord {
        BlackboxRecord::new(
            tick,
            TrustScore::new(60),
            FlightMode::Cautious,
            &TelemetrySnapshot::default(),
        )
    }

    #[test]
    fn test_jsonl_one_line_per_record() {
        let mut sink = JsonlSink::new(Vec::new());
        sink.write_record(&record(0)).unwrap();
        sink.write_record(&record(1)).unwrap();
        assert_eq!(sink.written(), 2);
        let bytes = sink.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("{\"tick\":0,"));
        assert!(lines[1].contains("\"mode\":\"cautious\""));
    }

    #[test]
    fn test_jsonl_read_back() {
        let mut sink = JsonlSink::new(Vec::new());
        for t in 0..3 {
            sink.write_record(&record(t)).unwrap();
        }
        let bytes = sink.into_inner().unwrap();
        let back = read_jsonl(bytes.as_slice()).unwrap();
        assert_eq!(back, vec![record(0), record(1), record(2)]);
    }

    #[test]
    fn test_read_reports_bad_line() {
        let text = "{\"tick\":0,\"score\":100,\"mode\":\"normal\",\"cpu\":1.0,\"latency_ms\":2.0,\"cyber_incident\":false}\n\ngarbage\n";
        let err = read_jsonl(text.as_bytes()).unwrap_err();
        match err {
            CbfError::Parse { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other}"),
        }
    }
}
