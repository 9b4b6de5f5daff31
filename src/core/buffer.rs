//! Per-session signal accumulator
//!
//! Holds the single most recent record per source. Replacement is
//! last-write-wins on arrival order, measured by the buffer's own clock -
//! never the record's self-reported timestamp, so producers cannot forge
//! freshness. Stale records are excluded from snapshots but retained until
//! overwritten or the session ends.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use crate::types::{SignalRecord, SignalSource};
use crate::STALENESS_WINDOW_SECS;

/// A record plus the instant the buffer accepted it
#[derive(Debug, Clone)]
struct BufferedRecord {
    record: SignalRecord,
    ingested_at: Instant,
}

/// Most-recent-record-per-source buffer with a staleness window
///
/// All operations take `&self` and are linearizable with respect to each
/// other: a snapshot never observes a half-written record.
#[derive(Debug)]
pub struct SignalBuffer {
    slots: RwLock<HashMap<SignalSource, BufferedRecord>>,
    staleness_window: Duration,
}

impl Default for SignalBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalBuffer {
    /// Buffer with the default staleness window (10 s)
    pub fn new() -> Self {
        Self::with_staleness_window(Duration::from_secs(STALENESS_WINDOW_SECS))
    }

    /// Buffer with a custom staleness window
    pub fn with_staleness_window(staleness_window: Duration) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            staleness_window,
        }
    }

    /// Store or replace the slot for this record's source
    pub fn ingest(&self, record: SignalRecord) {
        self.ingest_at(record, Instant::now());
    }

    /// Clock-injected ingest, for deterministic staleness tests
    pub fn ingest_at(&self, record: SignalRecord, now: Instant) {
        let source = record.source;
        let replaced = self
            .slots
            .write()
            .unwrap()
            .insert(
                source,
                BufferedRecord {
                    record,
                    ingested_at: now,
                },
            )
            .is_some();
        tracing::trace!(source = %source, replaced, "buffered signal");
    }

    /// Current non-stale records, sorted by source
    pub fn snapshot(&self) -> Vec<SignalRecord> {
        self.snapshot_at(Instant::now())
    }

    /// Clock-injected snapshot, for deterministic staleness tests
    pub fn snapshot_at(&self, now: Instant) -> Vec<SignalRecord> {
        let slots = self.slots.read().unwrap();
        let mut records: Vec<SignalRecord> = slots
            .values()
            .filter(|e| now.saturating_duration_since(e.ingested_at) <= self.staleness_window)
            .map(|e| e.record.clone())
            .collect();
        records.sort_by_key(|r| r.source);
        records
    }

    /// Number of retained slots, stale ones included
    pub fn len(&self) -> usize {
        self.slots.read().unwrap().len()
    }

    /// Check if no records are retained
    pub fn is_empty(&self) -> bool {
        self.slots.read().unwrap().is_empty()
    }

    /// Drop all retained records (session end)
    pub fn clear(&self) {
        self.slots.write().unwrap().clear();
    }

    /// The configured staleness window
    pub fn staleness_window(&self) -> Duration {
        self.staleness_window
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawValue;

    fn record(source: SignalSource, value: f64) -> SignalRecord {
        SignalRecord::new(source, "cat", RawValue::Scalar(value), value, 0.8, 0.0).unwrap()
    }

    #[test]
    fn test_one_slot_per_source() {
        let buffer = SignalBuffer::new();
        buffer.ingest(record(SignalSource::VisionGrimace, 0.2));
        buffer.ingest(record(SignalSource::AudioVocal, 0.4));
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.snapshot().len(), 2);
    }

    #[test]
    fn test_last_write_wins_per_source() {
        let buffer = SignalBuffer::new();
        buffer.ingest(record(SignalSource::VisionGrimace, 0.2));
        buffer.ingest(record(SignalSource::VisionGrimace, 0.9));

        let snapshot = buffer.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert!((snapshot[0].normalized_value - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_arrival_order_beats_record_timestamp() {
        let buffer = SignalBuffer::new();
        // Second arrival claims an older capture time; it still wins the slot
        let mut early = record(SignalSource::AudioVocal, 0.3);
        early.timestamp = 100.0;
        let mut late = record(SignalSource::AudioVocal, 0.7);
        late.timestamp = 50.0;

        buffer.ingest(early);
        buffer.ingest(late);

        let snapshot = buffer.snapshot();
        assert!((snapshot[0].normalized_value - 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_stale_record_excluded_but_retained() {
        let buffer = SignalBuffer::with_staleness_window(Duration::from_secs(10));
        let t0 = Instant::now();
        buffer.ingest_at(record(SignalSource::VisionGrimace, 0.5), t0);

        // Inside the window
        assert_eq!(buffer.snapshot_at(t0 + Duration::from_secs(9)).len(), 1);
        // Past the window: excluded from snapshot, still retained
        assert_eq!(buffer.snapshot_at(t0 + Duration::from_secs(11)).len(), 0);
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_replacement_refreshes_staleness() {
        let buffer = SignalBuffer::with_staleness_window(Duration::from_secs(10));
        let t0 = Instant::now();
        buffer.ingest_at(record(SignalSource::AudioVocal, 0.3), t0);
        buffer.ingest_at(record(SignalSource::AudioVocal, 0.6), t0 + Duration::from_secs(8));

        let snapshot = buffer.snapshot_at(t0 + Duration::from_secs(15));
        assert_eq!(snapshot.len(), 1);
        assert!((snapshot[0].normalized_value - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_snapshot_sorted_by_source() {
        let buffer = SignalBuffer::new();
        buffer.ingest(record(SignalSource::AudioBreathing, 0.1));
        buffer.ingest(record(SignalSource::VisionGrimace, 0.2));
        buffer.ingest(record(SignalSource::AudioVocal, 0.3));

        let sources: Vec<SignalSource> = buffer.snapshot().iter().map(|r| r.source).collect();
        assert_eq!(
            sources,
            vec![
                SignalSource::VisionGrimace,
                SignalSource::AudioVocal,
                SignalSource::AudioBreathing,
            ]
        );
    }

    #[test]
    fn test_clear() {
        let buffer = SignalBuffer::new();
        buffer.ingest(record(SignalSource::VisionPose, 0.4));
        assert!(!buffer.is_empty());
        buffer.clear();
        assert!(buffer.is_empty());
        assert!(buffer.snapshot().is_empty());
    }

    #[test]
    fn test_concurrent_ingest_and_snapshot() {
        use std::sync::Arc;
        use std::thread;

        let buffer = Arc::new(SignalBuffer::new());
        let mut handles = Vec::new();

        for i in 0..4 {
            let buffer = Arc::clone(&buffer);
            handles.push(thread::spawn(move || {
                let source = SignalSource::all()[i % 5];
                for j in 0..100 {
                    buffer.ingest(record(source, (j % 10) as f64 / 10.0));
                }
            }));
        }
        for _ in 0..100 {
            for r in buffer.snapshot() {
                // Never observe a half-written or out-of-range record
                assert!(r.validate().is_ok());
            }
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(buffer.len() <= 5);
    }
}
