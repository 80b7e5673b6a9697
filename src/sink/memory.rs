//! In-memory sink for tests and embedding hosts that inspect records.

use chrono::{DateTime, Utc};
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::fields::Fields;
use crate::sink::{Level, LogSink, Record, SinkError};

/// An owned copy of a record received by a `MemorySink`.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedRecord {
    pub level: Level,
    pub time: DateTime<Utc>,
    pub message: String,
    pub caller: Option<String>,
    pub fields: Fields,
}

/// Sink that keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<CapturedRecord>>,
    flushes: AtomicUsize,
    fail_flush: AtomicBool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose `flush` always fails.
    pub fn failing_flush() -> Self {
        let sink = Self::default();
        sink.fail_flush.store(true, Ordering::SeqCst);
        sink
    }

    /// Snapshot of captured records.
    pub fn records(&self) -> Vec<CapturedRecord> {
        self.lock().clone()
    }

    /// Drain captured records.
    pub fn take(&self) -> Vec<CapturedRecord> {
        std::mem::take(&mut *self.lock())
    }

    /// First captured record with this message.
    pub fn find(&self, message: &str) -> Option<CapturedRecord> {
        self.lock().iter().find(|r| r.message == message).cloned()
    }

    /// Number of `flush` calls, successful or not.
    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CapturedRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink for MemorySink {
    fn log(&self, record: &Record<'_>) {
        let mut fields = Fields::with_capacity(record.fields.len());
        for field in record.fields {
            fields.push(field.clone());
        }
        self.lock().push(CapturedRecord {
            level: record.level,
            time: record.time,
            message: record.message.to_string(),
            caller: record.caller.map(|c| format!("{}:{}", c.file(), c.line())),
            fields,
        });
    }

    fn flush(&self) -> Result<(), SinkError> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        if self.fail_flush.load(Ordering::SeqCst) {
            return Err(SinkError::Flush(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "memory sink flush failure",
            )));
        }
        Ok(())
    }
}
