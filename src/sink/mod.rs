//! Record sinks.
//!
//! # Data Flow
//! ```text
//! Logger (level, message, Fields)
//!     → Record (timestamp + caller attached)
//!     → LogSink::log
//!         → DispatchSink: tracing event → fmt layer (format.rs) → LogOutput
//!         → MemorySink: captured in memory (tests)
//! ```
//!
//! # Design Decisions
//! - Sinks are shared as `Arc<dyn LogSink>` and must be safe for concurrent use
//! - `log` never returns an error
//! - `flush` is the only fallible operation, used by `Flush` and `Fatal`

pub mod dispatch;
pub mod format;
pub mod level;
pub mod memory;
pub mod output;

use chrono::{DateTime, Utc};
use std::panic::Location;
use std::path::PathBuf;

use crate::fields::Field;

pub use dispatch::DispatchSink;
pub use format::Encoding;
pub use level::Level;
pub use memory::{CapturedRecord, MemorySink};
pub use output::LogOutput;

/// One leveled record handed to a sink.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    pub level: Level,
    pub time: DateTime<Utc>,
    pub message: &'a str,
    pub caller: Option<&'static Location<'static>>,
    pub fields: &'a [Field],
}

/// Error type for sink construction and flushing.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("unable to open log output {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: tracing_appender::rolling::InitError,
    },

    #[error("log output path has no file name: {0:?}")]
    InvalidPath(PathBuf),

    #[error("error flushing log output: {0}")]
    Flush(#[source] std::io::Error),
}

/// Accepts leveled records with ordered fields and durably emits them.
pub trait LogSink: Send + Sync {
    /// Whether records at `level` are emitted.
    fn enabled(&self, _level: Level) -> bool {
        true
    }

    /// Emit one record.
    fn log(&self, record: &Record<'_>);

    /// Force buffered records to their destination.
    fn flush(&self) -> Result<(), SinkError>;
}
