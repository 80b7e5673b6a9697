//! Structured logging.
//!
//! # Responsibilities
//! - Provide the five leveled entry points plus `flush` and `output`
//! - Extract context fields exactly once per call
//! - Guarantee a flush before the process exits on `fatal`
//!
//! # Design Decisions
//! - Two sinks: the primary one records caller locations, the external
//!   one (third-party chatter) does not
//! - Built from config, both sinks share one background writer; the
//!   external one doubles as the global `tracing` subscriber
//! - Every entry point is `#[track_caller]` so the caller is the call site
//! - Flush failures on the fatal path go to stderr and never stop the exit

use chrono::Utc;
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use crate::config::LoggerConfig;
use crate::context::LogContext;
use crate::fields::{extract_fields, Field, Fields, SERVER_FIELD};
use crate::observability::tracing::install_tracing_bridge;
use crate::sink::{DispatchSink, Level, LogOutput, LogSink, Record, SinkError};

/// Exit status used after a fatal record.
pub const FATAL_EXIT_CODE: i32 = 1;

/// Error type for logger construction.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("unable to resolve hostname for worker: {0}")]
    Hostname(#[source] std::io::Error),

    #[error("hostname is not valid UTF-8")]
    HostnameEncoding,

    #[error("error building log configuration: {0}")]
    Sink(#[from] SinkError),

    #[error("logger initialization requires a Tokio runtime")]
    NoRuntime,
}

/// Emitter façade over a primary and an external sink.
pub struct Logger {
    hostname: String,
    primary: Arc<dyn LogSink>,
    external: Arc<dyn LogSink>,
}

impl Logger {
    /// Create a logger over existing sinks.
    pub fn new(
        hostname: impl Into<String>,
        primary: Arc<dyn LogSink>,
        external: Arc<dyn LogSink>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            primary,
            external,
        }
    }

    /// Resolve the local hostname and build both sinks from `config`.
    pub fn from_config(config: &LoggerConfig) -> Result<Self, InitError> {
        let hostname = resolve_hostname()?;
        let output = Arc::new(LogOutput::open(&config.output, config.buffered_lines)?);
        let primary = DispatchSink::primary(config, output.clone());
        let external = DispatchSink::external(config, output);
        if config.bridge_tracing {
            // Another subscriber may already own the process; third-party
            // events then stay where they are.
            let _ = install_tracing_bridge(external.dispatch());
        }
        Ok(Self::new(hostname, Arc::new(primary), Arc::new(external)))
    }

    /// Local hostname attached to every record as `server`.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Log at verbose (debug) severity.
    #[track_caller]
    pub fn verbose(&self, ctx: Option<&dyn LogContext>, message: &str) {
        self.log_at(Level::Verbose, ctx, message, Location::caller());
    }

    /// Log an informational message.
    #[track_caller]
    pub fn info(&self, ctx: Option<&dyn LogContext>, message: &str) {
        self.log_at(Level::Info, ctx, message, Location::caller());
    }

    /// Log a warning.
    #[track_caller]
    pub fn warn(&self, ctx: Option<&dyn LogContext>, message: &str) {
        self.log_at(Level::Warn, ctx, message, Location::caller());
    }

    /// Log an error.
    #[track_caller]
    pub fn error(&self, ctx: Option<&dyn LogContext>, message: &str) {
        self.log_at(Level::Error, ctx, message, Location::caller());
    }

    /// Log a fatal message, flush, and exit with a non-zero status.
    #[track_caller]
    pub fn fatal(&self, ctx: Option<&dyn LogContext>, message: &str) -> ! {
        self.fatal_then_flush(ctx, message, Location::caller());
        std::process::exit(FATAL_EXIT_CODE)
    }

    /// Force buffered records of both sinks to their destination.
    pub fn flush(&self) -> Result<(), SinkError> {
        let primary = self.primary.flush();
        let external = self.external.flush();
        primary.and(external)
    }

    /// Debug-level line from a third-party component.
    ///
    /// `depth` is accepted for interface compatibility; bridged components
    /// have no meaningful call site. No fields are attached. Sink problems
    /// are never reported back.
    pub fn output(&self, _depth: usize, data: &str) {
        self.external.log(&Record {
            level: Level::Verbose,
            time: Utc::now(),
            message: data,
            caller: None,
            fields: &[],
        });
    }

    pub(crate) fn log_at(
        &self,
        level: Level,
        ctx: Option<&dyn LogContext>,
        message: &str,
        caller: &'static Location<'static>,
    ) {
        let fields = extract_fields(ctx, &self.hostname);
        self.emit(level, message, Some(caller), fields.as_slice());
    }

    /// Emit a record whose context fields were captured earlier.
    pub(crate) fn replay(
        &self,
        level: Level,
        message: &str,
        caller: Option<&'static Location<'static>>,
        context: Fields,
    ) {
        let mut fields = Fields::with_capacity(context.len() + 1);
        fields.push(Field::string(SERVER_FIELD, self.hostname.as_str()));
        fields.extend(context);
        self.emit(level, message, caller, fields.as_slice());
    }

    /// Emit at fatal severity and flush; the caller terminates.
    pub(crate) fn fatal_then_flush(
        &self,
        ctx: Option<&dyn LogContext>,
        message: &str,
        caller: &'static Location<'static>,
    ) {
        self.log_at(Level::Fatal, ctx, message, caller);
        if let Err(err) = self.flush() {
            eprintln!("Error flushing logs for fatal error: {err}");
        }
    }

    fn emit(
        &self,
        level: Level,
        message: &str,
        caller: Option<&'static Location<'static>>,
        fields: &[Field],
    ) {
        self.primary.log(&Record {
            level,
            time: Utc::now(),
            message,
            caller,
            fields,
        });
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("hostname", &self.hostname)
            .finish_non_exhaustive()
    }
}

fn resolve_hostname() -> Result<String, InitError> {
    hostname::get()
        .map_err(InitError::Hostname)?
        .into_string()
        .map_err(|_| InitError::HostnameEncoding)
}
