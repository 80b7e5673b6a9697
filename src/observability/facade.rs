//! Process-wide emitters.
//!
//! These route through the logger published by the readiness task. Calls
//! made before it is ready are queued and replayed once it is, except
//! `fatal`, which cannot wait.

use chrono::Utc;
use std::io;
use std::panic::Location;

use crate::context::LogContext;
use crate::fields::context_fields;
use crate::lifecycle::readiness;
use crate::observability::logging::FATAL_EXIT_CODE;
use crate::sink::{Level, SinkError};

/// Log at verbose (debug) severity.
#[track_caller]
pub fn verbose(ctx: Option<&dyn LogContext>, message: &str) {
    readiness::emit(Level::Verbose, ctx, message, Location::caller());
}

/// Log an informational message.
#[track_caller]
pub fn info(ctx: Option<&dyn LogContext>, message: &str) {
    readiness::emit(Level::Info, ctx, message, Location::caller());
}

/// Log a warning.
#[track_caller]
pub fn warn(ctx: Option<&dyn LogContext>, message: &str) {
    readiness::emit(Level::Warn, ctx, message, Location::caller());
}

/// Log an error.
#[track_caller]
pub fn error(ctx: Option<&dyn LogContext>, message: &str) {
    readiness::emit(Level::Error, ctx, message, Location::caller());
}

/// Log a fatal message, flush, and exit with a non-zero status.
///
/// Before readiness there is no sink: queued records and then the fatal one
/// go to stderr instead.
#[track_caller]
pub fn fatal(ctx: Option<&dyn LogContext>, message: &str) -> ! {
    let caller = Location::caller();
    match readiness::logger() {
        Some(logger) => logger.fatal_then_flush(ctx, message, caller),
        None => {
            readiness::drain_pending_to_stderr();
            let fields = ctx
                .map(|ctx| context_fields(ctx, Utc::now()))
                .unwrap_or_default();
            let _ = readiness::write_stderr_line(
                &mut io::stderr().lock(),
                Level::Fatal,
                Some(caller),
                message,
                &fields,
            );
        }
    }
    std::process::exit(FATAL_EXIT_CODE)
}

/// Flush the process-wide logger. A no-op before readiness.
pub fn flush() -> Result<(), SinkError> {
    match readiness::logger() {
        Some(logger) => logger.flush(),
        None => Ok(()),
    }
}

/// Third-party debug line through the external sink.
pub fn output(depth: usize, data: &str) {
    readiness::output(depth, data);
}
