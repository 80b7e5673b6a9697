//! Process-wide logger readiness.
//!
//! # Responsibilities
//! - Run the one-time initialization sequence in a background task
//! - Hold the shared logger once it exists
//! - Queue records emitted before readiness and replay them in order
//!
//! # Design Decisions
//! - Initialization waits for the configuration signal, then runs once
//! - Boot failures (no hostname, no sink) abort the process
//! - Nothing is written directly until the queue has been replayed, so one
//!   thread's records keep their program order across the transition
//! - A fatal record before readiness drains the queue to stderr first

use std::io::{self, Write};
use std::panic::Location;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use crate::config::load_from_env;
use crate::context::LogContext;
use crate::fields::{context_fields, Fields};
use crate::lifecycle::gate::ReadinessGate;
use crate::lifecycle::startup::{Startup, CONFIGURATION};
use crate::observability::logging::{InitError, Logger, FATAL_EXIT_CODE};
use crate::sink::format::FieldsJson;
use crate::sink::Level;

/// Signal published once the logger is usable.
pub const PACKAGE_TYPE: &str = "logprovider";

/// Records held before readiness; later ones are counted and dropped.
pub const MAX_PENDING_RECORDS: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Primary,
    External,
}

struct PendingRecord {
    target: Target,
    level: Level,
    message: String,
    caller: Option<&'static Location<'static>>,
    context: Fields,
}

#[derive(Default)]
struct Pending {
    records: Vec<PendingRecord>,
    dropped: usize,
}

struct GlobalState {
    gate: ReadinessGate<Arc<Logger>>,
    pending: Mutex<Pending>,
    spawned: AtomicBool,
}

static STATE: LazyLock<GlobalState> = LazyLock::new(|| GlobalState {
    gate: ReadinessGate::new(),
    pending: Mutex::new(Pending::default()),
    spawned: AtomicBool::new(false),
});

fn pending() -> MutexGuard<'static, Pending> {
    STATE.pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Spawn the readiness task with configuration from the environment.
///
/// Returns `Ok(false)` if a readiness task was already spawned.
pub fn init() -> Result<bool, InitError> {
    init_with(|| Logger::from_config(&load_from_env()))
}

/// Spawn the readiness task with a caller-supplied logger factory.
///
/// The factory runs after the configuration signal fires. Outside a Tokio
/// runtime nothing is spawned and a later call may still succeed.
pub fn init_with<F>(factory: F) -> Result<bool, InitError>
where
    F: FnOnce() -> Result<Logger, InitError> + Send + 'static,
{
    let handle = tokio::runtime::Handle::try_current().map_err(|_| InitError::NoRuntime)?;
    if STATE.spawned.swap(true, Ordering::SeqCst) {
        return Ok(false);
    }
    handle.spawn(async move {
        let startup = Startup::global();
        startup.wait(CONFIGURATION).await;

        let logger = match factory() {
            Ok(logger) => Arc::new(logger),
            Err(err) => {
                eprintln!("{err}");
                std::process::exit(FATAL_EXIT_CODE);
            }
        };

        release(Arc::clone(&logger));
        logger.verbose(None, "Logging service is ready.");
        if let Err(err) = logger.flush() {
            eprintln!("{err}");
        }
        startup.publish(PACKAGE_TYPE);
    });
    Ok(true)
}

/// Install the logger, replay queued records, then open the gate.
fn release(logger: Arc<Logger>) {
    let mut pending = pending();
    for record in pending.records.drain(..) {
        match record.target {
            Target::Primary => {
                logger.replay(record.level, &record.message, record.caller, record.context)
            }
            Target::External => logger.output(0, &record.message),
        }
    }
    if pending.dropped > 0 {
        let message = format!(
            "{} log records emitted before the logger was ready were dropped",
            pending.dropped
        );
        logger.replay(Level::Warn, &message, None, Fields::new());
        pending.dropped = 0;
    }
    STATE.gate.publish(logger);
}

/// Suspend until the logger is ready and return it.
pub async fn wait() -> Arc<Logger> {
    STATE.gate.wait().await
}

/// The logger, if ready.
pub fn logger() -> Option<Arc<Logger>> {
    STATE.gate.get()
}

pub fn is_ready() -> bool {
    STATE.gate.is_ready()
}

/// Emit through the logger, or queue until it is ready.
pub(crate) fn emit(
    level: Level,
    ctx: Option<&dyn LogContext>,
    message: &str,
    caller: &'static Location<'static>,
) {
    if let Some(logger) = STATE.gate.get() {
        return logger.log_at(level, ctx, message, caller);
    }

    let now = Utc::now();
    let mut pending = pending();
    // Re-check under the lock: release() opens the gate while holding it.
    if let Some(logger) = STATE.gate.get() {
        drop(pending);
        return logger.log_at(level, ctx, message, caller);
    }
    let context = ctx.map(|ctx| context_fields(ctx, now)).unwrap_or_default();
    push(
        &mut pending,
        PendingRecord {
            target: Target::Primary,
            level,
            message: message.to_string(),
            caller: Some(caller),
            context,
        },
    );
}

/// Third-party output through the external sink, or queued.
pub(crate) fn output(depth: usize, data: &str) {
    if let Some(logger) = STATE.gate.get() {
        return logger.output(depth, data);
    }

    let mut pending = pending();
    if let Some(logger) = STATE.gate.get() {
        drop(pending);
        return logger.output(depth, data);
    }
    push(
        &mut pending,
        PendingRecord {
            target: Target::External,
            level: Level::Verbose,
            message: data.to_string(),
            caller: None,
            context: Fields::new(),
        },
    );
}

fn push(pending: &mut Pending, record: PendingRecord) {
    if pending.records.len() >= MAX_PENDING_RECORDS {
        pending.dropped += 1;
    } else {
        pending.records.push(record);
    }
}

/// Number of records waiting for readiness.
pub fn pending_len() -> usize {
    pending().records.len()
}

/// Write every queued record to stderr, oldest first, and empty the queue.
///
/// Used when the process must exit before a logger exists.
pub(crate) fn drain_pending_to_stderr() {
    let mut pending = pending();
    let mut stderr = io::stderr().lock();
    for record in pending.records.drain(..) {
        let _ = write_stderr_line(
            &mut stderr,
            record.level,
            record.caller,
            &record.message,
            &record.context,
        );
    }
    if pending.dropped > 0 {
        let _ = writeln!(
            stderr,
            "{} log records emitted before the logger was ready were dropped",
            pending.dropped
        );
        pending.dropped = 0;
    }
}

/// `level<TAB>caller<TAB>message[<TAB>fields]`, the layout used before readiness.
pub(crate) fn write_stderr_line(
    out: &mut impl Write,
    level: Level,
    caller: Option<&'static Location<'static>>,
    message: &str,
    fields: &Fields,
) -> io::Result<()> {
    write!(out, "{level}\t")?;
    if let Some(caller) = caller {
        write!(out, "{}:{}", caller.file(), caller.line())?;
    }
    write!(out, "\t{message}")?;
    if !fields.is_empty() {
        write!(out, "\t{}", FieldsJson(fields.as_slice()))?;
    }
    writeln!(out)
}
