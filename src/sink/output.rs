//! Background-writer output shared by both sinks.
//!
//! # Design Decisions
//! - Lines are handed to a `tracing-appender` worker thread; callers block
//!   instead of losing lines when its buffer is full
//! - Files are opened in append mode and never rotated
//! - `flush` retires the current worker: a fresh one takes new lines while
//!   dropping the old guard drains everything written before the call

use arc_swap::ArcSwap;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use tracing_appender::non_blocking::{
    NonBlocking, NonBlockingBuilder, WorkerGuard, DEFAULT_BUFFERED_LINES_LIMIT,
};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

use crate::config::OutputTarget;
use crate::sink::SinkError;

struct Worker {
    writer: NonBlocking,
    guard: Mutex<Option<WorkerGuard>>,
}

impl Worker {
    fn spawn(target: &OutputTarget, buffered_lines: usize) -> Result<Self, SinkError> {
        let builder = NonBlockingBuilder::default()
            .lossy(false)
            .buffered_lines_limit(buffered_lines);
        let (writer, guard) = match target {
            OutputTarget::Stdout => builder.finish(io::stdout()),
            OutputTarget::Stderr => builder.finish(io::stderr()),
            OutputTarget::File(path) => builder.finish(open_file(path)?),
        };
        Ok(Self {
            writer,
            guard: Mutex::new(Some(guard)),
        })
    }

    /// Block until every line already handed to this worker is written.
    fn retire(&self) {
        let guard = self
            .guard
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(guard);
    }
}

fn open_file(path: &Path) -> Result<RollingFileAppender, SinkError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| SinkError::InvalidPath(path.to_path_buf()))?
        .to_string_lossy()
        .into_owned();
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)
        .map_err(|source| SinkError::Open {
            path: path.to_path_buf(),
            source,
        })
}

/// Destination for encoded lines: stdout, stderr or an append-only file.
pub struct LogOutput {
    target: OutputTarget,
    buffered_lines: usize,
    worker: ArcSwap<Worker>,
}

impl LogOutput {
    /// Open `target` behind a background writer.
    ///
    /// `buffered_lines` of zero keeps the writer's default limit.
    pub fn open(target: &OutputTarget, buffered_lines: usize) -> Result<Self, SinkError> {
        let buffered_lines = if buffered_lines == 0 {
            DEFAULT_BUFFERED_LINES_LIMIT
        } else {
            buffered_lines
        };
        let worker = Worker::spawn(target, buffered_lines)?;
        Ok(Self {
            target: target.clone(),
            buffered_lines,
            worker: ArcSwap::from_pointee(worker),
        })
    }

    pub fn target(&self) -> &OutputTarget {
        &self.target
    }

    /// Write out every line accepted so far.
    pub fn flush(&self) -> Result<(), SinkError> {
        let next = Worker::spawn(&self.target, self.buffered_lines)?;
        let previous = self.worker.swap(Arc::new(next));
        previous.retire();
        Ok(())
    }
}

impl Drop for LogOutput {
    fn drop(&mut self) {
        self.worker.load().retire();
    }
}

impl Write for &LogOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.worker.load().writer.clone().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl std::fmt::Debug for LogOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogOutput")
            .field("target", &self.target)
            .field("buffered_lines", &self.buffered_lines)
            .finish_non_exhaustive()
    }
}
