//! `LogSink` backed by a `tracing` dispatch.

use std::sync::Arc;
use tracing::Dispatch;

use crate::config::LoggerConfig;
use crate::sink::format::{self, Encoding, FieldsJson};
use crate::sink::{Level, LogOutput, LogSink, Record, SinkError};

const TARGET: &str = "scoped_logger";

macro_rules! emit {
    ($level:expr, $record:expr, $caller:expr, $fields:expr $(, $extra:tt)*) => {
        tracing::event!(
            target: TARGET,
            $level,
            caller = $caller,
            fields = $fields,
            $($extra = true,)*
            "{}",
            $record.message
        )
    };
}

/// Sink that formats records through its own subscriber.
#[derive(Clone)]
pub struct DispatchSink {
    dispatch: Dispatch,
    min_level: Level,
    output: Option<Arc<LogOutput>>,
}

impl DispatchSink {
    /// Wrap a dispatch. Records below `min_level` are dropped before it sees them.
    pub fn new(dispatch: Dispatch, min_level: Level) -> Self {
        Self {
            dispatch,
            min_level,
            output: None,
        }
    }

    /// Leveled records: configured level, configured encoding.
    pub fn primary(config: &LoggerConfig, output: Arc<LogOutput>) -> Self {
        let encoding = Encoding::from_config(config);
        Self {
            dispatch: format::primary_dispatch(encoding, config.level, output.clone()),
            min_level: config.level,
            output: Some(output),
        }
    }

    /// Third-party output: every level reaches the `EnvFilter`.
    pub fn external(config: &LoggerConfig, output: Arc<LogOutput>) -> Self {
        let encoding = Encoding::from_config(config);
        Self {
            dispatch: format::external_dispatch(encoding, config.level, output.clone()),
            min_level: Level::Verbose,
            output: Some(output),
        }
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }
}

impl std::fmt::Debug for DispatchSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchSink")
            .field("min_level", &self.min_level)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

impl LogSink for DispatchSink {
    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.level) {
            return;
        }
        let caller = record
            .caller
            .map(|c| format!("{}:{}", c.file(), c.line()));
        let fields = (!record.fields.is_empty()).then(|| FieldsJson(record.fields).to_string());
        let caller = caller.as_deref();
        let fields = fields.as_deref();

        tracing::dispatcher::with_default(&self.dispatch, || match record.level {
            Level::Verbose => emit!(tracing::Level::DEBUG, record, caller, fields),
            Level::Info => emit!(tracing::Level::INFO, record, caller, fields),
            Level::Warn => emit!(tracing::Level::WARN, record, caller, fields),
            Level::Error => emit!(tracing::Level::ERROR, record, caller, fields),
            Level::Fatal => emit!(tracing::Level::ERROR, record, caller, fields, fatal),
        });
    }

    fn flush(&self) -> Result<(), SinkError> {
        match &self.output {
            Some(output) => output.flush(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputTarget;
    use crate::fields::Field;
    use crate::sink::format::tests::TestWriter;
    use chrono::Utc;
    use std::panic::Location;

    fn record<'a>(level: Level, message: &'a str, fields: &'a [Field]) -> Record<'a> {
        Record {
            level,
            time: Utc::now(),
            message,
            caller: Some(Location::caller()),
            fields,
        }
    }

    fn lines(writer: &TestWriter) -> Vec<serde_json::Value> {
        writer
            .contents()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_record_reaches_writer() {
        let writer = TestWriter::default();
        let sink = DispatchSink::new(
            format::primary_dispatch(Encoding::Json, Level::Verbose, writer.clone()),
            Level::Verbose,
        );
        let fields = [Field::string("requestId", "req-1")];

        sink.log(&record(Level::Verbose, "detail", &fields));
        sink.log(&record(Level::Warn, "careful", &[]));

        let lines = lines(&writer);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["level"], "debug");
        assert_eq!(lines[0]["msg"], "detail");
        assert_eq!(lines[0]["requestId"], "req-1");
        assert!(lines[0]["caller"].as_str().unwrap().contains("dispatch.rs:"));
        assert_eq!(lines[1]["level"], "warn");
        assert!(lines[1].get("requestId").is_none());
    }

    #[test]
    fn test_fatal_only_threshold() {
        let writer = TestWriter::default();
        let sink = DispatchSink::new(
            format::primary_dispatch(Encoding::Json, Level::Fatal, writer.clone()),
            Level::Fatal,
        );

        assert!(!sink.enabled(Level::Error));
        sink.log(&record(Level::Error, "dropped", &[]));
        sink.log(&record(Level::Fatal, "kept", &[]));

        let lines = lines(&writer);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["level"], "fatal");
        assert_eq!(lines[0]["msg"], "kept");
    }

    #[test]
    fn test_does_not_leak_into_thread_default() {
        let outer = TestWriter::default();
        let inner = TestWriter::default();
        let sink = DispatchSink::new(
            format::primary_dispatch(Encoding::Json, Level::Verbose, inner.clone()),
            Level::Verbose,
        );
        let outer_dispatch = format::primary_dispatch(Encoding::Json, Level::Verbose, outer.clone());

        tracing::dispatcher::with_default(&outer_dispatch, || {
            sink.log(&record(Level::Info, "to sink", &[]));
            tracing::info!("to outer");
        });

        assert!(inner.contents().contains("to sink"));
        assert!(!inner.contents().contains("to outer"));
        assert!(!outer.contents().contains("to sink"));
    }

    #[test]
    fn test_flush_writes_file() {
        let path = std::env::temp_dir()
            .join(format!("scoped-logger-{}", uuid::Uuid::new_v4()))
            .join("primary.log");
        let config = LoggerConfig {
            output: OutputTarget::File(path.clone()),
            ..LoggerConfig::default()
        };
        let output = Arc::new(LogOutput::open(&config.output, 0).unwrap());
        let sink = DispatchSink::primary(&config, output);

        sink.log(&record(Level::Info, "persisted", &[Field::uint("attempt", 2)]));
        sink.flush().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(contents.trim()).unwrap();
        assert_eq!(value["msg"], "persisted");
        assert_eq!(value["attempt"], 2);
    }
}
