//! `tracing-subscriber` fmt layers for both sinks.
//!
//! # Formats
//! - Json (primary): `{"level":"info","ts":"...","caller":"src/app.rs:12","msg":"...","requestId":"..."}`
//! - Json (external): the stock flattened JSON formatter
//! - Console: the stock full formatter, ANSI colored when enabled
//!
//! # Design Decisions
//! - Record fields have names only known at runtime, so they travel as one
//!   pre-encoded `fields` value; `RecordJson` splices it into the top level
//! - Fatal has no `tracing` level; it is an ERROR event tagged `fatal = true`

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt::{self, Write as _};
use tracing::field::{Field as EventField, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Dispatch, Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{ChronoUtc, FormatTime};
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

use crate::config::LoggerConfig;
use crate::fields::{Field, FieldValue};
use crate::sink::Level;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// UTC timestamps with millisecond precision.
pub fn timer() -> ChronoUtc {
    ChronoUtc::new(TIMESTAMP_FORMAT.to_string())
}

/// Line format shared by the primary and external sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Production: one JSON object per line.
    Json,
    /// Development: human-oriented console lines.
    Console { color: bool },
}

impl Encoding {
    /// Development configs get console output, production configs JSON.
    pub fn from_config(config: &LoggerConfig) -> Self {
        if config.debug {
            Encoding::Console {
                color: config.color,
            }
        } else {
            Encoding::Json
        }
    }
}

/// Subscriber for leveled records: a level filter plus one fmt layer.
pub fn primary_dispatch<W>(encoding: Encoding, level: Level, writer: W) -> Dispatch
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let registry = tracing_subscriber::registry().with(LevelFilter::from(level));
    match encoding {
        Encoding::Json => Dispatch::new(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .event_format(RecordJson::new(timer()))
                    .with_writer(writer),
            ),
        ),
        Encoding::Console { color } => Dispatch::new(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(color)
                    .with_target(false)
                    .with_timer(timer())
                    .with_writer(writer),
            ),
        ),
    }
}

/// Subscriber for third-party output. `RUST_LOG` overrides the default level.
pub fn external_dispatch<W>(encoding: Encoding, level: Level, writer: W) -> Dispatch
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(level).into())
        .from_env_lossy();
    let registry = tracing_subscriber::registry().with(filter);
    match encoding {
        Encoding::Json => Dispatch::new(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_timer(timer())
                    .flatten_event(true)
                    .with_current_span(false)
                    .with_span_list(false)
                    .with_writer(writer),
            ),
        ),
        Encoding::Console { color } => Dispatch::new(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(color)
                    .with_timer(timer())
                    .with_writer(writer),
            ),
        ),
    }
}

/// Record fields as one JSON object, in order. Durations are float seconds.
#[derive(Debug, Clone, Copy)]
pub struct FieldsJson<'a>(pub &'a [Field]);

impl Serialize for FieldsJson<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for field in self.0 {
            let name: &str = &field.name;
            match &field.value {
                FieldValue::Str(s) => map.serialize_entry(name, s)?,
                FieldValue::Uint(n) => map.serialize_entry(name, n)?,
                FieldValue::Duration(d) => map.serialize_entry(name, &d.as_secs_f64())?,
                FieldValue::Time(t) => map.serialize_entry(
                    name,
                    &t.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                )?,
            }
        }
        map.end()
    }
}

impl fmt::Display for FieldsJson<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Event values the primary sink attaches to every record.
#[derive(Default)]
struct RecordVisitor {
    message: String,
    caller: Option<String>,
    fields: Option<String>,
    fatal: bool,
}

impl RecordVisitor {
    fn set(&mut self, name: &str, value: String) {
        match name {
            "message" => self.message = value,
            "caller" => self.caller = Some(value),
            "fields" => self.fields = Some(value),
            _ => {}
        }
    }
}

impl Visit for RecordVisitor {
    fn record_bool(&mut self, field: &EventField, value: bool) {
        if field.name() == "fatal" {
            self.fatal = value;
        }
    }

    fn record_str(&mut self, field: &EventField, value: &str) {
        self.set(field.name(), value.to_string());
    }

    fn record_debug(&mut self, field: &EventField, value: &dyn fmt::Debug) {
        self.set(field.name(), format!("{value:?}"));
    }
}

/// JSON event format for the primary sink.
///
/// Key order is fixed: `level`, `ts`, `caller`, `msg`, then record fields.
#[derive(Debug, Clone)]
pub struct RecordJson<T = ChronoUtc> {
    timer: T,
}

impl<T> RecordJson<T> {
    pub fn new(timer: T) -> Self {
        Self { timer }
    }
}

fn json_str(value: &str) -> Result<String, fmt::Error> {
    serde_json::to_string(value).map_err(|_| fmt::Error)
}

fn level_label(level: &tracing::Level) -> &'static str {
    if *level == tracing::Level::ERROR {
        "error"
    } else if *level == tracing::Level::WARN {
        "warn"
    } else if *level == tracing::Level::INFO {
        "info"
    } else {
        "debug"
    }
}

impl<S, N, T> FormatEvent<S, N> for RecordJson<T>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
    T: FormatTime,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);

        let level = if visitor.fatal {
            Level::Fatal.as_str()
        } else {
            level_label(event.metadata().level())
        };
        write!(writer, "{{\"level\":\"{level}\",\"ts\":\"")?;
        self.timer.format_time(&mut writer)?;
        writer.write_char('"')?;
        if let Some(caller) = &visitor.caller {
            write!(writer, ",\"caller\":{}", json_str(caller)?)?;
        }
        write!(writer, ",\"msg\":{}", json_str(&visitor.message)?)?;
        if let Some(inner) = visitor
            .fields
            .as_deref()
            .and_then(|f| f.strip_prefix('{'))
            .and_then(|f| f.strip_suffix('}'))
            .filter(|f| !f.is_empty())
        {
            write!(writer, ",{inner}")?;
        }
        writeln!(writer, "}}")
    }
}
