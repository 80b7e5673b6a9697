//! Context-enriched structured logging.
//!
//! Leveled emitters (`verbose`, `info`, `warn`, `error`, `fatal`) attach
//! fields read from a request-scoped context to every record, and stay
//! deferred until configuration has signalled readiness.
//!
//! ```no_run
//! use scoped_logger::{Context, ContextKey, Startup};
//!
//! # async fn run() {
//! scoped_logger::init().expect("inside a Tokio runtime");
//! Startup::global().ready();
//! scoped_logger::wait().await;
//!
//! let ctx = Context::background()
//!     .with_value(ContextKey::RequestId, "req-1")
//!     .with_value(ContextKey::ObjectIds, "tenantid=T1&workspaceid=W1");
//! scoped_logger::info(Some(&ctx), "Item created");
//! # }
//! ```

pub mod config;
pub mod context;
pub mod fields;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod sink;

pub use config::LoggerConfig;
pub use context::{Context, ContextKey, ContextValue, LogContext, ResponseMetadata};
pub use fields::{Field, FieldValue, Fields};
pub use lifecycle::{init, init_with, wait, Startup};
pub use observability::facade::{error, fatal, flush, info, output, verbose, warn};
pub use observability::{LogProvider, Logger};
pub use sink::{Level, LogOutput, LogSink};
