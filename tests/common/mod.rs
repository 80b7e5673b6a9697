//! Shared utilities for integration tests.

use std::sync::Arc;

use scoped_logger::sink::MemorySink;
use scoped_logger::Logger;

/// A logger over two in-memory sinks: (logger, primary, external).
#[allow(dead_code)]
pub fn memory_logger(hostname: &str) -> (Arc<Logger>, Arc<MemorySink>, Arc<MemorySink>) {
    let primary = Arc::new(MemorySink::new());
    let external = Arc::new(MemorySink::new());
    let logger = Arc::new(Logger::new(hostname, primary.clone(), external.clone()));
    (logger, primary, external)
}

/// Messages of every captured record, in order.
#[allow(dead_code)]
pub fn messages(sink: &MemorySink) -> Vec<String> {
    sink.records().into_iter().map(|r| r.message).collect()
}
