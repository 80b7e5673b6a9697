//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::sink::Level;

/// Configuration shared by the primary and external sinks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Development mode: console encoding and a verbose default level.
    pub debug: bool,

    /// Minimum severity emitted by both sinks.
    pub level: Level,

    /// Colorize console level labels (development mode only).
    pub color: bool,

    /// Where encoded records go.
    pub output: OutputTarget,

    /// Lines the background writer may hold before callers block; 0 keeps
    /// the writer's default.
    pub buffered_lines: usize,

    /// Install the external sink as the global `tracing` subscriber.
    pub bridge_tracing: bool,
}

impl LoggerConfig {
    /// Production defaults.
    pub fn production() -> Self {
        Self {
            debug: false,
            level: Level::Info,
            color: false,
            output: OutputTarget::Stderr,
            buffered_lines: 0,
            bridge_tracing: true,
        }
    }

    /// Development defaults. Color is enabled everywhere but Windows.
    pub fn development() -> Self {
        Self {
            debug: true,
            level: Level::Verbose,
            color: !cfg!(windows),
            ..Self::production()
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::production()
    }
}

/// Output destination for encoded records.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputTarget {
    Stdout,
    #[default]
    Stderr,
    /// Append to a file, creating it if needed.
    File(PathBuf),
}

impl OutputTarget {
    /// `stdout` and `stderr` (any case) name the streams; anything else is a path.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        match value.to_ascii_lowercase().as_str() {
            "stdout" => Some(OutputTarget::Stdout),
            "stderr" => Some(OutputTarget::Stderr),
            _ => Some(OutputTarget::File(PathBuf::from(value))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_defaults() {
        let config = LoggerConfig::development();
        assert!(config.debug);
        assert_eq!(config.level, Level::Verbose);
        assert_eq!(config.color, !cfg!(windows));
        assert_eq!(config.output, OutputTarget::Stderr);
    }

    #[test]
    fn test_output_parse() {
        assert_eq!(OutputTarget::parse("STDOUT"), Some(OutputTarget::Stdout));
        assert_eq!(OutputTarget::parse("stderr"), Some(OutputTarget::Stderr));
        assert_eq!(
            OutputTarget::parse("/var/log/app.log"),
            Some(OutputTarget::File(PathBuf::from("/var/log/app.log")))
        );
        assert_eq!(OutputTarget::parse("  "), None);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: LoggerConfig =
            serde_json::from_str(r#"{"level":"warn","output":"stdout"}"#).unwrap();
        assert_eq!(config.level, Level::Warn);
        assert_eq!(config.output, OutputTarget::Stdout);
        assert!(!config.debug);
        assert!(config.bridge_tracing);
    }
}
