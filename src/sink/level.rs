//! Severity levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

/// Record severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Diagnostic chatter (encoded as `debug`).
    Verbose,
    /// Normal operation.
    #[default]
    Info,
    /// Something unexpected that the caller recovered from.
    Warn,
    /// A failed operation.
    Error,
    /// Unrecoverable; the process terminates after emission.
    Fatal,
}

impl Level {
    /// Parse a level token.
    ///
    /// Accepts `debug|verbose|1`, `info|2`, `warn|warning|3`, `error|4` and
    /// `critical|fatal|5`, case-insensitively. Anything else is `None`.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "debug" | "verbose" | "1" => Some(Level::Verbose),
            "info" | "2" => Some(Level::Info),
            "warn" | "warning" | "3" => Some(Level::Warn),
            "error" | "4" => Some(Level::Error),
            "critical" | "fatal" | "5" => Some(Level::Fatal),
            _ => None,
        }
    }

    /// Lowercase label used in JSON records.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Verbose => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a level token is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized log level: {0}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::parse(s).ok_or_else(|| ParseLevelError(s.to_string()))
    }
}

impl From<Level> for LevelFilter {
    fn from(level: Level) -> Self {
        match level {
            Level::Verbose => LevelFilter::DEBUG,
            Level::Info => LevelFilter::INFO,
            Level::Warn => LevelFilter::WARN,
            // tracing has nothing above ERROR.
            Level::Error | Level::Fatal => LevelFilter::ERROR,
        }
    }
}
