//! Configuration loading from the environment.

use crate::config::schema::{LoggerConfig, OutputTarget};
use crate::sink::Level;

/// Environment variable names.
pub mod env {
    /// Any non-empty value enables development mode.
    pub const DEBUG: &str = "DEBUG";
    /// Minimum severity token.
    pub const LOGGING_LEVEL: &str = "LOGGING_LEVEL";
    /// `stdout`, `stderr` or a file path.
    pub const LOGGING_OUTPUT: &str = "LOGGING_OUTPUT";
    /// Lines held by the background writer.
    pub const LOGGING_BUFFER: &str = "LOGGING_BUFFER";
}

/// Load configuration from the process environment.
pub fn load_from_env() -> LoggerConfig {
    load_from_lookup(|key| std::env::var(key).ok())
}

/// Load configuration through an arbitrary key lookup.
pub fn load_from_lookup<F>(lookup: F) -> LoggerConfig
where
    F: Fn(&str) -> Option<String>,
{
    let debug = lookup(env::DEBUG).is_some_and(|v| !v.is_empty());
    let mut config = if debug {
        LoggerConfig::development()
    } else {
        LoggerConfig::production()
    };

    if let Some(level) = lookup(env::LOGGING_LEVEL).as_deref().and_then(Level::parse) {
        config.level = level;
    }
    if let Some(output) = lookup(env::LOGGING_OUTPUT).as_deref().and_then(OutputTarget::parse) {
        config.output = output;
    }
    if let Some(lines) = lookup(env::LOGGING_BUFFER).and_then(|v| v.trim().parse().ok()) {
        config.buffered_lines = lines;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> LoggerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        load_from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_empty_environment_is_production() {
        assert_eq!(load(&[]), LoggerConfig::production());
    }

    #[test]
    fn test_empty_debug_value_is_production() {
        assert!(!load(&[(env::DEBUG, "")]).debug);
    }

    #[test]
    fn test_debug_enables_development() {
        let config = load(&[(env::DEBUG, "1")]);
        assert!(config.debug);
        assert_eq!(config.level, Level::Verbose);
    }

    #[test]
    fn test_level_override() {
        let config = load(&[(env::DEBUG, "yes"), (env::LOGGING_LEVEL, "Warning")]);
        assert!(config.debug);
        assert_eq!(config.level, Level::Warn);

        let config = load(&[(env::LOGGING_LEVEL, "5")]);
        assert_eq!(config.level, Level::Fatal);
    }

    #[test]
    fn test_unrecognized_level_keeps_default() {
        assert_eq!(load(&[(env::LOGGING_LEVEL, "loud")]).level, Level::Info);
        assert_eq!(
            load(&[(env::DEBUG, "1"), (env::LOGGING_LEVEL, "loud")]).level,
            Level::Verbose
        );
    }

    #[test]
    fn test_output_and_buffer() {
        let config = load(&[(env::LOGGING_OUTPUT, "stdout"), (env::LOGGING_BUFFER, "4096")]);
        assert_eq!(config.output, OutputTarget::Stdout);
        assert_eq!(config.buffered_lines, 4096);

        let config = load(&[(env::LOGGING_BUFFER, "lots")]);
        assert_eq!(config.buffered_lines, 0);
    }
}
