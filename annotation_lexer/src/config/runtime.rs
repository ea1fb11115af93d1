// RUNTIME PREFERENCES (User Experience)
//
// Compile-time limits live in the generated `compile_time` module; everything
// here may be changed per process through environment variables or a TOML file.

use crate::log_error;
use crate::logging::{codes, LogLevel};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Emit characters matched by no pattern as `NONE` tokens instead of dropping them
    pub capture_unmatched: bool,

    /// Whether to collect per-session token metrics
    pub collect_metrics: bool,

    /// Whether to log a summary after each scan
    pub log_scan_summary: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            capture_unmatched: false,
            collect_metrics: true,
            log_scan_summary: false,
        }
    }
}

impl LexicalPreferences {
    /// Defaults overridden by `ANNOTATION_LEXER_*` environment variables.
    /// Only sessions built through `Lexer::with_preferences` see these.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            capture_unmatched: env_flag(env_vars::LEXICAL_CAPTURE_UNMATCHED)
                .unwrap_or(defaults.capture_unmatched),
            collect_metrics: env_flag(env_vars::LEXICAL_COLLECT_METRICS)
                .unwrap_or(defaults.collect_metrics),
            log_scan_summary: env_flag(env_vars::LEXICAL_LOG_SCAN_SUMMARY)
                .unwrap_or(defaults.log_scan_summary),
        }
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Minimum level that reaches the configured logger
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED).unwrap_or(false),
            enable_console_logging: env_flag(env_vars::LOGGING_ENABLE_CONSOLE).unwrap_or(false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
        }
    }
}

/// Parse log level from string (used for environment variables)
pub(crate) fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Errors raised while loading a runtime configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid runtime configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub lexical: LexicalPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    /// Parse preferences from TOML; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| {
            let error = ConfigError::from(e);
            log_error!(codes::config::INVALID_RUNTIME_CONFIG, &error.to_string());
            error
        })
    }

    /// Load preferences from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| {
            let error = ConfigError::Io {
                path: path.to_path_buf(),
                source,
            };
            log_error!(codes::config::INVALID_RUNTIME_CONFIG, &error.to_string(),
                "path" => path.display()
            );
            error
        })?;
        Self::from_toml_str(&content)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Lexical
    pub const LEXICAL_CAPTURE_UNMATCHED: &str = "ANNOTATION_LEXER_CAPTURE_UNMATCHED";
    pub const LEXICAL_COLLECT_METRICS: &str = "ANNOTATION_LEXER_COLLECT_METRICS";
    pub const LEXICAL_LOG_SCAN_SUMMARY: &str = "ANNOTATION_LEXER_LOG_SCAN_SUMMARY";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "ANNOTATION_LEXER_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "ANNOTATION_LEXER_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "ANNOTATION_LEXER_LOGGING_MIN_LEVEL";
}
