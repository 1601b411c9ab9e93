//! Error types for sr-core

use thiserror::Error;

/// Core error type for starrocks-migrate
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Invalid configuration value
    #[error("[C002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C003: IO error with file path context
    #[error("[C003] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// C004: YAML parse error
    #[error("[C004] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// C005: Identifier rejected (empty, backtick, or disallowed character)
    #[error("[C005] Invalid {kind} name '{name}': {reason}")]
    InvalidIdentifier {
        kind: &'static str,
        name: String,
        reason: &'static str,
    },

    /// C006: Stored check-sum could not be parsed
    #[error("[C006] Invalid check-sum '{value}': {reason}")]
    InvalidCheckSum { value: String, reason: String },

    /// C007: Unknown EXECTYPE value
    #[error("[C007] Unknown exec type '{0}'")]
    InvalidExecType(String),

    /// C008: Product version could not be read from the connection
    #[error("[C008] Database product version unavailable: {0}")]
    VersionUnavailable(String),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
