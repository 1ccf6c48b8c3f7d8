//! Crate-level error type.

use thiserror::Error;

/// Errors raised while building or configuring a guard.
///
/// Failure handling itself never returns an error; these only surface from
/// configuration loading and classifier construction.
#[derive(Debug, Error)]
pub enum GuardError {
    /// The configuration file was not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),

    /// The configuration path is not valid UTF-8.
    #[error("invalid configuration path: {0}")]
    InvalidConfigPath(String),

    /// The configuration could not be parsed or deserialized.
    #[error("failed to parse configuration: {0}")]
    Config(#[from] ::config::ConfigError),

    /// A configured classification keyword could not be compiled.
    #[error("invalid classification pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern text.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// The cache-busting query parameter name is blank.
    #[error("retry query parameter must not be empty")]
    EmptyRetryParam,
}

/// Result type for guard construction and configuration.
pub type GuardResult<T> = Result<T, GuardError>;
