//! Harness error types.

/// Errors raised while configuring or running the conformance harness.
///
/// Case failures are not errors: they are recorded in the report.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// A case filter names a case that does not exist.
    #[error("unknown case '{name}'. Known cases: {known}")]
    UnknownCase { name: String, known: String },

    /// The configured log level is not a `log` level name.
    #[error("invalid log level '{value}'. Choose: off, error, warn, info, debug, trace")]
    InvalidLogLevel { value: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for harness operations.
pub type Result<T> = std::result::Result<T, HarnessError>;
