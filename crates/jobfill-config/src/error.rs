//! Errors from reading the config file, the applicant profile and documents.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A configured path does not exist.
    #[error("{0} does not exist")]
    NotFound(String),

    #[error("malformed config: {0}")]
    InvalidFormat(String),

    #[error("{field}: {message}")]
    InvalidValue { field: String, message: String },

    /// A `${VAR}` reference names an unset variable.
    #[error("${{{0}}} is referenced but not set")]
    EnvVarNotSet(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
}
