//! Error types for parsing and schema construction.
//!
//! [`ParseError`] is what a parse run records for each rejected option or
//! flag. Its `Display` output is the diagnostic string exposed through
//! [`Parser::error_messages`](crate::Parser::error_messages).
//!
//! [`SchemaError`] covers failures while building a [`Schema`](crate::Schema)
//! from a schema file.

use thiserror::Error;

/// A rejected option or flag, recorded during [`Parser::parse`](crate::Parser::parse).
///
/// # Examples
///
/// ```
/// use cliparse_core::ParseError;
///
/// let err = ParseError::InvalidOptionValue {
///     name: "port".to_string(),
///     value: Some("abc".to_string()),
/// };
/// assert_eq!(err.to_string(), r#"Invalid value for option "port": "abc""#);
///
/// let err = ParseError::UnknownFlag('x');
/// assert_eq!(err.to_string(), r#"Unknown flag "x""#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A `--name` that the option schema does not declare.
    #[error("Unknown option \"{0}\"")]
    UnknownOption(String),
    /// A `-x` that the flag schema does not map, or that cannot be resolved
    /// because no option schema is set.
    #[error("Unknown flag \"{0}\"")]
    UnknownFlag(char),
    /// The option's validator rejected the value (`None` when no value was given).
    #[error("Invalid value for option \"{name}\": {}", quote_value(.value))]
    InvalidOptionValue { name: String, value: Option<String> },
}

fn quote_value(value: &Option<String>) -> String {
    match value {
        Some(value) => format!("\"{value}\""),
        None => "null".to_string(),
    }
}

/// Errors that can occur while loading or building a schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Schema file could not be read.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON schema file failed to deserialize.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML schema file failed to deserialize.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// A pattern validator carries a regex that does not compile.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A flag key is not exactly one character, or is `=` or `-`.
    #[error("invalid flag name: {0:?}")]
    InvalidFlagName(String),
}

/// Convenience alias for results with [`SchemaError`].
pub type Result<T> = std::result::Result<T, SchemaError>;
