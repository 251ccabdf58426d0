use thiserror::Error;

use crate::core::dtype::Dtype;

/// Error type definitions
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error")]
    Io(#[source] std::io::Error),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Duplicate column name: {0}")]
    DuplicateColumnName(String),

    #[error("Inconsistent row count: expected {expected}, found {found}")]
    InconsistentRowCount { expected: usize, found: usize },

    #[error("Column type mismatch: column {name}, expected {expected}, found {found}")]
    ColumnTypeMismatch {
        name: String,
        expected: Dtype,
        found: Dtype,
    },

    #[error("Index out of bounds: index {index}, size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    #[error("Length mismatch: expected {expected}, actual {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Type error: {0}")]
    Type(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::ConfigurationError(format!("invalid YAML: {}", err))
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigurationError(format!("invalid TOML: {}", err))
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::ConfigurationError(format!("cannot serialize TOML: {}", err))
    }
}
