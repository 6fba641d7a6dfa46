//! Error types for the Timestream-to-MDF converter library.

use std::fmt;

/// Result type alias for converter operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when reading a query result or writing an MDF file.
#[derive(Debug)]
pub enum Error {
    /// Input is not a valid Timestream query result document
    /// (malformed JSON, missing `ColumnInfo`/`Rows`, wrong shape)
    InvalidFormat(String),

    /// I/O error occurred while reading or writing
    Io(std::io::Error),

    /// A required column is missing from the `ColumnInfo` section
    MissingColumn(String),

    /// A `time` value could not be parsed as an instant
    InvalidTimestamp(String),

    /// A row carries neither a double nor a bigint measure value
    MissingValue { time: String, signal: String },

    /// Output error (e.g. MDF serialization or write failure)
    OutputError(String),

    /// Generic error with message
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidFormat(msg) => write!(f, "Invalid query result document: {}", msg),
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::MissingColumn(name) => write!(f, "Missing required column: {}", name),
            Error::InvalidTimestamp(text) => write!(f, "Invalid timestamp: {:?}", text),
            Error::MissingValue { time, signal } => write!(
                f,
                "Row at {} for signal {:?} has neither a double nor a bigint value",
                time, signal
            ),
            Error::OutputError(msg) => write!(f, "Output error: {}", msg),
            Error::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidFormat(err.to_string())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}
