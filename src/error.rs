/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/
use std::fmt;

/// Main error type for the library
#[derive(Debug)]
pub enum AppError {
    /// The operation needs a session token and none is held
    NotAuthenticated,
    /// The requested field is not present in the resource response
    UnknownField {
        /// Logical resource name
        resource: String,
        /// Requested field name
        field: String,
    },
    /// A typed field lookup found a value of another JSON type
    FieldType {
        /// Field name
        field: String,
        /// Expected kind, as displayed by `FieldKind`
        expected: String,
    },
    /// A `results` wrapper was missing or empty
    EmptyResults(String),
    /// No instrument matches the given ticker symbol
    InstrumentNotFound(String),
    /// A credential provider could not supply the named value
    MissingCredentials(String),
    /// Invalid caller input
    InvalidInput(String),
    /// Response body did not have the expected shape
    Deserialization(String),
    /// A background task failed to complete
    Internal(String),
    /// Transport-level failure
    Network(reqwest::Error),
    /// JSON encoding or decoding failure
    Json(serde_json::Error),
    /// I/O failure
    Io(std::io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotAuthenticated => write!(f, "not authenticated"),
            AppError::UnknownField { resource, field } => {
                write!(f, "unknown field '{field}' for resource '{resource}'")
            }
            AppError::FieldType { field, expected } => {
                write!(f, "field '{field}' is not of kind {expected}")
            }
            AppError::EmptyResults(resource) => {
                write!(f, "empty results for resource '{resource}'")
            }
            AppError::InstrumentNotFound(symbol) => write!(f, "instrument not found: {symbol}"),
            AppError::MissingCredentials(what) => write!(f, "missing credentials: {what}"),
            AppError::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            AppError::Deserialization(msg) => write!(f, "deserialization error: {msg}"),
            AppError::Internal(msg) => write!(f, "internal error: {msg}"),
            AppError::Network(e) => write!(f, "network error: {e}"),
            AppError::Json(e) => write!(f, "json error: {e}"),
            AppError::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Network(e) => Some(e),
            AppError::Json(e) => Some(e),
            AppError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Json(err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err)
    }
}
