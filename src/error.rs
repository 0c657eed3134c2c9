use std::path::PathBuf;

use thiserror::Error;

/// Errors raised outside the numerical core: parameter handling and persistence.
///
/// Integration and convergence analysis never fail; they signal bad input
/// through non-finite values instead.
#[derive(Debug, Error)]
pub enum Error {
    #[error("missing parameter: {0}")]
    MissingParameter(String),

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("unknown method: {0}")]
    UnknownMethod(String),

    #[error("line {line}: malformed row {content:?}")]
    MalformedRow { line: usize, content: String },

    #[error("missing files in {}", .0.display())]
    MissingData(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
