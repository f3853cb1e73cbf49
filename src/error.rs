use std::path::PathBuf;

use thiserror::Error;

use crate::schedule::ParseError;

/// Errors surfaced by the fallible parts of the crate: file loading, graph and config parsing,
/// and calculator input. The containers themselves never fail; out-of-range access is answered
/// with a default value or `None`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not load '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("i/o error: {0}")]
    Stream(#[from] std::io::Error),

    #[error("line {line}: invalid edge cost '{value}'")]
    InvalidCost { line: usize, value: String },

    #[error("unknown city '{0}'")]
    UnknownCity(String),

    #[error("line {line}: {reason}")]
    Schedule { line: usize, reason: ParseError },

    #[error("invalid simulation config: {0}")]
    InvalidConfig(String),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("could not encode json: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
