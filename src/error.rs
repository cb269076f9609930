use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or processing inflammation data.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no inflammation data files found matching {pattern:?}")]
    NoDataFiles { pattern: String },

    #[error("{0}")]
    Domain(String),

    #[error("{0}")]
    Shape(String),

    #[error("{0}")]
    Type(String),

    #[error("failed to read {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path:?} line {line} column {column}: {value:?} is not a number")]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        value: String,
    },

    #[error("invalid CSV data")]
    Csv(#[from] csv::Error),

    #[error("invalid JSON data")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Missing input or values outside the valid domain.
    pub fn is_domain(&self) -> bool {
        matches!(self, Error::NoDataFiles { .. } | Error::Domain(_))
    }

    pub fn is_shape(&self) -> bool {
        matches!(self, Error::Shape(_))
    }

    pub fn is_type(&self) -> bool {
        matches!(self, Error::Type(_))
    }
}

impl From<ndarray::ShapeError> for Error {
    fn from(err: ndarray::ShapeError) -> Self {
        Error::Shape(err.to_string())
    }
}
