use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Dataset not found: {}", .0.display())]
    DataNotFound(PathBuf),

    #[error("Invalid dataset format: {0}")]
    DataFormat(String),

    #[error("Record {index}: field '{field}' {reason}")]
    DataField {
        index: usize,
        field: &'static str,
        reason: String,
    },

    #[error("Index is empty")]
    IndexEmpty,

    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Embedding provider error: {0}")]
    Embedding(String),

    #[error("Canonical text grammar violation: {0}")]
    GrammarViolation(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Startup errors: the engine must not serve queries after one of these.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::DataNotFound(_)
                | Error::DataFormat(_)
                | Error::DataField { .. }
                | Error::InvalidConfig(_)
                | Error::Io(_)
        )
    }
}
