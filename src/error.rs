use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignalError {
    #[error("input file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SignalError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SignalError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SignalError>;
