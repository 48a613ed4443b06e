//! Error type for dataset I/O and classification
//!
//! Structural problems are reported as the core [`DigitsError`] so callers
//! can match on the exact [`FormatError`] kind; only genuine I/O failures
//! stay as [`std::io::Error`].

use digits_core::{DigitsError, FormatError, ValueError};
use thiserror::Error;

/// Errors raised by the dataset reader, openers and classifiers
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Underlying I/O failure other than a premature end of stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Format, shape, argument or value violation
    #[error("{0}")]
    Core(#[from] DigitsError),

    /// A previous record failed to decode; nothing past it is trusted
    #[error("Reader stopped after a failure at record {record}")]
    Poisoned { record: u32 },
}

impl DatasetError {
    /// The format violation behind this error, if any
    pub fn format_error(&self) -> Option<FormatError> {
        match self {
            DatasetError::Core(DigitsError::Format(err)) => Some(*err),
            _ => None,
        }
    }

    /// The core error behind this error, if any
    pub fn core_error(&self) -> Option<DigitsError> {
        match self {
            DatasetError::Core(err) => Some(*err),
            _ => None,
        }
    }
}

impl From<FormatError> for DatasetError {
    fn from(err: FormatError) -> Self {
        DatasetError::Core(err.into())
    }
}

impl From<ValueError> for DatasetError {
    fn from(err: ValueError) -> Self {
        DatasetError::Core(err.into())
    }
}

/// Result type for dataset operations
pub type Result<T> = std::result::Result<T, DatasetError>;
