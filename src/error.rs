//! Error taxonomy shared by every loader and conditioning step.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EegError {
    /// An expected input file (e.g. one of the CURRY siblings) is absent.
    #[error("{} not accessible/available", .0.display())]
    MissingFile(PathBuf),

    /// Byte layout or value mismatch: wrong total size, non-numeric required
    /// field, reshape mismatch, malformed section.
    #[error("format error: {0}")]
    Format(String),

    /// A required metadata key is absent.
    #[error("required field `{0}` missing")]
    MissingField(String),

    #[error("reference channel {0} not found")]
    ReferenceChannelNotFound(String),

    #[error("unsupported format tag: {0}")]
    UnsupportedFormat(String),

    /// Filter or resampler arguments outside their valid range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("EDF reader error: {0}")]
    Edf(#[from] edfplus::EdfError),

    #[error("MAT reader error: {0}")]
    Mat(String),
}

pub type Result<T> = std::result::Result<T, EegError>;

/// Shorthand for building a [`EegError::Format`].
pub(crate) fn format_err(msg: impl Into<String>) -> EegError {
    EegError::Format(msg.into())
}
