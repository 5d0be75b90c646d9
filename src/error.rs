use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by `CardinalityEstimator` operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("precision must be in the range [{min},{max}], got {precision}")]
    InvalidPrecision { precision: u8, min: u8, max: u8 },
    #[error("error rate must be in the range (0,1) and reachable with precision {max_precision}, got {error_rate}")]
    InvalidErrorRate { error_rate: f64, max_precision: u8 },
    #[error("number of registers doesn't match: {expected} != {actual}")]
    RegisterCountMismatch { expected: usize, actual: usize },
    #[error("malformed snapshot: {0}")]
    Format(#[from] FormatError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Reasons a snapshot is rejected by `restore`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("truncated, expected {expected} bytes but found {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u8),
    #[error("precision {0} is outside the supported range")]
    InvalidPrecision(u8),
    #[error("register {index} holds {value}, maximum is {max}")]
    RegisterOutOfRange { index: usize, value: u8, max: u8 },
    #[error("{0} unexpected bytes after the last register")]
    TrailingBytes(usize),
}
