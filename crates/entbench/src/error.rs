//! Errors raised for malformed inputs and for a failed report write.
//!
//! Only malformed inputs are errors. Degenerate arithmetic (no samples inside a
//! supplied range, fewer than two bins, a single sample) is not: it surfaces as
//! NaN or infinity in the returned statistic.

use thiserror::Error;

/// Errors produced while resolving a value range or a bin layout, or while
/// writing the text report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntError {
    /// The range had to be derived from the data, but there is none.
    #[error("empty input: cannot derive a value range from zero samples")]
    EmptyInput,

    #[error("invalid value range: min ({min}) is larger than max ({max})")]
    InvalidRange { min: f64, max: f64 },

    #[error("value range [{min}, {max}] is not finite")]
    NonFiniteRange { min: f64, max: f64 },

    #[error("bin count must be positive")]
    ZeroBins,

    /// The bin count cannot be laid out in memory.
    #[error("bin count {count} is too large")]
    TooManyBins { count: usize },

    #[error("explicit bin edges must contain at least one value")]
    EmptyEdges,

    /// Edge at `index` is smaller than the edge before it.
    #[error("bin edges must increase monotonically (edge {index} decreases)")]
    NonMonotonicEdges { index: usize },

    #[error("bin edge {index} is not finite")]
    NonFiniteEdge { index: usize },

    /// Writing the text report failed.
    #[error("failed to write report: {message}")]
    Io {
        kind: std::io::ErrorKind,
        message: String,
    },
}

impl From<std::io::Error> for EntError {
    fn from(err: std::io::Error) -> Self {
        EntError::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EntError>;
