//! Error handling for smoke simulation and rendering

use std::io;
use thiserror::Error;

/// Errors that can occur while simulating or rendering smoke
#[derive(Debug, Error)]
pub enum SmokeError {
    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Simulation parameters were rejected
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// A value range had a non-finite bound
    #[error("Invalid {what} range: {min}..{max}")]
    InvalidRange {
        /// Which range was rejected
        what: &'static str,
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// The particle cache ended before the advertised number of records
    #[error("Truncated particle cache: expected {expected} records, found {found}")]
    TruncatedStore {
        /// Record count from the cache header
        expected: usize,
        /// Records that could actually be read
        found: usize,
    },
}

/// Type alias for Results from smoke operations
pub type Result<T> = std::result::Result<T, SmokeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = SmokeError::InvalidParameters("fps must be positive".to_string());
        assert_eq!(
            format!("{}", error),
            "Invalid parameters: fps must be positive"
        );

        let error = SmokeError::TruncatedStore {
            expected: 10,
            found: 3,
        };
        assert_eq!(
            format!("{}", error),
            "Truncated particle cache: expected 10 records, found 3"
        );

        let error = SmokeError::InvalidRange {
            what: "vx",
            min: 1.0,
            max: f64::NAN,
        };
        assert_eq!(format!("{}", error), "Invalid vx range: 1..NaN");
    }
}
