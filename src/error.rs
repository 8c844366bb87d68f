//! Error types for fx_enrich

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for fx_enrich
///
/// `DateFormat` and `RateLookup` are resolution failures: the resolver logs
/// them and the enricher wraps them in `Aborted`. Everything else propagates
/// unchanged to the binary.
#[derive(Error, Debug)]
pub enum FxEnrichError {
    /// Row timestamp is not `DD.MM.YYYY HH:MM:SS`
    #[error("Invalid date '{timestamp}': expected DD.MM.YYYY HH:MM:SS ({reason})")]
    DateFormat { timestamp: String, reason: String },

    /// Transport failure, bad status, malformed body or missing/unusable rate
    #[error("Rate lookup failed for {date}: {reason}")]
    RateLookup { date: String, reason: String },

    /// Amount column is not a number
    #[error("Invalid amount '{value}' in row {row}")]
    AmountParse { row: usize, value: String },

    /// Record shorter than the column layout needs (row 0 is the header)
    #[error("Row {row} has {len} fields, column {index} is required")]
    MissingField { row: usize, index: usize, len: usize },

    /// Access key file missing, unreadable or empty
    #[error("Cannot read credential from {path}: {reason}")]
    CredentialRead { path: PathBuf, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Fail-fast stop: the resolution failure of data row `row`
    #[error("Aborted at row {row}: {source}")]
    Aborted {
        row: usize,
        #[source]
        source: Box<FxEnrichError>,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FxEnrichError {
    /// Shorthand for a lookup failure on a given date
    pub fn lookup(date: impl ToString, reason: impl Into<String>) -> Self {
        FxEnrichError::RateLookup {
            date: date.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for fx_enrich operations
pub type Result<T> = std::result::Result<T, FxEnrichError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_message() {
        let err = FxEnrichError::lookup("2023-02-01", "missing rate for UAH");
        assert_eq!(
            err.to_string(),
            "Rate lookup failed for 2023-02-01: missing rate for UAH"
        );
    }

    #[test]
    fn test_aborted_wraps_source() {
        let inner = FxEnrichError::lookup("2023-02-01", "timeout");
        let err = FxEnrichError::Aborted {
            row: 7,
            source: Box::new(inner),
        };
        let msg = err.to_string();
        assert!(msg.contains("row 7"));
        assert!(msg.contains("timeout"));
    }

    #[test]
    fn test_missing_field_message() {
        let err = FxEnrichError::MissingField {
            row: 3,
            index: 3,
            len: 2,
        };
        assert_eq!(err.to_string(), "Row 3 has 2 fields, column 3 is required");
    }
}
