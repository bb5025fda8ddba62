//! Error types for ratetap.

use chrono::NaiveDate;
use thiserror::Error;

/// Result type alias for ratetap operations.
pub type Result<T> = std::result::Result<T, TapError>;

/// Errors that can abort a sync run.
#[derive(Error, Debug)]
pub enum TapError {
    /// HTTP request failed after the transport's retry policy gave up.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A date string was malformed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The API response did not have the expected shape.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Invalid or incomplete configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Invalid date window.
    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Output format error.
    #[error("Format error: {0}")]
    Format(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A date string did not match `YYYY-MM-DD`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input is not a valid calendar date.
    #[error("Invalid date '{input}': expected YYYY-MM-DD ({source})")]
    InvalidDate {
        /// The offending input.
        input: String,
        /// The underlying chrono error.
        source: chrono::ParseError,
    },
}

/// The response body lacked the structure the parser expects.
///
/// Carries the raw body so the API contract change can be diagnosed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unexpected response shape: {reason}. Body: {body}")]
pub struct SchemaError {
    /// What was wrong with the body.
    pub reason: String,
    /// The raw response body.
    pub body: String,
}

impl SchemaError {
    /// Creates a schema error from a reason and the raw body bytes.
    #[must_use]
    pub fn new(reason: impl Into<String>, body: &[u8]) -> Self {
        Self {
            reason: reason.into(),
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }
}

/// Error for invalid date windows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    /// Start date is after end date.
    #[error("Invalid date range: {start} > {end}")]
    InvalidRange {
        /// The start date.
        start: NaiveDate,
        /// The end date.
        end: NaiveDate,
    },

    /// The window spans more days than a single request allows.
    #[error("Date range {start} to {end} exceeds {max_days} days")]
    TooLong {
        /// The start date.
        start: NaiveDate,
        /// The end date.
        end: NaiveDate,
        /// The largest allowed span.
        max_days: i64,
    },
}

/// Errors raised while loading or validating configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        /// The config path.
        path: std::path::PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the config file.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// No auth token was configured.
    #[error("auth_token is required")]
    MissingAuthToken,

    /// Neither a bookmark nor a start date is available.
    #[error("start_date is required when no bookmark has been saved")]
    MissingStartDate,

    /// The source currency is not a three-letter code.
    #[error("Invalid source currency '{0}': expected a three-letter code")]
    InvalidCurrency(String),
}
