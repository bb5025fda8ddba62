//! Output format abstraction.

use ratetap_types::QuoteRecord;
use std::io::Write;
use thiserror::Error;

/// Output format identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Singer message stream.
    #[default]
    Singer,
    /// Newline-delimited JSON format.
    Ndjson,
    /// JSON array format.
    Json,
    /// CSV format.
    Csv,
}

impl OutputFormat {
    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Singer => "singer.jsonl",
            Self::Ndjson => "ndjson",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    /// Returns the name used on the command line.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Singer => "singer",
            Self::Ndjson => "ndjson",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    /// Returns all available formats.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Singer, Self::Ndjson, Self::Json, Self::Csv]
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "singer" => Ok(Self::Singer),
            "ndjson" | "jsonl" => Ok(Self::Ndjson),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            _ => Err(FormatError::UnknownFormat(s.to_string())),
        }
    }
}

/// Errors that can occur during formatting.
#[derive(Error, Debug)]
pub enum FormatError {
    /// Unknown output format.
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Trait for output formatters.
///
/// A sync writes the header once, then one batch of records per window,
/// each followed by a checkpoint. Formatters that cannot be appended to
/// batch by batch report it through [`Formatter::is_streaming`].
pub trait Formatter: Send + Sync {
    /// Writes anything that must precede the first record.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_header<W: Write + Send>(&self, _writer: W) -> Result<(), FormatError> {
        Ok(())
    }

    /// Writes a batch of records to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_records<W: Write + Send>(
        &self,
        records: &[QuoteRecord],
        writer: W,
    ) -> Result<(), FormatError>;

    /// Writes a checkpoint carrying the sync state after a batch.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_state<W: Write + Send>(
        &self,
        _state: &serde_json::Value,
        _writer: W,
    ) -> Result<(), FormatError> {
        Ok(())
    }

    /// Returns true if batches can be written as they arrive.
    fn is_streaming(&self) -> bool {
        true
    }

    /// Returns the file extension for this format.
    fn extension(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("singer".parse::<OutputFormat>().unwrap(), OutputFormat::Singer);
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Ndjson);
        assert!(matches!(
            "parquet".parse::<OutputFormat>(),
            Err(FormatError::UnknownFormat(_))
        ));
    }

    #[test]
    fn test_display_round_trips() {
        for format in OutputFormat::all() {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), *format);
        }
    }
}
