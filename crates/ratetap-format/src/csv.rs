//! CSV output format.

use ratetap_types::{DATE_FORMAT, QuoteRecord};
use std::io::Write;

use crate::{FormatError, Formatter};

/// CSV formatter.
#[derive(Debug, Clone)]
pub struct CsvFormatter {
    /// Field delimiter (default: comma).
    delimiter: char,
    /// Whether to include header row.
    include_header: bool,
}

impl Default for CsvFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatter {
    /// Creates a new CSV formatter with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            include_header: true,
        }
    }

    /// Sets the field delimiter.
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets whether to include a header row.
    #[must_use]
    pub const fn with_header(mut self, include: bool) -> Self {
        self.include_header = include;
        self
    }

    /// Creates a tab-separated values (TSV) formatter.
    #[must_use]
    pub const fn tsv() -> Self {
        Self {
            delimiter: '\t',
            include_header: true,
        }
    }
}

impl Formatter for CsvFormatter {
    fn write_header<W: Write + Send>(&self, mut writer: W) -> Result<(), FormatError> {
        if self.include_header {
            let d = self.delimiter;
            writeln!(writer, "date{d}currency{d}quote")?;
        }
        Ok(())
    }

    fn write_records<W: Write + Send>(
        &self,
        records: &[QuoteRecord],
        mut writer: W,
    ) -> Result<(), FormatError> {
        let d = self.delimiter;

        for record in records {
            writeln!(
                writer,
                "{}{d}{}{d}{}",
                record.date.format(DATE_FORMAT),
                record.currency,
                record.quote
            )?;
        }

        Ok(())
    }

    fn extension(&self) -> &str {
        if self.delimiter == '\t' { "tsv" } else { "csv" }
    }
}
