//! Singer message output.
//!
//! A Singer tap writes newline-delimited JSON messages: one `SCHEMA` for the
//! stream, then `RECORD`s, with `STATE` messages in between that a runner
//! persists and hands back on the next run.

use chrono::{DateTime, Utc};
use ratetap_types::QuoteRecord;
use serde::Serialize;
use serde_json::{Value, json};
use std::io::Write;

use crate::{FormatError, Formatter};

/// Name of the exchange-rate stream.
pub const STREAM_NAME: &str = "timeframe";

/// JSON schema of a [`QuoteRecord`].
#[must_use]
pub fn timeframe_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "date": {
                "type": ["string"],
                "format": "date",
                "description": "Date of the quote"
            },
            "currency": {
                "type": ["string"],
                "description": "{source}{destination} currency codes"
            },
            "quote": {
                "type": ["number"],
                "description": "Quoted rate between currencies"
            }
        },
        "required": ["date", "currency", "quote"]
    })
}

/// One Singer protocol message.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum SingerMessage<'a> {
    /// Describes the records of a stream.
    Schema {
        /// Stream name.
        stream: &'a str,
        /// JSON schema of each record.
        schema: Value,
        /// Fields identifying a record.
        key_properties: &'a [&'a str],
        /// Fields the bookmark is taken from.
        bookmark_properties: &'a [&'a str],
    },
    /// One record of a stream.
    Record {
        /// Stream name.
        stream: &'a str,
        /// The record.
        record: &'a QuoteRecord,
        /// When the record was fetched.
        time_extracted: DateTime<Utc>,
    },
    /// Sync state to persist.
    State {
        /// Opaque state value.
        value: &'a Value,
    },
}

/// Writes records as a Singer message stream.
#[derive(Debug, Clone)]
pub struct SingerFormatter {
    stream: String,
    time_extracted: DateTime<Utc>,
}

impl Default for SingerFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl SingerFormatter {
    /// Fields identifying a record.
    pub const KEY_PROPERTIES: &'static [&'static str] = &["date", "currency"];

    /// Replication key.
    pub const BOOKMARK_PROPERTIES: &'static [&'static str] = &["date"];

    /// Creates a formatter for the `timeframe` stream, stamping records
    /// with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stream: STREAM_NAME.to_string(),
            time_extracted: Utc::now(),
        }
    }

    /// Sets the extraction timestamp written on every record.
    #[must_use]
    pub const fn with_time_extracted(mut self, time_extracted: DateTime<Utc>) -> Self {
        self.time_extracted = time_extracted;
        self
    }

    /// Returns the stream name.
    #[must_use]
    pub fn stream(&self) -> &str {
        &self.stream
    }

    fn write_message<W: Write>(message: &SingerMessage<'_>, mut writer: W) -> Result<(), FormatError> {
        serde_json::to_writer(&mut writer, message)?;
        writeln!(writer)?;
        Ok(())
    }
}

impl Formatter for SingerFormatter {
    fn write_header<W: Write + Send>(&self, writer: W) -> Result<(), FormatError> {
        let message = SingerMessage::Schema {
            stream: &self.stream,
            schema: timeframe_schema(),
            key_properties: Self::KEY_PROPERTIES,
            bookmark_properties: Self::BOOKMARK_PROPERTIES,
        };
        Self::write_message(&message, writer)
    }

    fn write_records<W: Write + Send>(
        &self,
        records: &[QuoteRecord],
        mut writer: W,
    ) -> Result<(), FormatError> {
        for record in records {
            let message = SingerMessage::Record {
                stream: &self.stream,
                record,
                time_extracted: self.time_extracted,
            };
            Self::write_message(&message, &mut writer)?;
        }
        Ok(())
    }

    fn write_state<W: Write + Send>(&self, state: &Value, writer: W) -> Result<(), FormatError> {
        Self::write_message(&SingerMessage::State { value: state }, writer)
    }

    fn extension(&self) -> &str {
        "singer.jsonl"
    }
}
