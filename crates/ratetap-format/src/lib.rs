//! Output formatters for ratetap exchange-rate records.
//!
//! This crate provides formatters for writing [`QuoteRecord`]s
//! to various output formats:
//!
//! - [`CsvFormatter`] - CSV format
//! - [`JsonFormatter`] - JSON array or NDJSON format
//! - [`SingerFormatter`] - Singer `SCHEMA` / `RECORD` / `STATE` messages
//!
//! [`QuoteRecord`]: ratetap_types::QuoteRecord

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ratetap/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod formatter;

#[cfg(feature = "csv")]
mod csv;
#[cfg(feature = "json")]
mod json;
#[cfg(feature = "singer")]
mod singer;

pub use formatter::{FormatError, Formatter, OutputFormat};

#[cfg(feature = "csv")]
pub use crate::csv::CsvFormatter;
#[cfg(feature = "json")]
pub use json::{JsonFormatter, JsonStyle};
#[cfg(feature = "singer")]
pub use singer::{STREAM_NAME, SingerFormatter, SingerMessage, timeframe_schema};
