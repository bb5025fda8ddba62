//! Core types for the ratetap exchange-rate extractor.
//!
//! This crate provides the pure, I/O-free building blocks of a sync run:
//!
//! - [`DateWindow`] - Inclusive date range sent as one request
//! - [`WindowPaginator`] - Splits a start date up to today into bounded windows
//! - [`Clock`] - Source of today's UTC date
//! - [`QuoteRecord`] - One exchange rate for one pair on one day
//! - [`TapConfig`] - Connector configuration

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ratetap/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod clock;
mod config;
mod error;
mod paginator;
mod quote;
mod window;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{AUTH_TOKEN_ENV, DEFAULT_BASE_URL, TapConfig};
pub use error::{ConfigError, DateRangeError, ParseError, Result, SchemaError, TapError};
pub use paginator::{Paginator, WindowPaginator};
pub use quote::{CURRENCY_CODE_LEN, QuoteRecord};
pub use window::{DATE_FORMAT, DateWindow, MAX_SPAN_DAYS, parse_date};
