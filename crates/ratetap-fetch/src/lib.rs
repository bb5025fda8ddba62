//! HTTP client and the windowed quote stream for ratetap.
//!
//! This crate provides the fetch/parse cycle:
//!
//! - [`Fetcher`] - Transport capability the stream depends on
//! - [`HttpClient`] - reqwest-backed [`Fetcher`] with retries and API key auth
//! - [`request::RequestParams`] - Query parameters for one window
//! - [`parse_quotes`] - Flattens a timeframe response into records
//! - [`RateStream`] - Drives window pagination, one request per window

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ratetap/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod auth;
mod client;
mod fetcher;
mod parse;
pub mod request;
mod stream;

pub use auth::{ApiKeyAuthenticator, KeyLocation};
pub use client::{ClientConfig, FetchError, HttpClient};
pub use fetcher::Fetcher;
pub use parse::{QUOTES_KEY, QuoteIter, parse_quotes};
pub use stream::{RateStream, WindowBatch, flatten_records};
