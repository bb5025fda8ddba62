//! Exchange-rate extraction from exchangerate.host.
//!
//! This is a facade crate that re-exports functionality from the ratetap
//! workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use ratetap_lib::prelude::*;
//! use futures::TryStreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TapConfig::new("my-token");
//!     let client = HttpClient::from_tap_config(&config)?;
//!     let paginator = WindowPaginator::parse("2024-01-01")?;
//!
//!     let mut records = Box::pin(RateStream::new(client, paginator, "USD").records());
//!     while let Some(record) = records.try_next().await? {
//!         println!("{} {} {}", record.date, record.currency, record.quote);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ratetap/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use ratetap_types::*;

// Re-export fetch functionality
#[cfg(feature = "fetch")]
pub use ratetap_fetch::{
    ApiKeyAuthenticator, ClientConfig, FetchError, Fetcher, HttpClient, KeyLocation, QuoteIter,
    RateStream, WindowBatch, flatten_records, parse_quotes, request,
};

// Re-export formatters
#[cfg(feature = "format")]
pub use ratetap_format::{
    CsvFormatter, FormatError, Formatter, JsonFormatter, JsonStyle, OutputFormat, STREAM_NAME,
    SingerFormatter, SingerMessage,
};

// Re-export state persistence
#[cfg(feature = "state")]
pub use ratetap_state::{BookmarkTracker, StateError, StateManager, StreamBookmark, SyncState};

/// Prelude module for convenient imports.
///
/// ```
/// use ratetap_lib::prelude::*;
/// ```
pub mod prelude {
    pub use ratetap_types::{
        Clock, DateWindow, Paginator, QuoteRecord, Result, SystemClock, TapConfig, TapError,
        WindowPaginator,
    };

    #[cfg(feature = "fetch")]
    pub use ratetap_fetch::{Fetcher, HttpClient, RateStream, WindowBatch};

    #[cfg(feature = "format")]
    pub use ratetap_format::{
        CsvFormatter, Formatter, JsonFormatter, OutputFormat, STREAM_NAME, SingerFormatter,
    };

    #[cfg(feature = "state")]
    pub use ratetap_state::{BookmarkTracker, StateManager, SyncState};
}
