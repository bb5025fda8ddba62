//! Endpoint and query parameter construction.

use chrono::NaiveDate;
use ratetap_types::{DATE_FORMAT, DateWindow};

/// Path of the historical timeframe endpoint.
pub const TIMEFRAME_PATH: &str = "/timeframe";

/// Field the API sorts quotes by.
pub const ORDER_BY: &str = "date";

/// Sort direction for returned quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Oldest first.
    #[default]
    Ascending,
    /// Newest first.
    Descending,
}

impl SortOrder {
    /// Returns the API's spelling of this order.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

/// Query parameters for one timeframe request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestParams {
    /// Source currency code.
    pub source: String,
    /// First date requested (inclusive).
    pub start_date: NaiveDate,
    /// Last date requested (inclusive).
    pub end_date: NaiveDate,
    /// Sort direction by date.
    pub sort: SortOrder,
}

impl RequestParams {
    /// Builds ascending-by-date parameters for a window.
    #[must_use]
    pub fn for_window(source: &str, window: DateWindow) -> Self {
        Self {
            source: source.to_string(),
            start_date: window.start,
            end_date: window.end,
            sort: SortOrder::Ascending,
        }
    }

    /// Returns the parameters as query-string pairs.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("source", self.source.clone()),
            ("start_date", self.start_date.format(DATE_FORMAT).to_string()),
            ("end_date", self.end_date.format(DATE_FORMAT).to_string()),
            ("sort", self.sort.as_str().to_string()),
            ("order_by", ORDER_BY.to_string()),
        ]
    }
}

/// Joins an API root and an endpoint path with exactly one slash.
///
/// # Example
///
/// ```
/// use ratetap_fetch::request::endpoint_url;
///
/// let url = endpoint_url("http://api.exchangerate.host/", "/timeframe");
/// assert_eq!(url, "http://api.exchangerate.host/timeframe");
/// ```
#[must_use]
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
