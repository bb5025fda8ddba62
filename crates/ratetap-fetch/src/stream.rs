//! Windowed quote download pipeline.

use futures::stream::{self, Stream, StreamExt, TryStreamExt};
use ratetap_types::{Clock, DateWindow, QuoteRecord, SystemClock, TapError, WindowPaginator};

use crate::{
    Fetcher, QuoteIter, parse_quotes,
    request::{RequestParams, TIMEFRAME_PATH},
};

/// The records returned for one window.
#[derive(Debug, Clone)]
pub struct WindowBatch {
    /// The window that was requested.
    pub window: DateWindow,
    /// The records in this batch, in date order.
    pub records: Vec<QuoteRecord>,
}

impl WindowBatch {
    /// Creates a new window batch.
    #[must_use]
    pub const fn new(window: DateWindow, records: Vec<QuoteRecord>) -> Self {
        Self { window, records }
    }

    /// Returns true if the batch is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of records in the batch.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns the latest quote date in the batch.
    #[must_use]
    pub fn max_date(&self) -> Option<chrono::NaiveDate> {
        self.records.iter().map(|r| r.date).max()
    }
}

/// Drives a [`WindowPaginator`] through the timeframe endpoint.
///
/// Each window becomes exactly one request. Requests are strictly
/// sequential: the next one is only sent once the consumer has pulled past
/// the previous window's records. The first error ends the stream, whether it
/// comes from the transport or from a single bad record, so a failed window is
/// never silently skipped.
#[derive(Debug)]
pub struct RateStream<F, C = SystemClock> {
    fetcher: F,
    paginator: WindowPaginator<C>,
    source_currency: String,
}

impl<F: Fetcher, C: Clock> RateStream<F, C> {
    /// Creates a stream fetching `source_currency` quotes through `fetcher`.
    #[must_use]
    pub fn new(fetcher: F, paginator: WindowPaginator<C>, source_currency: impl Into<String>) -> Self {
        Self {
            fetcher,
            paginator,
            source_currency: source_currency.into(),
        }
    }

    /// Returns the paginator driving this stream.
    #[must_use]
    pub const fn paginator(&self) -> &WindowPaginator<C> {
        &self.paginator
    }

    /// Returns the configured source currency.
    #[must_use]
    pub fn source_currency(&self) -> &str {
        &self.source_currency
    }

    /// Builds the query parameters for one window.
    #[must_use]
    pub fn request_params(&self, window: DateWindow) -> RequestParams {
        RequestParams::for_window(&self.source_currency, window)
    }

    /// Fetches one window and returns its records, unparsed until iterated.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body has the wrong shape.
    pub async fn fetch_window(&self, window: DateWindow) -> Result<QuoteIter, TapError> {
        let params = self.request_params(window);
        tracing::debug!(%window, source = %self.source_currency, "fetching window");

        let body = self
            .fetcher
            .get(TIMEFRAME_PATH, &params.to_query())
            .await
            .map_err(|e| TapError::Http(e.to_string()))?;

        Ok(parse_quotes(&body)?)
    }

    /// Consumes the stream, yielding each window's parsed response.
    fn responses(self) -> impl Stream<Item = Result<(DateWindow, QuoteIter), TapError>> {
        stream::try_unfold(self, |mut this| async move {
            if this.paginator.is_finished() {
                return Ok(None);
            }

            let window = this.paginator.current_window();
            let quotes = this.fetch_window(window).await?;
            this.paginator.advance();

            Ok::<_, TapError>(Some(((window, quotes), this)))
        })
    }

    /// Consumes the stream, yielding one batch per window.
    ///
    /// A window with a bad record yields that error and no further windows
    /// are requested.
    pub fn batches(self) -> impl Stream<Item = Result<WindowBatch, TapError>> {
        stream::try_unfold(self, |mut this| async move {
            if this.paginator.is_finished() {
                return Ok(None);
            }

            let window = this.paginator.current_window();
            let records = this
                .fetch_window(window)
                .await?
                .collect::<Result<Vec<_>, _>>()?;
            this.paginator.advance();
            tracing::debug!(%window, records = records.len(), "window complete");

            Ok::<_, TapError>(Some((WindowBatch::new(window, records), this)))
        })
    }

    /// Consumes the stream, yielding individual records.
    ///
    /// The stream is finite and cannot be restarted; a new sync needs a new
    /// paginator.
    pub fn records(self) -> impl Stream<Item = Result<QuoteRecord, TapError>> {
        stop_after_error(
            self.responses()
                .map_ok(|(_, quotes)| stream::iter(quotes))
                .try_flatten(),
        )
    }
}

/// Passes items through up to and including the first error.
fn stop_after_error<T>(
    results: impl Stream<Item = Result<T, TapError>>,
) -> impl Stream<Item = Result<T, TapError>> {
    // The inner stream is not polled again once it has failed.
    stream::unfold((Box::pin(results), false), |(mut results, failed)| async move {
        if failed {
            return None;
        }
        let result = results.next().await?;
        let failed = result.is_err();
        Some((result, (results, failed)))
    })
}

/// Flattens a batch stream into individual records.
pub fn flatten_records(
    batch_stream: impl Stream<Item = Result<WindowBatch, TapError>>,
) -> impl Stream<Item = Result<QuoteRecord, TapError>> {
    stop_after_error(batch_stream.flat_map(|result| match result {
        Ok(batch) => stream::iter(batch.records.into_iter().map(Ok)).left_stream(),
        Err(e) => stream::once(async move { Err(e) }).right_stream(),
    }))
}
