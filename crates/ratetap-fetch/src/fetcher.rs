//! Transport capability used by the quote stream.

use async_trait::async_trait;
use bytes::Bytes;

use crate::FetchError;

/// Performs a GET request and returns the response body.
///
/// The quote stream only talks to this trait, so it never depends on a
/// particular HTTP client, retry policy, or authentication scheme.
/// Implementations are expected to have exhausted their own retries before
/// returning an error.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `path` with the given query parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request ultimately fails.
    async fn get(&self, path: &str, query: &[(&'static str, String)]) -> Result<Bytes, FetchError>;
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for &F {
    async fn get(&self, path: &str, query: &[(&'static str, String)]) -> Result<Bytes, FetchError> {
        (**self).get(path, query).await
    }
}

#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for std::sync::Arc<F> {
    async fn get(&self, path: &str, query: &[(&'static str, String)]) -> Result<Bytes, FetchError> {
        (**self).get(path, query).await
    }
}
