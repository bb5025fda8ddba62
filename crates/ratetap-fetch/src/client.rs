//! HTTP client for the exchangerate.host API.

use async_trait::async_trait;
use bytes::Bytes;
use ratetap_types::{DEFAULT_BASE_URL, TapConfig};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use crate::{ApiKeyAuthenticator, Fetcher, request::endpoint_url};

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root URL.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retry attempts for failed requests.
    pub max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds).
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds).
    pub max_delay_ms: u64,
    /// User agent string.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 5,
            base_delay_ms: 1_000, // The free plan is heavily rate limited
            max_delay_ms: 60_000,
            user_agent: format!("ratetap/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    /// Builds a client config from the connector settings.
    #[must_use]
    pub fn from_tap_config(config: &TapConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            user_agent: config.user_agent.clone(),
            ..Self::default()
        }
    }
}

/// Errors that can occur during requests.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request failed. The URL is stripped, since its query carries the
    /// access key.
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// Server kept returning a retryable status until retries ran out.
    #[error("Server error: {status} after {attempts} attempts")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Attempts made, including the first.
        attempts: u32,
    },

    /// Server rejected the request.
    #[error("Request rejected with status {status}: {body}")]
    ClientError {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnosis.
        body: String,
    },
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        Self::Http(error.without_url())
    }
}

/// Returns the body of a rejected response, or a placeholder naming the
/// read failure.
fn rejected_body(body: Result<String, reqwest::Error>) -> String {
    body.unwrap_or_else(|e| format!("<unreadable body: {}>", e.without_url()))
}

/// HTTP client with API key authentication and retry logic.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    config: ClientConfig,
    auth: ApiKeyAuthenticator,
}

impl HttpClient {
    /// Creates a new client with the given configuration and authenticator.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: ClientConfig, auth: ApiKeyAuthenticator) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;
        Ok(Self {
            client,
            config,
            auth,
        })
    }

    /// Creates a client for the connector settings, authenticating with
    /// the configured token.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_tap_config(config: &TapConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            ClientConfig::from_tap_config(config),
            ApiKeyAuthenticator::access_key(config.auth_token.clone()),
        )
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Calculates the backoff delay with exponential backoff and jitter.
    fn calculate_backoff_delay(&self, attempt: u32) -> Duration {
        // base_delay * 2^attempt
        let exp_delay = self
            .config
            .base_delay_ms
            .saturating_mul(1u64 << attempt.min(10));

        let capped_delay = exp_delay.min(self.config.max_delay_ms);

        // Deterministic jitter of up to ±25%
        let jitter_range = capped_delay / 4;
        let jitter = if jitter_range > 0 {
            let jitter_offset = (u64::from(attempt) * 17) % (jitter_range * 2);
            jitter_offset as i64 - jitter_range as i64
        } else {
            0
        };

        let final_delay = (capped_delay as i64 + jitter).max(100) as u64;
        Duration::from_millis(final_delay)
    }

    /// Determines if an error is retryable.
    fn is_retryable_error(error: &reqwest::Error) -> bool {
        if error.is_builder() {
            return false;
        }
        error.is_timeout() || error.is_connect() || error.is_request()
    }
}

#[async_trait]
impl Fetcher for HttpClient {
    async fn get(&self, path: &str, query: &[(&'static str, String)]) -> Result<Bytes, FetchError> {
        let url = endpoint_url(&self.config.base_url, path);
        let mut attempts = 0;

        loop {
            let request = self.auth.apply(self.client.get(&url).query(query));
            tracing::debug!(%url, attempt = attempts + 1, "GET");

            match request.send().await {
                Ok(response) => {
                    let status = response.status();

                    // Retry on server errors (5xx) and rate limiting (429)
                    if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        if attempts < self.config.max_retries {
                            attempts += 1;
                            let delay = self.calculate_backoff_delay(attempts);
                            tracing::warn!(%status, ?delay, attempt = attempts, "retrying request");
                            tokio::time::sleep(delay).await;
                            continue;
                        }
                        return Err(FetchError::ServerError {
                            status: status.as_u16(),
                            attempts: attempts + 1,
                        });
                    }

                    if status.is_client_error() {
                        return Err(FetchError::ClientError {
                            status: status.as_u16(),
                            body: rejected_body(response.text().await),
                        });
                    }

                    return Ok(response.bytes().await?);
                }
                Err(e) if Self::is_retryable_error(&e) && attempts < self.config.max_retries => {
                    attempts += 1;
                    let delay = self.calculate_backoff_delay(attempts);
                    tracing::warn!(error = %e.without_url(), ?delay, attempt = attempts, "retrying request");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HttpClient {
        HttpClient::new(
            ClientConfig::default(),
            ApiKeyAuthenticator::access_key("test"),
        )
        .unwrap()
    }

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://api.exchangerate.host");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.base_delay_ms, 1_000);
        assert_eq!(config.max_delay_ms, 60_000);
        assert!(config.user_agent.starts_with("ratetap/"));
    }

    #[test]
    fn test_client_config_from_tap_config() {
        let mut tap = TapConfig::new("token");
        tap.user_agent = "my-agent".to_string();
        tap.base_url = "http://localhost:9000".to_string();

        let config = ClientConfig::from_tap_config(&tap);
        assert_eq!(config.user_agent, "my-agent");
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.max_retries, ClientConfig::default().max_retries);
    }

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::from_tap_config(&TapConfig::new("token"));
        assert!(client.is_ok());
    }

    #[test]
    fn test_backoff_delay_calculation() {
        let client = client();

        // First attempt: base_delay * 2 = 2000ms (plus jitter)
        let delay1 = client.calculate_backoff_delay(1);
        assert!(delay1.as_millis() >= 1500 && delay1.as_millis() <= 2500);

        // Second attempt: base_delay * 4 = 4000ms (plus jitter)
        let delay2 = client.calculate_backoff_delay(2);
        assert!(delay2.as_millis() >= 3000 && delay2.as_millis() <= 5000);

        // High attempt should be capped at max_delay
        let delay_high = client.calculate_backoff_delay(20);
        assert!(delay_high.as_millis() <= 75_000);
    }

    #[tokio::test]
    async fn test_connection_refused_is_reported() {
        let config = ClientConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            max_retries: 0,
            ..ClientConfig::default()
        };
        let client = HttpClient::new(config, ApiKeyAuthenticator::access_key("test")).unwrap();

        let result = client.get("/timeframe", &[]).await;
        assert!(matches!(result, Err(FetchError::Http(_))));
    }

    async fn refused_request(token: &str) -> FetchError {
        let config = ClientConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            max_retries: 0,
            ..ClientConfig::default()
        };
        let client = HttpClient::new(config, ApiKeyAuthenticator::access_key(token)).unwrap();

        client
            .get("/timeframe", &[("source", "USD".to_string())])
            .await
            .unwrap_err()
    }

    #[tokio::test]
    async fn test_http_error_hides_access_key() {
        let err = refused_request("SECRET123").await;

        assert!(matches!(err, FetchError::Http(_)));
        assert!(!err.to_string().contains("SECRET123"), "{err}");
        assert!(!format!("{err:?}").contains("SECRET123"), "{err:?}");
        assert!(!err.to_string().contains("access_key"), "{err}");
    }

    #[tokio::test]
    async fn test_rejected_body_read_failure_is_described() {
        let FetchError::Http(source) = refused_request("SECRET123").await else {
            panic!("expected an HTTP error");
        };

        let body = rejected_body(Err(source));
        assert!(body.starts_with("<unreadable body: "), "{body}");
        assert!(!body.contains("SECRET123"), "{body}");
        assert_eq!(rejected_body(Ok("bad key".to_string())), "bad key");
    }
}
