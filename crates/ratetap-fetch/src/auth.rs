//! API key authentication.

use reqwest::RequestBuilder;

/// Where the API key is attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyLocation {
    /// As a query string parameter.
    #[default]
    Params,
    /// As a request header.
    Header,
}

/// Attaches a static API key to outgoing requests.
#[derive(Clone)]
pub struct ApiKeyAuthenticator {
    key: String,
    value: String,
    location: KeyLocation,
}

impl ApiKeyAuthenticator {
    /// Query parameter exchangerate.host reads the key from.
    pub const ACCESS_KEY: &'static str = "access_key";

    /// Creates an authenticator that sends `key=value` at `location`.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>, location: KeyLocation) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            location,
        }
    }

    /// Creates the authenticator exchangerate.host expects: the token as the
    /// `access_key` query parameter.
    #[must_use]
    pub fn access_key(token: impl Into<String>) -> Self {
        Self::new(Self::ACCESS_KEY, token, KeyLocation::Params)
    }

    /// Returns the parameter or header name.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns where the key is attached.
    #[must_use]
    pub const fn location(&self) -> KeyLocation {
        self.location
    }

    /// Attaches the key to a request.
    #[must_use]
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self.location {
            KeyLocation::Params => request.query(&[(self.key.as_str(), self.value.as_str())]),
            KeyLocation::Header => request.header(self.key.as_str(), self.value.as_str()),
        }
    }
}

impl std::fmt::Debug for ApiKeyAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuthenticator")
            .field("key", &self.key)
            .field("value", &"<redacted>")
            .field("location", &self.location)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param_auth() {
        let auth = ApiKeyAuthenticator::access_key("secret");
        let client = reqwest::Client::new();
        let request = auth
            .apply(client.get("http://localhost/timeframe").query(&[("source", "USD")]))
            .build()
            .unwrap();

        assert_eq!(
            request.url().query(),
            Some("source=USD&access_key=secret")
        );
    }

    #[test]
    fn test_header_auth() {
        let auth = ApiKeyAuthenticator::new("apikey", "secret", KeyLocation::Header);
        let client = reqwest::Client::new();
        let request = auth.apply(client.get("http://localhost/")).build().unwrap();

        assert_eq!(request.headers()["apikey"], "secret");
        assert_eq!(request.url().query(), None);
    }

    #[test]
    fn test_debug_redacts_value() {
        let auth = ApiKeyAuthenticator::access_key("secret");
        let debug = format!("{auth:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("access_key"));
    }
}
