//! Connector configuration.
//!
//! The config file is a JSON object in the shape Singer taps accept:
//!
//! ```json
//! {
//!   "auth_token": "...",
//!   "start_date": "2020-01-01",
//!   "source_currency": "USD",
//!   "user_agent": "singer-tap"
//! }
//! ```

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use std::path::Path;

use crate::{CURRENCY_CODE_LEN, ConfigError, parse_date};

/// Environment variable that overrides `auth_token`.
pub const AUTH_TOKEN_ENV: &str = "RATETAP_AUTH_TOKEN";

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "http://api.exchangerate.host";

/// Settings for one sync run.
#[derive(Clone, Deserialize)]
pub struct TapConfig {
    /// The token to authenticate against the API service.
    #[serde(default)]
    pub auth_token: String,

    /// The earliest record date to sync.
    #[serde(default, deserialize_with = "deserialize_start_date")]
    pub start_date: Option<NaiveDate>,

    /// Source currency to get exchange rates for.
    #[serde(default = "default_source_currency")]
    pub source_currency: String,

    /// User agent presented to the API.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// API root URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_source_currency() -> String {
    "USD".to_string()
}

fn default_user_agent() -> String {
    "singer-tap".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl TapConfig {
    /// Creates a config with defaults for everything but the token.
    #[must_use]
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
            start_date: None,
            source_currency: default_source_currency(),
            user_agent: default_user_agent(),
            base_url: default_base_url(),
        }
    }

    /// Sets the start date.
    #[must_use]
    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Sets the source currency.
    #[must_use]
    pub fn with_source_currency(mut self, currency: impl Into<String>) -> Self {
        self.source_currency = currency.into();
        self
    }

    /// Parses a config from a JSON string without validating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a config file without validating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Reads a config file, applies the environment override, and validates.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or the result
    /// is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::read(path)?;
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Replaces the auth token with [`AUTH_TOKEN_ENV`] when it is set.
    pub fn apply_env(&mut self) {
        if let Some(token) = std::env::var(AUTH_TOKEN_ENV)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
        {
            self.auth_token = token;
        }
    }

    /// Checks required fields and normalizes the source currency to upper case.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or the currency is not a
    /// three-letter code.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        if self.auth_token.trim().is_empty() {
            return Err(ConfigError::MissingAuthToken);
        }

        let currency = self.source_currency.trim();
        if currency.len() != CURRENCY_CODE_LEN || !currency.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(ConfigError::InvalidCurrency(self.source_currency.clone()));
        }
        self.source_currency = currency.to_ascii_uppercase();
        Ok(())
    }

    /// Picks the date a sync starts from: the bookmark when one exists,
    /// otherwise the configured start date.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingStartDate`] if neither is available.
    pub fn starting_date(&self, bookmark: Option<NaiveDate>) -> Result<NaiveDate, ConfigError> {
        bookmark
            .or(self.start_date)
            .ok_or(ConfigError::MissingStartDate)
    }
}

impl std::fmt::Debug for TapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapConfig")
            .field("auth_token", &"<redacted>")
            .field("start_date", &self.start_date)
            .field("source_currency", &self.source_currency)
            .field("user_agent", &self.user_agent)
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 date-time, keeping only the date.
fn deserialize_start_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.date_naive()));
    }
    parse_date(raw).map(Some).map_err(serde::de::Error::custom)
}
