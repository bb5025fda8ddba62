//! Exchange-rate quote records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Length of an ISO 4217 currency code.
pub const CURRENCY_CODE_LEN: usize = 3;

/// One exchange rate for one currency pair on one day.
///
/// `currency` holds the source and destination codes concatenated, as the
/// API reports them (e.g. `USDEUR`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// Date of the quote.
    pub date: NaiveDate,
    /// `{source}{destination}` currency codes.
    pub currency: String,
    /// Quoted rate between the currencies.
    pub quote: f64,
}

impl QuoteRecord {
    /// Creates a new quote record.
    #[must_use]
    pub fn new(date: NaiveDate, currency: impl Into<String>, quote: f64) -> Self {
        Self {
            date,
            currency: currency.into(),
            quote,
        }
    }

    /// Returns the source currency code, if the pair is two three-letter codes.
    #[must_use]
    pub fn source_currency(&self) -> Option<&str> {
        self.split_pair().map(|(source, _)| source)
    }

    /// Returns the destination currency code, if the pair is two three-letter codes.
    #[must_use]
    pub fn dest_currency(&self) -> Option<&str> {
        self.split_pair().map(|(_, dest)| dest)
    }

    fn split_pair(&self) -> Option<(&str, &str)> {
        if self.currency.len() != CURRENCY_CODE_LEN * 2 || !self.currency.is_ascii() {
            return None;
        }
        Some(self.currency.split_at(CURRENCY_CODE_LEN))
    }
}
