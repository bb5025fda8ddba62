//! Timeframe response parsing.

use ratetap_types::{QuoteRecord, SchemaError, TapError, parse_date};
use serde_json::{Map, Value};

/// Top-level key holding the quotes.
pub const QUOTES_KEY: &str = "quotes";

/// Parses a timeframe response body into a lazy iterator of records.
///
/// The body must look like
/// `{"quotes": {"<YYYY-MM-DD>": {"<PAIR>": <rate>, ...}, ...}}`. The
/// structure is validated up front; each record is built as the iterator
/// is advanced, in date order and then pair order.
///
/// # Errors
///
/// Returns [`SchemaError`] if the body is not JSON or `quotes` is missing or
/// not an object. The iterator itself yields an error for a malformed date
/// key or a non-numeric rate.
pub fn parse_quotes(body: &[u8]) -> Result<QuoteIter, SchemaError> {
    let json: Value = serde_json::from_slice(body)
        .map_err(|e| SchemaError::new(format!("body is not valid JSON ({e})"), body))?;

    let Value::Object(mut root) = json else {
        return Err(SchemaError::new("body is not a JSON object", body));
    };

    match root.remove(QUOTES_KEY) {
        Some(Value::Object(quotes)) => Ok(QuoteIter::new(quotes, body)),
        Some(_) => Err(SchemaError::new("'quotes' is not an object", body)),
        None => {
            let reason = api_error_info(&root).map_or_else(
                || "response did not include 'quotes'".to_string(),
                |info| format!("response did not include 'quotes' (API error: {info})"),
            );
            Err(SchemaError::new(reason, body))
        }
    }
}

/// Extracts the message from the API's `{"success": false, "error": {...}}` envelope.
fn api_error_info(root: &Map<String, Value>) -> Option<String> {
    let error = root.get("error")?;
    let info = error
        .get("info")
        .or_else(|| error.get("type"))
        .and_then(Value::as_str)
        .map(str::to_string);
    let code = error.get("code").and_then(Value::as_i64);
    match (code, info) {
        (Some(code), Some(info)) => Some(format!("{code} {info}")),
        (None, Some(info)) => Some(info),
        (Some(code), None) => Some(code.to_string()),
        (None, None) => Some(error.to_string()),
    }
}

/// Lazy iterator over the records of one response.
///
/// Consumes the parsed body; once exhausted it cannot be restarted.
pub struct QuoteIter {
    dates: serde_json::map::IntoIter,
    current: Option<(String, serde_json::map::IntoIter)>,
    body: String,
}

impl QuoteIter {
    fn new(quotes: Map<String, Value>, body: &[u8]) -> Self {
        Self {
            dates: quotes.into_iter(),
            current: None,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    fn record(&self, date: &str, pair: String, rate: &Value) -> Result<QuoteRecord, TapError> {
        let date = parse_date(date)?;
        let quote = coerce_rate(rate).ok_or_else(|| {
            SchemaError::new(format!("rate for {pair} on {date} is not a number"), self.body.as_bytes())
        })?;
        Ok(QuoteRecord::new(date, pair, quote))
    }

    /// Drops everything left in the body.
    fn stop(&mut self) {
        self.dates = Map::new().into_iter();
        self.current = None;
    }

    fn next_record(&mut self) -> Option<Result<QuoteRecord, TapError>> {
        loop {
            if let Some((date, rates)) = &mut self.current {
                if let Some((pair, rate)) = rates.next() {
                    let date = date.clone();
                    return Some(self.record(&date, pair, &rate));
                }
                self.current = None;
            }

            let (date, rates) = self.dates.next()?;
            match rates {
                Value::Object(rates) => self.current = Some((date, rates.into_iter())),
                _ => {
                    return Some(Err(SchemaError::new(
                        format!("quotes for {date} are not an object"),
                        self.body.as_bytes(),
                    )
                    .into()));
                }
            }
        }
    }
}

impl std::fmt::Debug for QuoteIter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteIter")
            .field("remaining_dates", &self.dates.len())
            .finish_non_exhaustive()
    }
}

/// Yields records until the first error, then nothing.
impl Iterator for QuoteIter {
    type Item = Result<QuoteRecord, TapError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.next_record()?;
        if item.is_err() {
            self.stop();
        }
        Some(item)
    }
}

/// Coerces a rate to `f64`, accepting numbers and numeric strings.
fn coerce_rate(rate: &Value) -> Option<f64> {
    match rate {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn collect(body: &str) -> Vec<QuoteRecord> {
        parse_quotes(body.as_bytes())
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_single_quote() {
        let records = collect(r#"{"quotes": {"2020-01-01": {"USDEUR": 0.89}}}"#);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(records[0].currency, "USDEUR");
        assert_relative_eq!(records[0].quote, 0.89);
    }

    #[test]
    fn test_flattens_in_date_order() {
        let body = r#"{
            "success": true,
            "timeframe": true,
            "source": "USD",
            "quotes": {
                "2020-01-02": {"USDGBP": 0.76, "USDEUR": 0.9},
                "2020-01-01": {"USDEUR": 0.89, "USDGBP": 1}
            }
        }"#;
        let records = collect(body);

        let flat: Vec<_> = records
            .iter()
            .map(|r| (r.date.to_string(), r.currency.as_str()))
            .collect();
        assert_eq!(
            flat,
            vec![
                ("2020-01-01".to_string(), "USDEUR"),
                ("2020-01-01".to_string(), "USDGBP"),
                ("2020-01-02".to_string(), "USDEUR"),
                ("2020-01-02".to_string(), "USDGBP"),
            ]
        );
        // Integer rates are coerced to f64.
        assert_relative_eq!(records[1].quote, 1.0);
    }

    #[test]
    fn test_empty_quotes() {
        assert!(collect(r#"{"quotes": {}}"#).is_empty());
        assert!(collect(r#"{"quotes": {"2020-01-01": {}}}"#).is_empty());
    }

    #[test]
    fn test_numeric_string_rate() {
        let records = collect(r#"{"quotes": {"2020-01-01": {"USDEUR": "0.89"}}}"#);
        assert_relative_eq!(records[0].quote, 0.89);
    }

    #[test]
    fn test_missing_quotes() {
        let body = r#"{"success": true, "rates": {}}"#;
        let err = parse_quotes(body.as_bytes()).unwrap_err();

        assert_eq!(err.body, body);
        assert!(err.reason.contains("quotes"));
    }

    #[test]
    fn test_api_error_envelope() {
        let body = r#"{"success": false, "error": {"code": 101, "info": "You have not supplied an API Access Key."}}"#;
        let err = parse_quotes(body.as_bytes()).unwrap_err();

        assert!(err.reason.contains("101 You have not supplied an API Access Key."));
        assert_eq!(err.body, body);
    }

    #[test]
    fn test_not_json() {
        let err = parse_quotes(b"<html>Bad Gateway</html>").unwrap_err();
        assert_eq!(err.body, "<html>Bad Gateway</html>");
    }

    #[test]
    fn test_quotes_wrong_type() {
        assert!(parse_quotes(br#"{"quotes": []}"#).is_err());
        assert!(parse_quotes(br#"[1, 2]"#).is_err());
    }

    #[test]
    fn test_bad_date_key() {
        let mut iter = parse_quotes(br#"{"quotes": {"01/01/2020": {"USDEUR": 0.89}}}"#).unwrap();
        assert!(matches!(iter.next(), Some(Err(TapError::Parse(_)))));
    }

    #[test]
    fn test_non_numeric_rate() {
        let mut iter = parse_quotes(br#"{"quotes": {"2020-01-01": {"USDEUR": null}}}"#).unwrap();
        assert!(matches!(iter.next(), Some(Err(TapError::Schema(_)))));
    }

    #[test]
    fn test_bad_rate_stops_iteration() {
        let body = br#"{"quotes": {
            "2020-01-01": {"USDEUR": null, "USDGBP": 0.8},
            "2020-01-02": {"USDEUR": 0.9}
        }}"#;
        let mut iter = parse_quotes(body).unwrap();

        assert!(matches!(iter.next(), Some(Err(TapError::Schema(_)))));
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_bad_date_key_stops_iteration() {
        let body = br#"{"quotes": {"2020-01-01": {"USDEUR": 0.9}, "2020-02-30": {"USDEUR": 0.9}, "2020-03-01": {"USDEUR": 0.9}}}"#;
        let mut iter = parse_quotes(body).unwrap();

        assert!(matches!(iter.next(), Some(Ok(_))));
        assert!(matches!(iter.next(), Some(Err(TapError::Parse(_)))));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_rates_not_object_stops_iteration() {
        let body = br#"{"quotes": {"2020-01-01": 5, "2020-01-02": {"USDEUR": 0.9}}}"#;
        let mut iter = parse_quotes(body).unwrap();

        assert!(matches!(iter.next(), Some(Err(TapError::Schema(_)))));
        assert!(iter.next().is_none());
    }
}
