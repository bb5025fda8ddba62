//! Singer-style sync state.

use chrono::{DateTime, NaiveDate};
use ratetap_types::{DATE_FORMAT, parse_date};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Replication key of every ratetap stream.
const REPLICATION_KEY: &str = "date";

/// Bookmark of one stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamBookmark {
    /// Name of the record field the bookmark tracks.
    pub replication_key: String,
    /// Latest value of the replication key that was synced.
    #[serde(
        serialize_with = "serialize_date",
        deserialize_with = "deserialize_date"
    )]
    pub replication_key_value: NaiveDate,
}

impl StreamBookmark {
    /// Creates a bookmark on the `date` field.
    #[must_use]
    pub fn new(value: NaiveDate) -> Self {
        Self {
            replication_key: REPLICATION_KEY.to_string(),
            replication_key_value: value,
        }
    }
}

/// Persistent state of a sync.
///
/// Keys other than `bookmarks` are kept as-is so state written by other
/// Singer tooling survives a round trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncState {
    /// Bookmarks keyed by stream name.
    #[serde(default)]
    pub bookmarks: BTreeMap<String, StreamBookmark>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl SyncState {
    /// Returns the bookmarked date of a stream.
    #[must_use]
    pub fn bookmark(&self, stream: &str) -> Option<NaiveDate> {
        self.bookmarks.get(stream).map(|b| b.replication_key_value)
    }

    /// Moves a stream's bookmark forward to `date`.
    ///
    /// Returns false, leaving the state untouched, if the bookmark is
    /// already at or past `date`.
    pub fn set_bookmark(&mut self, stream: &str, date: NaiveDate) -> bool {
        if self.bookmark(stream).is_some_and(|current| current >= date) {
            return false;
        }
        self.bookmarks.insert(stream.to_string(), StreamBookmark::new(date));
        true
    }

    /// Removes a stream's bookmark, returning it.
    pub fn clear_bookmark(&mut self, stream: &str) -> Option<NaiveDate> {
        self.bookmarks.remove(stream).map(|b| b.replication_key_value)
    }

    /// Returns true if no stream has a bookmark.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    /// Converts the state to a JSON value, as carried by a `STATE` message.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

fn serialize_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&date.format(DATE_FORMAT))
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 date-time, which Singer tooling
/// commonly writes for date bookmarks.
fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw)
        .or_else(|e| DateTime::parse_from_rfc3339(&raw).map(|dt| dt.date_naive()).map_err(|_| e))
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_singer_layout() {
        let mut state = SyncState::default();
        state.set_bookmark("timeframe", date(2024, 6, 1));

        assert_eq!(
            state.to_value().unwrap(),
            json!({
                "bookmarks": {
                    "timeframe": {
                        "replication_key": "date",
                        "replication_key_value": "2024-06-01"
                    }
                }
            })
        );
    }

    #[test]
    fn test_bookmark_only_moves_forward() {
        let mut state = SyncState::default();

        assert!(state.set_bookmark("timeframe", date(2024, 6, 1)));
        assert!(!state.set_bookmark("timeframe", date(2024, 5, 1)));
        assert!(!state.set_bookmark("timeframe", date(2024, 6, 1)));
        assert_eq!(state.bookmark("timeframe"), Some(date(2024, 6, 1)));

        assert!(state.set_bookmark("timeframe", date(2024, 6, 2)));
        assert_eq!(state.bookmark("timeframe"), Some(date(2024, 6, 2)));
    }

    #[test]
    fn test_reads_datetime_bookmark() {
        let state: SyncState = serde_json::from_value(json!({
            "bookmarks": {
                "timeframe": {
                    "replication_key": "date",
                    "replication_key_value": "2023-12-31T00:00:00+00:00"
                }
            }
        }))
        .unwrap();

        assert_eq!(state.bookmark("timeframe"), Some(date(2023, 12, 31)));
    }

    #[test]
    fn test_rejects_bad_bookmark() {
        let result = serde_json::from_value::<SyncState>(json!({
            "bookmarks": {"timeframe": {"replication_key": "date", "replication_key_value": "June"}}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_preserves_unknown_keys() {
        let value = json!({
            "bookmarks": {},
            "currently_syncing": "timeframe"
        });
        let state: SyncState = serde_json::from_value(value.clone()).unwrap();

        assert!(state.is_empty());
        assert_eq!(state.to_value().unwrap(), value);
    }

    #[test]
    fn test_clear_bookmark() {
        let mut state = SyncState::default();
        state.set_bookmark("timeframe", date(2024, 6, 1));

        assert_eq!(state.clear_bookmark("timeframe"), Some(date(2024, 6, 1)));
        assert_eq!(state.clear_bookmark("timeframe"), None);
        assert!(state.is_empty());
    }
}
