//! Bookmark tracking during a sync.

use chrono::NaiveDate;
use ratetap_types::QuoteRecord;

use crate::SyncState;

/// Tracks the latest record date seen for one stream.
///
/// Records arrive in date order, but the tracker keeps the maximum
/// regardless, so the bookmark never moves backwards.
#[derive(Debug, Clone)]
pub struct BookmarkTracker {
    stream: String,
    bookmark: Option<NaiveDate>,
    records_seen: u64,
}

impl BookmarkTracker {
    /// Creates a tracker for `stream`, starting from the stored bookmark.
    #[must_use]
    pub fn new(stream: impl Into<String>, state: &SyncState) -> Self {
        let stream = stream.into();
        let bookmark = state.bookmark(&stream);
        Self {
            stream,
            bookmark,
            records_seen: 0,
        }
    }

    /// Returns the stream name.
    #[must_use]
    pub fn stream(&self) -> &str {
        &self.stream
    }

    /// Returns the latest date seen, including the starting bookmark.
    #[must_use]
    pub const fn bookmark(&self) -> Option<NaiveDate> {
        self.bookmark
    }

    /// Returns the number of records observed.
    #[must_use]
    pub const fn records_seen(&self) -> u64 {
        self.records_seen
    }

    /// Observes one record.
    pub fn observe(&mut self, record: &QuoteRecord) {
        self.records_seen += 1;
        if self.bookmark.is_none_or(|current| record.date > current) {
            self.bookmark = Some(record.date);
        }
    }

    /// Observes a batch of records.
    pub fn observe_all(&mut self, records: &[QuoteRecord]) {
        for record in records {
            self.observe(record);
        }
    }

    /// Writes the bookmark into `state`.
    ///
    /// Returns true if the state changed.
    pub fn apply(&self, state: &mut SyncState) -> bool {
        self.bookmark
            .is_some_and(|date| state.set_bookmark(&self.stream, date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(d: NaiveDate) -> QuoteRecord {
        QuoteRecord::new(d, "USDEUR", 0.9)
    }

    #[test]
    fn test_tracks_max_date() {
        let mut tracker = BookmarkTracker::new("timeframe", &SyncState::default());
        assert_eq!(tracker.bookmark(), None);

        tracker.observe_all(&[record(date(2024, 1, 2)), record(date(2024, 1, 3))]);
        tracker.observe(&record(date(2024, 1, 1)));

        assert_eq!(tracker.bookmark(), Some(date(2024, 1, 3)));
        assert_eq!(tracker.records_seen(), 3);
    }

    #[test]
    fn test_starts_from_stored_bookmark() {
        let mut state = SyncState::default();
        state.set_bookmark("timeframe", date(2024, 6, 1));

        let mut tracker = BookmarkTracker::new("timeframe", &state);
        tracker.observe(&record(date(2024, 5, 1)));

        assert_eq!(tracker.bookmark(), Some(date(2024, 6, 1)));
        assert!(!tracker.apply(&mut state));
    }

    #[test]
    fn test_apply_advances_state() {
        let mut state = SyncState::default();
        let mut tracker = BookmarkTracker::new("timeframe", &state);

        assert!(!tracker.apply(&mut state));
        tracker.observe(&record(date(2024, 6, 2)));
        assert!(tracker.apply(&mut state));
        assert_eq!(state.bookmark("timeframe"), Some(date(2024, 6, 2)));
        assert_eq!(tracker.stream(), "timeframe");
    }
}
