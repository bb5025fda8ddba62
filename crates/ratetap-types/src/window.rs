//! Date windows and date-string parsing.

use chrono::{NaiveDate, TimeDelta};

use crate::{DateRangeError, ParseError};

/// Date format used by the API, config, and bookmarks.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Largest number of days between a window's start and end.
///
/// The timeframe endpoint rejects requests spanning more than this.
pub const MAX_SPAN_DAYS: i64 = 365;

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`ParseError::InvalidDate`] if the input is not a calendar date
/// in that format.
pub fn parse_date(input: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|source| ParseError::InvalidDate {
        input: input.to_string(),
        source,
    })
}

/// An inclusive range of dates sent as one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateWindow {
    /// Start date (inclusive).
    pub start: NaiveDate,
    /// End date (inclusive).
    pub end: NaiveDate,
}

impl DateWindow {
    /// Creates a new window, validating that `start <= end` and that the
    /// span fits in a single request.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end or the span exceeds [`MAX_SPAN_DAYS`].
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange { start, end });
        }
        if (end - start).num_days() > MAX_SPAN_DAYS {
            return Err(DateRangeError::TooLong {
                start,
                end,
                max_days: MAX_SPAN_DAYS,
            });
        }
        Ok(Self { start, end })
    }

    /// Creates a window for a single day.
    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Returns the number of days between start and end.
    #[must_use]
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    /// Returns the total number of days covered, counting both ends.
    #[must_use]
    pub fn total_days(&self) -> usize {
        (self.span_days() + 1) as usize
    }

    /// Returns true if the window contains the given date.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Returns true if `next` starts the day after this window ends.
    #[must_use]
    pub fn is_followed_by(&self, next: &Self) -> bool {
        self.end.checked_add_signed(TimeDelta::days(1)) == Some(next.start)
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(DATE_FORMAT),
            self.end.format(DATE_FORMAT)
        )
    }
}
