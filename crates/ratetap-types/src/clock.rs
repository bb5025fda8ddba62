//! Source of "today" for window pagination.

use chrono::{NaiveDate, Utc};

/// Supplies the current UTC calendar date.
///
/// Pagination asks the clock on every call instead of caching a date, so a
/// sync that runs across midnight extends its final window.
pub trait Clock: Send + Sync {
    /// Returns today's date in UTC.
    fn today(&self) -> NaiveDate;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// A clock frozen on a single date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}
