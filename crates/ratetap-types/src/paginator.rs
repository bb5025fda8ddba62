//! Date-window pagination.
//!
//! The timeframe endpoint caps the span of a single request, so a sync from
//! an arbitrary start date up to today is split into consecutive windows of
//! at most [`MAX_SPAN_DAYS`] days. Windows never overlap and never leave a
//! gap: each one starts the day after the previous one ended, and the last
//! one ends on today's UTC date.

use chrono::{NaiveDate, TimeDelta};

use crate::{Clock, DateWindow, MAX_SPAN_DAYS, ParseError, SystemClock, parse_date};

/// Pagination capability consumed by a stream driver.
pub trait Paginator {
    /// The request parameters for one page.
    type Page;

    /// Returns the page to request next. Calling this repeatedly without
    /// advancing returns the same page.
    fn current(&self) -> Self::Page;

    /// Moves past the current page.
    fn advance(&mut self);

    /// Returns true once no pages remain.
    fn finished(&self) -> bool;
}

/// Splits `[cursor, today]` into bounded, non-overlapping [`DateWindow`]s.
///
/// "Today" is read from the clock on every call, never cached.
#[derive(Debug, Clone)]
pub struct WindowPaginator<C = SystemClock> {
    cursor: NaiveDate,
    finished: bool,
    clock: C,
}

impl WindowPaginator {
    /// Creates a paginator starting at `start` using the system clock.
    #[must_use]
    pub const fn new(start: NaiveDate) -> Self {
        Self::with_clock(start, SystemClock)
    }

    /// Creates a paginator from a `YYYY-MM-DD` start date.
    ///
    /// # Errors
    ///
    /// Returns an error if `start` is not a valid date.
    pub fn parse(start: &str) -> Result<Self, ParseError> {
        parse_date(start).map(Self::new)
    }
}

impl<C: Clock> WindowPaginator<C> {
    /// Creates a paginator starting at `start` with the given clock.
    #[must_use]
    pub const fn with_clock(start: NaiveDate, clock: C) -> Self {
        Self {
            cursor: start,
            finished: false,
            clock,
        }
    }

    /// Returns the left edge of the next window.
    #[must_use]
    pub const fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    /// Returns the window starting at the cursor, clamped to today.
    ///
    /// A cursor after today yields `(today, today)`.
    #[must_use]
    pub fn current_window(&self) -> DateWindow {
        let today = self.clock.today();
        let start = self.cursor.min(today);
        let end = add_days(start, MAX_SPAN_DAYS).min(today);
        DateWindow { start, end }
    }

    /// Moves the cursor to the day after the current window.
    ///
    /// If that day is after today, pagination finishes and the cursor is
    /// parked on today. Does nothing once finished.
    pub fn advance(&mut self) {
        if self.finished {
            return;
        }

        let today = self.clock.today();
        let next = add_days(self.cursor, MAX_SPAN_DAYS + 1);
        if next > today {
            tracing::trace!(cursor = %self.cursor, %today, "pagination finished");
            self.cursor = today;
            self.finished = true;
        } else {
            self.cursor = next;
        }
    }

    /// Returns true once the final window has been advanced past.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Returns the number of windows still to be produced, as of now.
    #[must_use]
    pub fn remaining_windows(&self) -> usize {
        if self.finished {
            return 0;
        }
        let today = self.clock.today();
        let days = (today - self.cursor.min(today)).num_days();
        (days / (MAX_SPAN_DAYS + 1)) as usize + 1
    }
}

impl<C: Clock> Paginator for WindowPaginator<C> {
    type Page = DateWindow;

    fn current(&self) -> DateWindow {
        self.current_window()
    }

    fn advance(&mut self) {
        Self::advance(self);
    }

    fn finished(&self) -> bool {
        self.is_finished()
    }
}

impl<C: Clock> Iterator for WindowPaginator<C> {
    type Item = DateWindow;

    fn next(&mut self) -> Option<DateWindow> {
        if self.finished {
            return None;
        }
        let window = self.current_window();
        self.advance();
        Some(window)
    }
}

/// Adds days, saturating at the largest representable date.
fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(TimeDelta::days(days))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FixedClock;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicI64, Ordering};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2026, 10, 19)
    }

    /// Collects every window and checks the pagination invariants.
    fn check_windows<C: Clock>(paginator: WindowPaginator<C>, today: NaiveDate) -> Vec<DateWindow> {
        let start = paginator.cursor();
        let windows: Vec<_> = paginator.collect();
        assert!(!windows.is_empty());

        let mut seen = HashSet::new();
        for window in &windows {
            assert!(window.start <= window.end, "inverted window {window}");
            assert!(window.span_days() <= MAX_SPAN_DAYS, "window too long {window}");
            let mut day = window.start;
            while day <= window.end {
                assert!(seen.insert(day), "date {day} repeated");
                day = day.succ_opt().unwrap();
            }
        }
        for pair in windows.windows(2) {
            assert!(pair[0].is_followed_by(&pair[1]), "gap or overlap at {}", pair[1]);
        }

        let last = windows.last().unwrap();
        assert_eq!(last.end, today, "final date is not today");
        assert_eq!(windows[0].start, start.min(today));
        windows
    }

    #[test]
    fn test_first_windows_from_2000() {
        let mut paginator = WindowPaginator::with_clock(date(2000, 1, 1), FixedClock(today()));

        assert_eq!(
            paginator.current_window(),
            DateWindow::new(date(2000, 1, 1), date(2000, 12, 31)).unwrap()
        );
        paginator.advance();
        assert_eq!(paginator.cursor(), date(2001, 1, 1));
        // 365 days on from a non-leap new year lands on the next new year.
        assert_eq!(
            paginator.current_window(),
            DateWindow::new(date(2001, 1, 1), date(2002, 1, 1)).unwrap()
        );
    }

    #[test]
    fn test_invariants_fixed_clock() {
        for start in [date(2000, 1, 1), date(2000, 2, 29), date(1939, 12, 1)] {
            let paginator = WindowPaginator::with_clock(start, FixedClock(today()));
            check_windows(paginator, today());
        }
    }

    #[test]
    fn test_invariants_system_clock() {
        for start in ["2000-01-01", "2000-02-29", "1939-12-01"] {
            let paginator = WindowPaginator::parse(start).unwrap();
            let windows: Vec<_> = paginator.collect();
            let today = SystemClock.today();
            // A run straddling midnight may finish on the following day.
            let last = windows.last().unwrap();
            assert!(last.end == today || last.end.succ_opt() == Some(today));
            for pair in windows.windows(2) {
                assert!(pair[0].is_followed_by(&pair[1]));
            }
        }
    }

    #[test]
    fn test_start_is_today() {
        let mut paginator = WindowPaginator::with_clock(today(), FixedClock(today()));

        assert_eq!(paginator.current_window(), DateWindow::single_day(today()));
        paginator.advance();
        assert!(paginator.is_finished());
        assert_eq!(paginator.next(), None);
    }

    #[test]
    fn test_start_after_today() {
        let paginator = WindowPaginator::with_clock(date(2030, 1, 1), FixedClock(today()));
        let windows: Vec<_> = paginator.collect();
        assert_eq!(windows, vec![DateWindow::single_day(today())]);
    }

    #[test]
    fn test_cursor_366_days_before_today() {
        let start = today() - TimeDelta::days(366);
        let paginator = WindowPaginator::with_clock(start, FixedClock(today()));
        let windows = check_windows(paginator, today());

        assert_eq!(
            windows,
            vec![
                DateWindow::new(start, today() - TimeDelta::days(1)).unwrap(),
                DateWindow::single_day(today()),
            ]
        );
    }

    #[test]
    fn test_cursor_365_days_before_today() {
        let start = today() - TimeDelta::days(365);
        let paginator = WindowPaginator::with_clock(start, FixedClock(today()));
        let windows = check_windows(paginator, today());

        assert_eq!(windows, vec![DateWindow::new(start, today()).unwrap()]);
    }

    #[test]
    fn test_current_window_is_idempotent() {
        let paginator = WindowPaginator::with_clock(date(2010, 6, 15), FixedClock(today()));
        let first = paginator.current_window();
        assert_eq!(paginator.current_window(), first);
        assert_eq!(paginator.current(), first);
    }

    #[test]
    fn test_advance_is_monotonic() {
        let mut paginator = WindowPaginator::with_clock(date(1980, 3, 1), FixedClock(today()));
        while !paginator.is_finished() {
            let before = paginator.cursor();
            paginator.advance();
            if !paginator.is_finished() {
                assert!(paginator.cursor() > before);
                assert_eq!((paginator.cursor() - before).num_days(), MAX_SPAN_DAYS + 1);
            }
        }
        assert_eq!(paginator.cursor(), today());
    }

    #[test]
    fn test_advance_after_finished_is_noop() {
        let mut paginator = WindowPaginator::with_clock(today(), FixedClock(today()));
        paginator.advance();
        paginator.advance();
        assert!(paginator.is_finished());
        assert_eq!(paginator.cursor(), today());
    }

    #[test]
    fn test_remaining_windows() {
        let start = date(1939, 12, 1);
        let paginator = WindowPaginator::with_clock(start, FixedClock(today()));
        let expected = paginator.remaining_windows();
        assert_eq!(paginator.count(), expected);

        let paginator = WindowPaginator::with_clock(today(), FixedClock(today()));
        assert_eq!(paginator.remaining_windows(), 1);
    }

    #[test]
    fn test_parse_rejects_bad_date() {
        assert!(matches!(
            WindowPaginator::parse("01-01-2000"),
            Err(ParseError::InvalidDate { .. })
        ));
    }

    /// A clock that moves forward one day each time it is told to.
    struct SteppingClock(AtomicI64);

    impl Clock for SteppingClock {
        fn today(&self) -> NaiveDate {
            date(2026, 10, 19) + TimeDelta::days(self.0.load(Ordering::SeqCst))
        }
    }

    #[test]
    fn test_midnight_rollover_extends_final_window() {
        let clock = SteppingClock(AtomicI64::new(0));
        let start = today() - TimeDelta::days(365);
        let mut paginator = WindowPaginator::with_clock(start, &clock);

        let first = paginator.current_window();
        assert_eq!(first.end, today());

        clock.0.store(1, Ordering::SeqCst);
        paginator.advance();
        assert!(!paginator.is_finished());

        let tomorrow = today() + TimeDelta::days(1);
        assert_eq!(paginator.current_window(), DateWindow::single_day(tomorrow));
        assert!(first.is_followed_by(&paginator.current_window()));
        paginator.advance();
        assert!(paginator.is_finished());
    }
}
