//! # Business Calendar
//!
//! Business-day arithmetic for the escalation ladder.
//!
//! A business day is Monday to Friday; there is no holiday table. Weekdays are
//! evaluated in the calendar's UTC offset, so the same instant can be a Friday
//! in one offset and a Saturday in another.
//!
//! ## Counting Rule
//!
//! `count_business_days(start, end)` walks a cursor forward from `start` in
//! whole 24-hour steps. Every cursor position that is still `<= end` and falls
//! on a weekday counts once. A day therefore only counts after its full 24
//! hours have elapsed relative to `start`'s time of day: Monday 09:00 to
//! Tuesday 08:59 is zero business days, to Tuesday 09:00 is one.

use chrono::{DateTime, Datelike, Duration, FixedOffset, Offset, Utc, Weekday};

/// Days per week and business days per week.
const WEEK_DAYS: i64 = 7;
const WEEK_BUSINESS_DAYS: i64 = 5;

/// Business-day calculator bound to a UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessCalendar {
    offset: FixedOffset,
}

impl BusinessCalendar {
    /// Create a calendar that evaluates weekdays in `offset`.
    #[must_use]
    pub const fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Calendar evaluated in UTC.
    #[must_use]
    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    /// Calendar evaluated in the offset `now` was reported in.
    #[must_use]
    pub fn for_now(now: &DateTime<FixedOffset>) -> Self {
        Self::new(*now.offset())
    }

    /// The offset weekdays are evaluated in.
    #[must_use]
    pub const fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Weekday of an instant in this calendar's offset.
    #[must_use]
    pub fn weekday(&self, at: DateTime<Utc>) -> Weekday {
        at.with_timezone(&self.offset).weekday()
    }

    /// True if `at` falls on Monday to Friday.
    #[must_use]
    pub fn is_business_day(&self, at: DateTime<Utc>) -> bool {
        !matches!(self.weekday(at), Weekday::Sat | Weekday::Sun)
    }

    /// Count business days strictly after `start` up to and including `end`.
    ///
    /// Returns 0 when `end <= start`.
    #[must_use]
    pub fn count_business_days(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> u32 {
        if end <= start {
            return 0;
        }

        // Number of cursor positions start + k days with k >= 1 that are <= end.
        let steps = (end - start).num_days();
        let full_weeks = steps / WEEK_DAYS;
        let mut count = full_weeks * WEEK_BUSINESS_DAYS;

        // Any 7 consecutive steps cover exactly 5 weekdays, so only the tail
        // needs walking. A fixed offset has no DST, so step k lands on
        // weekday (start + k) mod 7.
        let first = i64::from(self.weekday(start).num_days_from_monday());
        for k in (full_weeks * WEEK_DAYS + 1)..=steps {
            if (first + k) % WEEK_DAYS < WEEK_BUSINESS_DAYS {
                count += 1;
            }
        }

        u32::try_from(count).unwrap_or(u32::MAX)
    }

    /// Add `days` business days to `start`, keeping the time of day.
    ///
    /// The result is the earliest instant at which
    /// `count_business_days(start, result) == days`, or `None` when that
    /// instant lies beyond the representable date range.
    #[must_use]
    pub fn add_business_days(&self, start: DateTime<Utc>, days: u32) -> Option<DateTime<Utc>> {
        if days == 0 {
            return Some(start);
        }

        // Jump whole weeks but leave 1..=5 business days to walk, so the
        // result lands on the last counted weekday rather than a weekend.
        let days = i64::from(days);
        let weeks = (days - 1) / WEEK_BUSINESS_DAYS;
        let mut remaining = days - weeks * WEEK_BUSINESS_DAYS;
        let mut cursor = start.checked_add_signed(Duration::try_days(weeks * WEEK_DAYS)?)?;
        let one_day = Duration::try_days(1)?;

        while remaining > 0 {
            cursor = cursor.checked_add_signed(one_day)?;
            if self.is_business_day(cursor) {
                remaining -= 1;
            }
        }

        Some(cursor)
    }
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self::utc()
    }
}

// =============================================================================
// TESTS
// =============================================================================
