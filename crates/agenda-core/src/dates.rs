//! Week addressing: every rotation is keyed off last Saturday and the next one.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Source of "today". Injected so runs can be replayed for any week.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// A clock pinned to one date.
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// The two meeting dates a run works between. Always Saturdays, 7 days apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekDates {
    pub last_week: NaiveDate,
    pub next_week: NaiveDate,
}

impl WeekDates {
    /// A Saturday `today` counts as last week's meeting.
    pub fn from_today(today: NaiveDate) -> Self {
        let since_saturday = (today.weekday().num_days_from_monday() + 7
            - Weekday::Sat.num_days_from_monday())
            % 7;
        let last_week = today - Duration::days(i64::from(since_saturday));
        Self {
            last_week,
            next_week: last_week + Duration::days(7),
        }
    }

    pub fn from_clock(clock: &dyn Clock) -> Self {
        Self::from_today(clock.today())
    }

    /// Day of month of the upcoming meeting (1-31).
    pub fn next_day_of_month(&self) -> u32 {
        self.next_week.day()
    }
}

impl fmt::Display for WeekDates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            crate::paths::format_date(self.last_week),
            crate::paths::format_date(self.next_week)
        )
    }
}
