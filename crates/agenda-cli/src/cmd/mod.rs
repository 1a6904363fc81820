pub mod check;
pub mod config;
pub mod dates;
pub mod init;
pub mod run;

use agenda_core::dates::{Clock, FixedClock, SystemClock, WeekDates};
use agenda_core::paths::DATE_FORMAT;
use chrono::NaiveDate;

/// clap value parser for `--today`.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

pub fn clock(today: Option<NaiveDate>) -> Box<dyn Clock> {
    match today {
        Some(date) => Box::new(FixedClock(date)),
        None => Box::new(SystemClock),
    }
}

pub fn week_dates(today: Option<NaiveDate>) -> WeekDates {
    WeekDates::from_clock(clock(today).as_ref())
}
