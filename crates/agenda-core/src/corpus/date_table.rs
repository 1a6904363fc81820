//! Calendar reading plan: month headings over `| Date | ... |` tables.
//!
//! ```text
//! ## **JANUARY**
//! | Date | Morning | Evening |
//! |------|---------|---------|
//! | 27   | ...     | 1 Corinthians 13:1-13 |
//! ```

use super::{table, ReferenceLoader};
use crate::error::{AgendaError, Result};
use chrono::{Datelike, Month, NaiveDate};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Day of month, scoped by the month heading above its table (if any).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthDay {
    pub month: Option<u32>,
    pub day: u32,
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.month.and_then(|m| Month::try_from(m as u8).ok()) {
            Some(month) => write!(f, "{} {}", month.name(), self.day),
            None => write!(f, "day {}", self.day),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptureReading {
    pub reading: String,
}

pub struct DateTableLoader {
    column: String,
}

impl DateTableLoader {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

static MONTH_RE: OnceLock<Regex> = OnceLock::new();
static DAY_RE: OnceLock<Regex> = OnceLock::new();

fn month_re() -> &'static Regex {
    MONTH_RE.get_or_init(|| Regex::new(r"^#{1,3}\s*\**\s*([A-Za-z]+)\s*\**\s*$").unwrap())
}

fn day_re() -> &'static Regex {
    // Last number in the cell: "27", "Jan 27", "1/27"
    DAY_RE.get_or_init(|| Regex::new(r"(\d{1,2})\D*$").unwrap())
}

struct Columns {
    date: usize,
    content: usize,
}

impl ReferenceLoader for DateTableLoader {
    type Key = MonthDay;
    type Entry = ScriptureReading;

    fn grammar(&self) -> &'static str {
        "date table"
    }

    fn parse(&self, text: &str) -> Result<Vec<(MonthDay, ScriptureReading)>> {
        let mut entries = Vec::new();
        let mut month: Option<u32> = None;
        let mut columns: Option<Columns> = None;
        let mut saw_rows = false;

        for line in text.lines() {
            if let Some(caps) = month_re().captures(line.trim()) {
                month = caps[1].parse::<Month>().ok().map(|m| m.number_from_month());
                columns = None;
                continue;
            }

            let Some(cells) = table::parse_row(line) else {
                if line.trim().is_empty() {
                    continue;
                }
                // Prose between tables ends the current table.
                columns = None;
                continue;
            };
            saw_rows = true;
            if table::is_separator(&cells) {
                continue;
            }

            let Some(cols) = &columns else {
                columns = self.header_columns(&cells);
                continue;
            };

            let (Some(date_cell), Some(content)) = (cells.get(cols.date), cells.get(cols.content))
            else {
                continue;
            };
            let Some(day) = day_re()
                .captures(date_cell)
                .and_then(|c| c[1].parse::<u32>().ok())
                .filter(|d| (1..=31).contains(d))
            else {
                continue;
            };
            if content.is_empty() {
                continue;
            }
            entries.push((
                MonthDay { month, day },
                ScriptureReading {
                    reading: content.clone(),
                },
            ));
        }

        if saw_rows && entries.is_empty() {
            return Err(AgendaError::parse(
                self.grammar(),
                "table has no `Date` column or no dated rows",
            ));
        }
        Ok(entries)
    }
}

impl DateTableLoader {
    fn header_columns(&self, cells: &[String]) -> Option<Columns> {
        let date = cells.iter().position(|c| c.eq_ignore_ascii_case("date"))?;
        let content = cells
            .iter()
            .position(|c| c.eq_ignore_ascii_case(&self.column))
            .unwrap_or(cells.len() - 1);
        if content == date {
            return None;
        }
        Some(Columns { date, content })
    }
}

/// Month-scoped rows win over rows that appear before any month heading.
pub fn reading_for<'a>(
    table: &'a super::Keyed<MonthDay, ScriptureReading>,
    date: NaiveDate,
) -> Option<&'a ScriptureReading> {
    table
        .get(&MonthDay {
            month: Some(date.month()),
            day: date.day(),
        })
        .or_else(|| {
            table.get(&MonthDay {
                month: None,
                day: date.day(),
            })
        })
}
