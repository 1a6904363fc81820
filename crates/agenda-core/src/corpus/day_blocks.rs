//! Day-of-month prayer guides: a `## **DAY N**` (or `## Day N`) heading
//! followed by the lines to read that day.

use super::{is_divider, ReferenceLoader};
use crate::error::Result;
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayHeaderStyle {
    /// `## **DAY 27**`
    Bold,
    /// `## Day 27`
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayReading {
    pub day: u32,
    pub lines: Vec<String>,
}

pub struct DayBlockLoader {
    style: DayHeaderStyle,
}

impl DayBlockLoader {
    pub fn new(style: DayHeaderStyle) -> Self {
        Self { style }
    }

    fn header(&self) -> &'static Regex {
        static BOLD: OnceLock<Regex> = OnceLock::new();
        static PLAIN: OnceLock<Regex> = OnceLock::new();
        match self.style {
            DayHeaderStyle::Bold => BOLD
                .get_or_init(|| Regex::new(r"(?i)^##\s*\*\*\s*day\s+(\d+)\s*\*\*\s*$").unwrap()),
            DayHeaderStyle::Plain => {
                PLAIN.get_or_init(|| Regex::new(r"(?i)^##\s*day\s+(\d+)\s*$").unwrap())
            }
        }
    }
}

impl ReferenceLoader for DayBlockLoader {
    type Key = u32;
    type Entry = DayReading;

    fn grammar(&self) -> &'static str {
        match self.style {
            DayHeaderStyle::Bold => "day blocks (## **DAY N**)",
            DayHeaderStyle::Plain => "day blocks (## Day N)",
        }
    }

    fn parse(&self, text: &str) -> Result<Vec<(u32, DayReading)>> {
        let mut entries = Vec::new();
        let mut current: Option<DayReading> = None;

        for line in text.lines() {
            let trimmed = line.trim();
            if let Some(caps) = self.header().captures(trimmed) {
                entries.extend(current.take().map(|r| (r.day, r)));
                current = caps[1]
                    .parse::<u32>()
                    .ok()
                    .filter(|d| (1..=31).contains(d))
                    .map(|day| DayReading {
                        day,
                        lines: Vec::new(),
                    });
                continue;
            }
            // Any other heading or a divider closes the block.
            if is_divider(trimmed) || trimmed.starts_with('#') {
                entries.extend(current.take().map(|r| (r.day, r)));
                continue;
            }
            if let Some(reading) = current.as_mut() {
                if !trimmed.is_empty() {
                    reading.lines.push(trimmed.to_string());
                }
            }
        }
        entries.extend(current.take().map(|r| (r.day, r)));
        Ok(entries)
    }
}
