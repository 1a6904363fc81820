//! Widows roster: `### N. Title` sections, each listing `Name, Location`.

use super::{is_divider, strip_bullet, ReferenceLoader};
use crate::error::Result;
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSection {
    pub number: u32,
    pub title: String,
    /// Raw `Name, Location` lines, bullets stripped.
    pub lines: Vec<String>,
}

impl RosterSection {
    /// Each line as `Location - Name`, in document order.
    pub fn display_lines(&self) -> Vec<String> {
        self.lines.iter().map(|l| location_first(l)).collect()
    }
}

/// `Jane Doe, Sanford` -> `Sanford - Jane Doe`. Swaps on the first comma only;
/// lines without a comma are returned unchanged.
pub fn location_first(line: &str) -> String {
    match line.split_once(',') {
        Some((name, location)) => format!("{} - {}", location.trim(), name.trim()),
        None => line.trim().to_string(),
    }
}

pub struct RosterLoader;

static SECTION_RE: OnceLock<Regex> = OnceLock::new();

fn section_re() -> &'static Regex {
    SECTION_RE.get_or_init(|| Regex::new(r"^###\s+(\d+)\.\s*(.+?)\s*$").unwrap())
}

impl ReferenceLoader for RosterLoader {
    type Key = u32;
    type Entry = RosterSection;

    fn grammar(&self) -> &'static str {
        "numbered sections (### N. Title)"
    }

    fn parse(&self, text: &str) -> Result<Vec<(u32, RosterSection)>> {
        let mut entries = Vec::new();
        let mut current: Option<RosterSection> = None;

        for line in text.lines() {
            let trimmed = line.trim();
            if let Some(caps) = section_re().captures(trimmed) {
                entries.extend(current.take().map(|s| (s.number, s)));
                current = caps[1].parse::<u32>().ok().map(|number| RosterSection {
                    number,
                    title: caps[2].to_string(),
                    lines: Vec::new(),
                });
                continue;
            }
            if trimmed.starts_with('#') || is_divider(trimmed) {
                entries.extend(current.take().map(|s| (s.number, s)));
                continue;
            }
            if let Some(section) = current.as_mut() {
                if !trimmed.is_empty() {
                    section.lines.push(strip_bullet(trimmed).to_string());
                }
            }
        }
        entries.extend(current.take().map(|s| (s.number, s)));
        Ok(entries)
    }
}
