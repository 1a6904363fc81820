use chrono::NaiveDate;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = "agenda.yaml";
pub const INPUT_DIR: &str = "input";
pub const OUTPUT_DIR: &str = "output";

/// Date format used in agenda file names and title lines.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const DEFAULT_TITLE: &str = "Saturday Prayer Breakfast Agenda";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// `2024-01-27 Saturday Prayer Breakfast Agenda.md`
pub fn agenda_file_name(date: NaiveDate, title: &str) -> String {
    format!("{} {}.md", format_date(date), title)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
