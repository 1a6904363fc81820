//! The six rotating agenda sections.
//!
//! Each step reads its current position out of the agenda itself, advances it,
//! looks the new position up in the reference corpus and splices the rendered
//! lines back over its anchor. Nothing outside that anchor's block changes.

pub mod day_reading;
pub mod devotional;
pub mod pastor;
pub mod roster;
pub mod scripture;

use crate::config::Config;
use crate::corpus::ReferenceCorpus;
use crate::dates::WeekDates;
use crate::document::AgendaDocument;
use crate::error::Result;
use crate::splice::{self, Anchor, BlockEnd};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use tracing::{debug, info};

pub use day_reading::DayReadingStep;
pub use devotional::DevotionalStep;
pub use pastor::PastorStep;
pub use roster::RosterStep;
pub use scripture::ScriptureStep;

// ---------------------------------------------------------------------------
// Anchor line formats
// ---------------------------------------------------------------------------

pub const SCRIPTURE_PREFIX: &str = "Bible Reading Rotation - ";
pub const DEVOTIONAL_PREFIX: &str = "Prayer Card Together - ";
pub const INTERNATIONAL_PREFIX: &str = "International Reading by ";
pub const STATE_PREFIX: &str = "State Reading by ";
pub const ROSTER_PREFIX: &str = "Pray for the Widows by ";
pub const PASTOR_PREFIX: &str = "Pray for Local Pastor by ";
pub const DEVOTIONAL_THOUGHT_PREFIX: &str = "Devotional Thought - ";

static BOUNDARY_RE: OnceLock<Regex> = OnceLock::new();

/// Ends a section's content block: a blank line, a divider, a heading, or the
/// start of any other section.
pub fn section_boundary() -> &'static Regex {
    BOUNDARY_RE.get_or_init(|| {
        let anchors = [
            SCRIPTURE_PREFIX,
            DEVOTIONAL_PREFIX,
            INTERNATIONAL_PREFIX,
            STATE_PREFIX,
            ROSTER_PREFIX,
            PASTOR_PREFIX,
            DEVOTIONAL_THOUGHT_PREFIX,
        ]
        .iter()
        .map(|p| regex::escape(p))
        .collect::<Vec<_>>()
        .join("|");
        Regex::new(&format!(
            r"^\s*$|^(?:-{{3,}}|\*{{3,}}|_{{3,}})\s*$|^#|^(?:{anchors})"
        ))
        .unwrap()
    })
}

pub(crate) fn build_anchor(section: Section, pattern: &str, block: BlockEnd) -> Anchor {
    Anchor::new(section.as_str(), Regex::new(pattern).unwrap(), block)
}

pub(crate) fn paragraph() -> BlockEnd {
    BlockEnd::Until(section_boundary().clone())
}

// ---------------------------------------------------------------------------
// Section
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    BibleReading,
    PrayerCard,
    InternationalReading,
    StateReading,
    WidowPrayer,
    PastorPrayer,
}

impl Section {
    /// Run order. Later steps see the document as earlier ones left it.
    pub fn all() -> &'static [Section] {
        &[
            Section::BibleReading,
            Section::PrayerCard,
            Section::InternationalReading,
            Section::StateReading,
            Section::WidowPrayer,
            Section::PastorPrayer,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Section::BibleReading => "bible_reading",
            Section::PrayerCard => "prayer_card",
            Section::InternationalReading => "international_reading",
            Section::StateReading => "state_reading",
            Section::WidowPrayer => "widow_prayer",
            Section::PastorPrayer => "pastor_prayer",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RotationStep
// ---------------------------------------------------------------------------

pub struct StepContext<'a> {
    pub dates: &'a WeekDates,
    pub corpus: &'a ReferenceCorpus,
    pub config: &'a Config,
}

pub trait RotationStep {
    type Key: Copy + fmt::Display;
    type Entry;

    fn section(&self) -> Section;

    fn anchor(&self) -> &Anchor;

    /// The position encoded in the anchor line, if this section encodes one.
    fn extract(&self, anchor_line: &str, ctx: &StepContext) -> Result<Option<Self::Key>>;

    fn advance(&self, current: Option<Self::Key>, ctx: &StepContext) -> Result<Self::Key>;

    fn fetch<'c>(&self, key: Self::Key, ctx: &StepContext<'c>) -> Result<&'c Self::Entry>;

    /// Lines that replace the anchor line and its block.
    fn render(&self, anchor_line: &str, key: Self::Key, entry: &Self::Entry, ctx: &StepContext)
        -> Vec<String>;
}

#[derive(Debug, Clone, Serialize)]
pub struct StepSummary {
    pub section: Section,
    pub previous: Option<String>,
    pub key: String,
    pub lines_replaced: usize,
    pub lines_written: usize,
}

/// Run one step against the document. On any error the document is untouched.
pub fn run_step<S: RotationStep>(
    step: &S,
    doc: &mut AgendaDocument,
    ctx: &StepContext,
) -> Result<StepSummary> {
    let region = splice::locate(doc, step.anchor())?;
    let anchor_line = region.anchor_line(doc).to_string();

    let current = step.extract(&anchor_line, ctx)?;
    let next = step.advance(current, ctx)?;
    debug!(section = %step.section(), current = ?current.map(|k| k.to_string()), next = %next, "advancing");
    let entry = step.fetch(next, ctx)?;
    let replacement = step.render(&anchor_line, next, entry, ctx);

    let summary = StepSummary {
        section: step.section(),
        previous: current.map(|k| k.to_string()),
        key: next.to_string(),
        lines_replaced: region.len(),
        lines_written: replacement.len(),
    };
    splice::replace(doc, &region, replacement);
    info!(section = %summary.section, key = %summary.key, "section rotated");
    Ok(summary)
}

// ---------------------------------------------------------------------------
// Shared fixtures
// ---------------------------------------------------------------------------


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_matches_other_anchors_and_blank() {
        let re = section_boundary();
        assert!(re.is_match(""));
        assert!(re.is_match("   "));
        assert!(re.is_match("---"));
        assert!(re.is_match("## Heading"));
        assert!(re.is_match("State Reading by Someone"));
        assert!(re.is_match("Devotional Thought - John 1"));
        assert!(!re.is_match("Pray for believers to stand firm."));
        assert!(!re.is_match("Acts 1:8"));
    }

    #[test]
    fn section_names() {
        assert_eq!(Section::all().len(), 6);
        assert_eq!(Section::WidowPrayer.to_string(), "widow_prayer");
    }
}
