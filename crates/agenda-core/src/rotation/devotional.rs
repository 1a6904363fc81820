use super::{build_anchor, paragraph, RotationStep, Section, StepContext, DEVOTIONAL_PREFIX};
use crate::corpus::Page;
use crate::error::{AgendaError, Result};
use crate::splice::Anchor;

/// `Prayer Card Together - Page N Title: first prayer`, followed by that
/// prayer's citations. Works through the booklet one page a week and starts
/// over at page 1 after the last page.
pub struct DevotionalStep {
    anchor: Anchor,
}

pub const FIRST_PAGE: u32 = 1;

impl DevotionalStep {
    pub fn new() -> Self {
        Self {
            anchor: build_anchor(
                Section::PrayerCard,
                &format!(r"^{}Page\s+(\d+)\b", regex::escape(DEVOTIONAL_PREFIX)),
                paragraph(),
            ),
        }
    }
}

impl Default for DevotionalStep {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationStep for DevotionalStep {
    type Key = u32;
    type Entry = Page;

    fn section(&self) -> Section {
        Section::PrayerCard
    }

    fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    fn extract(&self, anchor_line: &str, _ctx: &StepContext) -> Result<Option<u32>> {
        let page = self
            .anchor
            .captures(anchor_line)
            .and_then(|c| c[1].parse::<u32>().ok())
            .ok_or_else(|| {
                AgendaError::parse(
                    self.section().as_str(),
                    format!("no page number in `{anchor_line}`"),
                )
            })?;
        Ok(Some(page))
    }

    fn advance(&self, current: Option<u32>, ctx: &StepContext) -> Result<u32> {
        let pages = &ctx.corpus.devotional;
        let candidate = current.map_or(FIRST_PAGE, |p| p.saturating_add(1));
        if pages.contains(&candidate) {
            Ok(candidate)
        } else if pages.contains(&FIRST_PAGE) {
            Ok(FIRST_PAGE)
        } else {
            Err(AgendaError::lookup_miss(
                self.section().as_str(),
                format!("page {candidate} (or page {FIRST_PAGE} after wrapping)"),
            ))
        }
    }

    fn fetch<'c>(&self, key: u32, ctx: &StepContext<'c>) -> Result<&'c Page> {
        ctx.corpus
            .devotional
            .get(&key)
            .ok_or_else(|| AgendaError::lookup_miss(self.section().as_str(), format!("page {key}")))
    }

    fn render(&self, _anchor_line: &str, key: u32, page: &Page, _ctx: &StepContext) -> Vec<String> {
        let mut header = format!("{DEVOTIONAL_PREFIX}Page {key} {}:", page.title);
        let mut lines = Vec::new();
        if let Some(entry) = page.first_entry() {
            header.push(' ');
            header.push_str(&entry.text);
            lines.extend(entry.citations.iter().cloned());
        }
        lines.insert(0, header);
        lines
    }
}
