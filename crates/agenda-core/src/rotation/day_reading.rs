use super::{
    build_anchor, paragraph, RotationStep, Section, StepContext, INTERNATIONAL_PREFIX, STATE_PREFIX,
};
use crate::corpus::{DayReading, Keyed, ReferenceCorpus};
use crate::error::{AgendaError, Result};
use crate::splice::Anchor;

/// `International Reading by <reader>` / `State Reading by <reader>` plus the
/// day-of-month block for the meeting date. The reader is always the
/// configured one; the body is replaced wholesale.
pub struct DayReadingStep {
    section: Section,
    prefix: &'static str,
    anchor: Anchor,
}

impl DayReadingStep {
    pub fn international() -> Self {
        Self::build(Section::InternationalReading, INTERNATIONAL_PREFIX)
    }

    pub fn state() -> Self {
        Self::build(Section::StateReading, STATE_PREFIX)
    }

    fn build(section: Section, prefix: &'static str) -> Self {
        Self {
            section,
            prefix,
            anchor: build_anchor(section, &format!("^{}", regex::escape(prefix)), paragraph()),
        }
    }

    fn readings<'c>(&self, corpus: &'c ReferenceCorpus) -> &'c Keyed<u32, DayReading> {
        match self.section {
            Section::StateReading => &corpus.state,
            _ => &corpus.international,
        }
    }

    fn reader<'a>(&self, ctx: &'a StepContext) -> &'a str {
        match self.section {
            Section::StateReading => &ctx.config.readers.state,
            _ => &ctx.config.readers.international,
        }
    }
}

impl RotationStep for DayReadingStep {
    type Key = u32;
    type Entry = DayReading;

    fn section(&self) -> Section {
        self.section
    }

    fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    fn extract(&self, _anchor_line: &str, _ctx: &StepContext) -> Result<Option<u32>> {
        Ok(None)
    }

    fn advance(&self, _current: Option<u32>, ctx: &StepContext) -> Result<u32> {
        Ok(ctx.dates.next_day_of_month())
    }

    fn fetch<'c>(&self, key: u32, ctx: &StepContext<'c>) -> Result<&'c DayReading> {
        self.readings(ctx.corpus)
            .get(&key)
            .ok_or_else(|| AgendaError::lookup_miss(self.section.as_str(), format!("day {key}")))
    }

    fn render(&self, _anchor_line: &str, _key: u32, entry: &DayReading, ctx: &StepContext) -> Vec<String> {
        let mut lines = vec![format!("{}{}", self.prefix, self.reader(ctx))];
        lines.extend(entry.lines.iter().cloned());
        lines
    }
}
