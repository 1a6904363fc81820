use super::{build_anchor, RotationStep, Section, StepContext, SCRIPTURE_PREFIX};
use crate::corpus::date_table::{reading_for, ScriptureReading};
use crate::error::{AgendaError, Result};
use crate::splice::{Anchor, BlockEnd};
use chrono::NaiveDate;

/// `Bible Reading Rotation - <reading>`: the calendar plan's entry for the
/// meeting date. Nothing cycles; a date missing from the plan is an error.
pub struct ScriptureStep {
    anchor: Anchor,
}

impl ScriptureStep {
    pub fn new() -> Self {
        Self {
            anchor: build_anchor(
                Section::BibleReading,
                &format!("^{}", regex::escape(SCRIPTURE_PREFIX)),
                BlockEnd::Line,
            ),
        }
    }
}

impl Default for ScriptureStep {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationStep for ScriptureStep {
    type Key = NaiveDate;
    type Entry = ScriptureReading;

    fn section(&self) -> Section {
        Section::BibleReading
    }

    fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    fn extract(&self, _anchor_line: &str, _ctx: &StepContext) -> Result<Option<NaiveDate>> {
        Ok(None)
    }

    fn advance(&self, _current: Option<NaiveDate>, ctx: &StepContext) -> Result<NaiveDate> {
        Ok(ctx.dates.next_week)
    }

    fn fetch<'c>(&self, key: NaiveDate, ctx: &StepContext<'c>) -> Result<&'c ScriptureReading> {
        reading_for(&ctx.corpus.scripture, key)
            .ok_or_else(|| AgendaError::lookup_miss(self.section().as_str(), key))
    }

    fn render(
        &self,
        _anchor_line: &str,
        _key: NaiveDate,
        entry: &ScriptureReading,
        _ctx: &StepContext,
    ) -> Vec<String> {
        vec![format!("{SCRIPTURE_PREFIX}{}", entry.reading)]
    }
}
