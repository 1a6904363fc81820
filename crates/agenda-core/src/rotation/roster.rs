use super::{build_anchor, paragraph, RotationStep, Section, StepContext, ROSTER_PREFIX};
use crate::corpus::RosterSection;
use crate::error::{AgendaError, Result};
use crate::splice::Anchor;

/// `Pray for the Widows by <reader> - N. Title` followed by one
/// `Location - Name` line per widow. Sections are numbered by day of month, so
/// the meeting date picks the section just like the day readings.
pub struct RosterStep {
    anchor: Anchor,
}

impl RosterStep {
    pub fn new() -> Self {
        Self {
            anchor: build_anchor(
                Section::WidowPrayer,
                &format!(r"^{}(.+?)(?:\s+-\s+.*)?$", regex::escape(ROSTER_PREFIX)),
                paragraph(),
            ),
        }
    }

    fn reader<'l>(&self, anchor_line: &'l str) -> &'l str {
        self.anchor
            .captures(anchor_line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .unwrap_or_default()
    }
}

impl Default for RosterStep {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationStep for RosterStep {
    type Key = u32;
    type Entry = RosterSection;

    fn section(&self) -> Section {
        Section::WidowPrayer
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

    fn fetch<'c>(&self, key: u32, ctx: &StepContext<'c>) -> Result<&'c RosterSection> {
        ctx.corpus
            .roster
            .get(&key)
            .ok_or_else(|| AgendaError::lookup_miss(self.section().as_str(), format!("section {key}")))
    }

    fn render(
        &self,
        anchor_line: &str,
        _key: u32,
        section: &RosterSection,
        _ctx: &StepContext,
    ) -> Vec<String> {
        let mut lines = vec![format!(
            "{ROSTER_PREFIX}{} - {}. {}",
            self.reader(anchor_line),
            section.number,
            section.title
        )];
        lines.extend(section.display_lines());
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::document::AgendaDocument;
    use crate::rotation::{fixtures, run_step};

    #[test]
    fn lists_location_first_and_keeps_reader() {
        let corpus = fixtures::corpus();
        let config = Config::default();
        let dates = fixtures::dates();
        let ctx = StepContext { dates: &dates, corpus: &corpus, config: &config };
        let mut doc = fixtures::agenda();

        run_step(&RosterStep::new(), &mut doc, &ctx).unwrap();
        let text = doc.render();
        assert!(text.contains(
            "Pray for the Widows by Donald Tise - 27. Faithful Families\nSanford - Jane Doe\nLongwood - Mary Major\nLake Mary - Ellen Grace\n\nPray for Local Pastor"
        ));
        assert!(!text.contains("Old widow entry"));
    }

    #[test]
    fn header_without_section_suffix() {
        let corpus = fixtures::corpus();
        let config = Config::default();
        let dates = fixtures::dates();
        let ctx = StepContext { dates: &dates, corpus: &corpus, config: &config };
        let mut doc = AgendaDocument::parse("Pray for the Widows by Donald Tise\n");

        run_step(&RosterStep::new(), &mut doc, &ctx).unwrap();
        assert_eq!(
            doc.line(0),
            Some("Pray for the Widows by Donald Tise - 27. Faithful Families")
        );
    }

    #[test]
    fn missing_anchor() {
        let corpus = fixtures::corpus();
        let config = Config::default();
        let dates = fixtures::dates();
        let ctx = StepContext { dates: &dates, corpus: &corpus, config: &config };
        let mut doc = AgendaDocument::parse("Pray for the Orphans by X - 1. Y\n");
        let err = run_step(&RosterStep::new(), &mut doc, &ctx).unwrap_err();
        assert!(matches!(err, AgendaError::AnchorNotFound { .. }));
    }
}
