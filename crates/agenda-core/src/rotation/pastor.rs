use super::{build_anchor, RotationStep, Section, StepContext, PASTOR_PREFIX};
use crate::corpus::PastorRow;
use crate::error::{AgendaError, Result};
use crate::splice::{Anchor, BlockEnd};

/// `Pray for Local Pastor by <reader> - <Church> - <Pastor>`. The line names
/// last week's pastor; finding that row in the roster and taking the next one
/// (wrapping after the last row) walks the whole roster in order, forever.
pub struct PastorStep {
    anchor: Anchor,
}

impl PastorStep {
    pub fn new() -> Self {
        Self {
            anchor: build_anchor(
                Section::PastorPrayer,
                &format!(r"^{}(.+?) - (.+)$", regex::escape(PASTOR_PREFIX)),
                BlockEnd::Line,
            ),
        }
    }

    /// (reader, "Church - Pastor")
    fn parts<'l>(&self, anchor_line: &'l str) -> Option<(&'l str, &'l str)> {
        let caps = self.anchor.captures(anchor_line)?;
        Some((caps.get(1)?.as_str(), caps.get(2)?.as_str().trim()))
    }
}

impl Default for PastorStep {
    fn default() -> Self {
        Self::new()
    }
}

impl RotationStep for PastorStep {
    type Key = u32;
    type Entry = PastorRow;

    fn section(&self) -> Section {
        Section::PastorPrayer
    }

    fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    fn extract(&self, anchor_line: &str, ctx: &StepContext) -> Result<Option<u32>> {
        let (_, current) = self.parts(anchor_line).ok_or_else(|| {
            AgendaError::parse(self.section().as_str(), format!("cannot read `{anchor_line}`"))
        })?;
        let index = ctx
            .corpus
            .pastors
            .find(|row| row.label() == current)
            .ok_or_else(|| AgendaError::lookup_miss(self.section().as_str(), current))?;
        Ok(Some(index))
    }

    fn advance(&self, current: Option<u32>, ctx: &StepContext) -> Result<u32> {
        let pastors = &ctx.corpus.pastors;
        current
            .and_then(|index| pastors.next_cyclic(&index))
            .ok_or_else(|| {
                AgendaError::lookup_miss(
                    self.section().as_str(),
                    format!("row after {}", current.map_or("?".to_string(), |i| i.to_string())),
                )
            })
    }

    fn fetch<'c>(&self, key: u32, ctx: &StepContext<'c>) -> Result<&'c PastorRow> {
        ctx.corpus
            .pastors
            .get(&key)
            .ok_or_else(|| AgendaError::lookup_miss(self.section().as_str(), format!("row {key}")))
    }

    fn render(&self, anchor_line: &str, _key: u32, row: &PastorRow, _ctx: &StepContext) -> Vec<String> {
        let reader = self.parts(anchor_line).map(|(r, _)| r).unwrap_or_default();
        vec![format!("{PASTOR_PREFIX}{reader} - {}", row.label())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::corpus::{CorpusSources, ReferenceCorpus};
    use crate::document::AgendaDocument;
    use crate::rotation::{fixtures, run_step};

    fn roster(rows: usize) -> ReferenceCorpus {
        let mut text = String::from("| # | Pastor Name | Church Name |\n|---|---|---|\n");
        for i in 1..=rows {
            text.push_str(&format!("| {i} | Pastor {i} | Church {i} |\n"));
        }
        let sources = CorpusSources {
            pastors: text,
            ..Default::default()
        };
        ReferenceCorpus::parse(&sources, &Config::default())
    }

    #[test]
    fn advances_and_wraps() {
        let corpus = fixtures::corpus();
        let config = Config::default();
        let dates = fixtures::dates();
        let ctx = StepContext { dates: &dates, corpus: &corpus, config: &config };
        let mut doc = fixtures::agenda();

        let summary = run_step(&PastorStep::new(), &mut doc, &ctx).unwrap();
        assert_eq!(summary.previous.as_deref(), Some("1"));
        assert_eq!(summary.key, "2");
        assert_eq!(
            doc.line(12),
            Some("Pray for Local Pastor by Johnny Perry - Church Beta - Pastor Beta")
        );

        run_step(&PastorStep::new(), &mut doc, &ctx).unwrap();
        assert_eq!(
            doc.line(12),
            Some("Pray for Local Pastor by Johnny Perry - Church Alpha - Pastor Alpha")
        );
    }

    #[test]
    fn cycle_closes_after_n_steps_from_any_start() {
        let corpus = roster(5);
        let config = Config::default();
        let dates = fixtures::dates();
        let ctx = StepContext { dates: &dates, corpus: &corpus, config: &config };

        for start in 1..=5 {
            let original = format!("Pray for Local Pastor by R - Church {start} - Pastor {start}\n");
            let mut doc = AgendaDocument::parse(&original);
            let mut seen = Vec::new();
            for _ in 0..5 {
                let summary = run_step(&PastorStep::new(), &mut doc, &ctx).unwrap();
                seen.push(summary.key);
            }
            assert_eq!(doc.render(), original, "start row {start}");
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), 5, "every row visited once from row {start}");
        }
    }

    #[test]
    fn unknown_pastor_is_lookup_miss() {
        let corpus = fixtures::corpus();
        let config = Config::default();
        let dates = fixtures::dates();
        let ctx = StepContext { dates: &dates, corpus: &corpus, config: &config };
        let mut doc = AgendaDocument::parse("Pray for Local Pastor by R - Church Gamma - Pastor Gamma\n");
        let before = doc.render();

        let err = run_step(&PastorStep::new(), &mut doc, &ctx).unwrap_err();
        assert!(matches!(err, AgendaError::LookupMiss { .. }));
        assert_eq!(doc.render(), before);
    }
}
