//! Anchor-bounded rewriting of an [`AgendaDocument`].
//!
//! An anchor is a line pattern plus a rule for where its content block ends.
//! Splicing replaces the anchor line and its block and nothing else.

use crate::document::AgendaDocument;
use crate::error::{AgendaError, Result};
use regex::{Captures, Regex};
use std::ops::Range;

/// Where the content block that belongs to an anchor line stops.
#[derive(Debug, Clone)]
pub enum BlockEnd {
    /// The anchor line has no block.
    Line,
    /// Block runs until the first line matching the terminator (exclusive)
    /// or the end of the document.
    Until(Regex),
    /// Block is the run of lines directly below the anchor matching the pattern.
    While(Regex),
}

#[derive(Debug, Clone)]
pub struct Anchor {
    section: &'static str,
    pattern: Regex,
    block: BlockEnd,
}

impl Anchor {
    pub fn new(section: &'static str, pattern: Regex, block: BlockEnd) -> Self {
        Self {
            section,
            pattern,
            block,
        }
    }

    pub fn section(&self) -> &'static str {
        self.section
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn is_match(&self, line: &str) -> bool {
        self.pattern.is_match(line.trim_end())
    }

    pub fn captures<'l>(&self, line: &'l str) -> Option<Captures<'l>> {
        self.pattern.captures(line.trim_end())
    }
}

/// A located anchor: its line index and the extent of its block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub start: usize,
    pub end: usize,
}

impl Region {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn anchor_line<'d>(&self, doc: &'d AgendaDocument) -> &'d str {
        doc.line(self.start).unwrap_or_default()
    }
}

/// Find the first line matching `anchor` and the block that belongs to it.
pub fn locate(doc: &AgendaDocument, anchor: &Anchor) -> Result<Region> {
    let lines = doc.lines();
    let start = lines
        .iter()
        .position(|l| anchor.is_match(l))
        .ok_or_else(|| AgendaError::AnchorNotFound {
            section: anchor.section.to_string(),
            pattern: anchor.pattern.as_str().to_string(),
        })?;

    let body = &lines[start + 1..];
    let block_len = match &anchor.block {
        BlockEnd::Line => 0,
        BlockEnd::Until(terminator) => body
            .iter()
            .position(|l| terminator.is_match(l.trim_end()))
            .unwrap_or(body.len()),
        BlockEnd::While(pattern) => body
            .iter()
            .take_while(|l| pattern.is_match(l.trim_end()))
            .count(),
    };

    Ok(Region {
        start,
        end: start + 1 + block_len,
    })
}

/// Replace a previously located region with `replacement`.
pub fn replace(doc: &mut AgendaDocument, region: &Region, replacement: Vec<String>) {
    doc.replace_range(region.range(), replacement);
}

/// Locate `anchor` and replace its region with `replacement` in one call.
pub fn splice(
    doc: &mut AgendaDocument,
    anchor: &Anchor,
    replacement: Vec<String>,
) -> Result<Region> {
    let region = locate(doc, anchor)?;
    replace(doc, &region, replacement);
    Ok(region)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn doc() -> AgendaDocument {
        AgendaDocument::parse("Title\nSection A by Someone\nold a1\nold a2\n\nSection B\nold b\n")
    }

    fn until_blank(section: &'static str, pattern: &str) -> Anchor {
        Anchor::new(
            section,
            Regex::new(pattern).unwrap(),
            BlockEnd::Until(Regex::new(r"^\s*$").unwrap()),
        )
    }

    #[test]
    fn splice_replaces_only_anchor_block() {
        let mut d = doc();
        let anchor = until_blank("a", r"^Section A by ");
        let region = splice(&mut d, &anchor, lines(&["Section A by New", "new a"])).unwrap();
        assert_eq!(region, Region { start: 1, end: 4 });
        assert_eq!(
            d.render(),
            "Title\nSection A by New\nnew a\n\nSection B\nold b\n"
        );
    }

    #[test]
    fn line_block_touches_one_line() {
        let mut d = doc();
        let anchor = Anchor::new("b", Regex::new(r"^Section B$").unwrap(), BlockEnd::Line);
        splice(&mut d, &anchor, lines(&["Section B!"])).unwrap();
        assert_eq!(
            d.render(),
            "Title\nSection A by Someone\nold a1\nold a2\n\nSection B!\nold b\n"
        );
    }

    #[test]
    fn until_runs_to_end_without_terminator() {
        let d = doc();
        let anchor = until_blank("b", r"^Section B$");
        let region = locate(&d, &anchor).unwrap();
        assert_eq!(region, Region { start: 5, end: 7 });
    }

    #[test]
    fn while_block_takes_matching_run() {
        let d = AgendaDocument::parse("Ref - John 3:16\n1. a\n2. b\nafter");
        let anchor = Anchor::new(
            "verses",
            Regex::new(r"^Ref - ").unwrap(),
            BlockEnd::While(Regex::new(r"^\d+\. ").unwrap()),
        );
        assert_eq!(locate(&d, &anchor).unwrap(), Region { start: 0, end: 3 });
    }

    #[test]
    fn missing_anchor_is_error_and_document_unchanged() {
        let mut d = doc();
        let before = d.render();
        let anchor = until_blank("missing", r"^Nowhere");
        let err = splice(&mut d, &anchor, lines(&["x"])).unwrap_err();
        assert!(matches!(err, AgendaError::AnchorNotFound { .. }));
        assert_eq!(d.render(), before);
    }

    #[test]
    fn first_match_wins() {
        let mut d = AgendaDocument::parse("X 1\nX 2");
        let anchor = Anchor::new("x", Regex::new(r"^X ").unwrap(), BlockEnd::Line);
        splice(&mut d, &anchor, lines(&["X 9"])).unwrap();
        assert_eq!(d.render(), "X 9\nX 2");
    }
}
