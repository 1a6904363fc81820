//! The carried-forward agenda: an ordered, editable sequence of lines.
//!
//! The document is both the output artifact and the only record of where each
//! rotation left off, so rendering must reproduce the input byte for byte for
//! every line that no step touched.

use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaDocument {
    lines: Vec<String>,
    newline: &'static str,
    trailing_newline: bool,
}

impl AgendaDocument {
    pub fn parse(text: &str) -> Self {
        let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
        let trailing_newline = text.ends_with(newline);
        let body = if trailing_newline {
            &text[..text.len() - newline.len()]
        } else {
            text
        };
        let lines = if text.is_empty() {
            Vec::new()
        } else {
            body.split(newline).map(str::to_string).collect()
        };
        Self {
            lines,
            newline,
            trailing_newline,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Replace `range` with `replacement`. Only the splicer calls this.
    pub(crate) fn replace_range(&mut self, range: Range<usize>, replacement: Vec<String>) {
        self.lines.splice(range, replacement);
    }

    pub(crate) fn set_line(&mut self, index: usize, text: String) {
        if let Some(line) = self.lines.get_mut(index) {
            *line = text;
        }
    }

    pub fn render(&self) -> String {
        let mut out = self.lines.join(self.newline);
        if self.trailing_newline {
            out.push_str(self.newline);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_is_byte_identical() {
        for text in [
            "",
            "one",
            "one\n",
            "one\ntwo\n\nthree",
            "one\r\ntwo\r\n",
            "\n\nlead\n",
        ] {
            assert_eq!(AgendaDocument::parse(text).render(), text, "input: {text:?}");
        }
    }

    #[test]
    fn blank_lines_are_kept_as_lines() {
        let doc = AgendaDocument::parse("a\n\nb");
        assert_eq!(doc.len(), 3);
        assert_eq!(doc.line(1), Some(""));
    }

    #[test]
    fn replace_range_splices() {
        let mut doc = AgendaDocument::parse("a\nb\nc\nd\n");
        doc.replace_range(1..3, vec!["x".to_string()]);
        assert_eq!(doc.render(), "a\nx\nd\n");
    }
}
