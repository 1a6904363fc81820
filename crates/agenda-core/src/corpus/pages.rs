//! Prayer-card booklet: `## Page N`, one `### Title`, then numbered prayers,
//! each optionally followed by citation lines.

use super::{strip_bullet, ReferenceLoader};
use crate::error::{AgendaError, Result};
use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    /// The numbered line as written, e.g. `2. Encourage the faithful`.
    pub text: String,
    pub citations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub title: String,
    pub entries: Vec<PageEntry>,
}

impl Page {
    pub fn first_entry(&self) -> Option<&PageEntry> {
        self.entries.first()
    }
}

pub struct PageLoader;

static PAGE_RE: OnceLock<Regex> = OnceLock::new();
static TITLE_RE: OnceLock<Regex> = OnceLock::new();
static ENTRY_RE: OnceLock<Regex> = OnceLock::new();

fn page_re() -> &'static Regex {
    PAGE_RE.get_or_init(|| Regex::new(r"(?i)^##\s*\**\s*page\s+(\d+)\s*\**\s*$").unwrap())
}

fn title_re() -> &'static Regex {
    TITLE_RE.get_or_init(|| Regex::new(r"^###\s+(.+?)\s*$").unwrap())
}

fn entry_re() -> &'static Regex {
    ENTRY_RE.get_or_init(|| Regex::new(r"^\d+\.\s+\S").unwrap())
}

struct Draft {
    number: u32,
    title: Option<String>,
    entries: Vec<PageEntry>,
}

impl Draft {
    fn finish(self) -> Result<(u32, Page)> {
        let title = self.title.ok_or_else(|| {
            AgendaError::parse(
                PageLoader.grammar(),
                format!("page {} has no `### Title` section header", self.number),
            )
        })?;
        Ok((
            self.number,
            Page {
                number: self.number,
                title,
                entries: self.entries,
            },
        ))
    }
}

impl ReferenceLoader for PageLoader {
    type Key = u32;
    type Entry = Page;

    fn grammar(&self) -> &'static str {
        "pages (## Page N / ### Title)"
    }

    fn parse(&self, text: &str) -> Result<Vec<(u32, Page)>> {
        let mut pages = Vec::new();
        let mut draft: Option<Draft> = None;

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if let Some(caps) = page_re().captures(trimmed) {
                if let Some(done) = draft.take() {
                    pages.push(done.finish()?);
                }
                let number = caps[1].parse::<u32>().map_err(|_| {
                    AgendaError::parse(self.grammar(), format!("bad page number in `{trimmed}`"))
                })?;
                draft = Some(Draft {
                    number,
                    title: None,
                    entries: Vec::new(),
                });
                continue;
            }
            // Text before the first page is preamble.
            let Some(page) = draft.as_mut() else {
                continue;
            };
            if let Some(caps) = title_re().captures(trimmed) {
                if page.title.is_some() {
                    return Err(AgendaError::parse(
                        self.grammar(),
                        format!("page {} has more than one section header", page.number),
                    ));
                }
                page.title = Some(caps[1].to_string());
                continue;
            }
            if entry_re().is_match(trimmed) {
                page.entries.push(PageEntry {
                    text: trimmed.to_string(),
                    citations: Vec::new(),
                });
                continue;
            }
            if let Some(entry) = page.entries.last_mut() {
                entry.citations.push(strip_bullet(trimmed).to_string());
            }
        }
        if let Some(done) = draft.take() {
            pages.push(done.finish()?);
        }
        Ok(pages)
    }
}
