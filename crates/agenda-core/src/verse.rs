//! Scripture text for the references named in the agenda.
//!
//! The lookup is supplementary: a failed or empty lookup inserts nothing and
//! the step still succeeds.

use crate::config::VersesConfig;
use crate::document::AgendaDocument;
use crate::error::{AgendaError, Result};
use crate::rotation::{DEVOTIONAL_THOUGHT_PREFIX, SCRIPTURE_PREFIX};
use crate::splice::{self, Anchor, BlockEnd};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    #[serde(default)]
    pub verse: Option<u32>,
    pub text: String,
}

impl Verse {
    pub fn new(verse: Option<u32>, text: impl Into<String>) -> Self {
        Self {
            verse,
            text: text.into(),
        }
    }
}

/// Resolves a reference such as `Romans 5:1-2` to its verses, in order.
/// Implementations return an empty list on any failure.
pub trait VerseLookup {
    fn lookup(&self, reference: &str) -> Vec<Verse>;
}

// ---------------------------------------------------------------------------
// HTTP lookup
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    verses: Vec<Verse>,
}

/// bible-api.com style endpoint: `GET {base}/{reference}?translation={t}`.
pub struct HttpVerseLookup {
    client: reqwest::blocking::Client,
    base_url: String,
    translation: String,
}

impl HttpVerseLookup {
    pub fn new(config: &VersesConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgendaError::Collaborator(format!("http client: {e}")))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            translation: config.translation.clone(),
        })
    }

    fn url(&self, reference: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| AgendaError::Collaborator(format!("bad verse url '{}': {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| AgendaError::Collaborator(format!("verse url '{}' cannot take a path", self.base_url)))?
            .pop_if_empty()
            .push(reference);
        url.query_pairs_mut()
            .append_pair("translation", &self.translation);
        Ok(url)
    }

    pub fn fetch(&self, reference: &str) -> Result<Vec<Verse>> {
        let url = self.url(reference)?;
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| AgendaError::Collaborator(format!("verse lookup for '{reference}': {e}")))?;
        let body: ApiResponse = response
            .json()
            .map_err(|e| AgendaError::Collaborator(format!("verse lookup for '{reference}': {e}")))?;
        Ok(body
            .verses
            .into_iter()
            .map(|v| Verse::new(v.verse, v.text.trim()))
            .filter(|v| !v.text.is_empty())
            .collect())
    }
}

impl VerseLookup for HttpVerseLookup {
    fn lookup(&self, reference: &str) -> Vec<Verse> {
        match self.fetch(reference) {
            Ok(verses) => verses,
            Err(e) => {
                warn!(reference, error = %e, "no verses available");
                Vec::new()
            }
        }
    }
}

/// Lookup used when verse insertion is switched off.
pub struct NoVerses;

impl VerseLookup for NoVerses {
    fn lookup(&self, _reference: &str) -> Vec<Verse> {
        Vec::new()
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Numbered list lines. With every verse numbered: `N. <reference> <text>`.
/// Otherwise the verses are numbered 1..K in order and the reference is left
/// out: `K. <text>`.
pub fn render_verses(reference: &str, verses: &[Verse]) -> Vec<String> {
    let all_numbered = verses.iter().all(|v| v.verse.is_some());
    verses
        .iter()
        .enumerate()
        .map(|(i, v)| match v.verse {
            Some(n) if all_numbered => format!("{n}. {reference} {}", v.text),
            _ => format!("{}. {}", i + 1, v.text),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// VerseInsertionStep
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct VerseSummary {
    pub anchor: &'static str,
    pub reference: String,
    pub inserted: usize,
}

/// Inserts the text of the reference named on an anchor line directly below
/// it. Lines already under the anchor belong to the agenda and are kept.
pub struct VerseInsertionStep {
    anchor: Anchor,
}

impl VerseInsertionStep {
    pub fn new(name: &'static str, prefix: &str) -> Self {
        let pattern = Regex::new(&format!(r"^{}(.+)$", regex::escape(prefix))).unwrap();
        Self {
            anchor: Anchor::new(name, pattern, BlockEnd::Line),
        }
    }

    /// `Devotional Thought - <reference>`
    pub fn devotional_thought() -> Self {
        Self::new("devotional_thought", DEVOTIONAL_THOUGHT_PREFIX)
    }

    /// `Bible Reading Rotation - <reference>`
    pub fn bible_reading() -> Self {
        Self::new("bible_reading_verses", SCRIPTURE_PREFIX)
    }

    pub fn name(&self) -> &'static str {
        self.anchor.section()
    }

    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    pub fn apply(&self, doc: &mut AgendaDocument, lookup: &dyn VerseLookup) -> Result<VerseSummary> {
        let region = splice::locate(doc, &self.anchor)?;
        let anchor_line = region.anchor_line(doc).to_string();
        let reference = self
            .anchor
            .captures(&anchor_line)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        let verses = if reference.is_empty() {
            Vec::new()
        } else {
            lookup.lookup(&reference)
        };
        let rendered = render_verses(&reference, &verses);
        let inserted = rendered.len();

        if inserted > 0 {
            let mut replacement = Vec::with_capacity(inserted + 1);
            replacement.push(anchor_line);
            replacement.extend(rendered);
            splice::replace(doc, &region, replacement);
        }
        info!(anchor = self.name(), reference = %reference, inserted, "verses inserted");
        Ok(VerseSummary {
            anchor: self.name(),
            reference,
            inserted,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
