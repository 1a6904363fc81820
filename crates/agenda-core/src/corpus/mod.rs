//! Reference documents: five markdown files, five grammars, one contract.
//!
//! Each loader turns raw text into an ordered, keyed set of entries. A document
//! that does not match its grammar loads as an empty set; the problem is kept
//! on the [`ReferenceCorpus`] so `agenda check` can report it, and the step
//! that needed the entry later fails with a lookup miss.

pub mod date_table;
pub mod day_blocks;
pub mod indexed;
pub mod numbered;
pub mod pages;
pub mod table;

use crate::config::Config;
use crate::error::{AgendaError, Result};
use crate::workspace::Workspace;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

pub use date_table::{DateTableLoader, MonthDay, ScriptureReading};
pub use day_blocks::{DayBlockLoader, DayHeaderStyle, DayReading};
pub use indexed::{PastorLoader, PastorRow};
pub use numbered::{RosterLoader, RosterSection};
pub use pages::{Page, PageEntry, PageLoader};

// ---------------------------------------------------------------------------
// Loader contract
// ---------------------------------------------------------------------------

pub trait ReferenceLoader {
    type Key: Copy + PartialEq + fmt::Display;
    type Entry;

    /// Grammar name used in diagnostics.
    fn grammar(&self) -> &'static str;

    /// Parse `text` into entries in document order.
    fn parse(&self, text: &str) -> Result<Vec<(Self::Key, Self::Entry)>>;

    /// Parse, treating any grammar failure (or an empty result) as an empty set.
    fn load(&self, text: &str) -> Loaded<Self::Key, Self::Entry> {
        let parsed = self.parse(text).and_then(|entries| {
            if entries.is_empty() {
                Err(AgendaError::parse(
                    self.grammar(),
                    "no entries found",
                ))
            } else {
                Ok(entries)
            }
        });
        match parsed {
            Ok(entries) => Loaded {
                entries: Keyed::from_entries(entries),
                problem: None,
            },
            Err(e) => {
                warn!(grammar = self.grammar(), error = %e, "reference document unusable");
                Loaded {
                    entries: Keyed::default(),
                    problem: Some(e),
                }
            }
        }
    }
}

pub struct Loaded<K, E> {
    pub entries: Keyed<K, E>,
    pub problem: Option<AgendaError>,
}

// ---------------------------------------------------------------------------
// Keyed
// ---------------------------------------------------------------------------

/// Entries in document order. The order is the rotation cycle for positional
/// sections.
#[derive(Debug, Clone)]
pub struct Keyed<K, E> {
    entries: Vec<(K, E)>,
}

impl<K, E> Default for Keyed<K, E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K: Copy + PartialEq + fmt::Display, E> Keyed<K, E> {
    /// Duplicate keys keep their first occurrence.
    pub fn from_entries(entries: Vec<(K, E)>) -> Self {
        let mut kept: Vec<(K, E)> = Vec::with_capacity(entries.len());
        for (key, entry) in entries {
            if kept.iter().any(|(k, _)| *k == key) {
                debug!(%key, "duplicate key ignored");
                continue;
            }
            kept.push((key, entry));
        }
        Self { entries: kept }
    }

    pub fn get(&self, key: &K) -> Option<&E> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, e)| e)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    pub fn position(&self, key: &K) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k == key)
    }

    /// The key after `key` in document order, wrapping to the first.
    pub fn next_cyclic(&self, key: &K) -> Option<K> {
        let pos = self.position(key)?;
        let next = (pos + 1) % self.entries.len();
        self.entries.get(next).map(|(k, _)| *k)
    }

    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &E)> {
        self.entries.iter().map(|(k, e)| (k, e))
    }

    pub fn find(&self, mut pred: impl FnMut(&E) -> bool) -> Option<K> {
        self.entries.iter().find(|(_, e)| pred(e)).map(|(k, _)| *k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ReferenceCorpus
// ---------------------------------------------------------------------------

/// Raw text of the five reference documents, by logical name.
#[derive(Debug, Clone, Default)]
pub struct CorpusSources {
    pub scripture: String,
    pub international: String,
    pub state: String,
    pub devotional: String,
    pub roster: String,
    pub pastors: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorpusProblem {
    pub document: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CorpusSummary {
    pub document: &'static str,
    pub entries: usize,
}

/// All reference data for one run. Built once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ReferenceCorpus {
    pub scripture: Keyed<MonthDay, ScriptureReading>,
    pub international: Keyed<u32, DayReading>,
    pub state: Keyed<u32, DayReading>,
    pub devotional: Keyed<u32, Page>,
    pub roster: Keyed<u32, RosterSection>,
    pub pastors: Keyed<u32, PastorRow>,
    pub problems: Vec<CorpusProblem>,
}

impl ReferenceCorpus {
    pub fn parse(sources: &CorpusSources, config: &Config) -> Self {
        let mut problems = Vec::new();
        let mut take = |document: &str, problem: Option<AgendaError>| {
            if let Some(e) = problem {
                problems.push(CorpusProblem {
                    document: document.to_string(),
                    message: e.to_string(),
                });
            }
        };

        let scripture = DateTableLoader::new(&config.scripture.column).load(&sources.scripture);
        take(&config.documents.scripture, scripture.problem);
        let international = DayBlockLoader::new(DayHeaderStyle::Bold).load(&sources.international);
        take(&config.documents.international, international.problem);
        let state = DayBlockLoader::new(DayHeaderStyle::Plain).load(&sources.state);
        take(&config.documents.state, state.problem);
        let devotional = PageLoader.load(&sources.devotional);
        take(&config.documents.devotional, devotional.problem);
        let roster = RosterLoader.load(&sources.roster);
        take(&config.documents.roster, roster.problem);
        let pastors = PastorLoader.load(&sources.pastors);
        take(&config.documents.pastors, pastors.problem);

        Self {
            scripture: scripture.entries,
            international: international.entries,
            state: state.entries,
            devotional: devotional.entries,
            roster: roster.entries,
            pastors: pastors.entries,
            problems,
        }
    }

    /// Read every reference document from the input directory. A missing file
    /// loads as empty and is recorded as a problem.
    pub fn load(workspace: &Workspace, config: &Config) -> Result<Self> {
        let docs = &config.documents;
        let mut missing = Vec::new();
        let mut read = |file: &str| -> Result<String> {
            match workspace.read_input(file)? {
                Some(text) => Ok(text),
                None => {
                    warn!(file, "reference document not found");
                    missing.push(CorpusProblem {
                        document: file.to_string(),
                        message: "file not found".to_string(),
                    });
                    Ok(String::new())
                }
            }
        };
        let sources = CorpusSources {
            scripture: read(&docs.scripture)?,
            international: read(&docs.international)?,
            state: read(&docs.state)?,
            devotional: read(&docs.devotional)?,
            roster: read(&docs.roster)?,
            pastors: read(&docs.pastors)?,
        };

        let mut corpus = Self::parse(&sources, config);
        // A missing file already explains its empty set.
        corpus
            .problems
            .retain(|p| !missing.iter().any(|m| m.document == p.document));
        missing.extend(corpus.problems);
        corpus.problems = missing;
        Ok(corpus)
    }

    pub fn summary(&self) -> Vec<CorpusSummary> {
        vec![
            CorpusSummary { document: "scripture", entries: self.scripture.len() },
            CorpusSummary { document: "international", entries: self.international.len() },
            CorpusSummary { document: "state", entries: self.state.len() },
            CorpusSummary { document: "devotional", entries: self.devotional.len() },
            CorpusSummary { document: "roster", entries: self.roster.len() },
            CorpusSummary { document: "pastors", entries: self.pastors.len() },
        ]
    }
}

// ---------------------------------------------------------------------------
// Shared line helpers
// ---------------------------------------------------------------------------

/// Strip a leading markdown bullet (`-`, `*`, `+`) and surrounding space.
pub(crate) fn strip_bullet(line: &str) -> &str {
    let t = line.trim();
    for marker in ["- ", "* ", "+ "] {
        if let Some(rest) = t.strip_prefix(marker) {
            return rest.trim();
        }
    }
    t
}

/// `---`, `***` or `___` on a line of its own.
pub(crate) fn is_divider(line: &str) -> bool {
    let t = line.trim();
    t.len() >= 3
        && (t.chars().all(|c| c == '-') || t.chars().all(|c| c == '*') || t.chars().all(|c| c == '_'))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
