//! One weekly run: seed from last week's agenda, rotate every section, write,
//! carry forward, add verses, print.
//!
//! Each stage is recorded in a [`RunReport`]. A failing rotation leaves its
//! own section as it was and the run continues; the report says which stages
//! did not succeed.

use crate::config::Config;
use crate::corpus::{CorpusProblem, CorpusSummary, ReferenceCorpus};
use crate::dates::{Clock, WeekDates};
use crate::document::AgendaDocument;
use crate::error::Result;
use crate::paths;
use crate::print::{LpPrinter, Printer};
use crate::rotation::{
    run_step, DayReadingStep, DevotionalStep, PastorStep, RosterStep, RotationStep, ScriptureStep,
    Section, StepContext, StepSummary,
};
use crate::splice::{self, Anchor};
use crate::verse::{VerseInsertionStep, VerseLookup};
use crate::workspace::Workspace;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// Options and collaborators
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Seed and rotate in memory only; nothing is written, printed or looked up.
    pub dry_run: bool,
    pub verses: bool,
    pub print: bool,
}

pub struct Collaborators<'a> {
    pub clock: &'a dyn Clock,
    pub verses: &'a dyn VerseLookup,
    pub printer: Option<&'a dyn Printer>,
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Ok,
    Error,
    Skipped,
}

impl StageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StageStatus::Ok => "ok",
            StageStatus::Error => "error",
            StageStatus::Skipped => "skipped",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    pub stage: String,
    pub status: StageStatus,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub dates: WeekDates,
    pub output_path: Option<PathBuf>,
    pub stages: Vec<StageReport>,
    #[serde(skip)]
    pub agenda: String,
}

impl RunReport {
    fn new(dates: WeekDates) -> Self {
        Self {
            dates,
            output_path: None,
            stages: Vec::new(),
            agenda: String::new(),
        }
    }

    pub fn success(&self) -> bool {
        self.stages.iter().all(|s| s.status != StageStatus::Error)
    }

    pub fn stage(&self, name: &str) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.stage == name)
    }

    fn ok(&mut self, stage: &str, detail: impl Into<String>) {
        self.push(stage, StageStatus::Ok, detail.into());
    }

    fn skipped(&mut self, stage: &str, detail: &str) {
        self.push(stage, StageStatus::Skipped, detail.to_string());
    }

    fn error(&mut self, stage: &str, error: impl std::fmt::Display) {
        warn!(stage, error = %error, "stage failed");
        self.push(stage, StageStatus::Error, error.to_string());
    }

    fn record<T>(&mut self, stage: &str, outcome: Result<T>, detail: impl FnOnce(&T) -> String) -> Option<T> {
        match outcome {
            Ok(value) => {
                self.ok(stage, detail(&value));
                Some(value)
            }
            Err(e) => {
                self.error(stage, e);
                None
            }
        }
    }

    fn push(&mut self, stage: &str, status: StageStatus, detail: String) {
        self.stages.push(StageReport {
            stage: stage.to_string(),
            status,
            detail,
        });
    }
}

// ---------------------------------------------------------------------------
// Stage names outside the six rotations
// ---------------------------------------------------------------------------

pub const STAGE_SEED: &str = "seed";
pub const STAGE_WRITE: &str = "write";
pub const STAGE_PRINT_HANDOUTS: &str = "print_handouts";
pub const STAGE_CARRY_FORWARD: &str = "carry_forward";
pub const STAGE_REWRITE: &str = "rewrite";
pub const STAGE_PRINT_LEADER: &str = "print_leader";

// ---------------------------------------------------------------------------
// Seeding and rotation
// ---------------------------------------------------------------------------

/// Next week's working copy of last week's agenda: the title line gets the
/// new date, every other line is carried as is.
pub fn seed(last_agenda: &str, dates: &WeekDates) -> AgendaDocument {
    let mut doc = AgendaDocument::parse(last_agenda);
    if let Some(title) = doc.line(0) {
        let last = paths::format_date(dates.last_week);
        if title.contains(&last) {
            let retitled = title.replace(&last, &paths::format_date(dates.next_week));
            doc.set_line(0, retitled);
        }
    }
    doc
}

enum Step {
    Scripture(ScriptureStep),
    Devotional(DevotionalStep),
    DayReading(DayReadingStep),
    Roster(RosterStep),
    Pastor(PastorStep),
}

impl Step {
    fn for_section(section: Section) -> Self {
        match section {
            Section::BibleReading => Step::Scripture(ScriptureStep::new()),
            Section::PrayerCard => Step::Devotional(DevotionalStep::new()),
            Section::InternationalReading => Step::DayReading(DayReadingStep::international()),
            Section::StateReading => Step::DayReading(DayReadingStep::state()),
            Section::WidowPrayer => Step::Roster(RosterStep::new()),
            Section::PastorPrayer => Step::Pastor(PastorStep::new()),
        }
    }

    fn anchor(&self) -> &Anchor {
        match self {
            Step::Scripture(s) => s.anchor(),
            Step::Devotional(s) => s.anchor(),
            Step::DayReading(s) => s.anchor(),
            Step::Roster(s) => s.anchor(),
            Step::Pastor(s) => s.anchor(),
        }
    }

    fn run(&self, doc: &mut AgendaDocument, ctx: &StepContext) -> Result<StepSummary> {
        match self {
            Step::Scripture(s) => run_step(s, doc, ctx),
            Step::Devotional(s) => run_step(s, doc, ctx),
            Step::DayReading(s) => run_step(s, doc, ctx),
            Step::Roster(s) => run_step(s, doc, ctx),
            Step::Pastor(s) => run_step(s, doc, ctx),
        }
    }
}

/// Run one section's rotation against the document.
pub fn rotate_section(section: Section, doc: &mut AgendaDocument, ctx: &StepContext) -> Result<StepSummary> {
    Step::for_section(section).run(doc, ctx)
}

/// Every rotation in order. Each outcome is independent of the others.
pub fn rotate_all(doc: &mut AgendaDocument, ctx: &StepContext) -> Vec<(Section, Result<StepSummary>)> {
    Section::all()
        .iter()
        .map(|&section| (section, rotate_section(section, doc, ctx)))
        .collect()
}

fn describe(summary: &StepSummary) -> String {
    match &summary.previous {
        Some(previous) => format!("{previous} -> {}", summary.key),
        None => summary.key.clone(),
    }
}

// ---------------------------------------------------------------------------
// run
// ---------------------------------------------------------------------------

/// Execute the weekly run under `root`. Only failures to read the reference
/// documents abort; everything else is reported per stage.
pub fn run(
    root: &Path,
    config: &Config,
    options: RunOptions,
    collab: &Collaborators,
) -> Result<RunReport> {
    let dates = WeekDates::from_clock(collab.clock);
    let workspace = Workspace::new(root, config);
    info!(%dates, dry_run = options.dry_run, "starting run");

    let corpus = ReferenceCorpus::load(&workspace, config)?;
    for problem in &corpus.problems {
        warn!(document = %problem.document, message = %problem.message, "reference document problem");
    }

    let mut report = RunReport::new(dates);

    let seeded = workspace
        .read_last_agenda(&dates)
        .map(|text| seed(&text, &dates));
    let Some(mut doc) = report.record(STAGE_SEED, seeded, |doc| {
        format!("{} lines from {}", doc.len(), paths::format_date(dates.last_week))
    }) else {
        return Ok(report);
    };

    let ctx = StepContext {
        dates: &dates,
        corpus: &corpus,
        config,
    };
    for (section, outcome) in rotate_all(&mut doc, &ctx) {
        report.record(section.as_str(), outcome, describe);
    }

    let verse_steps = [VerseInsertionStep::bible_reading(), VerseInsertionStep::devotional_thought()];
    if options.dry_run {
        let [bible, thought] = &verse_steps;
        for stage in [
            STAGE_WRITE,
            STAGE_PRINT_HANDOUTS,
            STAGE_CARRY_FORWARD,
            bible.name(),
            thought.name(),
            STAGE_REWRITE,
            STAGE_PRINT_LEADER,
        ] {
            report.skipped(stage, "dry run");
        }
        report.agenda = doc.render();
        return Ok(report);
    }

    let rotated = doc.render();
    let written = workspace.write_output(&dates, &rotated);
    let Some(output_path) = report.record(STAGE_WRITE, written, |p| p.display().to_string()) else {
        report.agenda = rotated;
        return Ok(report);
    };
    report.output_path = Some(output_path.clone());

    print_stage(
        &mut report,
        STAGE_PRINT_HANDOUTS,
        options,
        collab,
        &output_path,
        config.print.handout_copies,
    );

    let carried = workspace.carry_forward(&dates, &rotated);
    report.record(STAGE_CARRY_FORWARD, carried, |p| p.display().to_string());

    if options.verses {
        let mut inserted = 0;
        for step in &verse_steps {
            let outcome = step.apply(&mut doc, collab.verses);
            if let Some(summary) = report.record(step.name(), outcome, |s| {
                format!("{} verses for {}", s.inserted, s.reference)
            }) {
                inserted += summary.inserted;
            }
        }
        if inserted > 0 {
            let rewritten = workspace.write_output(&dates, &doc.render());
            report.record(STAGE_REWRITE, rewritten, |_| format!("{inserted} verse lines"));
        } else {
            report.skipped(STAGE_REWRITE, "no verses inserted");
        }
    } else {
        for step in &verse_steps {
            report.skipped(step.name(), "verses disabled");
        }
        report.skipped(STAGE_REWRITE, "verses disabled");
    }

    print_stage(
        &mut report,
        STAGE_PRINT_LEADER,
        options,
        collab,
        &output_path,
        config.print.leader_copies,
    );

    report.agenda = doc.render();
    info!(success = report.success(), "run finished");
    Ok(report)
}

fn print_stage(
    report: &mut RunReport,
    stage: &str,
    options: RunOptions,
    collab: &Collaborators,
    path: &Path,
    copies: u32,
) {
    match collab.printer {
        Some(printer) if options.print => {
            let outcome = printer.print(path, copies);
            report.record(stage, outcome, |_| format!("{copies} copies"));
        }
        _ => report.skipped(stage, "printing disabled"),
    }
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub dates: WeekDates,
    pub corpus: Vec<CorpusSummary>,
    pub problems: Vec<CorpusProblem>,
    pub last_agenda: PathBuf,
    pub last_agenda_found: bool,
    /// Anchors the last agenda lacks, by name.
    pub missing_anchors: Vec<String>,
    /// Whether the print command is on PATH; `None` when printing is off.
    pub print_command_found: Option<bool>,
}

impl CheckReport {
    pub fn is_ready(&self) -> bool {
        self.problems.is_empty()
            && self.last_agenda_found
            && self.missing_anchors.is_empty()
            && self.print_command_found != Some(false)
    }
}

/// Names of the anchors `doc` does not contain: six rotations plus the
/// devotional reference.
pub fn missing_anchors(doc: &AgendaDocument) -> Vec<String> {
    let mut missing: Vec<String> = Section::all()
        .iter()
        .map(|&s| Step::for_section(s))
        .filter(|step| splice::locate(doc, step.anchor()).is_err())
        .map(|step| step.anchor().section().to_string())
        .collect();
    let thought = VerseInsertionStep::devotional_thought();
    if splice::locate(doc, thought.anchor()).is_err() {
        missing.push(thought.name().to_string());
    }
    missing
}

/// Load everything a run would load and report what is missing, without
/// touching any file.
pub fn check(root: &Path, config: &Config, dates: WeekDates) -> Result<CheckReport> {
    let workspace = Workspace::new(root, config);
    let corpus = ReferenceCorpus::load(&workspace, config)?;
    let last_agenda = workspace.last_agenda_path(&dates);

    let (last_agenda_found, missing) = match workspace.read_last_agenda(&dates) {
        Ok(text) => (true, missing_anchors(&AgendaDocument::parse(&text))),
        Err(crate::error::AgendaError::MissingAgenda(_)) => (false, Vec::new()),
        Err(e) => return Err(e),
    };

    Ok(CheckReport {
        dates,
        corpus: corpus.summary(),
        problems: corpus.problems,
        last_agenda,
        last_agenda_found,
        missing_anchors: missing,
        print_command_found: config
            .print
            .enabled
            .then(|| LpPrinter::new(&config.print.command).available()),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::FixedClock;
    use crate::error::AgendaError;
    use crate::io;
    use crate::rotation::fixtures;
    use crate::verse::{NoVerses, Verse};
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use tempfile::TempDir;

    struct OneVerse;

    impl VerseLookup for OneVerse {
        fn lookup(&self, reference: &str) -> Vec<Verse> {
            vec![Verse::new(Some(1), format!("text of {reference}"))]
        }
    }

    #[derive(Default)]
    struct RecordingPrinter {
        jobs: RefCell<Vec<(PathBuf, u32)>>,
    }

    impl Printer for RecordingPrinter {
        fn print(&self, path: &Path, copies: u32) -> Result<()> {
            self.jobs.borrow_mut().push((path.to_path_buf(), copies));
            Ok(())
        }
    }

    fn clock() -> FixedClock {
        FixedClock(NaiveDate::from_ymd_opt(2024, 1, 24).unwrap())
    }

    fn project(agenda: &str) -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        let config = Config::default();
        let ws = Workspace::new(dir.path(), &config);
        let sources = fixtures::sources();
        let docs = &config.documents;
        for (name, text) in [
            (&docs.scripture, &sources.scripture),
            (&docs.international, &sources.international),
            (&docs.state, &sources.state),
            (&docs.devotional, &sources.devotional),
            (&docs.roster, &sources.roster),
            (&docs.pastors, &sources.pastors),
        ] {
            io::atomic_write(&ws.input_dir().join(name), text.as_bytes()).unwrap();
        }
        let last = ws.last_agenda_path(&fixtures::dates());
        io::atomic_write(&last, agenda.as_bytes()).unwrap();
        (dir, config)
    }

    #[test]
    fn seed_retitles_only_first_line() {
        let dates = fixtures::dates();
        let doc = seed("Agenda 2024-01-20\nNotes from 2024-01-20\n", &dates);
        assert_eq!(doc.render(), "Agenda 2024-01-27\nNotes from 2024-01-20\n");
    }

    #[test]
    fn seed_keeps_crlf() {
        let doc = seed("Agenda 2024-01-20\r\nBody\r\n", &fixtures::dates());
        assert_eq!(doc.render(), "Agenda 2024-01-27\r\nBody\r\n");
    }

    #[test]
    fn full_run_rotates_writes_and_carries_forward() {
        let (dir, config) = project(fixtures::AGENDA);
        let clock = clock();
        let printer = RecordingPrinter::default();
        let collab = Collaborators {
            clock: &clock,
            verses: &OneVerse,
            printer: Some(&printer),
        };
        let options = RunOptions {
            dry_run: false,
            verses: true,
            print: true,
        };

        let report = run(dir.path(), &config, options, &collab).unwrap();
        assert!(report.success(), "{:?}", report.stages);

        let out = report.output_path.clone().unwrap();
        let written = std::fs::read_to_string(&out).unwrap();
        assert!(written.starts_with(
            "North Seminole County Gideons - 2024-01-27 Saturday Prayer Breakfast Agenda\n\
             Bible Reading Rotation - 1 Corinthians 13:1-13\n\
             1. 1 Corinthians 13:1-13 text of 1 Corinthians 13:1-13\n\
             Prayer Card Together - Page 2 Faithful Witnesses: 2. Encourage the faithful\n\
             Acts 1:8\n"
        ));
        assert!(written.contains("Sanford - Jane Doe"));
        assert!(written.contains("Pray for Local Pastor by Johnny Perry - Church Beta - Pastor Beta"));
        assert!(written.ends_with(
            "Devotional Thought - Romans 5:1-2\n1. Romans 5:1-2 text of Romans 5:1-2\n"
        ));
        assert_eq!(report.agenda, written);

        // Carried copy is the rotated agenda without verses; last week's is gone.
        let ws = Workspace::new(dir.path(), &config);
        let dates = fixtures::dates();
        assert!(!ws.last_agenda_path(&dates).exists());
        let carried = std::fs::read_to_string(ws.carried_agenda_path(&dates)).unwrap();
        assert!(!carried.contains("text of"));
        assert!(carried.contains("Bible Reading Rotation - 1 Corinthians 13:1-13\nPrayer Card"));

        let jobs = printer.jobs.borrow();
        assert_eq!(jobs.as_slice(), [(out.clone(), 6), (out, 1)]);
    }

    #[test]
    fn next_week_runs_from_carried_agenda() {
        let (dir, config) = project(fixtures::AGENDA);
        let collab = Collaborators {
            clock: &clock(),
            verses: &NoVerses,
            printer: None,
        };
        let options = RunOptions {
            verses: true,
            ..Default::default()
        };
        run(dir.path(), &config, options, &collab).unwrap();

        let following = FixedClock(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        let collab = Collaborators {
            clock: &following,
            ..collab
        };
        let report = run(dir.path(), &config, options, &collab).unwrap();
        // February 3 has no readings in the fixtures; the pastor roster
        // still wraps from the carried agenda.
        assert_eq!(report.stage(STAGE_SEED).unwrap().status, StageStatus::Ok);
        assert_eq!(
            report.stage("pastor_prayer").unwrap().detail,
            "2 -> 1"
        );
    }

    #[test]
    fn failed_rotation_leaves_section_and_reports_error() {
        let agenda = fixtures::AGENDA.replace("Pray for Local Pastor", "Pray for Visiting Pastor");
        let (dir, config) = project(&agenda);
        let collab = Collaborators {
            clock: &clock(),
            verses: &NoVerses,
            printer: None,
        };

        let report = run(dir.path(), &config, RunOptions::default(), &collab).unwrap();
        assert!(!report.success());
        assert_eq!(report.stage("pastor_prayer").unwrap().status, StageStatus::Error);
        assert_eq!(report.stage("widow_prayer").unwrap().status, StageStatus::Ok);
        assert!(report.agenda.contains("Pray for Visiting Pastor by Johnny Perry - Church Alpha"));
        assert_eq!(report.stage(STAGE_PRINT_HANDOUTS).unwrap().status, StageStatus::Skipped);
    }

    #[test]
    fn dry_run_writes_nothing() {
        let (dir, config) = project(fixtures::AGENDA);
        let collab = Collaborators {
            clock: &clock(),
            verses: &OneVerse,
            printer: None,
        };
        let options = RunOptions {
            dry_run: true,
            verses: true,
            print: false,
        };

        let report = run(dir.path(), &config, options, &collab).unwrap();
        assert!(report.success());
        assert!(report.output_path.is_none());
        let skipped: Vec<&str> = report
            .stages
            .iter()
            .filter(|s| s.status == StageStatus::Skipped)
            .map(|s| s.stage.as_str())
            .collect();
        assert_eq!(
            skipped,
            [
                STAGE_WRITE,
                STAGE_PRINT_HANDOUTS,
                STAGE_CARRY_FORWARD,
                "bible_reading_verses",
                "devotional_thought",
                STAGE_REWRITE,
                STAGE_PRINT_LEADER,
            ]
        );
        assert_eq!(report.stages.len(), 1 + Section::all().len() + skipped.len());
        assert!(report.agenda.contains("Sanford - Jane Doe"));
        assert!(!report.agenda.contains("text of"));

        let ws = Workspace::new(dir.path(), &config);
        assert!(ws.last_agenda_path(&fixtures::dates()).exists());
        assert!(!ws.output_agenda_path(&fixtures::dates()).exists());
    }

    #[test]
    fn missing_last_agenda_stops_after_seed() {
        let dir = TempDir::new().unwrap();
        let collab = Collaborators {
            clock: &clock(),
            verses: &NoVerses,
            printer: None,
        };
        let report = run(dir.path(), &Config::default(), RunOptions::default(), &collab).unwrap();
        assert!(!report.success());
        assert_eq!(report.stages.len(), 1);
        assert_eq!(report.stages[0].status, StageStatus::Error);
    }

    #[test]
    fn check_reports_missing_anchor() {
        let agenda = fixtures::AGENDA.replace("Devotional Thought - ", "Thought for the Day - ");
        let (dir, config) = project(&agenda);

        let report = check(dir.path(), &config, fixtures::dates()).unwrap();
        assert!(report.last_agenda_found);
        assert!(report.problems.is_empty(), "{:?}", report.problems);
        assert_eq!(report.missing_anchors, vec!["devotional_thought".to_string()]);
        assert!(!report.is_ready());
    }

    #[test]
    fn check_reports_missing_print_command() {
        let (dir, mut config) = project(fixtures::AGENDA);
        config.print.enabled = true;
        config.print.command = "no-such-print-command-xyz".to_string();

        let report = check(dir.path(), &config, fixtures::dates()).unwrap();
        assert_eq!(report.print_command_found, Some(false));
        assert!(report.missing_anchors.is_empty());
        assert!(!report.is_ready());

        config.print.enabled = false;
        let report = check(dir.path(), &config, fixtures::dates()).unwrap();
        assert_eq!(report.print_command_found, None);
        assert!(report.is_ready());
    }

    #[test]
    fn check_without_agenda() {
        let dir = TempDir::new().unwrap();
        let report = check(dir.path(), &Config::default(), fixtures::dates()).unwrap();
        assert!(!report.last_agenda_found);
        assert_eq!(report.problems.len(), 6);
        assert!(matches!(
            Workspace::new(dir.path(), &Config::default()).read_last_agenda(&fixtures::dates()),
            Err(AgendaError::MissingAgenda(_))
        ));
    }
}
