use crate::output::{print_json, print_table};
use agenda_core::config::{Config, WarnLevel};
use agenda_core::pipeline;
use anyhow::Context;
use chrono::NaiveDate;
use std::path::Path;

pub fn run(root: &Path, today: Option<NaiveDate>, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    let warnings = config.validate();
    let dates = super::week_dates(today);
    let report = pipeline::check(root, &config, dates).context("failed to read reference documents")?;

    if json {
        let value = serde_json::json!({
            "config_warnings": warnings,
            "check": report,
            "ready": report.is_ready(),
        });
        print_json(&value)?;
    } else {
        println!("Week: {dates}");
        println!();

        let rows: Vec<Vec<String>> = report
            .corpus
            .iter()
            .map(|s| vec![s.document.to_string(), s.entries.to_string()])
            .collect();
        print_table(&["DOCUMENT", "ENTRIES"], &rows);

        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
        for p in &report.problems {
            println!("[problem] {}: {}", p.document, p.message);
        }

        println!();
        if report.last_agenda_found {
            println!("Last agenda: {}", report.last_agenda.display());
            if report.missing_anchors.is_empty() {
                println!("All anchors present.");
            } else {
                println!("Missing anchors: {}", report.missing_anchors.join(", "));
            }
        } else {
            println!("Last agenda: not found ({})", report.last_agenda.display());
        }
        if report.print_command_found == Some(false) {
            println!("Print command '{}' not found on PATH", config.print.command);
        }
    }

    if !report.is_ready() {
        anyhow::bail!("agenda is not ready to run");
    }
    Ok(())
}
