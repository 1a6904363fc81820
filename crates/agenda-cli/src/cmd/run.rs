use crate::output::{print_json, print_table};
use agenda_core::config::Config;
use agenda_core::pipeline::{self, Collaborators, RunOptions};
use agenda_core::print::LpPrinter;
use agenda_core::verse::{HttpVerseLookup, NoVerses, VerseLookup};
use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;
use std::path::Path;

#[derive(Args)]
pub struct RunArgs {
    /// Pretend today is this date (YYYY-MM-DD)
    #[arg(long, value_parser = super::parse_date)]
    today: Option<NaiveDate>,

    /// Rotate in memory and print the result; write nothing
    #[arg(long)]
    dry_run: bool,

    /// Skip the verse lookup even if enabled in agenda.yaml
    #[arg(long)]
    no_verses: bool,

    /// Print the agenda even if printing is disabled in agenda.yaml
    #[arg(long)]
    print: bool,
}

pub fn run(root: &Path, args: RunArgs, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;

    let options = RunOptions {
        dry_run: args.dry_run,
        verses: config.verses.enabled && !args.no_verses && !args.dry_run,
        print: (args.print || config.print.enabled) && !args.dry_run,
    };

    let http;
    let verses: &dyn VerseLookup = if options.verses {
        http = HttpVerseLookup::new(&config.verses).context("failed to set up verse lookup")?;
        &http
    } else {
        &NoVerses
    };
    let printer = LpPrinter::new(&config.print.command);
    let clock = super::clock(args.today);
    let collab = Collaborators {
        clock: clock.as_ref(),
        verses,
        printer: Some(&printer),
    };

    let report = pipeline::run(root, &config, options, &collab).context("run failed")?;

    if json {
        let value = serde_json::json!({
            "success": report.success(),
            "report": report,
            "agenda": args.dry_run.then_some(&report.agenda),
        });
        print_json(&value)?;
    } else {
        if args.dry_run {
            print!("{}", report.agenda);
            println!();
        }
        println!("Week: {}", report.dates);
        let rows: Vec<Vec<String>> = report
            .stages
            .iter()
            .map(|s| vec![s.stage.clone(), s.status.as_str().to_string(), s.detail.clone()])
            .collect();
        print_table(&["STAGE", "STATUS", "DETAIL"], &rows);
        if let Some(path) = &report.output_path {
            println!("\nAgenda written to {}", path.display());
        }
    }

    if !report.success() {
        anyhow::bail!("one or more stages failed");
    }
    Ok(())
}
