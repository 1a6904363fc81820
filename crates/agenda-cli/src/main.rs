mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, run::RunArgs};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "agenda",
    about = "Prepare next week's prayer breakfast agenda by rotating last week's",
    version,
    propagate_version = true
)]
struct Cli {
    /// Agenda root (default: auto-detect from agenda.yaml)
    #[arg(long, global = true, env = "AGENDA_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write agenda.yaml and create the input and output directories
    Init,

    /// Show last and next meeting Saturday
    Dates {
        /// Pretend today is this date (YYYY-MM-DD)
        #[arg(long, value_parser = cmd::parse_date)]
        today: Option<chrono::NaiveDate>,
    },

    /// Check reference documents and last week's agenda without changing anything
    Check {
        /// Pretend today is this date (YYYY-MM-DD)
        #[arg(long, value_parser = cmd::parse_date)]
        today: Option<chrono::NaiveDate>,
    },

    /// Produce next week's agenda
    Run(RunArgs),

    /// Inspect and validate agenda.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Run(_) => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Dates { today } => cmd::dates::run(today, cli.json),
        Commands::Check { today } => cmd::check::run(&root, today, cli.json),
        Commands::Run(args) => cmd::run::run(&root, args, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
