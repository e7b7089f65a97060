use anyhow::Result;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

use crate::config::Config;
use crate::elevation::OsPrivilege;
use crate::error::Error;
use crate::mutate::TargetDirectory;
use crate::notify::{ConsoleNotifier, Notifier};
use crate::output::{self, JsonReport, OutputMode};
use crate::run::{self, ElevationPolicy, RunOptions, RunOutcome};
use crate::store;
use crate::theme::Theme;

#[derive(Parser)]
#[command(name = "pathadd")]
#[command(version)]
#[command(about = "Add a directory to the machine-wide PATH")]
#[command(
    long_about = "pathadd appends a directory to the machine-wide PATH and reports the \
    outcome. Adding is idempotent: a directory already on the PATH is left alone and \
    nothing is written. When the process lacks administrator rights it relaunches \
    itself with an elevation prompt (configurable).\n\n\
    Examples:\n  \
    pathadd C:\\Tools\\bin        # Add a directory to the machine PATH\n  \
    pathadd                     # Add the directory this executable runs from\n  \
    pathadd -n /opt/tool/bin    # Show what would change without writing\n  \
    pathadd --json /srv/bin     # Machine-readable outcome for scripting"
)]
pub struct Cli {
    /// Directory to add; defaults to the directory this executable runs from
    pub directory: Option<PathBuf>,

    /// Decide and report without writing or elevating
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Output the outcome as JSON for scripting
    #[arg(long)]
    pub json: bool,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let output_mode = OutputMode::from_flags(self.quiet, self.verbose);
        let config = Config::load();

        let target = match self.directory.clone() {
            Some(dir) => TargetDirectory::from_argument(dir),
            None => TargetDirectory::from_executable_dir()?,
        };

        let policy = if config.elevation.auto_relaunch {
            ElevationPolicy::Relaunch
        } else {
            ElevationPolicy::Refuse
        };
        let options = RunOptions {
            policy,
            dry_run: self.dry_run,
        };

        let store = store::system_store(&config);
        // Forward the original arguments so an elevated child repeats the
        // same request.
        let forwarded: Vec<String> = std::env::args().skip(1).collect();

        match run::execute(&OsPrivilege, store.as_ref(), &target, &forwarded, options) {
            Ok(outcome) => {
                self.report_outcome(&outcome, output_mode);
                Ok(())
            }
            Err(err) => {
                self.report_error(&err, &target.display_string());
                std::process::exit(1);
            }
        }
    }

    fn report_outcome(&self, outcome: &RunOutcome, mode: OutputMode) {
        let (status, message, kind, directory, list) = match outcome {
            RunOutcome::Relaunched => (
                "Elevation requested",
                "Continuing in an elevated instance.".to_string(),
                "relaunched",
                String::new(),
                None,
            ),
            RunOutcome::AlreadyPresent { directory } => (
                "Already in system PATH",
                format!("Path: {directory}"),
                "already-present",
                directory.clone(),
                None,
            ),
            RunOutcome::Added { directory, list } if self.dry_run => (
                "Dry run",
                format!("Would add '{directory}' to the system PATH."),
                "would-add",
                directory.clone(),
                Some(list),
            ),
            RunOutcome::Added { directory, list } => (
                "Added to system PATH",
                format!("Path: {directory}"),
                "added",
                directory.clone(),
                Some(list),
            ),
        };

        if self.json {
            output::print_json(&JsonReport {
                outcome: kind,
                directory,
                message,
            });
            return;
        }

        if mode == OutputMode::Quiet {
            return;
        }
        ConsoleNotifier::stdout().notify(status, &message);
        if let Some(list) = list {
            output::print_path_list(list, mode);
        }
    }

    fn report_error(&self, err: &Error, directory: &str) {
        let message = err.to_string();

        if self.json {
            output::print_json(&JsonReport {
                outcome: "failed",
                directory: directory.to_string(),
                message,
            });
            return;
        }

        // Errors go to stderr and stay visible in quiet mode.
        ConsoleNotifier::stderr().notify(err.status(), &message);
        if matches!(err, Error::InsufficientPrivilege) && !self.quiet {
            let rerun = if cfg!(windows) {
                format!("Start-Process pathadd -Verb RunAs -ArgumentList '{directory}'")
            } else {
                format!("pkexec pathadd {directory}")
            };
            eprintln!("  {}", Theme::muted("To add it anyway, rerun elevated:"));
            eprintln!("  {}", Theme::command(&rerun));
        }
    }
}
