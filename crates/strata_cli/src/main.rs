//! Strata CLI: the command-line interface of the strata build orchestrator.
//!
//! A single invocation builds every target of the project in the selected
//! profile and can then run one of the built executables.

#![warn(missing_docs)]

mod build;
mod pipeline;

use std::process;

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};

/// Strata: incremental builds for module-based C++ projects.
#[derive(Parser, Debug)]
#[command(name = "strata", version, about = "Strata build orchestrator")]
pub struct Cli {
    /// Build the release profile instead of debug.
    #[arg(long)]
    pub release: bool,

    /// Run the named target's executable after a successful build.
    #[arg(long, value_name = "TARGET")]
    pub run: Option<String>,

    /// Configuration file to load, or a directory containing `strata.toml`.
    #[arg(long)]
    pub config: Option<String>,

    /// Suppress all output except errors.
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format of the build summary.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Build summary output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable lines on stderr.
    Text,
    /// Machine-readable JSON on stdout.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
    /// Build summary format.
    pub format: ReportFormat,
}

/// Exit code after printing help.
const EXIT_HELP: i32 = 1;
/// Exit code of every failed invocation.
const EXIT_FAILURE: i32 = 2;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = parse_exit_code(e.kind());
            let _ = e.print();
            process::exit(code);
        }
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config.clone(),
        format: cli.format,
    };
    pipeline::init_tracing(&global);

    match build::run(&cli, &global) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(EXIT_FAILURE);
        }
    }
}

/// Maps a command-line parse outcome to the process exit code.
fn parse_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => EXIT_HELP,
        ErrorKind::DisplayVersion => 0,
        _ => EXIT_FAILURE,
    }
}
