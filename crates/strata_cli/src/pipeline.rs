//! Shared helpers for the CLI: locating the project, logging setup and
//! build summary rendering.

use std::path::{Path, PathBuf};

use strata_build::BuildReport;
use strata_config::CONFIG_FILE_NAME;

use crate::{GlobalArgs, ReportFormat};

/// Where a project's description lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFiles {
    /// The project root; layout directories and commands are relative to it.
    pub root: PathBuf,
    /// The configuration file to load.
    pub config_file: PathBuf,
}

/// Locates the configuration file and the project root.
///
/// An explicit `config` path naming a directory means `strata.toml` inside
/// it; any other path is the configuration file itself, whatever its name,
/// and its directory becomes the root. Without one, the nearest directory at
/// or above `cwd` holding `strata.toml` is the root. Relative paths resolve
/// against `cwd`, which must be absolute.
pub fn locate_project(
    config: Option<&str>,
    cwd: &Path,
) -> Result<ProjectFiles, Box<dyn std::error::Error>> {
    let files = match config {
        Some(path) => {
            let path = cwd.join(path);
            if path.is_dir() {
                ProjectFiles {
                    config_file: path.join(CONFIG_FILE_NAME),
                    root: path,
                }
            } else {
                ProjectFiles {
                    root: path.parent().unwrap_or(cwd).to_path_buf(),
                    config_file: path,
                }
            }
        }
        None => {
            let root = cwd
                .ancestors()
                .find(|dir| dir.join(CONFIG_FILE_NAME).is_file())
                .ok_or_else(|| {
                    format!(
                        "could not find {CONFIG_FILE_NAME} in {} or any parent directory",
                        cwd.display()
                    )
                })?;
            ProjectFiles {
                root: root.to_path_buf(),
                config_file: root.join(CONFIG_FILE_NAME),
            }
        }
    };

    if !files.config_file.is_file() {
        return Err(format!(
            "configuration file {} does not exist",
            files.config_file.display()
        )
        .into());
    }
    Ok(files)
}

/// Returns the log filter used when `RUST_LOG` is unset.
fn default_filter(global: &GlobalArgs) -> &'static str {
    if global.quiet {
        "error"
    } else if global.verbose {
        "debug"
    } else {
        "info"
    }
}

/// Installs the stderr log subscriber. `RUST_LOG` overrides the verbosity flags.
pub fn init_tracing(global: &GlobalArgs) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(global)));
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(filter)
        .init();
}

/// Prints the build summary in the selected format.
pub fn render_report(
    report: &BuildReport,
    global: &GlobalArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    match global.format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(report)?),
        ReportFormat::Text if !global.quiet => {
            for line in summary_lines(report) {
                eprintln!("{line}");
            }
        }
        ReportFormat::Text => {}
    }
    Ok(())
}

fn summary_lines(report: &BuildReport) -> Vec<String> {
    let mut lines = Vec::new();
    if !report.bootstrapped.is_empty() {
        lines.push(format!(
            "  Prepared {} header module(s): {}",
            report.bootstrapped.len(),
            report.bootstrapped.join(", ")
        ));
    }
    if !report.lone_executables.is_empty() {
        lines.push(format!(
            "     Built {} standalone executable(s)",
            report.lone_executables.len()
        ));
    }
    if !report.compiled.is_empty() {
        lines.push(format!(
            "  Compiled {} source(s) in {}",
            report.compiled.len(),
            report.rebuilt_primaries.join(", ")
        ));
    }
    if !report.relinked.is_empty() {
        lines.push(format!("    Linked {}", report.relinked.join(", ")));
    }
    if report.is_noop() {
        lines.push(format!("  Finished {} (up to date)", report.profile));
    } else {
        lines.push(format!("  Finished {}", report.profile));
    }
    lines
}
