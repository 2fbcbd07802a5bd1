//! The build command: load the project, build every target, optionally run one.

use strata_build::{run_executable, CommandToolchain, Orchestrator, PkgConfig};
use strata_config::{load_config_file, resolve_profile, Profile};

use crate::pipeline::{locate_project, render_report};
use crate::{Cli, GlobalArgs};

/// Runs one build session.
///
/// Steps: locate and load the configuration file, build with the
/// process-backed toolchain and `pkg-config`, print the summary, then run
/// the `--run` target if one was given. Returns exit code 0 on success;
/// every failure is returned as an error.
pub fn run(cli: &Cli, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    // Commands run from the project root, so every path handed to them must
    // be absolute.
    let cwd = std::path::absolute(std::env::current_dir()?)?;
    let project = locate_project(global.config.as_deref(), &cwd)?;
    tracing::debug!(
        root = %project.root.display(),
        config = %project.config_file.display(),
        "project located"
    );
    let config = load_config_file(&project.config_file)?;

    let profile = if cli.release {
        Profile::Release
    } else {
        Profile::Debug
    };
    let orchestrator = Orchestrator::new(config, &project.root, profile)?;
    let config = orchestrator.config();

    if !global.quiet {
        eprintln!(
            "   Building {} v{} ({})",
            config.project.name,
            config.project.version,
            orchestrator.profile()
        );
    }

    let resolved = resolve_profile(config, orchestrator.profile());
    let mut toolchain =
        CommandToolchain::new(&config.toolchain, &resolved, orchestrator.layout().headers_dir())
            .with_working_dir(&project.root);
    let mut libraries = PkgConfig::new(config.toolchain.library_resolver.clone());

    let report = orchestrator.build(&mut toolchain, &mut libraries)?;
    render_report(&report, global)?;

    if let Some(target) = &cli.run {
        let executable = orchestrator.executable_for(target)?;
        run_executable(&executable)?;
    }

    Ok(0)
}
