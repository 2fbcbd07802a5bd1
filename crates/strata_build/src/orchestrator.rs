//! The top-level build entry point.
//!
//! [`Orchestrator::build`] runs one session: directory preparation, header
//! module bootstrap, lone units, then every target in declaration order.

use std::path::{Path, PathBuf};
use std::process::Command;

use strata_config::{resolve_target, Profile, ProjectConfig};
use strata_graph::PrimaryGraph;

use crate::bootstrap::bootstrap_modules;
use crate::error::BuildError;
use crate::layout::BuildLayout;
use crate::library::LibraryResolver;
use crate::linker::TargetLinker;
use crate::lone::build_lone_units;
use crate::report::BuildReport;
use crate::resolver::DependencyResolver;
use crate::scheduler::BuildScheduler;
use crate::session::{BuildPolicy, BuildSession};
use crate::toolchain::Toolchain;

/// A validated project ready to build for one profile.
#[derive(Debug)]
pub struct Orchestrator {
    config: ProjectConfig,
    graph: PrimaryGraph,
    layout: BuildLayout,
    profile: Profile,
}

impl Orchestrator {
    /// Prepares `config` rooted at `project_dir` for `profile`.
    ///
    /// Fails if the primary dependencies contain a cycle.
    pub fn new(
        config: ProjectConfig,
        project_dir: &Path,
        profile: Profile,
    ) -> Result<Self, BuildError> {
        let graph = PrimaryGraph::from_config(&config)?;
        let layout = BuildLayout::new(project_dir, &config, profile);
        Ok(Self {
            config,
            graph,
            layout,
            profile,
        })
    }

    /// The project configuration.
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// The build tree layout.
    pub fn layout(&self) -> &BuildLayout {
        &self.layout
    }

    /// The selected profile.
    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Runs one build session with a fresh [`BuildSession`].
    pub fn build(
        &self,
        toolchain: &mut dyn Toolchain,
        libraries: &mut dyn LibraryResolver,
    ) -> Result<BuildReport, BuildError> {
        let mut session = BuildSession::new(BuildPolicy::from_config(&self.config.build));
        self.build_in(&mut session, toolchain, libraries)
    }

    /// Runs the build steps against an existing session.
    pub fn build_in(
        &self,
        session: &mut BuildSession,
        toolchain: &mut dyn Toolchain,
        libraries: &mut dyn LibraryResolver,
    ) -> Result<BuildReport, BuildError> {
        self.layout.create_directories(
            self.config.primaries.iter().map(|p| p.name.as_str()),
        )?;

        let bootstrapped =
            bootstrap_modules(&self.layout, &self.config.bootstrap.modules, toolchain)?;
        let lone_executables = build_lone_units(&self.layout, &self.config.lone, toolchain)?;

        let resolver = DependencyResolver::new(&self.config, &self.layout);
        let linker = TargetLinker::new(BuildScheduler::new(&self.graph, resolver));
        let outcomes = linker.link_all(session, toolchain, libraries, &self.config.targets)?;

        let (relinked, up_to_date): (Vec<_>, Vec<_>) =
            outcomes.into_iter().partition(|outcome| outcome.relinked);
        let rebuilt_primaries = self
            .graph
            .topological_order()
            .filter(|primary| session.is_updated(primary))
            .map(str::to_string)
            .collect();

        let report = BuildReport {
            profile: self.profile.to_string(),
            bootstrapped,
            lone_executables,
            compiled: session.compiled().to_vec(),
            rebuilt_primaries,
            relinked: relinked.into_iter().map(|o| o.name).collect(),
            up_to_date: up_to_date.into_iter().map(|o| o.name).collect(),
        };
        tracing::debug!(
            checked = session.checked_count(),
            updated = session.updated_count(),
            "session finished"
        );
        Ok(report)
    }

    /// Returns the executable of `target`, which must exist after a build.
    pub fn executable_for(&self, target: &str) -> Result<PathBuf, BuildError> {
        let target = resolve_target(&self.config, target)?;
        let path = self.layout.executable_path(&target.name);
        if !path.exists() {
            return Err(BuildError::MissingArtifact { path });
        }
        Ok(path)
    }
}

/// Runs `path` with inherited stdio and waits for it.
///
/// The program's exit status is returned for logging only; a non-zero exit
/// is not an error.
pub fn run_executable(path: &Path) -> Result<Option<i32>, BuildError> {
    tracing::info!("* {}", path.display());
    let status = Command::new(path)
        .status()
        .map_err(|source| BuildError::Spawn {
            program: path.display().to_string(),
            source,
        })?;
    if !status.success() {
        tracing::warn!(status = %status, "{} exited unsuccessfully", path.display());
    }
    Ok(status.code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_config::{load_config_from_str, ConfigError};
    use strata_graph::GraphError;

    #[test]
    fn cycle_is_rejected_before_building() {
        let config = load_config_from_str(
            r#"
[project]
name = "cyclic"

[[primary]]
name = "a"
sources = ["a.cpp"]
deps = ["b"]

[[primary]]
name = "b"
sources = ["b.cpp"]
deps = ["a"]
"#,
        )
        .unwrap();
        let err = Orchestrator::new(config, Path::new("/nonexistent"), Profile::Debug).unwrap_err();
        match err {
            BuildError::Graph(GraphError::Cycle { members }) => {
                assert_eq!(members, vec!["a", "b"]);
            }
            other => panic!("expected cycle error, got {other:?}"),
        }
    }

    #[test]
    fn executable_for_unknown_target() {
        let config = load_config_from_str("[project]\nname = \"demo\"\n").unwrap();
        let orchestrator =
            Orchestrator::new(config, Path::new("/nonexistent"), Profile::Debug).unwrap();
        let err = orchestrator.executable_for("wc").unwrap_err();
        assert!(matches!(
            err,
            BuildError::Config(ConfigError::UnknownTarget(ref name)) if name == "wc"
        ));
    }

    #[test]
    fn executable_for_missing_executable() {
        let config = load_config_from_str(
            r#"
[project]
name = "demo"

[[primary]]
name = "core"
sources = ["core.cpp"]

[[target]]
name = "exe"
primaries = ["core"]
"#,
        )
        .unwrap();
        let orchestrator =
            Orchestrator::new(config, Path::new("/nonexistent"), Profile::Release).unwrap();
        let err = orchestrator.executable_for("exe").unwrap_err();
        assert!(matches!(err, BuildError::MissingArtifact { .. }));
        assert_eq!(
            err.to_string(),
            "file /nonexistent/build/release/exe doesn't exist after a successful build"
        );
    }

    #[test]
    fn run_executable_ignores_exit_status() {
        assert_eq!(run_executable(Path::new("false")).unwrap(), Some(1));
        assert_eq!(run_executable(Path::new("true")).unwrap(), Some(0));
    }
}
