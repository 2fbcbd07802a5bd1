//! Target building and relinking.

use strata_config::{RelinkScope, TargetConfig};

use crate::error::BuildError;
use crate::library::{LibraryFlags, LibraryResolver};
use crate::scheduler::BuildScheduler;
use crate::session::BuildSession;
use crate::toolchain::{Invocation, Toolchain};

/// What happened to one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOutcome {
    /// The target name.
    pub name: String,
    /// Whether the executable was relinked.
    pub relinked: bool,
}

/// Builds the primaries of each target and relinks its executable.
#[derive(Debug, Clone, Copy)]
pub struct TargetLinker<'a> {
    scheduler: BuildScheduler<'a>,
}

impl<'a> TargetLinker<'a> {
    /// Creates a linker driving `scheduler`.
    pub fn new(scheduler: BuildScheduler<'a>) -> Self {
        Self { scheduler }
    }

    /// Builds and, if needed, relinks every target in declaration order.
    ///
    /// Stops at the first error; targets after a failing one are not touched.
    pub fn link_all(
        &self,
        session: &mut BuildSession,
        toolchain: &mut dyn Toolchain,
        libraries: &mut dyn LibraryResolver,
        targets: &[TargetConfig],
    ) -> Result<Vec<LinkOutcome>, BuildError> {
        targets
            .iter()
            .map(|target| self.link_target(session, toolchain, libraries, target))
            .collect()
    }

    /// Builds the primaries of `target` and relinks it if needed.
    ///
    /// The target relinks when its executable is missing, or when the
    /// session's relink scope sees a rebuilt primary: any primary at all for
    /// [`RelinkScope::Session`], one of the target's own for
    /// [`RelinkScope::Target`].
    pub fn link_target(
        &self,
        session: &mut BuildSession,
        toolchain: &mut dyn Toolchain,
        libraries: &mut dyn LibraryResolver,
        target: &TargetConfig,
    ) -> Result<LinkOutcome, BuildError> {
        let mut flags = LibraryFlags::default();
        for library in &target.libraries {
            flags.extend(libraries.resolve(library)?);
        }

        let resolver = self.scheduler.resolver();
        let propagate = session.policy().rebuild_dependents;
        for primary in &target.primaries {
            let work = resolver.resolve(session, primary)?;
            if !work.is_empty() || propagate {
                self.scheduler
                    .build_primary(session, toolchain, primary, work, &flags.compile)?;
            }
        }

        let executable = resolver.layout().executable_path(&target.name);
        let relink = if !executable.exists() {
            tracing::debug!(name = %target.name, "executable is missing");
            true
        } else {
            match session.policy().relink {
                RelinkScope::Session => session.any_updated(),
                RelinkScope::Target => target.primaries.iter().any(|p| session.is_updated(p)),
            }
        };

        if !relink {
            tracing::debug!(name = %target.name, "up to date");
            return Ok(LinkOutcome {
                name: target.name.clone(),
                relinked: false,
            });
        }

        let mut objects = Vec::new();
        for primary in &target.primaries {
            let config = resolver.primary(primary)?;
            objects.extend(
                resolver
                    .layout()
                    .source_units(config)
                    .into_iter()
                    .map(|unit| unit.object),
            );
        }

        tracing::info!(name = %target.name, "linking");
        toolchain.invoke(&Invocation::Link {
            objects,
            executable,
            link_flags: flags.link,
        })?;

        Ok(LinkOutcome {
            name: target.name.clone(),
            relinked: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};

    use strata_config::{load_config_from_str, Profile};
    use strata_graph::PrimaryGraph;

    use crate::layout::BuildLayout;
    use crate::resolver::DependencyResolver;
    use crate::session::BuildPolicy;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Invocation>,
    }

    impl Toolchain for Recorder {
        fn invoke(&mut self, invocation: &Invocation) -> Result<(), BuildError> {
            self.calls.push(invocation.clone());
            Ok(())
        }
    }

    struct Libraries(HashMap<&'static str, LibraryFlags>);

    impl LibraryResolver for Libraries {
        fn resolve(&mut self, library: &str) -> Result<LibraryFlags, BuildError> {
            self.0
                .get(library)
                .cloned()
                .ok_or_else(|| BuildError::Library {
                    library: library.to_string(),
                    query: "--cflags".to_string(),
                    reason: "not found".to_string(),
                })
        }
    }

    const CONFIG: &str = r#"
[project]
name = "demo"

[[primary]]
name = "core"
module = true
sources = ["core.cpp", "extra.cpp"]

[[primary]]
name = "app"
sources = ["app.cpp"]
deps = ["core"]

[[target]]
name = "exe"
libraries = ["readline"]
primaries = ["app", "core"]

[[target]]
name = "broken"
libraries = ["missing"]
primaries = ["core"]
"#;

    fn libraries() -> Libraries {
        Libraries(HashMap::from([(
            "readline",
            LibraryFlags {
                compile: vec!["-I/usr/include/readline".to_string()],
                link: vec!["-lreadline".to_string()],
            },
        )]))
    }

    #[test]
    fn builds_dependencies_then_links_in_declared_order() {
        let config = load_config_from_str(CONFIG).unwrap();
        let graph = PrimaryGraph::from_config(&config).unwrap();
        let layout = BuildLayout::new(Path::new("/nonexistent/strata"), &config, Profile::Debug);
        let linker = TargetLinker::new(BuildScheduler::new(
            &graph,
            DependencyResolver::new(&config, &layout),
        ));
        let mut session = BuildSession::new(BuildPolicy::default());
        let mut toolchain = Recorder::default();

        let outcome = linker
            .link_target(&mut session, &mut toolchain, &mut libraries(), &config.targets[0])
            .unwrap();
        assert!(outcome.relinked);
        assert_eq!(toolchain.calls.len(), 4);

        match &toolchain.calls[0] {
            Invocation::CompileModule { extra_flags, .. } => {
                assert_eq!(extra_flags, &["-I/usr/include/readline".to_string()]);
            }
            other => panic!("expected module compile first, got {other:?}"),
        }
        assert_eq!(
            toolchain.calls[3],
            Invocation::Link {
                objects: vec![
                    PathBuf::from("/nonexistent/strata/build/debug/objects/app/app.o"),
                    PathBuf::from("/nonexistent/strata/build/debug/objects/core/core.o"),
                    PathBuf::from("/nonexistent/strata/build/debug/objects/core/extra.o"),
                ],
                executable: PathBuf::from("/nonexistent/strata/build/debug/exe"),
                link_flags: vec!["-lreadline".to_string()],
            }
        );
    }

    #[test]
    fn library_failure_stops_before_compiling() {
        let config = load_config_from_str(CONFIG).unwrap();
        let graph = PrimaryGraph::from_config(&config).unwrap();
        let layout = BuildLayout::new(Path::new("/nonexistent/strata"), &config, Profile::Debug);
        let linker = TargetLinker::new(BuildScheduler::new(
            &graph,
            DependencyResolver::new(&config, &layout),
        ));
        let mut session = BuildSession::default();
        let mut toolchain = Recorder::default();

        let err = linker
            .link_all(&mut session, &mut toolchain, &mut libraries(), &config.targets[1..])
            .unwrap_err();
        assert!(matches!(err, BuildError::Library { ref library, .. } if library == "missing"));
        assert!(toolchain.calls.is_empty());
        assert_eq!(session.checked_count(), 0);
    }
}
