//! Shared fixtures for build integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use strata_build::{
    BuildError, BuildReport, Invocation, LibraryFlags, LibraryResolver, Orchestrator, Toolchain,
};
use strata_config::{load_config, Profile};
use tempfile::TempDir;

static CLOCK: AtomicU64 = AtomicU64::new(0);

/// Returns a modification time later than every previous one.
///
/// Filesystem timestamps can be coarser than the time between two writes in a
/// test, so every fixture write gets an explicit, strictly increasing time.
pub fn tick() -> SystemTime {
    let step = CLOCK.fetch_add(1, Ordering::SeqCst);
    UNIX_EPOCH + Duration::from_secs(1_700_000_000 + step)
}

/// Writes `path`, creating parent directories, stamped with [`tick`].
pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(tick())
        .unwrap();
}

/// A toolchain that records each step and writes the files it would produce.
#[derive(Debug, Default)]
pub struct FakeToolchain {
    pub calls: Vec<Invocation>,
    /// Compiling this source fails with exit code 1.
    pub fail_on: Option<PathBuf>,
}

impl FakeToolchain {
    pub fn failing_on(source: PathBuf) -> Self {
        Self {
            fail_on: Some(source),
            ..Self::default()
        }
    }

    /// Short descriptions of each recorded step, e.g. `module core.cpp`.
    pub fn steps(&self) -> Vec<String> {
        self.calls.iter().map(describe).collect()
    }
}

impl Toolchain for FakeToolchain {
    fn invoke(&mut self, invocation: &Invocation) -> Result<(), BuildError> {
        if let Invocation::CompileObject { source, .. } | Invocation::CompileModule { source, .. } =
            invocation
        {
            if self.fail_on.as_ref() == Some(source) {
                return Err(BuildError::CommandFailed {
                    command: format!("g++ -c {}", source.display()),
                    code: Some(1),
                });
            }
        }
        self.calls.push(invocation.clone());
        for output in invocation.outputs() {
            write_file(output, "artifact");
        }
        Ok(())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().into_owned()
}

fn describe(invocation: &Invocation) -> String {
    match invocation {
        Invocation::CompileObject { source, .. } => format!("compile {}", file_name(source)),
        Invocation::CompileModule { source, .. } => format!("module {}", file_name(source)),
        Invocation::CompileHeaderModule { header, .. } => format!("header {header}"),
        Invocation::BuildExecutable { source, .. } => format!("lone {}", file_name(source)),
        Invocation::Link { executable, .. } => format!("link {}", file_name(executable)),
    }
}

/// A library resolver answering from a fixed table.
#[derive(Debug, Default)]
pub struct FakeLibraries {
    flags: HashMap<String, LibraryFlags>,
    pub queried: Vec<String>,
}

impl FakeLibraries {
    pub fn with(mut self, library: &str, compile: &[&str], link: &[&str]) -> Self {
        self.flags.insert(
            library.to_string(),
            LibraryFlags {
                compile: compile.iter().map(|s| s.to_string()).collect(),
                link: link.iter().map(|s| s.to_string()).collect(),
            },
        );
        self
    }
}

impl LibraryResolver for FakeLibraries {
    fn resolve(&mut self, library: &str) -> Result<LibraryFlags, BuildError> {
        self.queried.push(library.to_string());
        self.flags
            .get(library)
            .cloned()
            .ok_or_else(|| BuildError::Library {
                library: library.to_string(),
                query: "--cflags".to_string(),
                reason: format!("Package {library} was not found"),
            })
    }
}

/// A temporary project directory holding `strata.toml` and every declared
/// source file.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn new(config: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("strata.toml"), config).unwrap();
        let project = Self { dir };

        let parsed = load_config(project.root()).unwrap();
        for primary in &parsed.primaries {
            for source in &primary.sources {
                project.touch(&format!("src/{}/{source}", primary.name));
            }
        }
        for group in &parsed.lone {
            for source in &group.sources {
                project.touch(&format!("src/{}/{source}", group.group));
            }
        }
        project
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Rewrites a file so it is newer than everything written before.
    pub fn touch(&self, relative: &str) {
        write_file(&self.path(relative), "// source");
    }

    pub fn orchestrator(&self, profile: Profile) -> Orchestrator {
        let config = load_config(self.root()).unwrap();
        Orchestrator::new(config, self.root(), profile).unwrap()
    }

    /// Runs a debug build in a fresh session.
    pub fn build(
        &self,
        toolchain: &mut FakeToolchain,
        libraries: &mut FakeLibraries,
    ) -> Result<BuildReport, BuildError> {
        self.orchestrator(Profile::Debug).build(toolchain, libraries)
    }

    /// Runs a debug build with a fresh toolchain and no libraries, returning
    /// the steps taken.
    pub fn build_steps(&self) -> Vec<String> {
        let mut toolchain = FakeToolchain::default();
        self.build(&mut toolchain, &mut FakeLibraries::default())
            .unwrap();
        toolchain.steps()
    }
}
