//! Compiler and linker invocation.
//!
//! The scheduler describes what it needs as an [`Invocation`]; a
//! [`Toolchain`] carries it out. [`CommandToolchain`] runs the configured
//! compiler driver as a blocking subprocess, one at a time.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use strata_config::{ResolvedProfile, ToolchainConfig};

use crate::error::BuildError;

/// One compiler or linker step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Compile a source file to an object file.
    CompileObject {
        /// The source file.
        source: PathBuf,
        /// The object file to write.
        object: PathBuf,
        /// Flags added after the standard compile flags.
        extra_flags: Vec<String>,
    },
    /// Compile a primary module file, writing its object and interface.
    CompileModule {
        /// The primary module file.
        source: PathBuf,
        /// The object file to write.
        object: PathBuf,
        /// The interface artifact the compiler writes alongside.
        interface: PathBuf,
        /// Flags added after the standard compile flags.
        extra_flags: Vec<String>,
    },
    /// Precompile an external header as a module interface.
    CompileHeaderModule {
        /// The header name (e.g. `iostream`).
        header: String,
        /// The interface artifact the compiler writes into the module cache.
        interface: PathBuf,
    },
    /// Compile and link a single source straight to an executable.
    BuildExecutable {
        /// The source file.
        source: PathBuf,
        /// The executable to write.
        executable: PathBuf,
    },
    /// Link object files into an executable.
    Link {
        /// Objects in link-line order.
        objects: Vec<PathBuf>,
        /// The executable to write.
        executable: PathBuf,
        /// Library link flags appended after the standard link flags.
        link_flags: Vec<String>,
    },
}

impl Invocation {
    /// Returns the files this step writes.
    pub fn outputs(&self) -> Vec<&Path> {
        match self {
            Invocation::CompileObject { object, .. } => vec![object.as_path()],
            Invocation::CompileModule {
                object, interface, ..
            } => vec![object.as_path(), interface.as_path()],
            Invocation::CompileHeaderModule { interface, .. } => vec![interface.as_path()],
            Invocation::BuildExecutable { executable, .. }
            | Invocation::Link { executable, .. } => vec![executable.as_path()],
        }
    }
}

/// Executes compiler and linker steps.
pub trait Toolchain {
    /// Runs `invocation` to completion. Any failure aborts the build.
    fn invoke(&mut self, invocation: &Invocation) -> Result<(), BuildError>;
}

/// A [`Toolchain`] that runs a GCC-style compiler driver.
#[derive(Debug, Clone)]
pub struct CommandToolchain {
    compiler: String,
    /// Standard compile flags plus the header search path.
    compile_flags: Vec<OsString>,
    profile_flags: Vec<String>,
    link_flags: Vec<String>,
    system_header_flag: String,
    working_dir: Option<PathBuf>,
}

impl CommandToolchain {
    /// Creates a toolchain from the `[toolchain]` table, the selected profile
    /// and the project's header directory.
    pub fn new(config: &ToolchainConfig, profile: &ResolvedProfile, headers_dir: &Path) -> Self {
        let mut compile_flags: Vec<OsString> = config.flags.iter().map(OsString::from).collect();
        let mut include = OsString::from("-I");
        include.push(headers_dir);
        compile_flags.push(include);

        Self {
            compiler: config.compiler.clone(),
            compile_flags,
            profile_flags: profile.flags.clone(),
            link_flags: config.link_flags.clone(),
            system_header_flag: config.system_header_flag.clone(),
            working_dir: None,
        }
    }

    /// Runs every command from `dir`.
    ///
    /// The compiler writes module interfaces into a cache relative to its
    /// working directory, so this should be the project root.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Builds the full argument vector for `invocation`, program first.
    pub fn command_line(&self, invocation: &Invocation) -> Vec<OsString> {
        let mut args = vec![OsString::from(&self.compiler)];
        match invocation {
            Invocation::CompileObject {
                source,
                object,
                extra_flags,
            }
            | Invocation::CompileModule {
                source,
                object,
                extra_flags,
                ..
            } => {
                args.extend(self.profile_flags.iter().map(OsString::from));
                args.extend(self.compile_flags.iter().cloned());
                args.extend(extra_flags.iter().map(OsString::from));
                args.push("-c".into());
                args.push(source.into());
                args.push("-o".into());
                args.push(object.into());
            }
            Invocation::CompileHeaderModule { header, .. } => {
                args.extend(self.compile_flags.iter().cloned());
                args.push(OsString::from(&self.system_header_flag));
                args.push(OsString::from(header));
            }
            Invocation::BuildExecutable { source, executable } => {
                args.extend(self.profile_flags.iter().map(OsString::from));
                args.extend(self.compile_flags.iter().cloned());
                args.extend(self.link_flags.iter().map(OsString::from));
                args.push(source.into());
                args.push("-o".into());
                args.push(executable.into());
            }
            Invocation::Link {
                objects,
                executable,
                link_flags,
            } => {
                args.extend(self.profile_flags.iter().map(OsString::from));
                args.extend(self.link_flags.iter().map(OsString::from));
                args.extend(link_flags.iter().map(OsString::from));
                args.extend(objects.iter().map(OsString::from));
                args.push("-o".into());
                args.push(executable.into());
            }
        }
        args
    }
}

impl Toolchain for CommandToolchain {
    fn invoke(&mut self, invocation: &Invocation) -> Result<(), BuildError> {
        let args = self.command_line(invocation);
        let rendered = render(&args);
        tracing::info!("* {rendered}");

        let mut command = Command::new(&args[0]);
        command.args(&args[1..]);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        let status = command
            .status()
            .map_err(|source| BuildError::Spawn {
                program: self.compiler.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(BuildError::CommandFailed {
                command: rendered,
                code: status.code(),
            })
        }
    }
}

/// Joins an argument vector for display.
fn render(args: &[OsString]) -> String {
    args.iter()
        .map(|a| a.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
