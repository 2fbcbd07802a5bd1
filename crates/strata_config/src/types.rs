//! Configuration types deserialized from `strata.toml`.

use serde::Deserialize;
use std::fmt;

/// The top-level project configuration parsed from `strata.toml`.
///
/// Primaries, targets and lone groups are declared as arrays of tables
/// (`[[primary]]`, `[[target]]`, `[[lone]]`) so their declaration order is kept.
#[derive(Debug, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata.
    pub project: ProjectMeta,
    /// Directory layout, relative to the project root.
    #[serde(default)]
    pub layout: LayoutConfig,
    /// Compiler, linker and library resolver settings.
    #[serde(default)]
    pub toolchain: ToolchainConfig,
    /// Per-profile compilation flags.
    #[serde(default)]
    pub profile: ProfileTable,
    /// Scheduling policy knobs.
    #[serde(default)]
    pub build: BuildConfig,
    /// External header modules precompiled before the project build.
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
    /// Compilation units, in declaration order.
    #[serde(default, rename = "primary")]
    pub primaries: Vec<PrimaryConfig>,
    /// Linked executables, in declaration order.
    #[serde(default, rename = "target")]
    pub targets: Vec<TargetConfig>,
    /// Groups of standalone single-file executables.
    #[serde(default, rename = "lone")]
    pub lone: Vec<LoneGroupConfig>,
}

impl ProjectConfig {
    /// Looks up a primary by name.
    pub fn primary(&self, name: &str) -> Option<&PrimaryConfig> {
        self.primaries.iter().find(|p| p.name == name)
    }

    /// Looks up a target by name.
    pub fn target(&self, name: &str) -> Option<&TargetConfig> {
        self.targets.iter().find(|t| t.name == name)
    }
}

/// Core project metadata.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    pub name: String,
    /// The project version string.
    #[serde(default)]
    pub version: String,
}

/// Directory names making up the project tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Sources root; holds one subdirectory per primary and per lone group.
    pub sources: String,
    /// Header search root passed to every compile as `-I`.
    pub headers: String,
    /// Build root; each profile gets its own subdirectory.
    pub build: String,
    /// Objects directory name, nested under the profile's build directory.
    pub objects: String,
    /// Module interface cache shared by every profile.
    pub module_cache: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            sources: "src".to_string(),
            headers: "inc".to_string(),
            build: "build".to_string(),
            objects: "objects".to_string(),
            module_cache: "gcm.cache".to_string(),
        }
    }
}

/// Compiler driver settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// The compiler driver, also used for linking.
    pub compiler: String,
    /// Flags passed to every compilation (language standard, module support).
    pub flags: Vec<String>,
    /// Flags passed to every link.
    pub link_flags: Vec<String>,
    /// Flag selecting "compile this system header as a module interface".
    pub system_header_flag: String,
    /// Program queried for external library flags.
    pub library_resolver: String,
    /// Extension of project source files.
    pub source_extension: String,
    /// Extension of object artifacts.
    pub object_extension: String,
    /// Extension of module interface artifacts.
    pub interface_extension: String,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            compiler: "g++".to_string(),
            flags: vec![
                "-fdiagnostics-color=always".to_string(),
                "-std=c++23".to_string(),
                "-fmodules-ts".to_string(),
            ],
            link_flags: Vec::new(),
            system_header_flag: "-xc++-system-header".to_string(),
            library_resolver: "pkg-config".to_string(),
            source_extension: "cpp".to_string(),
            object_extension: "o".to_string(),
            interface_extension: "gcm".to_string(),
        }
    }
}

/// Flags for the `debug` and `release` profiles.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProfileTable {
    /// Flags for the default debug profile.
    pub debug: ProfileFlags,
    /// Flags for the optimized release profile.
    pub release: ProfileFlags,
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self {
            debug: ProfileFlags {
                flags: vec!["-g".to_string(), "-DDEBUG".to_string()],
            },
            release: ProfileFlags {
                flags: vec!["-DNDEBUG".to_string()],
            },
        }
    }
}

/// The flag set of one profile.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileFlags {
    /// Optimization and debug flags and defines.
    #[serde(default)]
    pub flags: Vec<String>,
}

/// Build profile selecting output directory and flag set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Profile {
    /// Debug build (default).
    #[default]
    Debug,
    /// Release build.
    Release,
}

impl Profile {
    /// Returns the directory name used for this profile's build tree.
    pub fn name(self) -> &'static str {
        match self {
            Profile::Debug => "debug",
            Profile::Release => "release",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scheduling policy settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Which rebuilt primaries force a target to relink.
    pub relink: RelinkScope,
    /// Recompile primaries whose dependencies were rebuilt in the session.
    pub rebuild_dependents: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            relink: RelinkScope::Session,
            rebuild_dependents: true,
        }
    }
}

/// Relink decision scope.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RelinkScope {
    /// Relink every target once any primary was rebuilt this session (default).
    #[default]
    Session,
    /// Relink only targets whose own primaries were rebuilt.
    Target,
}

/// External header modules compiled into the module cache.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BootstrapConfig {
    /// Path under the module cache where the compiler stores header units
    /// (e.g. `usr/include/c++/14.1.1`).
    #[serde(default)]
    pub header_root: String,
    /// Header names to precompile.
    #[serde(default)]
    pub modules: Vec<String>,
}

/// A compilation unit made of one or more source files.
#[derive(Debug, Clone, Deserialize)]
pub struct PrimaryConfig {
    /// Primary name; also the name of its subdirectory under the sources root.
    pub name: String,
    /// Whether the primary is a language module with an interface artifact.
    #[serde(default)]
    pub module: bool,
    /// Source file names, in compile order.
    pub sources: Vec<String>,
    /// Names of primaries this one depends on.
    #[serde(default)]
    pub deps: Vec<String>,
}

/// A linked executable.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Executable name.
    pub name: String,
    /// External libraries resolved through the library resolver.
    #[serde(default)]
    pub libraries: Vec<String>,
    /// Constituent primaries; their order is the link-line object order.
    pub primaries: Vec<String>,
}

/// A group of standalone single-file executables.
#[derive(Debug, Clone, Deserialize)]
pub struct LoneGroupConfig {
    /// Group name; also the subdirectory under the sources root.
    pub group: String,
    /// Source file names; each builds its own executable.
    pub sources: Vec<String>,
}
