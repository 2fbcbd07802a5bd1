//! Project and build tree paths.
//!
//! Maps primaries, lone units and bootstrap headers to the source and
//! artifact paths the scheduler reasons about. Object files and executables
//! live under a profile-specific build directory; module interfaces live in a
//! cache shared by every profile.

use std::path::{Path, PathBuf};

use strata_config::{LoneGroupConfig, PrimaryConfig, Profile, ProjectConfig};

use crate::error::BuildError;

/// One source file of a primary with its derived artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// The source file.
    pub source: PathBuf,
    /// The object file compiled from it.
    pub object: PathBuf,
    /// The module interface it produces, set only for the primary module
    /// file (a module primary's file whose basename is the primary name).
    pub interface: Option<PathBuf>,
}

/// A standalone single-file executable outside the primary graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoneUnit {
    /// The source file.
    pub source: PathBuf,
    /// The executable built from it.
    pub executable: PathBuf,
}

/// Resolved directory layout for one build profile.
#[derive(Debug, Clone)]
pub struct BuildLayout {
    sources_dir: PathBuf,
    headers_dir: PathBuf,
    build_dir: PathBuf,
    objects_dir: PathBuf,
    module_cache_dir: PathBuf,
    header_root: PathBuf,
    source_extension: String,
    object_extension: String,
    interface_extension: String,
}

impl BuildLayout {
    /// Resolves the layout of `config` rooted at `project_dir` for `profile`.
    pub fn new(project_dir: &Path, config: &ProjectConfig, profile: Profile) -> Self {
        let layout = &config.layout;
        let build_dir = project_dir.join(&layout.build).join(profile.name());
        Self {
            sources_dir: project_dir.join(&layout.sources),
            headers_dir: project_dir.join(&layout.headers),
            objects_dir: build_dir.join(&layout.objects),
            build_dir,
            module_cache_dir: project_dir.join(&layout.module_cache),
            header_root: PathBuf::from(&config.bootstrap.header_root),
            source_extension: config.toolchain.source_extension.clone(),
            object_extension: config.toolchain.object_extension.clone(),
            interface_extension: config.toolchain.interface_extension.clone(),
        }
    }

    /// The header search root.
    pub fn headers_dir(&self) -> &Path {
        &self.headers_dir
    }

    /// Returns the source units of `primary` in declared order.
    pub fn source_units(&self, primary: &PrimaryConfig) -> Vec<SourceUnit> {
        let primary_dir = self.sources_dir.join(&primary.name);
        primary
            .sources
            .iter()
            .map(|file| {
                let stem = self.stem(file);
                let interface = (primary.module && stem == primary.name)
                    .then(|| self.interface_path(&primary.name));
                SourceUnit {
                    source: primary_dir.join(file),
                    object: self.object_path(&primary.name, file),
                    interface,
                }
            })
            .collect()
    }

    /// Returns the object path of `file` in `primary`.
    pub fn object_path(&self, primary: &str, file: &str) -> PathBuf {
        self.objects_dir
            .join(primary)
            .join(format!("{}.{}", self.stem(file), self.object_extension))
    }

    /// Returns the interface artifact path of module primary `primary`.
    pub fn interface_path(&self, primary: &str) -> PathBuf {
        self.module_cache_dir
            .join(format!("{primary}.{}", self.interface_extension))
    }

    /// Returns the path of the executable named `name`.
    pub fn executable_path(&self, name: &str) -> PathBuf {
        self.build_dir.join(name)
    }

    /// Returns the interface artifact of the external header module `module`.
    pub fn header_interface_path(&self, module: &str) -> PathBuf {
        self.module_cache_dir
            .join(&self.header_root)
            .join(format!("{module}.{}", self.interface_extension))
    }

    /// Returns the lone units of `group` in declared order.
    pub fn lone_units(&self, group: &LoneGroupConfig) -> Vec<LoneUnit> {
        let group_dir = self.sources_dir.join(&group.group);
        group
            .sources
            .iter()
            .map(|file| LoneUnit {
                source: group_dir.join(file),
                executable: self.executable_path(self.stem(file)),
            })
            .collect()
    }

    /// Creates the build directory, the objects tree with one subdirectory per
    /// primary, and the module cache. Existing directories are left alone.
    pub fn create_directories<'a>(
        &self,
        primaries: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), BuildError> {
        create_dir(&self.build_dir)?;
        create_dir(&self.objects_dir)?;
        for primary in primaries {
            create_dir(&self.objects_dir.join(primary))?;
        }
        create_dir(&self.module_cache_dir)
    }

    /// Strips the source extension from a file name.
    fn stem<'f>(&self, file: &'f str) -> &'f str {
        file.strip_suffix(self.source_extension.as_str())
            .and_then(|s| s.strip_suffix('.'))
            .unwrap_or(file)
    }
}

fn create_dir(path: &Path) -> Result<(), BuildError> {
    std::fs::create_dir_all(path).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })
}
