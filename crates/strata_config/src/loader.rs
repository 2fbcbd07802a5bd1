//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ProjectConfig;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Name of the project description file at the project root.
pub const CONFIG_FILE_NAME: &str = "strata.toml";

/// Loads and validates a `strata.toml` configuration from a project directory.
///
/// Reads `<project_dir>/strata.toml`, parses it, and validates it.
pub fn load_config(project_dir: &Path) -> Result<ProjectConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates the configuration file at `path`, whatever its name.
pub fn load_config_file(path: &Path) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `strata.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<ProjectConfig, ConfigError> {
    let config: ProjectConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates names, cross references and source file names.
///
/// Dependency cycles are not checked here; the primary graph rejects them.
fn validate_config(config: &ProjectConfig) -> Result<(), ConfigError> {
    if config.project.name.is_empty() {
        return Err(ConfigError::MissingField("project.name".to_string()));
    }

    let extension = format!(".{}", config.toolchain.source_extension);

    let mut primaries = HashSet::new();
    for primary in &config.primaries {
        if primary.name.is_empty() {
            return Err(ConfigError::MissingField("primary.name".to_string()));
        }
        if !primaries.insert(primary.name.as_str()) {
            return Err(ConfigError::DuplicateName {
                kind: "primary",
                name: primary.name.clone(),
            });
        }
        if primary.sources.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "primary '{}' has no source files",
                primary.name
            )));
        }
        check_sources(&primary.sources, &extension, "primary", &primary.name)?;
    }

    for primary in &config.primaries {
        for dep in &primary.deps {
            if !primaries.contains(dep.as_str()) {
                return Err(ConfigError::UnknownPrimary {
                    name: dep.clone(),
                    referenced_by: format!("primary '{}'", primary.name),
                });
            }
        }
    }

    let mut targets = HashSet::new();
    for target in &config.targets {
        if target.name.is_empty() {
            return Err(ConfigError::MissingField("target.name".to_string()));
        }
        if !targets.insert(target.name.as_str()) {
            return Err(ConfigError::DuplicateName {
                kind: "target",
                name: target.name.clone(),
            });
        }
        if target.primaries.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "target '{}' has no primaries",
                target.name
            )));
        }
        for name in &target.primaries {
            if !primaries.contains(name.as_str()) {
                return Err(ConfigError::UnknownPrimary {
                    name: name.clone(),
                    referenced_by: format!("target '{}'", target.name),
                });
            }
        }
    }

    let mut groups = HashSet::new();
    for lone in &config.lone {
        if !groups.insert(lone.group.as_str()) {
            return Err(ConfigError::DuplicateName {
                kind: "lone group",
                name: lone.group.clone(),
            });
        }
        check_sources(&lone.sources, &extension, "lone group", &lone.group)?;
    }

    check_executable_names(config, &extension)
}

/// Checks that no two executables share a path in the profile build directory.
///
/// Targets and lone sources both link into `build/<profile>/`, next to the
/// objects directory, so a lone source stem must not repeat a target name or
/// another lone stem, and neither may take the objects directory's name.
fn check_executable_names(config: &ProjectConfig, extension: &str) -> Result<(), ConfigError> {
    let objects = config.layout.objects.as_str();
    let mut owners: HashMap<&str, String> = HashMap::new();

    for target in &config.targets {
        if target.name == objects {
            return Err(ConfigError::ValidationError(format!(
                "target '{}' has the same name as the objects directory",
                target.name
            )));
        }
        owners.insert(target.name.as_str(), format!("target '{}'", target.name));
    }

    for lone in &config.lone {
        for source in &lone.sources {
            let stem = source.strip_suffix(extension).unwrap_or(source);
            let owner = format!("source '{source}' of lone group '{}'", lone.group);
            if stem == objects {
                return Err(ConfigError::ValidationError(format!(
                    "{owner} builds an executable named like the objects directory"
                )));
            }
            if let Some(previous) = owners.insert(stem, owner.clone()) {
                return Err(ConfigError::ValidationError(format!(
                    "{owner} builds executable '{stem}', already built by {previous}"
                )));
            }
        }
    }

    Ok(())
}

/// Checks that every source carries the expected extension and appears once.
fn check_sources(
    sources: &[String],
    extension: &str,
    kind: &str,
    owner: &str,
) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for source in sources {
        let stem_len = source.len().saturating_sub(extension.len());
        if !source.ends_with(extension) || stem_len == 0 {
            return Err(ConfigError::ValidationError(format!(
                "source '{source}' of {kind} '{owner}' must end in '{extension}'"
            )));
        }
        if !seen.insert(source.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "source '{source}' is listed twice in {kind} '{owner}'"
            )));
        }
    }
    Ok(())
}
