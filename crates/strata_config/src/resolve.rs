//! Profile and target resolution against a loaded configuration.

use crate::error::ConfigError;
use crate::types::{Profile, ProjectConfig, TargetConfig};

/// A build profile with its flag set looked up from the configuration.
#[derive(Debug, Clone)]
pub struct ResolvedProfile {
    /// The selected profile.
    pub profile: Profile,
    /// Optimization and debug flags for every compile and link.
    pub flags: Vec<String>,
}

/// Resolves the flag set of `profile`.
pub fn resolve_profile(config: &ProjectConfig, profile: Profile) -> ResolvedProfile {
    let flags = match profile {
        Profile::Debug => config.profile.debug.flags.clone(),
        Profile::Release => config.profile.release.flags.clone(),
    };
    ResolvedProfile { profile, flags }
}

/// Resolves a declared target by name.
pub fn resolve_target<'a>(
    config: &'a ProjectConfig,
    target_name: &str,
) -> Result<&'a TargetConfig, ConfigError> {
    config
        .target(target_name)
        .ok_or_else(|| ConfigError::UnknownTarget(target_name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;

    const CONFIG: &str = r#"
[project]
name = "test"

[profile.release]
flags = ["-O2", "-DNDEBUG"]

[[primary]]
name = "core"
sources = ["core.cpp"]

[[target]]
name = "exe"
primaries = ["core"]
"#;

    #[test]
    fn resolve_debug_profile() {
        let config = load_config_from_str(CONFIG).unwrap();
        let resolved = resolve_profile(&config, Profile::Debug);
        assert_eq!(resolved.profile, Profile::Debug);
        assert_eq!(resolved.flags, vec!["-g", "-DDEBUG"]);
    }

    #[test]
    fn resolve_release_profile() {
        let config = load_config_from_str(CONFIG).unwrap();
        let resolved = resolve_profile(&config, Profile::Release);
        assert_eq!(resolved.flags, vec!["-O2", "-DNDEBUG"]);
    }

    #[test]
    fn resolve_known_target() {
        let config = load_config_from_str(CONFIG).unwrap();
        let target = resolve_target(&config, "exe").unwrap();
        assert_eq!(target.primaries, vec!["core"]);
    }

    #[test]
    fn unknown_target_errors() {
        let config = load_config_from_str(CONFIG).unwrap();
        let err = resolve_target(&config, "nonexistent").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTarget(_)));
    }
}
