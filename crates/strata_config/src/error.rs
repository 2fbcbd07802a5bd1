//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `strata.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A referenced target name does not exist in the configuration.
    #[error("no such executable is registered: '{0}'")]
    UnknownTarget(String),

    /// A target or primary refers to a primary that is not declared.
    #[error("unknown primary '{name}' referenced by {referenced_by}")]
    UnknownPrimary {
        /// The undeclared primary name.
        name: String,
        /// Description of the referencing entry (e.g. "target 'wc'").
        referenced_by: String,
    },

    /// Two entries of the same kind share a name.
    #[error("duplicate {kind} '{name}'")]
    DuplicateName {
        /// The kind of entry ("primary", "target", "lone group").
        kind: &'static str,
        /// The repeated name.
        name: String,
    },

    /// A required field is missing from the configuration.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A configuration value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}
