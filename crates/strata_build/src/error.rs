//! Error types for build orchestration.

use std::path::PathBuf;

use strata_config::ConfigError;
use strata_graph::GraphError;

/// Errors that abort a build session.
///
/// Every error is fatal: the session stops at the first one, and nothing
/// already written to disk is rolled back.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The project configuration is invalid or names something undeclared.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The primary graph is inconsistent (unknown primary, cycle).
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A declared source file does not exist.
    #[error("source file {path} is missing: {source}")]
    MissingSource {
        /// The declared source path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An executable is missing right after a build reported success.
    #[error("file {path} doesn't exist after a successful build")]
    MissingArtifact {
        /// The expected artifact path.
        path: PathBuf,
    },

    /// A toolchain or target process could not be started.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        /// The program that failed to start.
        program: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A compile or link process exited unsuccessfully.
    #[error("command failed with {}: {command}", describe_exit(.code))]
    CommandFailed {
        /// The rendered command line.
        command: String,
        /// The exit code, or `None` if the process was killed by a signal.
        code: Option<i32>,
    },

    /// The library resolver could not provide flags for a library.
    #[error("failed to resolve library '{library}' ({query}): {reason}")]
    Library {
        /// The library name.
        library: String,
        /// The failed query (e.g. `--cflags`).
        query: String,
        /// What the resolver reported.
        reason: String,
    },

    /// A filesystem operation on the build tree failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Coarse classification of a [`BuildError`].
///
/// Only internal control flow distinguishes these; the command line reports
/// every kind the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The project description is inconsistent with itself or the disk.
    Configuration,
    /// A compiler or linker invocation failed.
    Toolchain,
    /// An external library lookup failed.
    Resolution,
    /// The build tree could not be read or written.
    Io,
}

impl BuildError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::Config(_)
            | BuildError::Graph(_)
            | BuildError::MissingSource { .. }
            | BuildError::MissingArtifact { .. } => ErrorKind::Configuration,
            BuildError::Spawn { .. } | BuildError::CommandFailed { .. } => ErrorKind::Toolchain,
            BuildError::Library { .. } => ErrorKind::Resolution,
            BuildError::Io { .. } => ErrorKind::Io,
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "a signal".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failed_display() {
        let err = BuildError::CommandFailed {
            command: "g++ -c a.cpp -o a.o".to_string(),
            code: Some(1),
        };
        assert_eq!(
            err.to_string(),
            "command failed with code 1: g++ -c a.cpp -o a.o"
        );
        assert_eq!(err.kind(), ErrorKind::Toolchain);
    }

    #[test]
    fn command_killed_display() {
        let err = BuildError::CommandFailed {
            command: "g++".to_string(),
            code: None,
        };
        assert!(err.to_string().contains("with a signal"));
    }

    #[test]
    fn library_display() {
        let err = BuildError::Library {
            library: "readline".to_string(),
            query: "--cflags".to_string(),
            reason: "Package readline was not found".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'readline'"));
        assert!(msg.contains("--cflags"));
        assert_eq!(err.kind(), ErrorKind::Resolution);
    }

    #[test]
    fn missing_artifact_is_configuration() {
        let err = BuildError::MissingArtifact {
            path: PathBuf::from("build/debug/wc"),
        };
        assert!(err.to_string().contains("build/debug/wc"));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn config_and_graph_errors_convert() {
        let err: BuildError = ConfigError::UnknownTarget("wc".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), "no such executable is registered: 'wc'");

        let err: BuildError = GraphError::UnknownPrimary("core".to_string()).into();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn io_error_display() {
        let err = BuildError::Io {
            path: PathBuf::from("/tmp/build/objects"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().starts_with("I/O error at /tmp/build/objects"));
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
