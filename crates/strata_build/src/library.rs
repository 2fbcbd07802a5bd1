//! External library flag resolution.

use std::process::Command;

use crate::error::BuildError;

/// Compile and link flags contributed by external libraries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryFlags {
    /// Flags added to every compile of the target's primaries.
    pub compile: Vec<String>,
    /// Flags added to the target's link line.
    pub link: Vec<String>,
}

impl LibraryFlags {
    /// Appends `other`'s flags after this set's.
    pub fn extend(&mut self, other: LibraryFlags) {
        self.compile.extend(other.compile);
        self.link.extend(other.link);
    }
}

/// Looks up the compile and link flags of an external library.
pub trait LibraryResolver {
    /// Returns the flags for `library`. Failure aborts the build.
    fn resolve(&mut self, library: &str) -> Result<LibraryFlags, BuildError>;
}

/// A [`LibraryResolver`] backed by a `pkg-config` compatible program.
#[derive(Debug, Clone)]
pub struct PkgConfig {
    program: String,
}

impl PkgConfig {
    /// Creates a resolver running `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn query(&self, library: &str, query: &str) -> Result<Vec<String>, BuildError> {
        tracing::debug!("* {} {library} {query}", self.program);
        let output = Command::new(&self.program)
            .arg(library)
            .arg(query)
            .output()
            .map_err(|e| BuildError::Library {
                library: library.to_string(),
                query: query.to_string(),
                reason: format!("failed to start '{}': {e}", self.program),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = match stderr.trim() {
                "" => format!("'{}' exited unsuccessfully", self.program),
                message => message.to_string(),
            };
            return Err(BuildError::Library {
                library: library.to_string(),
                query: query.to_string(),
                reason,
            });
        }

        Ok(split_flags(&String::from_utf8_lossy(&output.stdout)))
    }
}

impl Default for PkgConfig {
    fn default() -> Self {
        Self::new("pkg-config")
    }
}

impl LibraryResolver for PkgConfig {
    fn resolve(&mut self, library: &str) -> Result<LibraryFlags, BuildError> {
        Ok(LibraryFlags {
            compile: self.query(library, "--cflags")?,
            link: self.query(library, "--libs")?,
        })
    }
}

fn split_flags(output: &str) -> Vec<String> {
    output.split_whitespace().map(str::to_string).collect()
}
