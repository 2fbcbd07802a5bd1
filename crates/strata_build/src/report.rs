//! Summary of one build session.

use std::path::PathBuf;

use serde::Serialize;

/// What a build session did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// The profile built (`debug` or `release`).
    pub profile: String,
    /// External header modules compiled into the module cache.
    pub bootstrapped: Vec<String>,
    /// Lone executables rebuilt.
    pub lone_executables: Vec<PathBuf>,
    /// Sources compiled, in compile order.
    pub compiled: Vec<PathBuf>,
    /// Primaries recompiled, dependencies first.
    pub rebuilt_primaries: Vec<String>,
    /// Targets relinked, in declaration order.
    pub relinked: Vec<String>,
    /// Targets left as they were.
    pub up_to_date: Vec<String>,
}

impl BuildReport {
    /// Returns `true` if the session invoked no toolchain step.
    pub fn is_noop(&self) -> bool {
        self.bootstrapped.is_empty()
            && self.lone_executables.is_empty()
            && self.compiled.is_empty()
            && self.relinked.is_empty()
    }
}
