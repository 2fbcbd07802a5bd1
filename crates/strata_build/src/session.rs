//! Per-invocation build session state.
//!
//! A [`BuildSession`] remembers which primaries were already staleness-checked
//! and which were actually recompiled. Both sets only grow, and every updated
//! primary has been checked first. The session is dropped when the build ends;
//! nothing is persisted.

use std::collections::HashSet;
use std::path::PathBuf;

use strata_config::{BuildConfig, RelinkScope};

/// Scheduling policy for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildPolicy {
    /// Which rebuilt primaries force a target to relink.
    pub relink: RelinkScope,
    /// Recompile a primary when one of its dependencies was rebuilt.
    pub rebuild_dependents: bool,
}

impl BuildPolicy {
    /// Reads the policy from the `[build]` table.
    pub fn from_config(config: &BuildConfig) -> Self {
        Self {
            relink: config.relink,
            rebuild_dependents: config.rebuild_dependents,
        }
    }
}

impl Default for BuildPolicy {
    fn default() -> Self {
        Self::from_config(&BuildConfig::default())
    }
}

/// Memoization state of one build session.
#[derive(Debug, Default)]
pub struct BuildSession {
    policy: BuildPolicy,
    /// Primaries whose staleness was computed.
    checked: HashSet<String>,
    /// Primaries recompiled in this session.
    updated: HashSet<String>,
    /// Primaries whose dependency walk finished; used with `rebuild_dependents`.
    settled: HashSet<String>,
    /// Every source compiled, in compile order.
    compiled: Vec<PathBuf>,
}

impl BuildSession {
    /// Starts an empty session with the given policy.
    pub fn new(policy: BuildPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// The session's policy.
    pub fn policy(&self) -> BuildPolicy {
        self.policy
    }

    /// Returns `true` if `primary` was already staleness-checked.
    pub fn is_checked(&self, primary: &str) -> bool {
        self.checked.contains(primary)
    }

    /// Records that `primary` was staleness-checked.
    pub fn mark_checked(&mut self, primary: &str) {
        self.checked.insert(primary.to_string());
    }

    /// Returns `true` if `primary` was recompiled in this session.
    pub fn is_updated(&self, primary: &str) -> bool {
        self.updated.contains(primary)
    }

    /// Records that `primary` was recompiled.
    pub fn mark_updated(&mut self, primary: &str) {
        debug_assert!(
            self.is_checked(primary),
            "primary '{primary}' updated before being checked"
        );
        self.updated.insert(primary.to_string());
    }

    /// Returns `true` if any primary was recompiled in this session.
    pub fn any_updated(&self) -> bool {
        !self.updated.is_empty()
    }

    /// Returns `true` if the dependency walk of `primary` already finished.
    pub fn is_settled(&self, primary: &str) -> bool {
        self.settled.contains(primary)
    }

    /// Records that the dependency walk of `primary` finished.
    pub fn mark_settled(&mut self, primary: &str) {
        self.settled.insert(primary.to_string());
    }

    /// Records a compiled source file.
    pub fn record_compiled(&mut self, source: PathBuf) {
        self.compiled.push(source);
    }

    /// Sources compiled so far, in order.
    pub fn compiled(&self) -> &[PathBuf] {
        &self.compiled
    }

    /// Number of primaries checked so far.
    pub fn checked_count(&self) -> usize {
        self.checked.len()
    }

    /// Number of primaries recompiled so far.
    pub fn updated_count(&self) -> usize {
        self.updated.len()
    }
}
