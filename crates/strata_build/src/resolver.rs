//! Per-primary staleness resolution.
//!
//! [`DependencyResolver::resolve`] turns a primary into the list of its source
//! files that need compiling. Each primary is examined at most once per
//! session: later calls return an empty list even if files changed since.

use std::path::PathBuf;

use strata_config::{PrimaryConfig, ProjectConfig};
use strata_graph::GraphError;

use crate::error::BuildError;
use crate::layout::{BuildLayout, SourceUnit};
use crate::session::BuildSession;
use crate::staleness::is_stale;
use crate::toolchain::Invocation;

/// A source file scheduled for compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// The source file.
    pub source: PathBuf,
    /// The object file to write.
    pub object: PathBuf,
    /// The module interface written alongside, for a primary module file.
    pub interface: Option<PathBuf>,
}

impl WorkItem {
    /// Returns the toolchain step compiling this item with `extra_flags`.
    pub fn invocation(&self, extra_flags: &[String]) -> Invocation {
        match &self.interface {
            Some(interface) => Invocation::CompileModule {
                source: self.source.clone(),
                object: self.object.clone(),
                interface: interface.clone(),
                extra_flags: extra_flags.to_vec(),
            },
            None => Invocation::CompileObject {
                source: self.source.clone(),
                object: self.object.clone(),
                extra_flags: extra_flags.to_vec(),
            },
        }
    }
}

impl From<SourceUnit> for WorkItem {
    fn from(unit: SourceUnit) -> Self {
        Self {
            source: unit.source,
            object: unit.object,
            interface: unit.interface,
        }
    }
}

/// Computes the stale sources of a primary.
#[derive(Debug, Clone, Copy)]
pub struct DependencyResolver<'a> {
    config: &'a ProjectConfig,
    layout: &'a BuildLayout,
}

impl<'a> DependencyResolver<'a> {
    /// Creates a resolver over the primaries of `config`.
    pub fn new(config: &'a ProjectConfig, layout: &'a BuildLayout) -> Self {
        Self { config, layout }
    }

    /// Returns the work items of `primary` and marks it checked.
    ///
    /// A source is queued when its object is missing or older than it. The
    /// primary module file is also queued when only its interface is stale,
    /// since one compile writes both. An already checked primary yields no
    /// work.
    pub fn resolve(
        &self,
        session: &mut BuildSession,
        primary: &str,
    ) -> Result<Vec<WorkItem>, BuildError> {
        if session.is_checked(primary) {
            tracing::debug!(primary, "already checked this session");
            return Ok(Vec::new());
        }

        let config = self.primary(primary)?;
        let mut work = Vec::new();
        for unit in self.layout.source_units(config) {
            let stale = if is_stale(&unit.source, &unit.object)? {
                tracing::debug!(source = %unit.source.display(), "object is stale");
                true
            } else if let Some(interface) = &unit.interface {
                let stale = is_stale(&unit.source, interface)?;
                if stale {
                    tracing::debug!(source = %unit.source.display(), "module interface is stale");
                }
                stale
            } else {
                false
            };
            if stale {
                work.push(WorkItem::from(unit));
            }
        }

        session.mark_checked(primary);
        Ok(work)
    }

    /// Returns every source of `primary` as work, ignoring timestamps.
    pub fn all_work(&self, primary: &str) -> Result<Vec<WorkItem>, BuildError> {
        let config = self.primary(primary)?;
        Ok(self
            .layout
            .source_units(config)
            .into_iter()
            .map(WorkItem::from)
            .collect())
    }

    /// The layout artifacts are resolved against.
    pub fn layout(&self) -> &'a BuildLayout {
        self.layout
    }

    /// Looks up `name` among the declared primaries.
    pub fn primary(&self, name: &str) -> Result<&'a PrimaryConfig, BuildError> {
        self.config
            .primary(name)
            .ok_or_else(|| GraphError::UnknownPrimary(name.to_string()).into())
    }
}
