//! Dependencies-first compilation of primaries.

use strata_graph::PrimaryGraph;

use crate::error::BuildError;
use crate::resolver::{DependencyResolver, WorkItem};
use crate::session::BuildSession;
use crate::toolchain::Toolchain;

/// Compiles primaries after their dependencies, each at most once per session.
#[derive(Debug, Clone, Copy)]
pub struct BuildScheduler<'a> {
    graph: &'a PrimaryGraph,
    resolver: DependencyResolver<'a>,
}

impl<'a> BuildScheduler<'a> {
    /// Creates a scheduler over an acyclic primary graph.
    pub fn new(graph: &'a PrimaryGraph, resolver: DependencyResolver<'a>) -> Self {
        Self { graph, resolver }
    }

    /// The resolver used for dependencies.
    pub fn resolver(&self) -> DependencyResolver<'a> {
        self.resolver
    }

    /// Builds `primary`, whose stale sources are `work`.
    ///
    /// Every dependency is resolved and built first, depth-first in declared
    /// order. Then each work item is compiled in order with `extra_flags`
    /// appended, and `primary` is marked updated if anything was compiled.
    /// A primary already updated this session is skipped. The first failed
    /// compile aborts the walk.
    ///
    /// When the session policy rebuilds dependents, a dependency rebuilt in
    /// this session replaces `work` with every source of `primary`.
    pub fn build_primary(
        &self,
        session: &mut BuildSession,
        toolchain: &mut dyn Toolchain,
        primary: &str,
        work: Vec<WorkItem>,
        extra_flags: &[String],
    ) -> Result<(), BuildError> {
        if session.is_updated(primary) {
            tracing::debug!(primary, "already built this session");
            return Ok(());
        }
        let propagate = session.policy().rebuild_dependents;
        if propagate && session.is_settled(primary) {
            return Ok(());
        }

        let mut dependency_rebuilt = false;
        for dependency in self.graph.dependencies(primary)? {
            let dependency_work = self.resolver.resolve(session, dependency)?;
            if !dependency_work.is_empty() || propagate {
                self.build_primary(session, toolchain, dependency, dependency_work, extra_flags)?;
            }
            dependency_rebuilt |= session.is_updated(dependency);
        }

        let work = if propagate && dependency_rebuilt {
            tracing::debug!(primary, "dependency rebuilt, recompiling all sources");
            self.resolver.all_work(primary)?
        } else {
            work
        };

        if !work.is_empty() {
            for item in &work {
                toolchain.invoke(&item.invocation(extra_flags))?;
                session.record_compiled(item.source.clone());
            }
            session.mark_updated(primary);
        }
        session.mark_settled(primary);
        Ok(())
    }
}
