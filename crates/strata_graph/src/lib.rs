//! The primary dependency graph.
//!
//! Primaries are nodes and declared dependencies are edges pointing from the
//! dependent to its dependency. The graph is validated on construction:
//! unknown dependencies and cycles are rejected before any build work starts,
//! so walks over a [`PrimaryGraph`] always terminate.

#![warn(missing_docs)]

pub mod error;

use std::collections::{HashMap, HashSet};

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};

use strata_config::ProjectConfig;

pub use error::GraphError;

/// A node of the graph: the primary name and its dependencies in declared order.
#[derive(Debug, Clone)]
struct PrimaryNode {
    name: String,
    dependencies: Vec<String>,
}

/// A validated, acyclic graph of primaries.
#[derive(Debug)]
pub struct PrimaryGraph {
    graph: DiGraph<PrimaryNode, ()>,
    indices: HashMap<String, NodeIndex>,
    /// Every primary, dependencies before dependents.
    order: Vec<NodeIndex>,
}

impl PrimaryGraph {
    /// Builds the graph from `(name, dependencies)` pairs.
    ///
    /// Fails if a dependency names an undeclared primary or if the
    /// dependencies form a cycle (including a primary depending on itself).
    pub fn new<'a, I>(primaries: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (&'a str, &'a [String])>,
    {
        let mut graph = DiGraph::new();
        let mut indices = HashMap::new();

        for (name, dependencies) in primaries {
            let index = graph.add_node(PrimaryNode {
                name: name.to_string(),
                dependencies: dependencies.to_vec(),
            });
            indices.insert(name.to_string(), index);
        }

        let mut edges = Vec::new();
        for index in graph.node_indices() {
            let node = &graph[index];
            for dep in &node.dependencies {
                let target = indices
                    .get(dep)
                    .ok_or_else(|| GraphError::UnknownDependency {
                        primary: node.name.clone(),
                        dependency: dep.clone(),
                    })?;
                edges.push((index, *target));
            }
        }
        for (from, to) in edges {
            graph.add_edge(from, to, ());
        }

        toposort(&graph, None).map_err(|cycle| GraphError::Cycle {
            members: cycle_members(&graph, cycle.node_id()),
        })?;
        let order = dependency_order(&graph, &indices);

        Ok(Self {
            graph,
            indices,
            order,
        })
    }

    /// Builds the graph of every primary declared in `config`.
    pub fn from_config(config: &ProjectConfig) -> Result<Self, GraphError> {
        Self::new(
            config
                .primaries
                .iter()
                .map(|p| (p.name.as_str(), p.deps.as_slice())),
        )
    }

    /// Returns the direct dependencies of `name` in declared order.
    pub fn dependencies(&self, name: &str) -> Result<&[String], GraphError> {
        let index = self
            .indices
            .get(name)
            .ok_or_else(|| GraphError::UnknownPrimary(name.to_string()))?;
        Ok(&self.graph[*index].dependencies)
    }

    /// Returns every primary name, each one after all of its dependencies.
    pub fn topological_order(&self) -> impl Iterator<Item = &str> + '_ {
        self.order
            .iter()
            .map(move |index| self.graph[*index].name.as_str())
    }
}

/// Orders every node after its dependencies.
///
/// A post-order walk over nodes and dependencies in declared order, so the
/// result is stable across runs. The graph must be acyclic.
fn dependency_order(
    graph: &DiGraph<PrimaryNode, ()>,
    indices: &HashMap<String, NodeIndex>,
) -> Vec<NodeIndex> {
    fn visit(
        graph: &DiGraph<PrimaryNode, ()>,
        indices: &HashMap<String, NodeIndex>,
        index: NodeIndex,
        visited: &mut HashSet<NodeIndex>,
        order: &mut Vec<NodeIndex>,
    ) {
        if !visited.insert(index) {
            return;
        }
        for dep in &graph[index].dependencies {
            if let Some(&dep_index) = indices.get(dep) {
                visit(graph, indices, dep_index, visited, order);
            }
        }
        order.push(index);
    }

    let mut visited = HashSet::new();
    let mut order = Vec::with_capacity(graph.node_count());
    for index in graph.node_indices() {
        visit(graph, indices, index, &mut visited, &mut order);
    }
    order
}

/// Collects the sorted names of the strongly connected component holding `node`.
fn cycle_members(graph: &DiGraph<PrimaryNode, ()>, node: NodeIndex) -> Vec<String> {
    let mut members: Vec<String> = tarjan_scc(graph)
        .into_iter()
        .find(|component| component.contains(&node))
        .unwrap_or_else(|| vec![node])
        .into_iter()
        .map(|index| graph[index].name.clone())
        .collect();
    members.sort();
    members
}
