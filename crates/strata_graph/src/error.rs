//! Error types for dependency graph construction and lookup.

/// Errors raised while building or querying a [`PrimaryGraph`](crate::PrimaryGraph).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A lookup named a primary that is not in the graph.
    #[error("unknown primary '{0}'")]
    UnknownPrimary(String),

    /// A primary declares a dependency on an undeclared primary.
    #[error("primary '{primary}' depends on unknown primary '{dependency}'")]
    UnknownDependency {
        /// The declaring primary.
        primary: String,
        /// The undeclared dependency.
        dependency: String,
    },

    /// The declared dependencies form a cycle.
    #[error("dependency cycle detected among primaries: {}", members.join(", "))]
    Cycle {
        /// Every primary of the cycle, sorted by name.
        members: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_display_lists_members() {
        let err = GraphError::Cycle {
            members: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "dependency cycle detected among primaries: a, b"
        );
    }

    #[test]
    fn unknown_dependency_display() {
        let err = GraphError::UnknownDependency {
            primary: "app".to_string(),
            dependency: "core".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "primary 'app' depends on unknown primary 'core'"
        );
    }
}
