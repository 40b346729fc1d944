use thiserror::Error;

/// Errors raised by structural graph operations.
///
/// Every variant is a local, synchronous precondition failure. A search that
/// finds no path is not an error; it returns `Ok(None)`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    /// A vertex slot held no value (a `null` in serialized input).
    #[error("vertex cannot be null")]
    NullVertex,

    /// An edge whose two endpoints are the same vertex.
    #[error("self-loops are not permitted: {0}")]
    SelfLoop(String),

    /// The named vertex is not part of the graph.
    #[error("vertex not in graph: {0}")]
    VertexNotInGraph(String),

    /// At least one of several named vertices is not part of the graph.
    #[error("{missing} of {of} vertices not in graph")]
    VerticesNotInGraph { missing: usize, of: usize },

    /// The graph is frozen and refuses structural changes.
    #[error("graph is frozen; modification not permitted")]
    ModificationNotPermitted,

    /// No topological order exists.
    #[error("graph contains a cycle")]
    CyclicGraph,

    /// A detached cursor outlived a structural change to its graph.
    #[error("graph was structurally modified during iteration")]
    ConcurrentStructuralModification,

    /// A detached cursor was stepped over a graph other than its own.
    #[error("cursor belongs to a different graph")]
    ForeignCursor,

    /// Edge weights must be finite and non-negative.
    #[error("invalid edge weight {0}")]
    InvalidWeight(f32),

    /// Serialized data describes the other kind of graph.
    #[error("expected {} graph, found {} graph", kind(.expected), kind(.found))]
    DirectednessMismatch { expected: bool, found: bool },
}

fn kind(directed: &bool) -> &'static str {
    if *directed { "directed" } else { "undirected" }
}

/// Result alias used throughout the crate.
pub type Result<T, E = GraphError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_vertex() {
        let e = GraphError::VertexNotInGraph(format!("{:?}", (3, 4)));
        assert_eq!(e.to_string(), "vertex not in graph: (3, 4)");
        let e = GraphError::VerticesNotInGraph { missing: 1, of: 2 };
        assert_eq!(e.to_string(), "1 of 2 vertices not in graph");
    }

    #[test]
    fn directedness_message() {
        let e = GraphError::DirectednessMismatch {
            expected: true,
            found: false,
        };
        assert_eq!(e.to_string(), "expected directed graph, found undirected graph");
    }
}
