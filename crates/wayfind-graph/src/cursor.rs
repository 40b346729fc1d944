//! Detached, fail-fast cursors over a graph's vertices and edges.
//!
//! A cursor does not borrow the graph between steps, so a caller may
//! interleave stepping with mutation. Any structural change made after the
//! cursor was created is reported as
//! [`GraphError::ConcurrentStructuralModification`] on the next step instead
//! of silently skipping or repeating elements. A cursor only steps over
//! the graph that created it; any other graph, including a clone, fails
//! with [`GraphError::ForeignCursor`].

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::node::{EdgeRef, Vertex};
use crate::policy::EdgePolicy;

fn check<V: Vertex, D: EdgePolicy>(graph: &Graph<V, D>, owner: u64, expected: u64) -> Result<()> {
    if graph.id() != owner {
        Err(GraphError::ForeignCursor)
    } else if graph.modification_count() != expected {
        Err(GraphError::ConcurrentStructuralModification)
    } else {
        Ok(())
    }
}

/// Cursor over vertices in graph order.
#[derive(Debug, Clone)]
pub struct VertexCursor {
    pos: usize,
    owner: u64,
    expected: u64,
}

impl VertexCursor {
    pub(crate) fn new(owner: u64, expected: u64) -> Self {
        Self {
            pos: 0,
            owner,
            expected,
        }
    }

    /// Step the cursor over the graph that created it.
    pub fn next<'g, V: Vertex, D: EdgePolicy>(
        &mut self,
        graph: &'g Graph<V, D>,
    ) -> Result<Option<&'g V>> {
        check(graph, self.owner, self.expected)?;
        let v = graph.node_map().nodes().get(self.pos).map(|n| n.vertex());
        if v.is_some() {
            self.pos += 1;
        }
        Ok(v)
    }
}

/// Cursor over logical edges, in the same order as [`Graph::edges`].
#[derive(Debug, Clone)]
pub struct EdgeCursor {
    node: usize,
    arc: usize,
    owner: u64,
    expected: u64,
}

impl EdgeCursor {
    pub(crate) fn new(owner: u64, expected: u64) -> Self {
        Self {
            node: 0,
            arc: 0,
            owner,
            expected,
        }
    }

    /// Step the cursor over the graph that created it.
    pub fn next<'g, V: Vertex, D: EdgePolicy>(
        &mut self,
        graph: &'g Graph<V, D>,
    ) -> Result<Option<EdgeRef<'g, V>>> {
        check(graph, self.owner, self.expected)?;
        let nodes = graph.node_map().nodes();
        while let Some(n) = nodes.get(self.node) {
            if let Some(e) = n.edges().get(self.arc) {
                self.arc += 1;
                if D::DIRECTED || self.node < e.to() {
                    return Ok(Some(EdgeRef {
                        from: n.vertex(),
                        to: nodes[e.to()].vertex(),
                        weight: e.weight(),
                    }));
                }
            } else {
                self.node += 1;
                self.arc = 0;
            }
        }
        Ok(None)
    }
}
