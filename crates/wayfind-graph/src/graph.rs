use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::atomic::{self, AtomicU64};

use log::debug;

use crate::algorithms::Algorithms;
use crate::cursor::{EdgeCursor, VertexCursor};
use crate::error::{GraphError, Result};
use crate::node::{Edge, EdgeRef, Node, Vertex};
use crate::node_map::{NodeMap, NodeMapConfig};
use crate::policy::{Directed, EdgePolicy, Undirected};

/// A graph whose edges are one-way.
pub type DirectedGraph<V> = Graph<V, Directed>;

/// A graph whose edges are two-way.
pub type UndirectedGraph<V> = Graph<V, Undirected>;

/// A weighted graph over caller-supplied vertex values.
///
/// The graph owns one [`Node`] per vertex in a [`NodeMap`] and stores edges
/// in the nodes' adjacency lists. The policy `D` decides whether
/// [`add_edge`](Self::add_edge) installs one arc or a mirrored pair.
///
/// A graph is not internally synchronised. Every mutation and every search
/// takes `&mut self`; share it across threads behind a lock.
#[derive(Debug, Clone)]
pub struct Graph<V, D = Directed> {
    pub(crate) nodes: NodeMap<V>,
    edge_count: usize,
    pub(crate) default_weight: f32,
    run: u32,
    modifications: u64,
    id: GraphId,
    frozen: bool,
    config: NodeMapConfig,
    _policy: PhantomData<D>,
}

/// Identity of one graph instance, checked by detached cursors. A clone is
/// a different graph and draws a new identity.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct GraphId(u64);

impl GraphId {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, atomic::Ordering::Relaxed))
    }
}

impl Clone for GraphId {
    fn clone(&self) -> Self {
        Self::fresh()
    }
}

impl<V: Vertex, D: EdgePolicy> Default for Graph<V, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Vertex, D: EdgePolicy> Graph<V, D> {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::with_config(NodeMapConfig::default())
    }

    /// Create an empty graph with room for `capacity` vertices.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(NodeMapConfig::default().with_capacity(capacity))
    }

    /// Create an empty graph whose vertex table uses `config`.
    pub fn with_config(config: NodeMapConfig) -> Self {
        Self {
            nodes: NodeMap::with_config(config),
            edge_count: 0,
            default_weight: 1.0,
            run: 0,
            modifications: 0,
            id: GraphId::fresh(),
            frozen: false,
            config,
            _policy: PhantomData,
        }
    }

    /// Whether edges are one-way.
    #[inline]
    pub const fn is_directed(&self) -> bool {
        D::DIRECTED
    }

    /// The vertex table settings this graph was created with.
    #[inline]
    pub fn config(&self) -> NodeMapConfig {
        self.config
    }

    /// The underlying vertex table.
    #[inline]
    pub fn node_map(&self) -> &NodeMap<V> {
        &self.nodes
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of logical edges; a mirrored undirected pair counts once.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Whether the graph has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // -----------------------------------------------------------------------
    // Configuration and guards
    // -----------------------------------------------------------------------

    /// Weight used by [`add_edge`](Self::add_edge). Starts at 1.
    #[inline]
    pub fn default_edge_weight(&self) -> f32 {
        self.default_weight
    }

    /// Set the weight for later [`add_edge`](Self::add_edge) calls.
    /// Existing edges keep their weights.
    pub fn set_default_edge_weight(&mut self, weight: f32) -> Result<()> {
        check_weight(weight)?;
        self.default_weight = weight;
        Ok(())
    }

    /// Refuse all further structural changes
    /// ([`GraphError::ModificationNotPermitted`]) until [`thaw`](Self::thaw).
    ///
    /// Searches remain available on a frozen graph.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Allow structural changes again.
    pub fn thaw(&mut self) {
        self.frozen = false;
    }

    /// Whether [`freeze`](Self::freeze) is in effect.
    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Counter bumped by every structural change.
    #[inline]
    pub fn modification_count(&self) -> u64 {
        self.modifications
    }

    #[inline]
    fn check_mutable(&self) -> Result<()> {
        if self.frozen {
            Err(GraphError::ModificationNotPermitted)
        } else {
            Ok(())
        }
    }

    #[inline]
    fn touch(&mut self) {
        self.modifications = self.modifications.wrapping_add(1);
    }

    // -----------------------------------------------------------------------
    // Vertices
    // -----------------------------------------------------------------------

    /// Add `vertex`; returns `false` if it was already present.
    pub fn add_vertex(&mut self, vertex: V) -> Result<bool> {
        self.check_mutable()?;
        let (_, inserted) = self.nodes.put(vertex);
        if inserted {
            self.touch();
        }
        Ok(inserted)
    }

    /// Add every vertex of `vertices`; returns how many were new.
    pub fn add_vertices(&mut self, vertices: impl IntoIterator<Item = V>) -> Result<usize> {
        self.check_mutable()?;
        Ok(self.put_all(vertices))
    }

    pub(crate) fn put_all(&mut self, vertices: impl IntoIterator<Item = V>) -> usize {
        let mut added = 0;
        for v in vertices {
            if self.nodes.put(v).1 {
                added += 1;
            }
        }
        if added > 0 {
            self.touch();
        }
        added
    }

    #[inline]
    pub fn contains_vertex(&self, vertex: &V) -> bool {
        self.nodes.contains(vertex)
    }

    /// Remove `vertex` together with every edge touching it.
    ///
    /// Returns `false` if the vertex was absent.
    pub fn remove_vertex(&mut self, vertex: &V) -> Result<bool> {
        self.check_mutable()?;
        let Some(idx) = self.nodes.get_index(vertex) else {
            return Ok(false);
        };
        self.detach(idx);
        let Some(removal) = self.nodes.remove(vertex) else {
            return Ok(false);
        };
        if let Some(old) = removal.moved {
            self.relabel_moved(old, removal.index);
        }
        self.touch();
        Ok(true)
    }

    /// Remove every listed vertex; returns how many were present.
    pub fn remove_vertices<'a>(&mut self, vertices: impl IntoIterator<Item = &'a V>) -> Result<usize>
    where
        V: 'a,
    {
        let mut removed = 0;
        for v in vertices {
            if self.remove_vertex(v)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Keep only the vertices for which `keep` returns `true`.
    pub fn retain_vertices(&mut self, mut keep: impl FnMut(&V) -> bool) -> Result<usize> {
        self.check_mutable()?;
        let doomed: Vec<V> = self
            .nodes
            .iter()
            .filter(|n| !keep(n.vertex()))
            .map(|n| n.vertex().clone())
            .collect();
        self.remove_vertices(doomed.iter())
    }

    /// Vertices in the graph's current order (insertion order unless
    /// reordered by removal or sorting).
    pub fn vertices(&self) -> impl ExactSizeIterator<Item = &V> {
        self.nodes.iter().map(Node::vertex)
    }

    /// Reorder vertices by `compare`; the sort is stable.
    pub fn sort_vertices(&mut self, mut compare: impl FnMut(&V, &V) -> Ordering) -> Result<()> {
        let nodes = self.nodes.nodes();
        let mut order: Vec<usize> = (0..nodes.len()).collect();
        order.sort_by(|&a, &b| compare(nodes[a].vertex(), nodes[b].vertex()));
        self.reorder(&order)
    }

    /// Put the node at `order[i]` into position `i`.
    pub(crate) fn reorder(&mut self, order: &[usize]) -> Result<()> {
        self.check_mutable()?;
        self.nodes.permute(order);
        self.touch();
        Ok(())
    }

    /// Remove every vertex and edge.
    pub fn clear(&mut self) -> Result<()> {
        self.check_mutable()?;
        self.nodes.clear();
        self.edge_count = 0;
        self.touch();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Edges
    // -----------------------------------------------------------------------

    /// Connect `a` to `b` with the default weight. See
    /// [`add_edge_weighted`](Self::add_edge_weighted).
    pub fn add_edge(&mut self, a: &V, b: &V) -> Result<bool> {
        self.add_edge_weighted(a, b, self.default_weight)
    }

    /// Connect `a` to `b` (and `b` to `a` for undirected graphs).
    ///
    /// Returns `Ok(false)` when the edge already existed; its weight is
    /// replaced. Fails on self-loops, absent endpoints and weights that are
    /// negative or not finite.
    pub fn add_edge_weighted(&mut self, a: &V, b: &V, weight: f32) -> Result<bool> {
        self.check_mutable()?;
        check_weight(weight)?;
        if a == b {
            return Err(GraphError::SelfLoop(format!("{a:?}")));
        }
        let (ia, ib) = self.index_pair(a, b)?;
        if self.reweigh(ia, ib, weight) {
            return Ok(false);
        }
        self.link_pair(ia, ib, weight);
        self.touch();
        Ok(true)
    }

    /// Install the arc(s) for a new logical edge between two handles.
    pub(crate) fn link_pair(&mut self, ia: usize, ib: usize, weight: f32) {
        self.link(ia, ib, weight);
        if !D::DIRECTED {
            self.link(ib, ia, weight);
        }
        self.edge_count += 1;
    }

    fn link(&mut self, from: usize, to: usize, weight: f32) {
        self.nodes.node_mut(from).out.push(Edge { to, weight });
        self.nodes.node_mut(to).inc.push(from);
    }

    /// Update the weight of an existing edge; `false` if there is none.
    fn reweigh(&mut self, ia: usize, ib: usize, weight: f32) -> bool {
        let Some(k) = self.nodes.node(ia).arc_to(ib) else {
            return false;
        };
        self.nodes.node_mut(ia).out[k].weight = weight;
        if !D::DIRECTED {
            if let Some(k) = self.nodes.node(ib).arc_to(ia) {
                self.nodes.node_mut(ib).out[k].weight = weight;
            }
        }
        true
    }

    /// Remove the edge from `a` to `b` (both arcs for undirected graphs).
    ///
    /// Returns `Ok(false)` if the endpoints exist but are not connected.
    pub fn remove_edge(&mut self, a: &V, b: &V) -> Result<bool> {
        self.check_mutable()?;
        let (ia, ib) = self.index_pair(a, b)?;
        if !self.nodes.node_mut(ia).unlink_out(ib) {
            return Ok(false);
        }
        self.nodes.node_mut(ib).unlink_in(ia);
        if !D::DIRECTED {
            self.nodes.node_mut(ib).unlink_out(ia);
            self.nodes.node_mut(ia).unlink_in(ib);
        }
        self.edge_count -= 1;
        self.touch();
        Ok(true)
    }

    /// Remove every edge, keeping the vertices.
    pub fn remove_all_edges(&mut self) -> Result<()> {
        self.check_mutable()?;
        for n in self.nodes.nodes_mut() {
            n.out.clear();
            n.inc.clear();
        }
        self.edge_count = 0;
        self.touch();
        Ok(())
    }

    /// Whether an edge from `a` to `b` exists. Absent vertices yield `false`.
    pub fn edge_exists(&self, a: &V, b: &V) -> bool {
        self.edge(a, b).is_some()
    }

    pub fn edge(&self, a: &V, b: &V) -> Option<EdgeRef<'_, V>> {
        let ia = self.nodes.get_index(a)?;
        let ib = self.nodes.get_index(b)?;
        let from = self.nodes.node(ia);
        let k = from.arc_to(ib)?;
        Some(EdgeRef {
            from: from.vertex(),
            to: self.nodes.node(ib).vertex(),
            weight: from.out[k].weight,
        })
    }

    pub fn edge_weight(&self, a: &V, b: &V) -> Option<f32> {
        self.edge(a, b).map(|e| e.weight)
    }

    /// Change the weight of an existing edge; `Ok(false)` if not connected.
    pub fn set_edge_weight(&mut self, a: &V, b: &V, weight: f32) -> Result<bool> {
        self.check_mutable()?;
        check_weight(weight)?;
        let (ia, ib) = self.index_pair(a, b)?;
        Ok(self.reweigh(ia, ib, weight))
    }

    /// Every logical edge once. Undirected edges are reported from the
    /// endpoint that comes first in vertex order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef<'_, V>> {
        let nodes = self.nodes.nodes();
        nodes.iter().enumerate().flat_map(move |(i, n)| {
            n.out
                .iter()
                .filter(move |e| D::DIRECTED || i < e.to)
                .map(move |e| EdgeRef {
                    from: n.vertex(),
                    to: nodes[e.to].vertex(),
                    weight: e.weight,
                })
        })
    }

    /// Edges leaving `vertex`.
    pub fn neighbors<'g>(
        &'g self,
        vertex: &V,
    ) -> Result<impl Iterator<Item = EdgeRef<'g, V>> + use<'g, V, D>> {
        let idx = self.index_of(vertex)?;
        let nodes = self.nodes.nodes();
        let from = &nodes[idx];
        Ok(from.out.iter().map(move |e| EdgeRef {
            from: from.vertex(),
            to: nodes[e.to].vertex(),
            weight: e.weight,
        }))
    }

    /// Number of arcs leaving `vertex`.
    pub fn out_degree(&self, vertex: &V) -> Result<usize> {
        Ok(self.nodes.node(self.index_of(vertex)?).out_degree())
    }

    /// Number of arcs entering `vertex`.
    pub fn in_degree(&self, vertex: &V) -> Result<usize> {
        Ok(self.nodes.node(self.index_of(vertex)?).in_degree())
    }

    // -----------------------------------------------------------------------
    // Iteration, algorithms
    // -----------------------------------------------------------------------

    /// A detached vertex cursor that fails once the graph is restructured.
    pub fn vertex_cursor(&self) -> VertexCursor {
        VertexCursor::new(self.id.0, self.modifications)
    }

    /// A detached edge cursor that fails once the graph is restructured.
    pub fn edge_cursor(&self) -> EdgeCursor {
        EdgeCursor::new(self.id.0, self.modifications)
    }

    /// Search and connectivity algorithms over this graph.
    pub fn algorithms(&mut self) -> Algorithms<'_, V, D> {
        Algorithms::new(self)
    }

    /// Advance the run stamp for a new search.
    ///
    /// On wraparound every node stamp is zeroed so no stale node can match.
    pub(crate) fn id(&self) -> u64 {
        self.id.0
    }

    pub(crate) fn next_run(&mut self) -> u32 {
        if self.run == u32::MAX {
            debug!("run stamp wrapped; resetting {} node stamps", self.nodes.len());
            for n in self.nodes.nodes_mut() {
                n.stamp = 0;
            }
            self.run = 0;
        }
        self.run += 1;
        self.run
    }

    // -----------------------------------------------------------------------
    // Handle helpers
    // -----------------------------------------------------------------------

    pub(crate) fn index_of(&self, vertex: &V) -> Result<usize> {
        self.nodes
            .get_index(vertex)
            .ok_or_else(|| GraphError::VertexNotInGraph(format!("{vertex:?}")))
    }

    pub(crate) fn index_pair(&self, a: &V, b: &V) -> Result<(usize, usize)> {
        match (self.nodes.get_index(a), self.nodes.get_index(b)) {
            (Some(ia), Some(ib)) => Ok((ia, ib)),
            (None, None) => Err(GraphError::VerticesNotInGraph { missing: 2, of: 2 }),
            (None, Some(_)) => Err(GraphError::VertexNotInGraph(format!("{a:?}"))),
            (Some(_), None) => Err(GraphError::VertexNotInGraph(format!("{b:?}"))),
        }
    }

    /// Drop every arc into or out of `idx`.
    fn detach(&mut self, idx: usize) {
        let out: Vec<usize> = self.nodes.node(idx).out.iter().map(|e| e.to).collect();
        let inc = self.nodes.node(idx).inc.clone();
        for &t in &out {
            self.nodes.node_mut(t).unlink_in(idx);
        }
        for &s in &inc {
            self.nodes.node_mut(s).unlink_out(idx);
        }
        self.edge_count -= if D::DIRECTED {
            out.len() + inc.len()
        } else {
            out.len()
        };
        let n = self.nodes.node_mut(idx);
        n.out.clear();
        n.inc.clear();
    }

    /// The node formerly at `old` now lives at `new`; fix its neighbours.
    fn relabel_moved(&mut self, old: usize, new: usize) {
        let moved = self.nodes.node(new);
        let mut touched: Vec<usize> = moved.out.iter().map(|e| e.to).collect();
        touched.extend_from_slice(&moved.inc);
        for t in touched {
            self.nodes.node_mut(t).relabel(old, new);
        }
    }
}

fn check_weight(weight: f32) -> Result<()> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(())
    } else {
        Err(GraphError::InvalidWeight(weight))
    }
}
