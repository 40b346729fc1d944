//! Connectivity, cycles, orderings and spanning trees.
//!
//! Components are weak for directed graphs: arcs are followed in both
//! directions. Strong components are available through
//! [`Algorithms::strongly_connected_components`].

use std::collections::VecDeque;

use log::debug;

use crate::algorithms::Algorithms;
use crate::disjoint_set::DisjointSet;
use crate::error::{GraphError, Result};
use crate::graph::{Graph, UndirectedGraph};
use crate::node::{Node, Vertex};
use crate::policy::{Directed, EdgePolicy, Undirected};

impl<V: Vertex, D: EdgePolicy> Graph<V, D> {
    /// Number of connected components (weakly connected for directed
    /// graphs). An empty graph has none.
    pub fn number_of_components(&self) -> usize {
        self.component_sets().sets()
    }

    fn component_sets(&self) -> DisjointSet {
        let nodes = self.nodes.nodes();
        let mut ds = DisjointSet::new(nodes.len());
        for (i, n) in nodes.iter().enumerate() {
            for e in &n.out {
                ds.union(i, e.to);
            }
        }
        ds
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InStack,
    Finished,
}

impl<V: Vertex, D: EdgePolicy> Algorithms<'_, V, D> {
    /// Vertices grouped by component, each group in graph order and groups
    /// ordered by their first vertex.
    pub fn connected_components(&self) -> Vec<Vec<V>> {
        let nodes = self.graph.nodes.nodes();
        let mut ds = self.graph.component_sets();
        let mut slot = vec![usize::MAX; nodes.len()];
        let mut groups: Vec<Vec<V>> = Vec::new();
        for (i, n) in nodes.iter().enumerate() {
            let root = ds.find(i);
            if slot[root] == usize::MAX {
                slot[root] = groups.len();
                groups.push(Vec::new());
            }
            groups[slot[root]].push(n.vertex().clone());
        }
        groups
    }

    /// Whether every vertex can reach every other, ignoring direction.
    /// Graphs with fewer than two vertices are connected.
    pub fn is_connected(&self) -> bool {
        self.graph.number_of_components() <= 1
    }

    /// Whether the graph contains a cycle.
    ///
    /// For undirected graphs a single edge is not a cycle; two paths
    /// between the same pair of vertices are.
    pub fn detect_cycle(&self) -> bool {
        let nodes = self.graph.nodes.nodes();
        if D::DIRECTED {
            directed_cycle(nodes)
        } else {
            let mut ds = DisjointSet::new(nodes.len());
            nodes.iter().enumerate().any(|(i, n)| {
                n.out.iter().filter(|e| i < e.to).any(|e| !ds.union(i, e.to))
            })
        }
    }
}

/// Iterative three-colour depth-first search for a back arc.
fn directed_cycle<V>(nodes: &[Node<V>]) -> bool {
    let mut mark = vec![Mark::Unvisited; nodes.len()];
    for root in 0..nodes.len() {
        if mark[root] != Mark::Unvisited {
            continue;
        }
        mark[root] = Mark::InStack;
        let mut stack = vec![(root, 0usize)];
        while let Some(top) = stack.last_mut() {
            let (u, k) = *top;
            match nodes[u].out.get(k) {
                Some(e) => {
                    top.1 += 1;
                    match mark[e.to] {
                        Mark::InStack => return true,
                        Mark::Unvisited => {
                            mark[e.to] = Mark::InStack;
                            stack.push((e.to, 0));
                        }
                        Mark::Finished => {}
                    }
                }
                None => {
                    mark[u] = Mark::Finished;
                    stack.pop();
                }
            }
        }
    }
    false
}

impl<V: Vertex> Algorithms<'_, V, Directed> {
    /// Vertices ordered so every edge points forward.
    ///
    /// Kahn's algorithm; among vertices that become free at the same time,
    /// graph order wins. Fails with [`GraphError::CyclicGraph`].
    pub fn topological_sort(&self) -> Result<Vec<V>> {
        let nodes = self.graph.nodes.nodes();
        Ok(self
            .topological_order()?
            .into_iter()
            .map(|i| nodes[i].vertex().clone())
            .collect())
    }

    /// Reorder the graph's vertices into topological order.
    pub fn sort_topologically(&mut self) -> Result<()> {
        let order = self.topological_order()?;
        self.graph.reorder(&order)
    }

    fn topological_order(&self) -> Result<Vec<usize>> {
        let nodes = self.graph.nodes.nodes();
        let mut pending: Vec<usize> = nodes.iter().map(Node::in_degree).collect();
        let mut queue: VecDeque<usize> = (0..nodes.len()).filter(|&i| pending[i] == 0).collect();
        let mut order = Vec::with_capacity(nodes.len());
        while let Some(u) = queue.pop_front() {
            order.push(u);
            for e in &nodes[u].out {
                pending[e.to] -= 1;
                if pending[e.to] == 0 {
                    queue.push_back(e.to);
                }
            }
        }
        if order.len() != nodes.len() {
            debug!(
                "topological sort: {} of {} vertices lie on or behind a cycle",
                nodes.len() - order.len(),
                nodes.len()
            );
            return Err(GraphError::CyclicGraph);
        }
        Ok(order)
    }

    /// Strongly connected components (Kosaraju).
    ///
    /// Components come out in topological order of the condensation, so a
    /// component only has arcs into components listed after it.
    pub fn strongly_connected_components(&self) -> Vec<Vec<V>> {
        let nodes = self.graph.nodes.nodes();
        let n = nodes.len();

        // Pass 1: finish order over forward arcs.
        let mut seen = vec![false; n];
        let mut finished = Vec::with_capacity(n);
        for root in 0..n {
            if seen[root] {
                continue;
            }
            seen[root] = true;
            let mut stack = vec![(root, 0usize)];
            while let Some(top) = stack.last_mut() {
                let (u, k) = *top;
                match nodes[u].out.get(k) {
                    Some(e) => {
                        top.1 += 1;
                        if !seen[e.to] {
                            seen[e.to] = true;
                            stack.push((e.to, 0));
                        }
                    }
                    None => {
                        finished.push(u);
                        stack.pop();
                    }
                }
            }
        }

        // Pass 2: collect over reversed arcs in reverse finish order.
        let mut assigned = vec![false; n];
        let mut components = Vec::new();
        for &root in finished.iter().rev() {
            if assigned[root] {
                continue;
            }
            assigned[root] = true;
            let mut component = Vec::new();
            let mut stack = vec![root];
            while let Some(u) = stack.pop() {
                component.push(nodes[u].vertex().clone());
                for &s in &nodes[u].inc {
                    if !assigned[s] {
                        assigned[s] = true;
                        stack.push(s);
                    }
                }
            }
            components.push(component);
        }
        components
    }
}

impl<V: Vertex> Algorithms<'_, V, Undirected> {
    /// Minimum spanning forest (Kruskal).
    ///
    /// The result holds every vertex, in the same order, and one tree per
    /// component. Among equal weights the edge reported first by
    /// [`Graph::edges`] is preferred.
    pub fn minimum_spanning_tree(&self) -> UndirectedGraph<V> {
        let graph = &*self.graph;
        let nodes = graph.nodes.nodes();
        let mut edges: Vec<(usize, usize, f32)> = nodes
            .iter()
            .enumerate()
            .flat_map(|(i, n)| {
                n.out
                    .iter()
                    .filter(move |e| i < e.to)
                    .map(move |e| (i, e.to, e.weight))
            })
            .collect();
        edges.sort_by(|a, b| a.2.total_cmp(&b.2));

        let mut tree = UndirectedGraph::with_config(graph.config());
        tree.default_weight = graph.default_weight;
        tree.put_all(nodes.iter().map(|n| n.vertex().clone()));

        let mut ds = DisjointSet::new(nodes.len());
        for (a, b, w) in edges {
            if ds.union(a, b) {
                tree.link_pair(a, b, w);
            }
        }
        tree
    }
}
