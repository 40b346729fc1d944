//! Shortest-path search over a [`Graph`].
//!
//! [`Algorithms`] borrows its graph mutably: searches write per-node scratch
//! state (distance, estimate, parent) tagged with the graph's run stamp, so
//! no node has to be cleared between searches.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::ops::ControlFlow;

use crate::error::Result;
use crate::graph::Graph;
use crate::node::{NONE, Vertex};
use crate::path::Path;
use crate::policy::EdgePolicy;

/// State of a node at the moment a search settles it.
#[derive(Debug, Clone, Copy)]
pub struct SearchStep<'a, V> {
    pub vertex: &'a V,
    /// Cost of the best known route from the start.
    pub distance: f32,
    /// Heuristic estimate of the remaining cost (0 for Dijkstra).
    pub estimate: f32,
    /// Predecessor on the best known route; `None` for the start.
    pub parent: Option<&'a V>,
    /// Number of nodes settled so far, this one included.
    pub settled: usize,
    pub is_goal: bool,
}

/// Open-list entry ordered by priority, then by insertion sequence.
///
/// Equal priorities pop in insertion order. This tie-break is an
/// implementation detail, not a contract.
#[derive(Clone, Copy)]
pub(crate) struct Frontier {
    pub(crate) priority: f32,
    pub(crate) seq: u64,
    pub(crate) idx: usize,
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest priority first.
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Found,
    Exhausted,
    Aborted,
}

/// Search, traversal and connectivity queries over one graph.
pub struct Algorithms<'g, V, D> {
    pub(crate) graph: &'g mut Graph<V, D>,
}

impl<'g, V: Vertex, D: EdgePolicy> Algorithms<'g, V, D> {
    pub(crate) fn new(graph: &'g mut Graph<V, D>) -> Self {
        Self { graph }
    }

    /// The graph being searched.
    pub fn graph(&self) -> &Graph<V, D> {
        &*self.graph
    }

    /// Dijkstra's shortest path from `start` to `goal`.
    ///
    /// Returns `Ok(None)` when `goal` is unreachable. Fails only if either
    /// vertex is absent.
    pub fn find_shortest_path(&mut self, start: &V, goal: &V) -> Result<Option<Path<V>>> {
        self.find_shortest_path_observed(start, goal, |_| ControlFlow::Continue(()))
    }

    /// A* shortest path guided by `heuristic(vertex, goal)`.
    ///
    /// The result is optimal only when the heuristic never overestimates
    /// the remaining cost; this is not checked.
    pub fn find_shortest_path_with<H>(
        &mut self,
        start: &V,
        goal: &V,
        heuristic: H,
    ) -> Result<Option<Path<V>>>
    where
        H: Fn(&V, &V) -> f32,
    {
        self.find_shortest_path_with_observed(start, goal, heuristic, |_| ControlFlow::Continue(()))
    }

    /// Dijkstra search reporting each settled node to `step`.
    pub fn find_shortest_path_observed<F>(
        &mut self,
        start: &V,
        goal: &V,
        step: F,
    ) -> Result<Option<Path<V>>>
    where
        F: FnMut(&SearchStep<'_, V>) -> ControlFlow<()>,
    {
        self.find_shortest_path_with_observed(start, goal, |_, _| 0.0, step)
    }

    /// A* search reporting each settled node to `step`.
    ///
    /// `step` is called once per settled node, the goal included. Returning
    /// [`ControlFlow::Break`] abandons the search with `Ok(None)`.
    pub fn find_shortest_path_with_observed<H, F>(
        &mut self,
        start: &V,
        goal: &V,
        heuristic: H,
        step: F,
    ) -> Result<Option<Path<V>>>
    where
        H: Fn(&V, &V) -> f32,
        F: FnMut(&SearchStep<'_, V>) -> ControlFlow<()>,
    {
        let (s, g) = self.graph.index_pair(start, goal)?;
        match self.search(s, g, heuristic, step) {
            Outcome::Found => Ok(Some(self.reconstruct(g))),
            Outcome::Exhausted | Outcome::Aborted => Ok(None),
        }
    }

    /// Total weight of the shortest path, without building it.
    pub fn find_minimum_distance(&mut self, start: &V, goal: &V) -> Result<Option<f32>> {
        let (s, g) = self.graph.index_pair(start, goal)?;
        let outcome = self.search(s, g, |_, _| 0.0, |_| ControlFlow::Continue(()));
        Ok((outcome == Outcome::Found).then(|| self.graph.nodes.node(g).distance))
    }

    /// Whether any path leads from `start` to `goal`.
    pub fn is_reachable(&mut self, start: &V, goal: &V) -> Result<bool> {
        Ok(self.find_minimum_distance(start, goal)?.is_some())
    }

    fn search<H, F>(&mut self, start: usize, goal: usize, heuristic: H, mut step: F) -> Outcome
    where
        H: Fn(&V, &V) -> f32,
        F: FnMut(&SearchStep<'_, V>) -> ControlFlow<()>,
    {
        let run = self.graph.next_run();
        let nodes = &mut self.graph.nodes;
        let goal_vertex = nodes.node(goal).vertex().clone();

        let start_estimate = heuristic(nodes.node(start).vertex(), &goal_vertex);
        {
            let n = nodes.node_mut(start);
            n.distance = 0.0;
            n.estimate = start_estimate;
            n.parent = NONE;
            n.stamp = run;
            n.open = true;
        }

        let mut open = BinaryHeap::new();
        let mut seq = 0u64;
        open.push(Frontier {
            priority: start_estimate,
            seq,
            idx: start,
        });
        let mut settled = 0usize;

        while let Some(current) = open.pop() {
            let ci = current.idx;
            let n = nodes.node(ci);
            // Skip stale entries.
            if n.stamp != run || !n.open || current.priority > n.distance + n.estimate {
                continue;
            }
            let current_g = n.distance;
            nodes.node_mut(ci).open = false;
            settled += 1;

            let n = nodes.node(ci);
            let info = SearchStep {
                vertex: n.vertex(),
                distance: current_g,
                estimate: n.estimate,
                parent: (n.parent != NONE).then(|| nodes.node(n.parent).vertex()),
                settled,
                is_goal: ci == goal,
            };
            if step(&info).is_break() {
                return Outcome::Aborted;
            }
            if ci == goal {
                return Outcome::Found;
            }

            for k in 0..nodes.node(ci).out.len() {
                let e = nodes.node(ci).out[k];
                let tentative = current_g + e.weight;
                let target = nodes.node(e.to);
                let fresh = target.stamp != run;
                if !fresh && tentative >= target.distance {
                    continue;
                }
                let estimate = if fresh {
                    heuristic(target.vertex(), &goal_vertex)
                } else {
                    target.estimate
                };

                let n = nodes.node_mut(e.to);
                n.stamp = run;
                n.distance = tentative;
                n.estimate = estimate;
                n.parent = ci;
                n.open = true;
                seq += 1;
                open.push(Frontier {
                    priority: tentative + estimate,
                    seq,
                    idx: e.to,
                });
            }
        }
        Outcome::Exhausted
    }

    /// Follow parent links back from `goal` and reverse.
    fn reconstruct(&self, goal: usize) -> Path<V> {
        let nodes = &self.graph.nodes;
        let mut vertices = Vec::new();
        let mut ci = goal;
        while ci != NONE {
            let n = nodes.node(ci);
            vertices.push(n.vertex().clone());
            ci = n.parent;
        }
        vertices.reverse();
        Path::new(vertices, nodes.node(goal).distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DirectedGraph, GraphError, UndirectedGraph};

    fn weighted(edges: &[(char, char, f32)]) -> DirectedGraph<char> {
        let mut g = DirectedGraph::new();
        for &(a, b, w) in edges {
            g.add_vertex(a).unwrap();
            g.add_vertex(b).unwrap();
            g.add_edge_weighted(&a, &b, w).unwrap();
        }
        g
    }

    #[test]
    fn dijkstra_prefers_cheaper_detour() {
        let mut g = weighted(&[('a', 'b', 4.0), ('a', 'c', 1.0), ('c', 'b', 2.0), ('b', 'd', 1.0)]);
        let path = g.algorithms().find_shortest_path(&'a', &'d').unwrap().unwrap();
        assert_eq!(path.as_slice(), &['a', 'c', 'b', 'd']);
        assert_eq!(path.length(), 4.0);
    }

    #[test]
    fn unreachable_goal_is_not_an_error() {
        let mut g = weighted(&[('a', 'b', 1.0), ('c', 'b', 1.0)]);
        assert_eq!(g.algorithms().find_shortest_path(&'a', &'c').unwrap(), None);
        assert_eq!(g.algorithms().find_minimum_distance(&'b', &'a').unwrap(), None);
        assert!(!g.algorithms().is_reachable(&'a', &'c').unwrap());
    }

    #[test]
    fn missing_vertex_is_an_error() {
        let mut g = weighted(&[('a', 'b', 1.0)]);
        assert_eq!(
            g.algorithms().find_shortest_path(&'a', &'z'),
            Err(GraphError::VertexNotInGraph("'z'".into()))
        );
    }

    #[test]
    fn start_equals_goal() {
        let mut g = weighted(&[('a', 'b', 1.0)]);
        let path = g.algorithms().find_shortest_path(&'a', &'a').unwrap().unwrap();
        assert_eq!(path.as_slice(), &['a']);
        assert_eq!(path.length(), 0.0);
    }

    #[test]
    fn astar_matches_dijkstra_on_a_line() {
        let mut g = UndirectedGraph::new();
        g.add_vertices(0..10).unwrap();
        for i in 0..9 {
            g.add_edge(&i, &(i + 1)).unwrap();
        }
        g.add_edge_weighted(&0, &9, 20.0).unwrap();
        let h = |a: &i32, b: &i32| (a - b).abs() as f32;
        let a = g.algorithms().find_shortest_path_with(&0, &9, h).unwrap().unwrap();
        let d = g.algorithms().find_shortest_path(&0, &9).unwrap().unwrap();
        assert_eq!(a.length(), 9.0);
        assert_eq!(a, d);
    }

    #[test]
    fn repeated_searches_ignore_stale_scratch() {
        let mut g = weighted(&[('a', 'b', 1.0), ('b', 'c', 1.0), ('x', 'c', 1.0)]);
        assert!(g.algorithms().find_shortest_path(&'a', &'c').unwrap().is_some());
        // 'b' and 'c' carry scratch from the previous run; 'x' cannot reach 'a'.
        assert_eq!(g.algorithms().find_shortest_path(&'x', &'a').unwrap(), None);
        let p = g.algorithms().find_shortest_path(&'x', &'c').unwrap().unwrap();
        assert_eq!(p.as_slice(), &['x', 'c']);
    }

    #[test]
    fn observer_sees_settled_nodes_in_order() {
        let mut g = weighted(&[('a', 'b', 1.0), ('b', 'c', 1.0), ('a', 'c', 5.0)]);
        let mut seen = Vec::new();
        let path = g
            .algorithms()
            .find_shortest_path_observed(&'a', &'c', |s| {
                seen.push((*s.vertex, s.distance, s.parent.copied(), s.is_goal));
                ControlFlow::Continue(())
            })
            .unwrap()
            .unwrap();
        assert_eq!(path.length(), 2.0);
        assert_eq!(
            seen,
            vec![
                ('a', 0.0, None, false),
                ('b', 1.0, Some('a'), false),
                ('c', 2.0, Some('b'), true),
            ]
        );
    }

    #[test]
    fn observer_can_abort() {
        let mut g = weighted(&[('a', 'b', 1.0), ('b', 'c', 1.0)]);
        let result = g
            .algorithms()
            .find_shortest_path_observed(&'a', &'c', |s| {
                if s.settled == 2 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap();
        assert_eq!(result, None);
    }

    #[test]
    fn equal_priorities_pop_in_insertion_order() {
        let mut heap = BinaryHeap::new();
        for (seq, idx) in [(0, 7), (1, 3), (2, 5)] {
            heap.push(Frontier {
                priority: 1.0,
                seq,
                idx,
            });
        }
        heap.push(Frontier {
            priority: 0.5,
            seq: 3,
            idx: 9,
        });
        let order: Vec<_> = std::iter::from_fn(|| heap.pop().map(|f| f.idx)).collect();
        assert_eq!(order, vec![9, 7, 3, 5]);
    }
}
