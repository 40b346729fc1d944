use std::collections::VecDeque;

use crate::algorithms::Algorithms;
use crate::error::Result;
use crate::node::Vertex;
use crate::path::Path;
use crate::policy::EdgePolicy;

impl<V: Vertex, D: EdgePolicy> Algorithms<'_, V, D> {
    /// Breadth-first traversal from `start`.
    ///
    /// Returns the vertices in visit order, `start` first. At most
    /// `max_vertices` vertices are visited and none further than `max_depth`
    /// edges from `start`. The path length is the total weight of the edges
    /// through which vertices were discovered.
    pub fn breadth_first_search(
        &mut self,
        start: &V,
        max_vertices: usize,
        max_depth: u32,
    ) -> Result<Path<V>> {
        let si = self.graph.index_of(start)?;
        if max_vertices == 0 {
            return Ok(Path::new(Vec::new(), 0.0));
        }
        let run = self.graph.next_run();
        let nodes = &mut self.graph.nodes;

        let mut order = vec![nodes.node(si).vertex().clone()];
        let mut length = 0.0;
        {
            let n = nodes.node_mut(si);
            n.stamp = run;
            n.depth = 0;
        }
        let mut queue = VecDeque::from([si]);

        'outer: while let Some(ci) = queue.pop_front() {
            let depth = nodes.node(ci).depth;
            if depth >= max_depth {
                continue;
            }
            for k in 0..nodes.node(ci).out.len() {
                let e = nodes.node(ci).out[k];
                let n = nodes.node_mut(e.to);
                if n.stamp == run {
                    continue;
                }
                n.stamp = run;
                n.depth = depth + 1;
                order.push(n.vertex().clone());
                length += e.weight;
                if order.len() >= max_vertices {
                    break 'outer;
                }
                queue.push_back(e.to);
            }
        }
        Ok(Path::new(order, length))
    }

    /// Depth-first (preorder) traversal from `start`.
    ///
    /// Neighbours are explored in adjacency order, matching a recursive
    /// walk. Limits and path length behave as in
    /// [`breadth_first_search`](Self::breadth_first_search).
    pub fn depth_first_search(
        &mut self,
        start: &V,
        max_vertices: usize,
        max_depth: u32,
    ) -> Result<Path<V>> {
        let si = self.graph.index_of(start)?;
        let run = self.graph.next_run();
        let nodes = &mut self.graph.nodes;

        let mut order = Vec::new();
        let mut length = 0.0;
        // (node, depth, weight of the discovering edge)
        let mut stack = vec![(si, 0u32, 0.0f32)];

        while let Some((ci, depth, weight)) = stack.pop() {
            if order.len() >= max_vertices {
                break;
            }
            let n = nodes.node_mut(ci);
            if n.stamp == run {
                continue;
            }
            n.stamp = run;
            n.depth = depth;
            order.push(n.vertex().clone());
            length += weight;
            if depth >= max_depth {
                continue;
            }
            let n = nodes.node(ci);
            for e in n.out.iter().rev() {
                if nodes.node(e.to).stamp != run {
                    stack.push((e.to, depth + 1, e.weight));
                }
            }
        }
        Ok(Path::new(order, length))
    }
}
