//! Weighted graphs and shortest-path search for simulations and games.
//!
//! Build a [`Graph`] over any hashable vertex type, then query it through
//! [`Graph::algorithms`]:
//!
//! - **Dijkstra** and **A\*** shortest paths ([`Algorithms::find_shortest_path`],
//!   [`Algorithms::find_shortest_path_with`]), optionally observed step by step
//! - **BFS / DFS** traversals ([`Algorithms::breadth_first_search`],
//!   [`Algorithms::depth_first_search`])
//! - **Connectivity**: components, cycles, topological order, strong
//!   components and minimum spanning trees
//!
//! Vertices live in a [`NodeMap`], an open-addressing table that owns one
//! [`Node`] per vertex. Searches write their scratch state into the nodes
//! tagged with a per-graph run stamp, so nothing is cleared between runs.
//!
//! ```
//! use wayfind_graph::UndirectedGraph;
//!
//! let mut g = UndirectedGraph::new();
//! g.add_vertices(["a", "b", "c"])?;
//! g.add_edge(&"a", &"b")?;
//! g.add_edge_weighted(&"b", &"c", 2.0)?;
//!
//! let path = g.algorithms().find_shortest_path(&"a", &"c")?.unwrap();
//! assert_eq!(path.as_slice(), &["a", "b", "c"]);
//! assert_eq!(path.length(), 3.0);
//! # Ok::<(), wayfind_graph::GraphError>(())
//! ```
//!
//! # Type overview
//!
//! | Type | Role |
//! |---|---|
//! | [`Graph`]`<V, D>` | vertices and weighted edges, policy `D` |
//! | [`Directed`] / [`Undirected`] | [`EdgePolicy`] for one-way or mirrored edges |
//! | [`Algorithms`] | searches borrowing a graph mutably |
//! | [`Path`] | search result: vertices plus total length |
//! | [`VertexCursor`] / [`EdgeCursor`] | fail-fast iteration across mutation |
//!
//! Enable the `serde` feature to serialize graphs and paths.

mod algorithms;
mod cursor;
mod disjoint_set;
mod error;
mod graph;
mod grid;
mod node;
mod node_map;
mod path;
mod policy;
#[cfg(feature = "serde")]
mod serialize;
mod structure;
mod traversal;

pub use algorithms::{Algorithms, SearchStep};
pub use cursor::{EdgeCursor, VertexCursor};
pub use error::{GraphError, Result};
pub use graph::{DirectedGraph, Graph, UndirectedGraph};
pub use grid::GridHeuristic;
pub use node::{Edge, EdgeRef, Node, Vertex};
pub use node_map::{NodeMap, NodeMapConfig, Removal};
pub use path::Path;
pub use policy::{Directed, EdgePolicy, Undirected};
pub use wayfind_core::Point;
