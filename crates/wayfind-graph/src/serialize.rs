//! serde support for [`Graph`].
//!
//! A graph is written as
//!
//! ```text
//! { "directed": bool, "default_weight": f32,
//!   "vertices": [V, ...], "edges": [[from, to, weight], ...] }
//! ```
//!
//! Undirected edges appear once. Reading adds every vertex before replaying
//! any edge, so the usual [`GraphError`] checks apply to the input.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::node::Vertex;
use crate::policy::EdgePolicy;

#[derive(Serialize)]
struct GraphRef<'a, V> {
    directed: bool,
    default_weight: f32,
    vertices: Vec<&'a V>,
    edges: Vec<(&'a V, &'a V, f32)>,
}

#[derive(Deserialize)]
struct GraphData<V> {
    directed: bool,
    #[serde(default = "unit_weight")]
    default_weight: f32,
    vertices: Vec<Option<V>>,
    #[serde(default = "Vec::new")]
    edges: Vec<(Option<V>, Option<V>, f32)>,
}

fn unit_weight() -> f32 {
    1.0
}

impl<V: Vertex + Serialize, D: EdgePolicy> Serialize for Graph<V, D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GraphRef {
            directed: D::DIRECTED,
            default_weight: self.default_weight,
            vertices: self.vertices().collect(),
            edges: self.edges().map(|e| (e.from, e.to, e.weight)).collect(),
        }
        .serialize(serializer)
    }
}

impl<'de, V: Vertex + Deserialize<'de>, D: EdgePolicy> Deserialize<'de> for Graph<V, D> {
    fn deserialize<De: Deserializer<'de>>(deserializer: De) -> Result<Self, De::Error> {
        let data = GraphData::<V>::deserialize(deserializer)?;
        Self::from_data(data).map_err(de::Error::custom)
    }
}

impl<V: Vertex, D: EdgePolicy> Graph<V, D> {
    fn from_data(data: GraphData<V>) -> Result<Self> {
        if data.directed != D::DIRECTED {
            return Err(GraphError::DirectednessMismatch {
                expected: D::DIRECTED,
                found: data.directed,
            });
        }
        let mut g = Self::with_capacity(data.vertices.len());
        g.set_default_edge_weight(data.default_weight)?;
        for v in data.vertices {
            g.add_vertex(v.ok_or(GraphError::NullVertex)?)?;
        }
        for (a, b, w) in data.edges {
            let a = a.ok_or(GraphError::NullVertex)?;
            let b = b.ok_or(GraphError::NullVertex)?;
            g.add_edge_weighted(&a, &b, w)?;
        }
        Ok(g)
    }
}

#[cfg(test)]
mod tests {
    use crate::{DirectedGraph, UndirectedGraph};

    fn sample() -> UndirectedGraph<String> {
        let mut g = UndirectedGraph::new();
        g.add_vertices(["a", "b", "c", "d"].map(String::from)).unwrap();
        g.set_default_edge_weight(0.5).unwrap();
        g.add_edge(&"a".into(), &"b".into()).unwrap();
        g.add_edge_weighted(&"c".into(), &"b".into(), 3.0).unwrap();
        g
    }

    #[test]
    fn undirected_round_trip() {
        let g = sample();
        let json = serde_json::to_string(&g).unwrap();
        let back: UndirectedGraph<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.vertices().collect::<Vec<_>>(), g.vertices().collect::<Vec<_>>());
        assert_eq!(back.edge_count(), 2);
        assert_eq!(back.edge_weight(&"b".into(), &"c".into()), Some(3.0));
        assert_eq!(back.edge_weight(&"b".into(), &"a".into()), Some(0.5));
        assert_eq!(back.default_edge_weight(), 0.5);
        assert_eq!(back.number_of_components(), g.number_of_components());
    }

    #[test]
    fn wire_shape() {
        let mut g = DirectedGraph::new();
        g.add_vertices([1, 2]).unwrap();
        g.add_edge_weighted(&2, &1, 2.5).unwrap();
        let json = serde_json::to_value(&g).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "directed": true,
                "default_weight": 1.0,
                "vertices": [1, 2],
                "edges": [[2, 1, 2.5]],
            })
        );
    }

    #[test]
    fn null_vertex_is_rejected() {
        let err = serde_json::from_str::<DirectedGraph<u32>>(
            r#"{"directed": true, "vertices": [1, null], "edges": []}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("vertex cannot be null"));
    }

    #[test]
    fn unknown_endpoint_is_rejected() {
        let err = serde_json::from_str::<DirectedGraph<u32>>(
            r#"{"directed": true, "vertices": [1, 2], "edges": [[1, 7, 1.0]]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("vertex not in graph: 7"));
    }

    #[test]
    fn self_loop_is_rejected() {
        let err = serde_json::from_str::<DirectedGraph<u32>>(
            r#"{"directed": true, "vertices": [1], "edges": [[1, 1, 1.0]]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("self-loops"));
    }

    #[test]
    fn directedness_must_match() {
        let json = serde_json::to_string(&sample()).unwrap();
        let err = serde_json::from_str::<DirectedGraph<String>>(&json).unwrap_err();
        assert!(
            err.to_string()
                .contains("expected directed graph, found undirected graph")
        );
    }
}
