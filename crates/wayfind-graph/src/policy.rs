//! Directedness policies for [`Graph`](crate::Graph).
//!
//! A graph's edge mirroring is selected by a zero-sized policy type rather
//! than by subclassing: `Graph<V, Directed>` stores each edge once, while
//! `Graph<V, Undirected>` stores every logical edge as a pair of arcs.

mod sealed {
    pub trait Sealed {}
}

/// Strategy selecting how edges are stored and mirrored.
pub trait EdgePolicy: sealed::Sealed + Copy + Default + std::fmt::Debug + 'static {
    /// Whether arcs are one-way.
    const DIRECTED: bool;
}

/// One-way edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Directed;

/// Two-way edges; each logical edge is installed as a mirrored pair of arcs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Undirected;

impl sealed::Sealed for Directed {}
impl sealed::Sealed for Undirected {}

impl EdgePolicy for Directed {
    const DIRECTED: bool = true;
}

impl EdgePolicy for Undirected {
    const DIRECTED: bool = false;
}
