use std::fmt::Debug;
use std::hash::Hash;

/// Bound for values usable as graph vertices.
///
/// Vertices are compared by `Eq` and located by `Hash`; `Debug` is used to
/// name them in errors.
pub trait Vertex: Hash + Eq + Clone + Debug {}

impl<T: Hash + Eq + Clone + Debug> Vertex for T {}

/// Handle value meaning "no node" (no parent, no predecessor).
pub(crate) const NONE: usize = usize::MAX;

/// A directed arc to another node, stored in its source's adjacency list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub(crate) to: usize,
    pub(crate) weight: f32,
}

impl Edge {
    /// Arena handle of the target node.
    #[inline]
    pub fn to(&self) -> usize {
        self.to
    }

    /// Weight of the arc.
    #[inline]
    pub fn weight(&self) -> f32 {
        self.weight
    }
}

/// A borrowed view of one logical edge, returned from graph queries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRef<'a, V> {
    pub from: &'a V,
    pub to: &'a V,
    pub weight: f32,
}

/// Per-vertex wrapper owned by a [`NodeMap`](crate::NodeMap).
///
/// Besides adjacency, a node carries scratch state written by
/// [`Algorithms`](crate::Algorithms). Scratch values are only meaningful
/// while `stamp` equals the run counter of the search that wrote them.
#[derive(Debug, Clone)]
pub struct Node<V> {
    pub(crate) vertex: V,
    pub(crate) hash: u64,
    pub(crate) out: Vec<Edge>,
    pub(crate) inc: Vec<usize>,
    // search scratch
    pub(crate) distance: f32,
    pub(crate) estimate: f32,
    pub(crate) parent: usize,
    pub(crate) depth: u32,
    pub(crate) stamp: u32,
    pub(crate) open: bool,
}

impl<V> Node<V> {
    pub(crate) fn new(vertex: V, hash: u64) -> Self {
        Self {
            vertex,
            hash,
            out: Vec::new(),
            inc: Vec::new(),
            distance: 0.0,
            estimate: 0.0,
            parent: NONE,
            depth: 0,
            stamp: 0,
            open: false,
        }
    }

    /// The vertex this node wraps.
    #[inline]
    pub fn vertex(&self) -> &V {
        &self.vertex
    }

    /// Outgoing arcs. Undirected graphs store both directions of every edge,
    /// so this is the full neighbourhood there.
    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.out
    }

    /// Handles of nodes with an arc into this one.
    #[inline]
    pub fn incoming(&self) -> &[usize] {
        &self.inc
    }

    #[inline]
    pub fn out_degree(&self) -> usize {
        self.out.len()
    }

    #[inline]
    pub fn in_degree(&self) -> usize {
        self.inc.len()
    }

    /// Position of the arc to `to` in the adjacency list.
    #[inline]
    pub(crate) fn arc_to(&self, to: usize) -> Option<usize> {
        self.out.iter().position(|e| e.to == to)
    }

    /// Drop the arc to `to`; returns whether one existed.
    pub(crate) fn unlink_out(&mut self, to: usize) -> bool {
        match self.arc_to(to) {
            Some(i) => {
                self.out.remove(i);
                true
            }
            None => false,
        }
    }

    pub(crate) fn unlink_in(&mut self, from: usize) {
        if let Some(i) = self.inc.iter().position(|&s| s == from) {
            self.inc.remove(i);
        }
    }

    /// Rewrite every handle equal to `old` into `new`.
    pub(crate) fn relabel(&mut self, old: usize, new: usize) {
        for e in self.out.iter_mut() {
            if e.to == old {
                e.to = new;
            }
        }
        for s in self.inc.iter_mut() {
            if *s == old {
                *s = new;
            }
        }
    }
}
