use std::ops::{Deref, Index};

/// An ordered sequence of vertices with its cumulative length.
///
/// Shortest-path searches return the vertices from start to goal inclusive
/// and the summed edge weight. Traversals return the visit order and the
/// total weight of the edges they discovered vertices through. A `Path` is
/// never modified after it is returned.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path<V> {
    vertices: Vec<V>,
    length: f32,
}

impl<V> Path<V> {
    pub(crate) fn new(vertices: Vec<V>, length: f32) -> Self {
        Self { vertices, length }
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Total weight along the path.
    #[inline]
    pub fn length(&self) -> f32 {
        self.length
    }

    #[inline]
    pub fn first(&self) -> Option<&V> {
        self.vertices.first()
    }

    #[inline]
    pub fn last(&self) -> Option<&V> {
        self.vertices.last()
    }

    #[inline]
    pub fn as_slice(&self) -> &[V] {
        &self.vertices
    }

    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.vertices.iter()
    }

    pub fn into_vec(self) -> Vec<V> {
        self.vertices
    }
}

impl<V> Deref for Path<V> {
    type Target = [V];

    fn deref(&self) -> &[V] {
        &self.vertices
    }
}

impl<V> Index<usize> for Path<V> {
    type Output = V;

    fn index(&self, i: usize) -> &V {
        &self.vertices[i]
    }
}

impl<V> IntoIterator for Path<V> {
    type Item = V;
    type IntoIter = std::vec::IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        self.vertices.into_iter()
    }
}

impl<'a, V> IntoIterator for &'a Path<V> {
    type Item = &'a V;
    type IntoIter = std::slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.vertices.iter()
    }
}
