//! Grid geometry shared by the wayfind crates.
//!
//! This crate provides the small value types the graph engine and the
//! gradient-grid pathfinder agree on: integer [`Point`]s, half-open
//! [`Range`] rectangles, and the usual grid distance metrics.

pub mod distance;
pub mod geom;

pub use distance::{chebyshev, euclidean, manhattan, octile};
pub use geom::{Point, Range, RangeIter};
