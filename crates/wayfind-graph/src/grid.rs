//! Building graphs from 2D grids.
//!
//! Rows are indexed `[y][x]`: row `y` of the input becomes the vertices
//! `Point::new(x, y)`. Only passable cells become vertices; call
//! [`Graph::connect_adjacent`] afterwards to install the moves.

use wayfind_core::Point;

use crate::error::Result;
use crate::graph::Graph;
use crate::policy::EdgePolicy;

/// Weight function for grid moves, called with the two cell positions.
pub type GridHeuristic<'a> = &'a dyn Fn(Point, Point) -> f32;

fn cells<'r, R, T, F>(rows: &'r [R], passable: F) -> impl Iterator<Item = Point> + 'r
where
    R: AsRef<[T]>,
    T: Copy + 'r,
    F: Fn(T) -> bool + Copy + 'r,
{
    rows.iter().enumerate().flat_map(move |(y, row)| {
        row.as_ref()
            .iter()
            .enumerate()
            .filter(move |&(_, &c)| passable(c))
            .map(move |(x, _)| Point::new(x as i32, y as i32))
    })
}

fn char_cells<S: AsRef<str>>(rows: &[S], passable: char) -> impl Iterator<Item = Point> + '_ {
    rows.iter().enumerate().flat_map(move |(y, row)| {
        row.as_ref()
            .chars()
            .enumerate()
            .filter(move |&(_, c)| c == passable)
            .map(move |(x, _)| Point::new(x as i32, y as i32))
    })
}

impl<D: EdgePolicy> Graph<Point, D> {
    /// A graph with a vertex for every `true` cell.
    pub fn from_bool_grid<R: AsRef<[bool]>>(rows: &[R]) -> Self {
        let mut g = Self::new();
        g.put_all(cells(rows, |c| c));
        g
    }

    /// A graph with a vertex for every cell equal to `passable`.
    pub fn from_char_grid<S: AsRef<str>>(rows: &[S], passable: char) -> Self {
        let mut g = Self::new();
        g.put_all(char_cells(rows, passable));
        g
    }

    /// A graph with a vertex for every cell within `lower..=upper`.
    pub fn from_float_grid<R: AsRef<[f32]>>(rows: &[R], lower: f32, upper: f32) -> Self {
        let mut g = Self::new();
        g.put_all(cells(rows, |c| (lower..=upper).contains(&c)));
        g
    }

    /// Add the `true` cells of `rows`; returns how many were new.
    pub fn add_bool_grid<R: AsRef<[bool]>>(&mut self, rows: &[R]) -> Result<usize> {
        self.add_vertices(cells(rows, |c| c))
    }

    pub fn add_char_grid<S: AsRef<str>>(&mut self, rows: &[S], passable: char) -> Result<usize> {
        self.add_vertices(char_cells(rows, passable))
    }

    pub fn add_float_grid<R: AsRef<[f32]>>(
        &mut self,
        rows: &[R],
        lower: f32,
        upper: f32,
    ) -> Result<usize> {
        self.add_vertices(cells(rows, |c| (lower..=upper).contains(&c)))
    }

    /// Connect every vertex to its neighbouring vertices.
    ///
    /// Cardinal neighbours are always considered; diagonal ones only when
    /// `permit_diagonal` is set. Each edge is weighted by `heuristic` when
    /// given, otherwise by the default edge weight. Existing edges keep
    /// their weight. Returns the number of edges added.
    pub fn connect_adjacent(
        &mut self,
        heuristic: Option<GridHeuristic<'_>>,
        permit_diagonal: bool,
    ) -> Result<usize> {
        let points: Vec<Point> = self.vertices().copied().collect();
        let mut added = 0;
        for p in points {
            // neighbors_8 lists the cardinals first.
            let around = p.neighbors_8();
            let around = if permit_diagonal { &around[..] } else { &around[..4] };
            for &q in around {
                if !self.contains_vertex(&q) || self.edge_exists(&p, &q) {
                    continue;
                }
                let weight = match heuristic {
                    Some(h) => h(p, q),
                    None => self.default_weight,
                };
                if self.add_edge_weighted(&p, &q, weight)? {
                    added += 1;
                }
            }
        }
        Ok(added)
    }
}
