//! Incremental multi-goal distance fields for grid-based games.
//!
//! A [`GradientGrid`] floods outward from every goal at once and records,
//! for each cell, the cost of reaching the nearest goal. Walking downhill
//! over that field from any start gives a shortest path to whichever goal
//! is closest. Scans can be spread over several frames with
//! [`GradientGrid::partial_scan`].
//!
//! ```
//! use wayfind_paths::{GradientGrid, Point};
//!
//! let mut grid = GradientGrid::from_char_grid(&["....", ".##.", "...."], '#');
//! grid.set_goals([Point::new(0, 0), Point::new(3, 2)]);
//! grid.scan(&[]);
//!
//! let path = grid.find_path_pre_scanned(Point::new(2, 2));
//! assert_eq!(path.last(), Some(&Point::new(3, 2)));
//! assert_eq!(grid.distance_at(Point::new(2, 2)), Some(1.0));
//! ```
//!
//! | Type | Role |
//! |---|---|
//! | [`GradientGrid`] | terrain, goals and the distance field |
//! | [`GradientConfig`] | measurement and corner-cutting rule |
//! | [`Measurement`] | 4-way, 8-way or 8-way with √2 diagonals |
//! | [`ScanState`] | progress of the current scan |

mod gradient;
mod measurement;

pub use gradient::{GradientGrid, ScanState};
pub use measurement::{GradientConfig, Measurement};
pub use wayfind_core::Point;
