//! **gridwalk-core**: occupancy grid core types.
//!
//! Geometry primitives, typed cells, and the square [`Grid`] that the
//! generator fills and the search engine walks.

pub mod cell;
pub mod geom;
pub mod grid;

pub use cell::{Cell, CellKind, ImageRef};
pub use geom::{Point, Range, RangeIter};
pub use grid::{Grid, GridError, PathMask};
