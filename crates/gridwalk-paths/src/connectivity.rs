//! Whole-grid connectivity checks.

use std::fmt;

use gridwalk_core::{Grid, Point};

use crate::PathRange;
use crate::traits::Pather;

/// Classification of a connectivity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConnectivityStatus {
    /// Every cell is an obstacle; the grid is unusable.
    NoValidCells,
    /// Exactly one passable cell.
    Trivial,
    /// Every passable cell is reachable from every other.
    Connected,
    /// At least one passable cell is cut off.
    Disconnected,
}

/// Outcome of [`PathRange::connectivity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConnectivityReport {
    pub status: ConnectivityStatus,
    /// Passable cells reached from the first passable cell.
    pub reachable: usize,
    /// All passable cells.
    pub total: usize,
}

impl ConnectivityReport {
    /// Strict check: true only when 100% of passable cells are reachable.
    #[inline]
    pub fn is_connected(&self) -> bool {
        matches!(
            self.status,
            ConnectivityStatus::Trivial | ConnectivityStatus::Connected
        )
    }

    /// `reachable / total`, or 0 for a grid with no passable cells.
    pub fn reachable_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.reachable as f64 / self.total as f64
    }
}

impl fmt::Display for ConnectivityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            ConnectivityStatus::NoValidCells => write!(f, "no valid cells (all obstacles)"),
            ConnectivityStatus::Trivial => write!(f, "only one valid cell"),
            ConnectivityStatus::Connected => {
                write!(f, "fully connected ({} reachable cells)", self.total)
            }
            ConnectivityStatus::Disconnected => write!(
                f,
                "disconnected: only {}/{} cells reachable ({:.1}%)",
                self.reachable,
                self.total,
                self.reachable_ratio() * 100.0
            ),
        }
    }
}

impl PathRange {
    /// Flood fill from the first passable cell in row-major order and
    /// compare the reached count with the passable total.
    pub fn connectivity<P: Pather>(&mut self, pather: &P) -> ConnectivityReport {
        let mut origin = None;
        let mut total = 0;
        for p in self.rng.iter() {
            if pather.passable(p) {
                total += 1;
                origin.get_or_insert(p);
            }
        }

        let Some(origin) = origin else {
            return ConnectivityReport {
                status: ConnectivityStatus::NoValidCells,
                reachable: 0,
                total: 0,
            };
        };
        if total == 1 {
            return ConnectivityReport {
                status: ConnectivityStatus::Trivial,
                reachable: 1,
                total: 1,
            };
        }

        let reachable = self.reachable_from(pather, origin).len();
        let status = if reachable == total {
            ConnectivityStatus::Connected
        } else {
            ConnectivityStatus::Disconnected
        };
        ConnectivityReport {
            status,
            reachable,
            total,
        }
    }
}

// ---------------------------------------------------------------------------
// One-shot helpers over a Grid
// ---------------------------------------------------------------------------

/// Positions reachable from `origin` over non-obstacle cells.
pub fn reachable_from(grid: &Grid, origin: Point) -> Vec<Point> {
    PathRange::new(grid.bounds()).reachable_from(grid, origin)
}

/// Strict whole-grid connectivity check.
pub fn validate_connectivity(grid: &Grid) -> ConnectivityReport {
    PathRange::new(grid.bounds()).connectivity(grid)
}

/// Disjoint passable regions, seeded in row-major order.
pub fn count_components(grid: &Grid) -> Vec<Vec<Point>> {
    PathRange::new(grid.bounds()).cc_map_all(grid)
}

/// Whether `to` can be reached from `from`.
pub fn path_exists(grid: &Grid, from: Point, to: Point) -> bool {
    if from == to {
        return grid.passable(from);
    }
    reachable_from(grid, from).contains(&to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridwalk_core::CellKind;

    fn rc(row: i32, col: i32) -> Point {
        Point::from_row_col(row, col)
    }

    fn fill_obstacles(g: &mut Grid) {
        for p in g.bounds() {
            g.set_kind(p, CellKind::Obstacle);
        }
    }

    #[test]
    fn open_grid_is_connected() {
        let g = Grid::new(4).unwrap();
        let r = validate_connectivity(&g);
        assert_eq!(r.status, ConnectivityStatus::Connected);
        assert_eq!((r.reachable, r.total), (16, 16));
        assert!(r.is_connected());
        assert_eq!(r.reachable_ratio(), 1.0);
    }

    #[test]
    fn all_obstacles_is_degenerate() {
        let mut g = Grid::new(3).unwrap();
        fill_obstacles(&mut g);
        let r = validate_connectivity(&g);
        assert_eq!(r.status, ConnectivityStatus::NoValidCells);
        assert!(!r.is_connected());
        assert_eq!(r.reachable_ratio(), 0.0);
    }

    #[test]
    fn single_cell_is_trivially_connected() {
        let mut g = Grid::new(3).unwrap();
        fill_obstacles(&mut g);
        g.set_kind(rc(2, 1), CellKind::Empty);
        let r = validate_connectivity(&g);
        assert_eq!(r.status, ConnectivityStatus::Trivial);
        assert!(r.is_connected());

        let one = Grid::new(1).unwrap();
        assert_eq!(validate_connectivity(&one).status, ConnectivityStatus::Trivial);
    }

    #[test]
    fn split_grid_is_disconnected() {
        let mut g = Grid::new(4).unwrap();
        for row in 0..4 {
            g.set_kind(rc(row, 1), CellKind::Obstacle);
        }
        let r = validate_connectivity(&g);
        assert_eq!(r.status, ConnectivityStatus::Disconnected);
        assert_eq!((r.reachable, r.total), (4, 12));
        assert!(!r.is_connected());
        assert!(r.to_string().contains("4/12"));
        assert_eq!(count_components(&g).len(), 2);
        assert!(!path_exists(&g, rc(0, 0), rc(0, 3)));
        assert!(path_exists(&g, rc(0, 2), rc(3, 3)));
    }

    #[test]
    fn targets_count_as_passable() {
        let mut g = Grid::new(3).unwrap();
        for row in 0..3 {
            g.set_kind(rc(row, 1), CellKind::TargetObject);
        }
        assert!(validate_connectivity(&g).is_connected());
        assert_eq!(reachable_from(&g, rc(0, 0)).len(), 9);
    }
}
