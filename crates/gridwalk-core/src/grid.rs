//! The [`Grid`] type: a square matrix of [`Cell`]s owned by value.

use std::fmt;

use crate::cell::{Cell, CellKind};
use crate::geom::{Point, Range};

/// Errors raised when constructing or decoding a [`Grid`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// The side length must be at least 1.
    #[error("grid size must be at least 1, got {0}")]
    InvalidSize(i32),
    /// A decoded cell list does not hold `N×N` cells.
    #[error("grid of size {size} needs {expected} cells, got {found}")]
    CellCount {
        size: i32,
        expected: usize,
        found: usize,
    },
    /// A decoded cell's position differs from its place in the matrix.
    #[error("cell {index} should be at {expected}, found {found}")]
    MisplacedCell {
        index: usize,
        expected: Point,
        found: Point,
    },
    /// More than one cell carries the start or goal kind.
    #[error("grid has {count} cells of kind {kind}")]
    DuplicateEndpoint { kind: &'static str, count: usize },
}

/// A square `N×N` grid of cells.
///
/// Cells are stored row-major and every cell's position equals its index in
/// the matrix. Cloning copies the cells.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawGrid")
)]
pub struct Grid {
    size: i32,
    cells: Vec<Cell>,
}

/// Undecoded form of a [`Grid`], checked by `TryFrom` before use.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawGrid {
    size: i32,
    cells: Vec<Cell>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGrid> for Grid {
    type Error = GridError;

    fn try_from(raw: RawGrid) -> Result<Self, GridError> {
        Self::from_cells(raw.size, raw.cells)
    }
}

impl Grid {
    /// Create an `n×n` grid of empty cells.
    pub fn new(n: i32) -> Result<Self, GridError> {
        Self::from_fn(n, Cell::new)
    }

    /// Create an `n×n` grid, initializing each cell with `f`.
    ///
    /// The position stored in the returned cell is ignored; cells always
    /// carry their own matrix position.
    pub fn from_fn(n: i32, mut f: impl FnMut(Point) -> Cell) -> Result<Self, GridError> {
        if n < 1 {
            return Err(GridError::InvalidSize(n));
        }
        let cells = Range::square(n)
            .iter()
            .map(|p| f(p).relocated(p))
            .collect();
        Ok(Self { size: n, cells })
    }

    /// Build a grid from row-major `cells`, checking the size, the cell
    /// count, every cell position and the single start/goal rule.
    pub fn from_cells(n: i32, cells: Vec<Cell>) -> Result<Self, GridError> {
        if n < 1 {
            return Err(GridError::InvalidSize(n));
        }
        let bounds = Range::square(n);
        if cells.len() != bounds.len() {
            return Err(GridError::CellCount {
                size: n,
                expected: bounds.len(),
                found: cells.len(),
            });
        }
        for (index, (expected, cell)) in bounds.iter().zip(&cells).enumerate() {
            if cell.pos() != expected {
                return Err(GridError::MisplacedCell {
                    index,
                    expected,
                    found: cell.pos(),
                });
            }
        }
        let grid = Self { size: n, cells };
        for kind in [CellKind::Start, CellKind::Goal] {
            let count = grid.count(kind);
            if count > 1 {
                return Err(GridError::DuplicateEndpoint {
                    kind: kind.name(),
                    count,
                });
            }
        }
        Ok(grid)
    }

    /// Side length `N`.
    #[inline]
    pub fn size(&self) -> i32 {
        self.size
    }

    /// Number of cells (`N×N`).
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: a grid has at least one cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The bounding range `[0, N)²`.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::square(self.size)
    }

    /// Whether `p` lies inside the grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some((p.y * self.size + p.x) as usize)
    }

    /// Get the cell at a point, or `None` if out of bounds.
    #[inline]
    pub fn at(&self, p: Point) -> Option<&Cell> {
        self.index(p).map(|i| &self.cells[i])
    }

    /// Kind of the cell at `p`, or `None` if out of bounds.
    #[inline]
    pub fn kind_at(&self, p: Point) -> Option<CellKind> {
        self.at(p).map(|c| c.kind)
    }

    /// Whether `p` is in bounds and not an obstacle.
    #[inline]
    pub fn passable(&self, p: Point) -> bool {
        self.kind_at(p).is_some_and(CellKind::passable)
    }

    /// Set the kind of the cell at `p` regardless of its current kind. Does
    /// nothing if out of bounds. Setting `Start` or `Goal` resets any other
    /// cell of that kind to `Empty`. Used by generators; interactive callers
    /// should go through [`select_point`](Self::select_point).
    pub fn set_kind(&mut self, p: Point, kind: CellKind) {
        let Some(i) = self.index(p) else {
            return;
        };
        if matches!(kind, CellKind::Start | CellKind::Goal) {
            for (j, cell) in self.cells.iter_mut().enumerate() {
                if j != i && cell.kind == kind {
                    cell.kind = CellKind::Empty;
                }
            }
        }
        let cell = &mut self.cells[i];
        cell.kind = kind;
        if kind != CellKind::TargetObject {
            cell.image = None;
        }
    }

    /// Append the passable orthogonal neighbours of `p` to `buf`, in the
    /// order up, down, left, right. The caller clears `buf`. Points outside
    /// the grid have no neighbours.
    pub fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        if !self.contains(p) {
            return;
        }
        for n in p.neighbors_4() {
            if self.passable(n) {
                buf.push(n);
            }
        }
    }

    /// Mark `p` as `kind` on behalf of a user selection.
    ///
    /// Returns `false` without touching the grid if `p` is out of bounds or
    /// currently an obstacle or target object. Selecting a `Start` or `Goal`
    /// first resets any other cell of that kind to `Empty`.
    pub fn select_point(&mut self, p: Point, kind: CellKind) -> bool {
        let Some(i) = self.index(p) else {
            return false;
        };
        if !self.cells[i].kind.selectable() {
            return false;
        }
        self.set_kind(p, kind);
        true
    }

    /// Position of the start cell, if one is set.
    pub fn start(&self) -> Option<Point> {
        self.find(CellKind::Start)
    }

    /// Position of the goal cell, if one is set.
    pub fn goal(&self) -> Option<Point> {
        self.find(CellKind::Goal)
    }

    /// First cell of `kind` in row-major order.
    pub fn find(&self, kind: CellKind) -> Option<Point> {
        self.cells.iter().find(|c| c.kind == kind).map(Cell::pos)
    }

    /// Count how many cells have the given kind.
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|c| c.kind == kind).count()
    }

    /// Count the cells a search may enter.
    pub fn non_obstacle_count(&self) -> usize {
        self.cells.iter().filter(|c| c.kind.passable()).count()
    }

    /// Iterate over the cells in row-major order.
    pub fn iter(&self) -> std::slice::Iter<'_, Cell> {
        self.cells.iter()
    }

    /// Build a [`PathMask`] for `path` over this grid.
    pub fn path_mask(&self, path: &[Point]) -> PathMask {
        PathMask::new(self.bounds(), path)
    }

    /// ASCII rendering, one line per row. Cells on `path` that are plain
    /// `Empty` or `TargetObject` cells are drawn as `o`.
    pub fn render(&self, path: Option<&PathMask>) -> String {
        let n = self.size as usize;
        let mut out = String::with_capacity(n * (n + 1));
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 && i % n == 0 {
                out.push('\n');
            }
            let on_path = path.is_some_and(|m| m.contains(cell.pos()));
            let ch = match cell.kind {
                CellKind::Empty | CellKind::TargetObject if on_path => 'o',
                k => k.glyph(),
            };
            out.push(ch);
        }
        out
    }
}

impl<'a> IntoIterator for &'a Grid {
    type Item = &'a Cell;
    type IntoIter = std::slice::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(None))
    }
}

// ---------------------------------------------------------------------------
// PathMask
// ---------------------------------------------------------------------------

/// Transient "on path" annotation derived from a search path. Build one per
/// path to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMask {
    bounds: Range,
    on_path: Vec<bool>,
}

impl PathMask {
    /// Mark every in-bounds point of `path`.
    pub fn new(bounds: Range, path: &[Point]) -> Self {
        let mut on_path = vec![false; bounds.len()];
        let w = bounds.width();
        for &p in path {
            if bounds.contains(p) {
                let i = ((p.y - bounds.min.y) * w + (p.x - bounds.min.x)) as usize;
                on_path[i] = true;
            }
        }
        Self { bounds, on_path }
    }

    /// Whether `p` lies on the path.
    pub fn contains(&self, p: Point) -> bool {
        if !self.bounds.contains(p) {
            return false;
        }
        let i = ((p.y - self.bounds.min.y) * self.bounds.width() + (p.x - self.bounds.min.x))
            as usize;
        self.on_path[i]
    }

    /// Number of marked cells.
    pub fn count(&self) -> usize {
        self.on_path.iter().filter(|&&b| b).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::ImageRef;

    fn rc(row: i32, col: i32) -> Point {
        Point::from_row_col(row, col)
    }

    #[test]
    fn new_grid_is_empty_and_indexed() {
        let g = Grid::new(4).unwrap();
        assert_eq!(g.size(), 4);
        assert_eq!(g.len(), 16);
        assert_eq!(g.count(CellKind::Empty), 16);
        for (i, cell) in g.iter().enumerate() {
            assert_eq!(cell.pos(), Point::new(i as i32 % 4, i as i32 / 4));
        }
    }

    #[test]
    fn zero_size_rejected() {
        assert_eq!(Grid::new(0), Err(GridError::InvalidSize(0)));
        assert_eq!(Grid::new(-3), Err(GridError::InvalidSize(-3)));
    }

    #[test]
    fn from_fn_keeps_matrix_positions() {
        let g = Grid::from_fn(3, |_| {
            Cell::new(Point::new(99, 99))
                .with_kind(CellKind::TargetObject)
                .with_image(ImageRef(2))
        })
        .unwrap();
        assert_eq!(g.at(rc(2, 1)).unwrap().pos(), rc(2, 1));
        assert_eq!(g.at(rc(2, 1)).unwrap().image, Some(ImageRef(2)));
        assert!(g.at(Point::new(99, 99)).is_none());
    }

    #[test]
    fn neighbors_fixed_order_and_filtered() {
        let mut g = Grid::new(3).unwrap();
        let mut buf = Vec::new();
        g.neighbors(rc(1, 1), &mut buf);
        assert_eq!(buf, vec![rc(0, 1), rc(2, 1), rc(1, 0), rc(1, 2)]);

        g.set_kind(rc(2, 1), CellKind::Obstacle);
        g.set_kind(rc(1, 0), CellKind::TargetObject);
        buf.clear();
        g.neighbors(rc(1, 1), &mut buf);
        assert_eq!(buf, vec![rc(0, 1), rc(1, 0), rc(1, 2)]);

        buf.clear();
        g.neighbors(rc(0, 0), &mut buf);
        assert_eq!(buf, vec![rc(1, 0), rc(0, 1)]);
    }

    #[test]
    fn select_point_rejects_blocked_and_out_of_bounds() {
        let mut g = Grid::new(3).unwrap();
        g.set_kind(rc(0, 1), CellKind::Obstacle);
        g.set_kind(rc(0, 2), CellKind::TargetObject);
        let before = g.clone();
        assert!(!g.select_point(rc(0, 1), CellKind::Start));
        assert!(!g.select_point(rc(0, 2), CellKind::Goal));
        assert!(!g.select_point(rc(3, 0), CellKind::Start));
        assert!(!g.select_point(Point::new(-1, 0), CellKind::Start));
        assert_eq!(g, before);
    }

    #[test]
    fn select_point_keeps_single_start_and_goal() {
        let mut g = Grid::new(3).unwrap();
        assert!(g.select_point(rc(0, 0), CellKind::Start));
        assert!(g.select_point(rc(2, 2), CellKind::Goal));
        assert!(g.select_point(rc(1, 1), CellKind::Start));
        assert_eq!(g.count(CellKind::Start), 1);
        assert_eq!(g.start(), Some(rc(1, 1)));
        assert_eq!(g.kind_at(rc(0, 0)), Some(CellKind::Empty));
        assert_eq!(g.goal(), Some(rc(2, 2)));

        assert!(g.select_point(rc(0, 2), CellKind::Goal));
        assert_eq!(g.count(CellKind::Goal), 1);
        assert_eq!(g.goal(), Some(rc(0, 2)));
    }

    #[test]
    fn reselecting_same_cell_is_idempotent() {
        let mut g = Grid::new(2).unwrap();
        assert!(g.select_point(rc(1, 1), CellKind::Start));
        assert!(g.select_point(rc(1, 1), CellKind::Start));
        assert_eq!(g.count(CellKind::Start), 1);
    }

    #[test]
    fn render_with_path_overlay() {
        let mut g = Grid::new(3).unwrap();
        g.set_kind(rc(1, 1), CellKind::Obstacle);
        g.set_kind(rc(0, 2), CellKind::TargetObject);
        g.select_point(rc(0, 0), CellKind::Start);
        g.select_point(rc(2, 2), CellKind::Goal);
        assert_eq!(g.to_string(), "S.*\n.#.\n..G");

        let path = [rc(0, 0), rc(0, 1), rc(0, 2), rc(1, 2), rc(2, 2)];
        let mask = g.path_mask(&path);
        assert_eq!(mask.count(), 5);
        assert_eq!(g.render(Some(&mask)), "Soo\n.#o\n..G");

        // A fresh mask for a different path leaves no trace of the old one.
        let other = g.path_mask(&[rc(0, 0), rc(1, 0), rc(2, 0), rc(2, 1), rc(2, 2)]);
        assert_eq!(g.render(Some(&other)), "S.*\no#.\nooG");
    }

    #[test]
    fn set_kind_drops_image_off_targets() {
        let mut g = Grid::from_fn(1, |p| {
            Cell::new(p)
                .with_kind(CellKind::TargetObject)
                .with_image(ImageRef(0))
        })
        .unwrap();
        g.set_kind(Point::ZERO, CellKind::Obstacle);
        assert_eq!(g.at(Point::ZERO).unwrap().image, None);
        assert_eq!(g.non_obstacle_count(), 0);
    }

    #[test]
    fn set_kind_keeps_single_start_and_goal() {
        let mut g = Grid::new(3).unwrap();
        g.set_kind(rc(0, 0), CellKind::Start);
        g.set_kind(rc(2, 2), CellKind::Start);
        assert_eq!(g.count(CellKind::Start), 1);
        assert_eq!(g.start(), Some(rc(2, 2)));
        assert_eq!(g.kind_at(rc(0, 0)), Some(CellKind::Empty));

        g.set_kind(rc(0, 1), CellKind::Goal);
        g.set_kind(rc(1, 0), CellKind::Goal);
        assert_eq!(g.count(CellKind::Goal), 1);
        assert_eq!(g.goal(), Some(rc(1, 0)));
        assert_eq!(g.start(), Some(rc(2, 2)));
    }

    #[test]
    fn extreme_points_have_no_neighbors() {
        let g = Grid::new(3).unwrap();
        let mut buf = Vec::new();
        for p in [
            Point::new(i32::MIN, i32::MIN),
            Point::new(i32::MAX, i32::MAX),
            Point::new(i32::MIN, 0),
            Point::new(0, i32::MAX),
        ] {
            g.neighbors(p, &mut buf);
        }
        assert!(buf.is_empty());
    }

    #[test]
    fn from_cells_checks_shape() {
        let cells: Vec<Cell> = Range::square(2).iter().map(Cell::new).collect();
        assert_eq!(Grid::from_cells(2, cells.clone()).unwrap(), Grid::new(2).unwrap());
        assert_eq!(
            Grid::from_cells(0, Vec::new()),
            Err(GridError::InvalidSize(0))
        );
        assert_eq!(
            Grid::from_cells(3, cells.clone()),
            Err(GridError::CellCount {
                size: 3,
                expected: 9,
                found: 4
            })
        );

        let mut swapped = cells.clone();
        swapped.swap(0, 1);
        assert_eq!(
            Grid::from_cells(2, swapped),
            Err(GridError::MisplacedCell {
                index: 0,
                expected: rc(0, 0),
                found: rc(0, 1)
            })
        );

        let mut two_starts = cells;
        two_starts[0].kind = CellKind::Start;
        two_starts[3].kind = CellKind::Start;
        assert_eq!(
            Grid::from_cells(2, two_starts),
            Err(GridError::DuplicateEndpoint {
                kind: "start",
                count: 2
            })
        );
    }
}
