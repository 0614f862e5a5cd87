use gridwalk_core::{Grid, Point};

/// Minimal search interface: neighbor enumeration plus a passability test.
pub trait Pather {
    /// Append neighbors of `p` into `buf`, in the order searches should
    /// prefer them. The caller clears `buf` before calling.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);

    /// Whether a search may stand on `p`.
    fn passable(&self, p: Point) -> bool;
}

/// Orthogonal moves between non-obstacle cells, preferring up, down, left,
/// right.
impl Pather for Grid {
    #[inline]
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        Grid::neighbors(self, p, buf);
    }

    #[inline]
    fn passable(&self, p: Point) -> bool {
        Grid::passable(self, p)
    }
}
