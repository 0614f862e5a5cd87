use std::collections::VecDeque;

use gridwalk_core::{Point, Range};

/// Parent sentinel for the search origin.
pub(crate) const NO_PARENT: usize = usize::MAX;

// ---------------------------------------------------------------------------
// PathRange
// ---------------------------------------------------------------------------

/// Central coordinator for searches on a grid rectangle.
///
/// `PathRange` owns the visited stamps, parent map, frontier buffers and
/// component labels so that repeated queries on the same range incur no
/// allocations after the first use. Visited and discovered flags are
/// generation stamps: a cell counts as marked only when its stamp equals the
/// current generation, so starting a new traversal is O(1).
pub struct PathRange {
    pub(crate) rng: Range,
    pub(crate) width: usize,
    pub(crate) generation: u32,
    pub(crate) visited: Vec<u32>,
    pub(crate) discovered: Vec<u32>,
    pub(crate) parents: Vec<usize>,
    pub(crate) queue: VecDeque<usize>,
    pub(crate) stack: Vec<usize>,
    /// Component label per cell, -1 when unlabelled.
    pub(crate) cc_labels: Vec<i32>,
    pub(crate) nbuf: Vec<Point>,
}

impl PathRange {
    /// Caches sized for `rng`.
    pub fn new(rng: Range) -> Self {
        let w = rng.width() as usize;
        let len = rng.len();
        Self {
            rng,
            width: w,
            generation: 0,
            visited: vec![0; len],
            discovered: vec![0; len],
            parents: vec![NO_PARENT; len],
            queue: VecDeque::new(),
            stack: Vec::new(),
            cc_labels: vec![-1; len],
            nbuf: Vec::with_capacity(4),
        }
    }

    /// Replace the underlying range, reallocating caches only when the new
    /// range does not fit in the existing capacity.
    pub fn set_range(&mut self, rng: Range) {
        let new_len = rng.len();
        let old_capacity = self.visited.len();
        self.rng = rng;
        self.width = rng.width() as usize;

        if new_len <= old_capacity {
            // Bumping the generation invalidates every stale stamp.
            self.generation = self.generation.wrapping_add(1);
            return;
        }

        self.generation = 0;
        self.visited.clear();
        self.visited.resize(new_len, 0);
        self.discovered.clear();
        self.discovered.resize(new_len, 0);
        self.parents.clear();
        self.parents.resize(new_len, NO_PARENT);
        self.cc_labels.clear();
        self.cc_labels.resize(new_len, -1);
        self.queue.clear();
        self.stack.clear();
    }

    /// The rectangle the caches are laid out for.
    #[inline]
    pub fn range(&self) -> Range {
        self.rng
    }

    /// Parent of `p` in the most recent BFS/DFS traversal.
    ///
    /// Returns `None` for points outside the range, points the traversal
    /// never discovered, and the traversal origin.
    pub fn parent_at(&self, p: Point) -> Option<Point> {
        let i = self.idx(p)?;
        if self.generation == 0 || self.discovered[i] != self.generation {
            return None;
        }
        match self.parents[i] {
            NO_PARENT => None,
            pi => Some(self.point(pi)),
        }
    }

    // -----------------------------------------------------------------------
    // Traversal bookkeeping
    // -----------------------------------------------------------------------

    /// Start a new traversal: returns the fresh generation stamp.
    pub(crate) fn begin(&mut self) -> u32 {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped: old stamps could collide with the new generation.
            self.visited.fill(0);
            self.discovered.fill(0);
            self.generation = 1;
        }
        self.queue.clear();
        self.stack.clear();
        self.generation
    }

    /// Walk the parent map back from `goal` and return the path from the
    /// traversal origin to `goal`.
    pub(crate) fn reconstruct(&self, goal: usize) -> Vec<Point> {
        let mut path = Vec::new();
        let mut ci = goal;
        while ci != NO_PARENT {
            path.push(self.point(ci));
            ci = self.parents[ci];
        }
        path.reverse();
        path
    }

    // -----------------------------------------------------------------------
    // Flat indexing, row-major within `rng`
    // -----------------------------------------------------------------------

    #[inline]
    pub(crate) fn idx(&self, p: Point) -> Option<usize> {
        self.rng.contains(p).then(|| {
            let (row, col) = (p.y - self.rng.min.y, p.x - self.rng.min.x);
            row as usize * self.width + col as usize
        })
    }

    #[inline]
    pub(crate) fn point(&self, i: usize) -> Point {
        let (row, col) = (i / self.width, i % self.width);
        Point::new(self.rng.min.x + col as i32, self.rng.min.y + row as i32)
    }
}
