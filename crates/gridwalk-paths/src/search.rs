//! Search runs: precondition checks, dispatch, timing.

use std::fmt;
use std::time::{Duration, Instant};

use gridwalk_core::{Grid, Point};

use crate::PathRange;
use crate::traits::Pather;

/// Uninformed search strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    /// Breadth-first: FIFO frontier, shortest path in edge count.
    Bfs,
    /// Depth-first: LIFO frontier, finds a path but not necessarily the
    /// shortest one.
    Dfs,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::Bfs, Algorithm::Dfs];

    /// Short upper-case name (`"BFS"` / `"DFS"`).
    pub const fn name(self) -> &'static str {
        match self {
            Algorithm::Bfs => "BFS",
            Algorithm::Dfs => "DFS",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Terminal state of a search run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStatus {
    /// The goal was reached and a path reconstructed.
    Succeeded,
    /// The frontier emptied before reaching the goal.
    Exhausted,
}

/// Invalid search input. No traversal is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("start and goal are the same cell {0}")]
    SameEndpoints(Point),
    #[error("{0} is outside the grid")]
    OutOfBounds(Point),
    #[error("{0} is an obstacle")]
    Blocked(Point),
}

/// Raw traversal product, before timing is attached.
pub(crate) struct Walk {
    pub(crate) path: Vec<Point>,
    pub(crate) trace: Vec<Point>,
}

/// Result of one search run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub algorithm: Algorithm,
    pub status: SearchStatus,
    /// Start to goal inclusive; empty when the goal was not reached.
    pub path: Vec<Point>,
    /// Every position in the order it was first dequeued or popped.
    pub trace: Vec<Point>,
    /// Wall-clock time of the traversal alone.
    pub duration: Duration,
}

impl SearchOutcome {
    #[inline]
    pub fn succeeded(&self) -> bool {
        self.status == SearchStatus::Succeeded
    }

    /// Number of positions dequeued or popped (after duplicate filtering).
    #[inline]
    pub fn nodes_explored(&self) -> usize {
        self.trace.len()
    }

    /// Number of positions on the path, endpoints included.
    #[inline]
    pub fn path_len(&self) -> usize {
        self.path.len()
    }
}

impl PathRange {
    /// Run `algorithm` from `start` to `goal`.
    ///
    /// Endpoints are validated first: they must differ, lie inside the range
    /// and be passable. An unreachable goal is not an error: the outcome is
    /// [`SearchStatus::Exhausted`] with an empty path and the partial trace.
    pub fn search<P: Pather>(
        &mut self,
        algorithm: Algorithm,
        pather: &P,
        start: Point,
        goal: Point,
    ) -> Result<SearchOutcome, SearchError> {
        if start == goal {
            return Err(SearchError::SameEndpoints(start));
        }
        let si = self.idx(start).ok_or(SearchError::OutOfBounds(start))?;
        let gi = self.idx(goal).ok_or(SearchError::OutOfBounds(goal))?;
        for p in [start, goal] {
            if !pather.passable(p) {
                return Err(SearchError::Blocked(p));
            }
        }

        let t0 = Instant::now();
        let walk = match algorithm {
            Algorithm::Bfs => self.bfs_walk(pather, si, gi),
            Algorithm::Dfs => self.dfs_walk(pather, si, gi),
        };
        let duration = t0.elapsed();

        let status = if walk.path.is_empty() {
            SearchStatus::Exhausted
        } else {
            SearchStatus::Succeeded
        };
        log::debug!(
            "{algorithm} {start} -> {goal}: {status:?}, {} explored, path {} in {duration:?}",
            walk.trace.len(),
            walk.path.len(),
        );

        Ok(SearchOutcome {
            algorithm,
            status,
            path: walk.path,
            trace: walk.trace,
            duration,
        })
    }
}

/// One-shot search over `grid` with a fresh [`PathRange`].
pub fn search(
    algorithm: Algorithm,
    grid: &Grid,
    start: Point,
    goal: Point,
) -> Result<SearchOutcome, SearchError> {
    PathRange::new(grid.bounds()).search(algorithm, grid, start, goal)
}
