//! Post-hoc grid diagnostics.

use std::fmt;

use gridwalk_core::{CellKind, Grid, Point};

use crate::PathRange;
use crate::connectivity::ConnectivityReport;

/// Snapshot of a grid's composition and navigability.
#[derive(Debug, Clone, PartialEq)]
pub struct GridReport {
    pub size: i32,
    /// Cell count per kind, in [`CellKind::ALL`] order.
    pub kind_counts: [(CellKind, usize); 5],
    pub connectivity: ConnectivityReport,
    /// Component sizes, largest first.
    pub component_sizes: Vec<usize>,
    pub start: Option<Point>,
    pub goal: Option<Point>,
    /// Whether start and goal share a component; `None` unless both are set.
    pub start_goal_connected: Option<bool>,
}

impl GridReport {
    pub fn new(grid: &Grid) -> Self {
        let mut pr = PathRange::new(grid.bounds());
        let connectivity = pr.connectivity(grid);
        let components = pr.cc_map_all(grid);
        let mut component_sizes: Vec<usize> = components.iter().map(Vec::len).collect();
        component_sizes.sort_unstable_by(|a, b| b.cmp(a));

        let start = grid.start();
        let goal = grid.goal();
        let start_goal_connected = match (start, goal) {
            (Some(s), Some(g)) => Some(pr.cc_at(s).is_some() && pr.cc_at(s) == pr.cc_at(g)),
            _ => None,
        };

        Self {
            size: grid.size(),
            kind_counts: CellKind::ALL.map(|k| (k, grid.count(k))),
            connectivity,
            component_sizes,
            start,
            goal,
            start_goal_connected,
        }
    }

    /// Number of cells of `kind`.
    pub fn count(&self, kind: CellKind) -> usize {
        self.kind_counts
            .iter()
            .find(|(k, _)| *k == kind)
            .map_or(0, |&(_, n)| n)
    }

    /// Number of disjoint passable regions.
    pub fn regions(&self) -> usize {
        self.component_sizes.len()
    }
}

impl fmt::Display for GridReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = (self.size * self.size) as f64;
        writeln!(f, "grid {0}x{0}: {1} cells", self.size, total as usize)?;
        for (kind, n) in self.kind_counts {
            match kind {
                CellKind::Start | CellKind::Goal => writeln!(f, "  {:<9} {n}", kind.name())?,
                _ => writeln!(
                    f,
                    "  {:<9} {n} ({:.1}%)",
                    kind.name(),
                    n as f64 / total * 100.0
                )?,
            }
        }
        writeln!(f, "connectivity: {}", self.connectivity)?;
        write!(f, "regions: {}", self.regions())?;
        if self.regions() > 1 {
            for (i, n) in self.component_sizes.iter().enumerate() {
                write!(f, "\n  region {}: {n} cells", i + 1)?;
            }
        }
        if let (Some(s), Some(g), Some(ok)) = (self.start, self.goal, self.start_goal_connected) {
            if ok {
                write!(f, "\npath exists from {s} to {g}")?;
            } else {
                write!(f, "\nno path from {s} to {g}: searches will fail")?;
            }
        }
        Ok(())
    }
}
