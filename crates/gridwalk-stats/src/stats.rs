//! Per-run statistics.

use std::fmt;
use std::time::Duration;

use gridwalk_core::Point;
use gridwalk_paths::{Algorithm, SearchOutcome};
use serde::{Deserialize, Serialize};

use crate::oracle::Classification;

/// One classified target cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellAnalysis {
    pub pos: Point,
    #[serde(flatten)]
    pub classification: Classification,
}

// ---------------------------------------------------------------------------
// Recording
// ---------------------------------------------------------------------------

/// Mutable accumulator for one run; [`finish`](Self::finish) freezes it.
#[derive(Debug, Clone)]
pub struct RunRecorder {
    stats: RunStatistics,
}

impl RunRecorder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            stats: RunStatistics {
                name: name.into(),
                algorithm: None,
                succeeded: false,
                path: Vec::new(),
                nodes_explored: 0,
                search_duration: Duration::ZERO,
                analysis_duration: Duration::ZERO,
                analyses: Vec::new(),
            },
        }
    }

    /// Recorder pre-filled with a search outcome, named after its algorithm.
    pub fn from_outcome(outcome: &SearchOutcome) -> Self {
        let mut rec = Self::new(outcome.algorithm.name());
        rec.record_outcome(outcome);
        rec
    }

    /// Copy success, path, node count and duration from `outcome`.
    pub fn record_outcome(&mut self, outcome: &SearchOutcome) {
        self.stats.algorithm = Some(outcome.algorithm);
        self.record_search(
            outcome.succeeded(),
            outcome.path.clone(),
            outcome.nodes_explored(),
            outcome.duration,
        );
    }

    /// Record search results that did not come from a [`SearchOutcome`].
    pub fn record_search(
        &mut self,
        succeeded: bool,
        path: Vec<Point>,
        nodes_explored: usize,
        duration: Duration,
    ) {
        self.stats.succeeded = succeeded;
        self.stats.path = path;
        self.stats.nodes_explored = nodes_explored;
        self.stats.search_duration = duration;
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.stats.algorithm = Some(algorithm);
    }

    /// Positions classified so far, in recording order.
    pub fn analyzed_positions(&self) -> impl Iterator<Item = Point> + '_ {
        self.stats.analyses.iter().map(|a| a.pos)
    }

    pub fn record_cell(&mut self, pos: Point, classification: Classification) {
        self.stats.analyses.push(CellAnalysis {
            pos,
            classification,
        });
    }

    pub fn add_analysis_time(&mut self, d: Duration) {
        self.stats.analysis_duration += d;
    }

    pub fn name(&self) -> &str {
        &self.stats.name
    }

    pub fn finish(self) -> RunStatistics {
        self.stats
    }
}

// ---------------------------------------------------------------------------
// Finished runs
// ---------------------------------------------------------------------------

/// Read-only record of one search run and its target analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct RunStatistics {
    name: String,
    algorithm: Option<Algorithm>,
    succeeded: bool,
    path: Vec<Point>,
    nodes_explored: usize,
    search_duration: Duration,
    analysis_duration: Duration,
    analyses: Vec<CellAnalysis>,
}

impl RunStatistics {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn algorithm(&self) -> Option<Algorithm> {
        self.algorithm
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// Positions on the path, endpoints included.
    pub fn path_len(&self) -> usize {
        self.path.len()
    }

    pub fn nodes_explored(&self) -> usize {
        self.nodes_explored
    }

    pub fn search_duration(&self) -> Duration {
        self.search_duration
    }

    pub fn analysis_duration(&self) -> Duration {
        self.analysis_duration
    }

    pub fn total_duration(&self) -> Duration {
        self.search_duration + self.analysis_duration
    }

    pub fn analyses(&self) -> &[CellAnalysis] {
        &self.analyses
    }

    pub fn analyzed(&self) -> usize {
        self.analyses.len()
    }

    /// Cells the classifier confirmed as targets.
    pub fn confirmed(&self) -> usize {
        self.analyses
            .iter()
            .filter(|a| a.classification.is_target)
            .count()
    }

    pub fn rejected(&self) -> usize {
        self.analyzed() - self.confirmed()
    }

    pub fn score(&self) -> usize {
        self.confirmed()
    }

    /// `confirmed / analyzed` in percent, 0 when nothing was analyzed.
    pub fn detection_precision(&self) -> f64 {
        percent(self.confirmed(), self.analyzed())
    }

    /// `path_len / nodes_explored` in percent, 0 when nothing was explored.
    pub fn path_efficiency(&self) -> f64 {
        percent(self.path_len(), self.nodes_explored)
    }

    /// Search throughput, 0 for an unmeasurably short search.
    pub fn nodes_per_second(&self) -> f64 {
        let secs = self.search_duration.as_secs_f64();
        if secs > 0.0 {
            self.nodes_explored as f64 / secs
        } else {
            0.0
        }
    }

    /// Nodes explored that did not end up on the path.
    pub fn exploration_overhead(&self) -> usize {
        self.nodes_explored.saturating_sub(self.path_len())
    }

    /// Serializable snapshot, durations in seconds.
    pub fn to_summary(&self) -> RunSummary {
        RunSummary {
            name: self.name.clone(),
            algorithm: self.algorithm,
            succeeded: self.succeeded,
            times: Times {
                search: self.search_duration.as_secs_f64(),
                analysis: self.analysis_duration.as_secs_f64(),
                total: self.total_duration().as_secs_f64(),
            },
            exploration: Exploration {
                nodes_explored: self.nodes_explored,
                path_length: self.path_len(),
                efficiency: self.path_efficiency(),
                nodes_per_second: self.nodes_per_second(),
            },
            targets: Targets {
                analyzed: self.analyzed(),
                confirmed: self.confirmed(),
                rejected: self.rejected(),
                precision: self.detection_precision(),
            },
            score: self.score(),
            cells: self.analyses.clone(),
            path: self.path.clone(),
        }
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.name)?;
        writeln!(
            f,
            "outcome:       {}",
            if self.succeeded { "goal reached" } else { "goal not reached" }
        )?;
        writeln!(f, "search time:   {:.4}s", self.search_duration.as_secs_f64())?;
        writeln!(f, "analysis time: {:.4}s", self.analysis_duration.as_secs_f64())?;
        writeln!(f, "total time:    {:.4}s", self.total_duration().as_secs_f64())?;
        writeln!(f, "nodes:         {}", self.nodes_explored)?;
        writeln!(f, "path length:   {}", self.path_len())?;
        writeln!(f, "efficiency:    {:.1}%", self.path_efficiency())?;
        writeln!(f, "overhead:      {} nodes", self.exploration_overhead())?;
        writeln!(f, "throughput:    {:.0} nodes/s", self.nodes_per_second())?;
        writeln!(
            f,
            "targets:       {} analyzed, {} confirmed, {} rejected",
            self.analyzed(),
            self.confirmed(),
            self.rejected()
        )?;
        write!(f, "precision:     {:.1}%", self.detection_precision())?;
        for a in &self.analyses {
            let c = &a.classification;
            write!(
                f,
                "\n  {} {:<24} {:.2} ({}){}",
                a.pos,
                c.label,
                c.confidence,
                c.level(),
                if c.is_target { " *" } else { "" }
            )?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Serializable snapshot
// ---------------------------------------------------------------------------

/// Flattened form of [`RunStatistics`] as stored in the comparison history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub name: String,
    #[serde(default)]
    pub algorithm: Option<Algorithm>,
    pub succeeded: bool,
    pub times: Times,
    pub exploration: Exploration,
    pub targets: Targets,
    pub score: usize,
    pub cells: Vec<CellAnalysis>,
    pub path: Vec<Point>,
}

/// Durations in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Times {
    pub search: f64,
    pub analysis: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Exploration {
    pub nodes_explored: usize,
    pub path_length: usize,
    /// Percent.
    pub efficiency: f64,
    pub nodes_per_second: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Targets {
    pub analyzed: usize,
    pub confirmed: usize,
    pub rejected: usize,
    /// Percent.
    pub precision: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridwalk_core::{CellKind, Grid};

    fn rc(row: i32, col: i32) -> Point {
        Point::from_row_col(row, col)
    }

    #[test]
    fn empty_run_has_zero_metrics() {
        let s = RunRecorder::new("idle").finish();
        assert_eq!(s.name(), "idle");
        assert!(!s.succeeded());
        assert_eq!(s.score(), 0);
        assert_eq!(s.detection_precision(), 0.0);
        assert_eq!(s.path_efficiency(), 0.0);
        assert_eq!(s.nodes_per_second(), 0.0);
        assert_eq!(s.exploration_overhead(), 0);
    }

    #[test]
    fn derived_metrics() {
        let mut rec = RunRecorder::new("BFS");
        let path: Vec<Point> = (0..12).map(|c| rc(0, c)).collect();
        rec.record_search(true, path, 40, Duration::from_millis(2));
        rec.record_cell(rc(0, 3), Classification::new("rose", 0.9, true));
        rec.record_cell(rc(0, 5), Classification::new("pinecone", 0.8, false));
        rec.record_cell(rc(0, 7), Classification::new("daisy", 0.6, true));
        rec.record_cell(rc(0, 9), Classification::new("tulip", 0.75, true));
        rec.add_analysis_time(Duration::from_millis(3));
        rec.add_analysis_time(Duration::from_millis(5));
        let s = rec.finish();

        assert_eq!(s.score(), 3);
        assert_eq!(s.rejected(), 1);
        assert_eq!(s.detection_precision(), 75.0);
        assert!((s.path_efficiency() - 30.0).abs() < 1e-9);
        assert_eq!(s.exploration_overhead(), 28);
        assert_eq!(s.analysis_duration(), Duration::from_millis(8));
        assert_eq!(s.total_duration(), Duration::from_millis(10));
        assert!((s.nodes_per_second() - 20_000.0).abs() < 1e-6);
    }

    #[test]
    fn recorder_takes_search_outcome() {
        let mut g = Grid::new(3).unwrap();
        g.set_kind(rc(1, 1), CellKind::Obstacle);
        let outcome = gridwalk_paths::search(Algorithm::Bfs, &g, rc(0, 0), rc(2, 2)).unwrap();
        let s = RunRecorder::from_outcome(&outcome).finish();
        assert_eq!(s.name(), "BFS");
        assert_eq!(s.algorithm(), Some(Algorithm::Bfs));
        assert!(s.succeeded());
        assert_eq!(s.path(), outcome.path.as_slice());
        assert_eq!(s.nodes_explored(), outcome.nodes_explored());
        assert_eq!(s.search_duration(), outcome.duration);
    }

    #[test]
    fn summary_mirrors_metrics() {
        let mut rec = RunRecorder::new("DFS");
        rec.record_search(true, vec![rc(0, 0), rc(0, 1)], 4, Duration::from_millis(500));
        rec.record_cell(rc(0, 1), Classification::new("sunflower", 0.95, true));
        let s = rec.finish();
        let sum = s.to_summary();
        assert_eq!(sum.score, 1);
        assert_eq!(sum.exploration.path_length, 2);
        assert_eq!(sum.exploration.efficiency, 50.0);
        assert_eq!(sum.exploration.nodes_per_second, 8.0);
        assert_eq!(sum.times.search, 0.5);
        assert_eq!(sum.targets.precision, 100.0);
        assert_eq!(sum.cells[0].classification.label, "sunflower");

        let json = serde_json::to_string(&sum).unwrap();
        assert!(json.contains("\"label\":\"sunflower\""));
        let back: RunSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sum);
    }

    #[test]
    fn display_lists_cells() {
        let mut rec = RunRecorder::new("BFS");
        rec.record_search(false, Vec::new(), 7, Duration::ZERO);
        rec.record_cell(rc(2, 3), Classification::new("rose", 0.5, true));
        let text = rec.finish().to_string();
        assert!(text.contains("goal not reached"));
        assert!(text.contains("(2, 3) rose"));
        assert!(text.contains("(medium) *"));
    }
}
