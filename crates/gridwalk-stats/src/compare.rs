//! Cross-run comparison.

use std::collections::BTreeMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use gridwalk_paths::Algorithm;
use serde::{Deserialize, Serialize};

use crate::stats::{RunStatistics, RunSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CompareError {
    #[error("need at least two runs to compare, have {0}")]
    TooFewRuns(usize),
}

/// Name of the winning run per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Winners {
    /// Shortest search duration.
    pub fastest: String,
    pub highest_score: String,
    pub highest_efficiency: String,
    /// Shortest non-empty path; `None` when no run found a path.
    pub shortest_path: Option<String>,
    pub fewest_nodes: String,
}

/// Percentage differences `(first - second) / second * 100` between exactly
/// two runs. A zero `second` value yields 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairDeltas {
    pub first: String,
    pub second: String,
    pub duration: f64,
    pub nodes_explored: f64,
    pub path_length: f64,
    pub score: f64,
}

/// Result of [`Comparator::compare`], also the unit of the on-disk history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Unix seconds.
    pub timestamp: u64,
    pub runs: BTreeMap<String, RunSummary>,
    /// Run names in the order they were added.
    pub order: Vec<String>,
    pub winners: Winners,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deltas: Option<PairDeltas>,
}

impl Comparison {
    /// Runs in insertion order.
    pub fn ordered_runs(&self) -> impl Iterator<Item = &RunSummary> {
        self.order.iter().filter_map(|name| self.runs.get(name))
    }

    fn run_for(&self, algorithm: Algorithm) -> Option<&RunSummary> {
        self.ordered_runs()
            .find(|r| r.algorithm == Some(algorithm))
            .or_else(|| self.runs.get(algorithm.name()))
    }
}

// ---------------------------------------------------------------------------
// Comparator
// ---------------------------------------------------------------------------

/// Named, borrowed runs in insertion order.
#[derive(Debug, Default)]
pub struct Comparator<'a> {
    runs: Vec<(String, &'a RunStatistics)>,
}

impl<'a> Comparator<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a run. A run already registered under `name` is replaced in place.
    pub fn add(&mut self, name: impl Into<String>, stats: &'a RunStatistics) {
        let name = name.into();
        match self.runs.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = stats,
            None => self.runs.push((name, stats)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&'a RunStatistics> {
        self.runs.iter().find(|(n, _)| n == name).map(|&(_, s)| s)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.runs.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn clear(&mut self) {
        self.runs.clear();
    }

    /// One line per run: path length, nodes and score.
    pub fn quick_summary(&self) -> String {
        self.runs
            .iter()
            .map(|(n, s)| {
                format!(
                    "{n}: path {}, {} nodes, score {}",
                    s.path_len(),
                    s.nodes_explored(),
                    s.score()
                )
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }

    /// Compare the registered runs, stamped with the current time.
    pub fn compare(&self) -> Result<Comparison, CompareError> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        self.compare_at(timestamp)
    }

    /// Compare the registered runs with an explicit timestamp.
    pub fn compare_at(&self, timestamp: u64) -> Result<Comparison, CompareError> {
        if self.runs.len() < 2 {
            return Err(CompareError::TooFewRuns(self.runs.len()));
        }

        let winners = Winners {
            fastest: self.best(|a, b| a.search_duration() < b.search_duration()),
            highest_score: self.best(|a, b| a.score() > b.score()),
            highest_efficiency: self.best(|a, b| a.path_efficiency() > b.path_efficiency()),
            shortest_path: self.best_among(
                |s| s.path_len() > 0,
                |a, b| a.path_len() < b.path_len(),
            ),
            fewest_nodes: self.best(|a, b| a.nodes_explored() < b.nodes_explored()),
        };

        let deltas = match self.runs.as_slice() {
            [(n1, a), (n2, b)] => Some(PairDeltas {
                first: n1.clone(),
                second: n2.clone(),
                duration: percent_delta(
                    a.search_duration().as_secs_f64(),
                    b.search_duration().as_secs_f64(),
                ),
                nodes_explored: percent_delta(a.nodes_explored() as f64, b.nodes_explored() as f64),
                path_length: percent_delta(a.path_len() as f64, b.path_len() as f64),
                score: percent_delta(a.score() as f64, b.score() as f64),
            }),
            _ => None,
        };

        let comparison = Comparison {
            timestamp,
            runs: self
                .runs
                .iter()
                .map(|(n, s)| (n.clone(), s.to_summary()))
                .collect(),
            order: self.runs.iter().map(|(n, _)| n.clone()).collect(),
            winners,
            deltas,
        };
        log::debug!("compared {} runs: {}", self.runs.len(), self.quick_summary());
        Ok(comparison)
    }

    /// Name of the run no other run beats; the earliest-added wins ties.
    fn best(&self, better: impl Fn(&RunStatistics, &RunStatistics) -> bool) -> String {
        self.best_among(|_| true, better).unwrap_or_default()
    }

    fn best_among(
        &self,
        eligible: impl Fn(&RunStatistics) -> bool,
        better: impl Fn(&RunStatistics, &RunStatistics) -> bool,
    ) -> Option<String> {
        let mut best: Option<&(String, &RunStatistics)> = None;
        for entry in self.runs.iter().filter(|(_, s)| eligible(*s)) {
            match best {
                Some((_, b)) if !better(entry.1, *b) => {}
                _ => best = Some(entry),
            }
        }
        best.map(|(n, _)| n.clone())
    }
}

fn percent_delta(a: f64, b: f64) -> f64 {
    if b == 0.0 { 0.0 } else { (a - b) / b * 100.0 }
}

// ---------------------------------------------------------------------------
// Text report
// ---------------------------------------------------------------------------

const RULE: &str =
    "----------------------------------------------------------------------";

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let runs: Vec<&RunSummary> = self.ordered_runs().collect();

        writeln!(f, "run comparison (t={})", self.timestamp)?;
        writeln!(f, "{RULE}")?;
        write!(f, "{:<20}", "metric")?;
        for name in &self.order {
            write!(f, " | {name:>12}")?;
        }
        writeln!(f)?;
        writeln!(f, "{RULE}")?;

        let rows: [(&str, fn(&RunSummary) -> String); 7] = [
            ("search time (s)", |r| format!("{:.4}", r.times.search)),
            ("nodes explored", |r| r.exploration.nodes_explored.to_string()),
            ("path length", |r| r.exploration.path_length.to_string()),
            ("efficiency (%)", |r| format!("{:.2}", r.exploration.efficiency)),
            ("targets confirmed", |r| r.targets.confirmed.to_string()),
            ("score", |r| r.score.to_string()),
            ("precision (%)", |r| format!("{:.1}", r.targets.precision)),
        ];
        for (label, cell) in rows {
            write!(f, "{label:<20}")?;
            for &r in &runs {
                write!(f, " | {:>12}", cell(r))?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{RULE}")?;

        let w = &self.winners;
        writeln!(f, "fastest:            {}", w.fastest)?;
        writeln!(f, "highest score:      {}", w.highest_score)?;
        writeln!(f, "highest efficiency: {}", w.highest_efficiency)?;
        writeln!(
            f,
            "shortest path:      {}",
            w.shortest_path.as_deref().unwrap_or("none found")
        )?;
        write!(f, "fewest nodes:       {}", w.fewest_nodes)?;

        if let Some(d) = &self.deltas {
            write!(f, "\n\n{} vs {}:", d.first, d.second)?;
            write!(f, "\n  time:           {:+.2}%", d.duration)?;
            write!(f, "\n  nodes explored: {:+.2}%", d.nodes_explored)?;
            write!(f, "\n  path length:    {:+.2}%", d.path_length)?;
            write!(f, "\n  score:          {:+.2}%", d.score)?;
        }

        if let (Some(bfs), Some(dfs)) = (self.run_for(Algorithm::Bfs), self.run_for(Algorithm::Dfs)) {
            let (b, d) = (&bfs.exploration, &dfs.exploration);
            write!(f, "\n\nBFS always finds a shortest path; DFS only finds some path.")?;
            write!(
                f,
                "\n  BFS: {} nodes, path {}, {:.2}% efficient",
                b.nodes_explored, b.path_length, b.efficiency
            )?;
            write!(
                f,
                "\n  DFS: {} nodes, path {}, {:.2}% efficient",
                d.nodes_explored, d.path_length, d.efficiency
            )?;
            let verdict = if b.path_length < d.path_length {
                "BFS found a shorter path than DFS"
            } else if b.path_length > d.path_length {
                "DFS found a shorter path this time"
            } else {
                "both found paths of the same length"
            };
            write!(f, "\n  {verdict}")?;
            if b.nodes_explored < d.nodes_explored {
                write!(f, "\n  BFS explored fewer nodes")?;
            } else if b.nodes_explored > d.nodes_explored {
                write!(f, "\n  DFS explored fewer nodes")?;
            } else {
                write!(f, "\n  both explored the same number of nodes")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::Classification;
    use crate::stats::RunRecorder;
    use gridwalk_core::Point;
    use std::time::Duration;

    fn run(
        algorithm: Algorithm,
        secs: f64,
        nodes: usize,
        path_len: usize,
        confirmed: usize,
    ) -> RunStatistics {
        let mut rec = RunRecorder::new(algorithm.name());
        rec.set_algorithm(algorithm);
        let path = (0..path_len as i32).map(|c| Point::from_row_col(0, c)).collect();
        rec.record_search(path_len > 0, path, nodes, Duration::from_secs_f64(secs));
        for i in 0..confirmed {
            rec.record_cell(
                Point::from_row_col(0, i as i32),
                Classification::new("rose", 0.9, true),
            );
        }
        rec.finish()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn needs_two_runs() {
        let bfs = run(Algorithm::Bfs, 0.1, 5, 3, 0);
        let mut cmp = Comparator::new();
        assert_eq!(cmp.compare().unwrap_err(), CompareError::TooFewRuns(0));
        cmp.add("BFS", &bfs);
        assert_eq!(cmp.compare().unwrap_err(), CompareError::TooFewRuns(1));
    }

    #[test]
    fn bfs_vs_dfs_winners_and_deltas() {
        let bfs = run(Algorithm::Bfs, 0.002, 40, 12, 2);
        let dfs = run(Algorithm::Dfs, 0.001, 55, 30, 1);
        let mut cmp = Comparator::new();
        cmp.add("BFS", &bfs);
        cmp.add("DFS", &dfs);
        let c = cmp.compare_at(1_700_000_000).unwrap();

        assert_eq!(c.winners.fastest, "DFS");
        assert_eq!(c.winners.shortest_path.as_deref(), Some("BFS"));
        assert_eq!(c.winners.fewest_nodes, "BFS");
        assert_eq!(c.winners.highest_score, "BFS");
        // 30/55 > 12/40
        assert_eq!(c.winners.highest_efficiency, "DFS");

        let d = c.deltas.as_ref().unwrap();
        assert_eq!((d.first.as_str(), d.second.as_str()), ("BFS", "DFS"));
        assert!(close(d.duration, 100.0));
        assert!(close(d.nodes_explored, -27.272727));
        assert!(close(d.path_length, -60.0));
        assert!(close(d.score, 100.0));

        assert_eq!(c.order, vec!["BFS", "DFS"]);
        assert_eq!(c.runs["DFS"].exploration.nodes_explored, 55);
    }

    #[test]
    fn ties_go_to_first_added() {
        let a = run(Algorithm::Bfs, 0.5, 10, 5, 1);
        let b = run(Algorithm::Dfs, 0.5, 10, 5, 1);
        let mut cmp = Comparator::new();
        cmp.add("second", &b);
        cmp.add("first", &a);
        let w = cmp.compare_at(0).unwrap().winners;
        assert_eq!(w.fastest, "second");
        assert_eq!(w.highest_score, "second");
        assert_eq!(w.highest_efficiency, "second");
        assert_eq!(w.shortest_path.as_deref(), Some("second"));
        assert_eq!(w.fewest_nodes, "second");
    }

    #[test]
    fn shortest_path_ignores_failed_runs() {
        let failed = run(Algorithm::Dfs, 0.1, 9, 0, 0);
        let ok = run(Algorithm::Bfs, 0.1, 9, 7, 0);
        let mut cmp = Comparator::new();
        cmp.add("failed", &failed);
        cmp.add("ok", &ok);
        assert_eq!(
            cmp.compare_at(0).unwrap().winners.shortest_path.as_deref(),
            Some("ok")
        );

        let mut none = Comparator::new();
        none.add("a", &failed);
        none.add("b", &failed);
        assert_eq!(none.compare_at(0).unwrap().winners.shortest_path, None);
    }

    #[test]
    fn zero_denominator_deltas() {
        let a = run(Algorithm::Bfs, 0.1, 4, 3, 2);
        let b = run(Algorithm::Dfs, 0.0, 0, 0, 0);
        let mut cmp = Comparator::new();
        cmp.add("a", &a);
        cmp.add("b", &b);
        let d = cmp.compare_at(0).unwrap().deltas.unwrap();
        assert_eq!((d.duration, d.nodes_explored, d.path_length, d.score), (0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn three_runs_have_no_deltas() {
        let a = run(Algorithm::Bfs, 0.3, 10, 4, 0);
        let b = run(Algorithm::Dfs, 0.2, 12, 6, 0);
        let c = run(Algorithm::Dfs, 0.1, 14, 8, 0);
        let mut cmp = Comparator::new();
        cmp.add("a", &a);
        cmp.add("b", &b);
        cmp.add("c", &c);
        let out = cmp.compare_at(0).unwrap();
        assert!(out.deltas.is_none());
        assert_eq!(out.winners.fastest, "c");
        assert_eq!(out.winners.fewest_nodes, "a");
    }

    #[test]
    fn re_adding_replaces_in_place() {
        let slow = run(Algorithm::Bfs, 0.9, 10, 4, 0);
        let fast = run(Algorithm::Bfs, 0.01, 10, 4, 0);
        let other = run(Algorithm::Dfs, 0.5, 10, 4, 0);
        let mut cmp = Comparator::new();
        cmp.add("BFS", &slow);
        cmp.add("DFS", &other);
        cmp.add("BFS", &fast);
        assert_eq!(cmp.len(), 2);
        assert_eq!(cmp.names().collect::<Vec<_>>(), ["BFS", "DFS"]);
        assert_eq!(cmp.get("BFS").map(RunStatistics::search_duration), Some(fast.search_duration()));
        assert_eq!(cmp.compare_at(0).unwrap().winners.fastest, "BFS");
        cmp.clear();
        assert!(cmp.is_empty());
    }

    #[test]
    fn report_text() {
        let bfs = run(Algorithm::Bfs, 0.002, 40, 12, 2);
        let dfs = run(Algorithm::Dfs, 0.001, 55, 30, 1);
        let mut cmp = Comparator::new();
        cmp.add("BFS", &bfs);
        cmp.add("DFS", &dfs);
        assert_eq!(
            cmp.quick_summary(),
            "BFS: path 12, 40 nodes, score 2 | DFS: path 30, 55 nodes, score 1"
        );
        let text = cmp.compare_at(0).unwrap().to_string();
        assert!(text.contains("fastest:            DFS"));
        assert!(text.contains("BFS vs DFS:"));
        assert!(text.contains("path length:    -60.00%"));
        assert!(text.contains("BFS found a shorter path than DFS"));
        assert!(text.contains("BFS explored fewer nodes"));
    }

    #[test]
    fn comparison_json_round_trip() {
        let bfs = run(Algorithm::Bfs, 0.25, 8, 4, 1);
        let dfs = run(Algorithm::Dfs, 0.5, 6, 6, 0);
        let mut cmp = Comparator::new();
        cmp.add("BFS", &bfs);
        cmp.add("DFS", &dfs);
        let c = cmp.compare_at(42).unwrap();
        let json = serde_json::to_string_pretty(&c).unwrap();
        let back: Comparison = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
