//! Classification of the target cells a run passed through.

use std::collections::HashSet;
use std::time::Instant;

use gridwalk_core::{CellKind, Grid, Point};
use gridwalk_paths::SearchOutcome;

use crate::oracle::{ClassificationCache, Classifier};
use crate::stats::RunRecorder;

/// Which positions of a search outcome get classified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnalysisScope {
    /// Only the cells on the reconstructed path.
    #[default]
    Path,
    /// Every cell the search explored.
    Trace,
}

/// Classify every target cell among `positions`, in order, and record the
/// results on `recorder`.
///
/// Each target position is recorded once per recorder, even if repeated or
/// already recorded by an earlier call. The cache is
/// consulted before the classifier; classifier failures are recorded as
/// sentinels. The elapsed time is added to the recorder's analysis time.
/// Returns the number of cells recorded.
pub fn analyze_cells<C: Classifier + ?Sized>(
    recorder: &mut RunRecorder,
    grid: &Grid,
    positions: &[Point],
    classifier: &mut C,
    cache: &mut ClassificationCache,
) -> usize {
    let t0 = Instant::now();
    let mut seen: HashSet<Point> = recorder.analyzed_positions().collect();
    let mut recorded = 0;

    for &p in positions {
        let Some(cell) = grid.at(p) else {
            continue;
        };
        if cell.kind != CellKind::TargetObject || !seen.insert(p) {
            continue;
        }
        let c = cache.get_or_classify(cell, classifier);
        log::debug!(
            "{}: {p} is {} ({:.2}, {})",
            recorder.name(),
            c.label,
            c.confidence,
            c.level()
        );
        recorder.record_cell(p, c);
        recorded += 1;
    }

    recorder.add_analysis_time(t0.elapsed());
    recorded
}

/// [`analyze_cells`] over the path or trace of `outcome`.
pub fn analyze_outcome<C: Classifier + ?Sized>(
    recorder: &mut RunRecorder,
    grid: &Grid,
    outcome: &SearchOutcome,
    scope: AnalysisScope,
    classifier: &mut C,
    cache: &mut ClassificationCache,
) -> usize {
    let positions = match scope {
        AnalysisScope::Path => &outcome.path,
        AnalysisScope::Trace => &outcome.trace,
    };
    analyze_cells(recorder, grid, positions, classifier, cache)
}
