//! Run statistics for grid searches.
//!
//! A run is recorded with a [`RunRecorder`]: the search outcome first, then
//! one [`CellAnalysis`] per target cell classified by an external
//! [`Classifier`]. [`RunRecorder::finish`] freezes it into a read-only
//! [`RunStatistics`]. A [`Comparator`] ranks finished runs against each other
//! and produces a [`Comparison`] that can be appended to an on-disk
//! [`history`].

pub mod analysis;
pub mod compare;
pub mod history;
pub mod oracle;
pub mod stats;

pub use analysis::{AnalysisScope, analyze_cells, analyze_outcome};
pub use compare::{CompareError, Comparator, Comparison, PairDeltas, Winners};
pub use history::HistoryError;
pub use oracle::{
    Classification, ClassificationCache, Classifier, ClassifyError, ConfidenceLevel,
};
pub use stats::{CellAnalysis, Exploration, RunRecorder, RunStatistics, RunSummary, Targets, Times};
