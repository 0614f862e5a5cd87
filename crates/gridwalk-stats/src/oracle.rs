//! Boundary to the external target classifier.

use std::collections::HashMap;
use std::fmt;

use gridwalk_core::{Cell, Point};
use serde::{Deserialize, Serialize};

/// What the classifier said about one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub label: String,
    /// In `[0, 1]`.
    pub confidence: f64,
    /// Whether the object is one of the sought targets.
    pub is_target: bool,
}

/// Coarse confidence bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub const fn name(self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Classification {
    pub fn new(label: impl Into<String>, confidence: f64, is_target: bool) -> Self {
        Self {
            label: label.into(),
            confidence: confidence.clamp(0.0, 1.0),
            is_target,
        }
    }

    /// Placeholder recorded when the classifier could not answer.
    pub fn sentinel(err: &ClassifyError) -> Self {
        Self {
            label: err.sentinel_label().to_owned(),
            confidence: 0.0,
            is_target: false,
        }
    }

    /// `High` from 0.7, `Medium` from 0.4, `Low` below.
    pub fn level(&self) -> ConfidenceLevel {
        if self.confidence >= 0.7 {
            ConfidenceLevel::High
        } else if self.confidence >= 0.4 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

/// Classifier failure. Never propagated past the analysis step: the cell is
/// recorded with [`Classification::sentinel`] instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    #[error("classifier unavailable")]
    Unavailable,
    #[error("classification inconclusive")]
    Inconclusive,
    #[error("classification failed: {0}")]
    Failed(String),
}

impl ClassifyError {
    pub const fn sentinel_label(&self) -> &'static str {
        match self {
            ClassifyError::Unavailable => "classifier-unavailable",
            ClassifyError::Inconclusive => "inconclusive",
            ClassifyError::Failed(_) => "classifier-error",
        }
    }
}

/// External object classifier. Only called for target cells.
pub trait Classifier {
    fn classify(&mut self, cell: &Cell) -> Result<Classification, ClassifyError>;
}

impl<F> Classifier for F
where
    F: FnMut(&Cell) -> Result<Classification, ClassifyError>,
{
    fn classify(&mut self, cell: &Cell) -> Result<Classification, ClassifyError> {
        self(cell)
    }
}

/// Classifications keyed by position, shared across the runs on one grid.
///
/// Must be cleared whenever a new grid is generated.
#[derive(Debug, Default)]
pub struct ClassificationCache {
    entries: HashMap<Point, Classification>,
    hits: usize,
    misses: usize,
}

impl ClassificationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, p: Point) -> Option<&Classification> {
        self.entries.get(&p)
    }

    pub fn insert(&mut self, p: Point, c: Classification) {
        self.entries.insert(p, c);
    }

    /// Cached classification for `cell`, asking `classifier` on a miss.
    ///
    /// Failures are cached as sentinels too, so a failing cell is not
    /// retried until the cache is cleared.
    pub fn get_or_classify<C: Classifier + ?Sized>(
        &mut self,
        cell: &Cell,
        classifier: &mut C,
    ) -> Classification {
        let p = cell.pos();
        if let Some(c) = self.entries.get(&p) {
            self.hits += 1;
            log::trace!("cache hit at {p}: {}", c.label);
            return c.clone();
        }
        self.misses += 1;
        let c = match classifier.classify(cell) {
            Ok(c) => c,
            Err(err) => {
                log::warn!("classifier failed at {p}: {err}");
                Classification::sentinel(&err)
            }
        };
        self.entries.insert(p, c.clone());
        c
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}
