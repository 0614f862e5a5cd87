//! Grid generation.
//!
//! Each attempt scatters obstacles and target objects independently per
//! cell, then checks how much of the passable area is reachable. The first
//! attempt reaching the configured ratio is accepted; if none does, an
//! obstacle-free layout is produced instead, which is always connected.

use gridwalk_core::{Cell, CellKind, Grid, GridError, ImageRef, Point};
use gridwalk_paths::PathRange;
use rand::Rng;

/// Generation parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenConfig {
    /// Probability that a cell becomes an obstacle.
    pub obstacle_prob: f64,
    /// Probability that a cell becomes a target object.
    pub target_prob: f64,
    /// Random layouts tried before falling back.
    pub max_attempts: usize,
    /// Minimum `reachable / passable` ratio for a random layout to be kept.
    pub min_reachable_ratio: f64,
    /// Turn passable cells cut off from the main region into obstacles once a
    /// layout is accepted, so accepted grids are always fully connected.
    pub seal_unreachable: bool,
    /// Image names target objects are drawn from, referenced by
    /// [`ImageRef`] index. Only the first 65 535 entries are drawn.
    pub catalog: Vec<String>,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            obstacle_prob: 0.25,
            target_prob: 0.10,
            max_attempts: 10,
            min_reachable_ratio: 0.90,
            seal_unreachable: true,
            catalog: ["daisy.jpg", "rose.jpg", "sunflower.jpg", "tulip.jpg", "pinecone.jpg"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl GenConfig {
    /// Catalog entry for an image reference.
    pub fn image_name(&self, image: ImageRef) -> Option<&str> {
        self.catalog.get(image.0 as usize).map(String::as_str)
    }
}

/// How a generated grid was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GenOutcome {
    /// Random layout accepted on attempt `attempt` (1-based).
    Random { attempt: usize, reachable_ratio: f64 },
    /// No random layout qualified; the grid has no obstacles.
    Fallback,
}

/// A generated grid and how it was obtained.
#[derive(Debug, Clone)]
pub struct Generated {
    pub grid: Grid,
    pub outcome: GenOutcome,
}

/// Grid generator driven by an injected random number generator.
pub struct MapGen<R: Rng> {
    pub rng: R,
    pub config: GenConfig,
    pr: PathRange,
}

impl<R: Rng> MapGen<R> {
    /// Create a new generator.
    pub fn new(config: GenConfig, rng: R) -> Self {
        Self {
            rng,
            config,
            pr: PathRange::new(Default::default()),
        }
    }

    /// Generate an `size×size` grid.
    ///
    /// Fails only for a non-positive `size`.
    pub fn generate(&mut self, size: i32) -> Result<Generated, GridError> {
        let obstacle_prob = self.config.obstacle_prob;
        for attempt in 1..=self.config.max_attempts {
            let mut grid = self.scatter(size, obstacle_prob)?;
            self.pr.set_range(grid.bounds());
            let report = self.pr.connectivity(&grid);
            let ratio = report.reachable_ratio();
            log::debug!("attempt {attempt}: {report}");

            if ratio >= self.config.min_reachable_ratio {
                if self.config.seal_unreachable && !report.is_connected() {
                    let sealed = self.seal_unreachable(&mut grid);
                    log::debug!("sealed {sealed} unreachable cells");
                }
                log::info!(
                    "accepted {size}x{size} grid on attempt {attempt} ({:.1}% reachable)",
                    ratio * 100.0
                );
                return Ok(Generated {
                    grid,
                    outcome: GenOutcome::Random {
                        attempt,
                        reachable_ratio: ratio,
                    },
                });
            }
        }

        log::warn!(
            "no layout reached {:.0}% connectivity in {} attempts, generating without obstacles",
            self.config.min_reachable_ratio * 100.0,
            self.config.max_attempts
        );
        let grid = self.scatter(size, 0.0)?;
        Ok(Generated {
            grid,
            outcome: GenOutcome::Fallback,
        })
    }

    /// Draw one value per cell: obstacle below `obstacle_prob`, target below
    /// `obstacle_prob + target_prob`, empty otherwise.
    fn scatter(&mut self, size: i32, obstacle_prob: f64) -> Result<Grid, GridError> {
        let target_cutoff = obstacle_prob + self.config.target_prob;
        let catalog_len = u16::try_from(self.config.catalog.len()).unwrap_or(u16::MAX);
        let rng = &mut self.rng;

        Grid::from_fn(size, |p| {
            let v: f64 = rng.random();
            let cell = Cell::new(p);
            if v < obstacle_prob {
                cell.with_kind(CellKind::Obstacle)
            } else if v < target_cutoff {
                let cell = cell.with_kind(CellKind::TargetObject);
                if catalog_len == 0 {
                    cell
                } else {
                    cell.with_image(ImageRef(rng.random_range(0..catalog_len)))
                }
            } else {
                cell
            }
        })
    }

    /// Turn every passable cell outside the first passable cell's region
    /// into an obstacle. Returns the number of cells changed.
    fn seal_unreachable(&mut self, grid: &mut Grid) -> usize {
        let Some(origin) = grid.iter().find(|c| c.kind.passable()).map(Cell::pos) else {
            return 0;
        };
        self.pr.reachable_from(grid, origin);
        let cut_off: Vec<Point> = grid
            .bounds()
            .iter()
            .filter(|&p| grid.passable(p) && self.pr.cc_at(p).is_none())
            .collect();
        for &p in &cut_off {
            grid.set_kind(p, CellKind::Obstacle);
        }
        cut_off.len()
    }
}
