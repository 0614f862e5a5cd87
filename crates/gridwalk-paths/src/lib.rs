//! Uninformed search and connectivity analysis on occupancy grids.
//!
//! - **BFS** shortest-path search ([`PathRange::search`] with [`Algorithm::Bfs`])
//! - **DFS** path search ([`Algorithm::Dfs`]), no optimality guarantee
//! - **Flood fill** reachability ([`PathRange::reachable_from`])
//! - **Connected components** ([`PathRange::cc_map_all`])
//! - **Whole-grid connectivity** ([`PathRange::connectivity`]) and the
//!   diagnostic [`GridReport`]
//!
//! All algorithms operate through [`PathRange`], which owns and reuses its
//! caches. The free functions ([`search`], [`validate_connectivity`], ...)
//! build a throwaway `PathRange` for one-shot use.

mod bfs;
mod cc;
mod connectivity;
mod dfs;
mod pathrange;
mod report;
mod search;
mod traits;

pub use connectivity::{
    ConnectivityReport, ConnectivityStatus, count_components, path_exists, reachable_from,
    validate_connectivity,
};
pub use pathrange::PathRange;
pub use report::GridReport;
pub use search::{Algorithm, SearchError, SearchOutcome, SearchStatus, search};
pub use traits::Pather;
