//! Random occupancy grid generation with bounded connectivity retries.

pub mod mapgen;

pub use mapgen::{GenConfig, GenOutcome, Generated, MapGen};
