//! Ground model for HOLDOUT.
//!
//! Heightmap grids with bilinear elevation queries, and the downward
//! ground probe the spawn coordinator uses to snap units to the terrain.

pub use holdout_core as core;

pub mod grid;

// Re-export key types for convenience.
pub use grid::{FlatGround, HeightGrid, HeightGridHeader};
