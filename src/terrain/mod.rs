//! Spatial index over the discretized terrain grid
//!
//! Walkability and height lookups back every pathing and region computation.

pub mod grid;
pub mod map;

pub use grid::Grid;
pub use map::TerrainMap;
