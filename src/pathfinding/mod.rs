//! Cached shortest paths at cell and region granularity

pub mod astar;
pub mod pathfinder;
pub mod reach;

pub use pathfinder::Pathfinder;
pub use reach::{ReachCache, ReachMap};
