//! Warroom - Tactical decision core for a real-time-strategy agent

pub mod army;
pub mod core;
pub mod evaluation;
pub mod pathfinding;
pub mod regions;
pub mod terrain;
