//! Per-region scalar scores derived from unit snapshots
//!
//! Four scores per region: Force (decaying military strength per alliance),
//! Value (economic worth), Threat (enemy force diffused over path distance)
//! and Defense (impact of defending a region on the rest of the map). All
//! are recomputed wholesale every evaluation tick.

pub mod defense;
pub mod force;
pub mod scores;
pub mod threat;
pub mod tracker;
pub mod units;
pub mod value;

pub use scores::ScoreStore;
pub use tracker::RegionTracker;
pub use units::{SnapshotFeed, UnitSnapshot, UnitsView};
