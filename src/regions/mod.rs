//! Region segmentation engine
//!
//! One-time (per map) decomposition of walkable terrain into regions
//! separated at choke points, found by dense ray casting and density
//! clustering. The analysis is expensive and is pipelined across frames;
//! callers poll [`RegionAnalyzer::is_initialized`] instead of blocking.

pub mod chokes;
pub mod clustering;
pub mod region;
pub mod segmentation;
pub mod store;

pub use chokes::{ChokeFinder, ChokePoint, VisionLine};
pub use region::{NeighboringRegion, Region, RegionGraph};
pub use segmentation::RegionAnalyzer;
pub use store::ScanLineStore;
