//! Reachability-adjusted enemy pressure per region
//!
//! Threat diffuses enemy force over the region graph: each source region
//! contributes its force divided by one plus the path distance to the
//! evaluated region. Regions the enemy cannot reach at all receive nothing
//! from that source.

use ahash::AHashMap;

use crate::core::types::RegionId;
use crate::pathfinding::Pathfinder;
use crate::regions::RegionGraph;

#[derive(Debug, Default)]
pub struct ThreatEvaluator;

impl ThreatEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// `enemy_force` is the opposing alliance's raw force map computed the
    /// same tick.
    pub fn evaluate(
        &self,
        graph: &RegionGraph,
        pathfinder: &mut Pathfinder,
        enemy_force: &AHashMap<RegionId, f32>,
    ) -> AHashMap<RegionId, f32> {
        let mut scores: AHashMap<RegionId, f32> = AHashMap::new();
        for target in graph.region_ids() {
            let mut threat = 0.0;
            for (&source, &force) in enemy_force {
                if force <= 0.0 {
                    continue;
                }
                if let Some(distance) = pathfinder.region_distance(graph, source, target, &[]) {
                    threat += force / (1.0 + distance);
                }
            }
            if threat > 0.0 {
                scores.insert(target, threat);
            }
        }
        scores
    }
}
