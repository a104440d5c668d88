//! Reachability sweeps over the region graph
//!
//! The defense evaluation repeatedly asks "which of these regions can be
//! reached from here, and how far is each one". Candidates are visited
//! farthest first so the pathfinder's prefix memoization turns the closer
//! queries into cache hits.

use ahash::AHashMap;
use ordered_float::OrderedFloat;

use crate::core::types::RegionId;
use crate::pathfinding::Pathfinder;
use crate::regions::RegionGraph;

/// Region path distance per reachable candidate. Absent key means
/// unreachable.
pub type ReachMap = AHashMap<RegionId, f32>;

type ReachKey = (RegionId, Vec<RegionId>, Vec<RegionId>);

#[derive(Debug, Default)]
pub struct ReachCache {
    sweeps: AHashMap<ReachKey, ReachMap>,
}

impl ReachCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distances from `origin` to every reachable candidate, avoiding the
    /// `blocked` regions. Whole sweeps are memoized on top of the
    /// pathfinder's own path cache.
    pub fn reach(
        &mut self,
        pathfinder: &mut Pathfinder,
        graph: &RegionGraph,
        origin: RegionId,
        candidates: &[RegionId],
        blocked: &[RegionId],
    ) -> &ReachMap {
        let mut sorted_candidates: Vec<RegionId> = candidates.to_vec();
        sorted_candidates.sort_unstable();
        sorted_candidates.dedup();
        let mut sorted_blocked: Vec<RegionId> = blocked.to_vec();
        sorted_blocked.sort_unstable();
        sorted_blocked.dedup();

        let key = (origin, sorted_candidates, sorted_blocked);
        if !self.sweeps.contains_key(&key) {
            let map = compute_reach(pathfinder, graph, origin, &key.1, &key.2);
            self.sweeps.insert(key.clone(), map);
        }
        &self.sweeps[&key]
    }

    /// Drop every memoized sweep. Call alongside [`Pathfinder::invalidate`].
    pub fn invalidate(&mut self) {
        self.sweeps.clear();
    }
}

fn compute_reach(
    pathfinder: &mut Pathfinder,
    graph: &RegionGraph,
    origin: RegionId,
    candidates: &[RegionId],
    blocked: &[RegionId],
) -> ReachMap {
    let origin_center = graph.region(origin).center().center();
    let mut ordered: Vec<RegionId> = candidates.to_vec();
    ordered.sort_by_key(|&id| {
        let center = graph.region(id).center().center();
        (std::cmp::Reverse(OrderedFloat(center.distance(&origin_center))), id)
    });

    let mut map = ReachMap::default();
    for candidate in ordered {
        if let Some(distance) = pathfinder.region_distance(graph, origin, candidate, blocked) {
            map.insert(candidate, distance);
        }
    }
    map
}
