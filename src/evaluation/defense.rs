//! Defense impact scoring
//!
//! For every region we could defend from, estimate how much defending it
//! protects the rest of the map against each currently threatening region.
//! The comparison runs on two reach maps: our reach from the defended
//! region, and the enemy's reach pretending the defended region is blocked.
//! Defending pays off where we arrive sooner than the enemy's best
//! alternative route, and pays extra where blocking the defended region
//! cuts the enemy off entirely.

use ahash::AHashMap;

use crate::core::config::TacticsConfig;
use crate::core::math::normalize;
use crate::core::types::RegionId;
use crate::evaluation::scores::ScoreStore;
use crate::pathfinding::{Pathfinder, ReachCache, ReachMap};
use crate::regions::RegionGraph;

#[derive(Debug, Default)]
pub struct DefenseEvaluator {
    reach: ReachCache,
}

impl DefenseEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop memoized reach sweeps. Call whenever region obstruction
    /// changes, alongside [`Pathfinder::invalidate`].
    pub fn invalidate(&mut self) {
        self.reach.invalidate();
    }

    /// `enemy_force` is the opposing alliance's raw force map and `value`
    /// our own value store, both computed the same tick.
    pub fn evaluate(
        &mut self,
        graph: &RegionGraph,
        pathfinder: &mut Pathfinder,
        enemy_force: &AHashMap<RegionId, f32>,
        value: &ScoreStore,
        config: &TacticsConfig,
    ) -> AHashMap<RegionId, f32> {
        let threatening: Vec<RegionId> = enemy_force
            .iter()
            .filter(|(_, &force)| force >= config.medium_force_threshold)
            .map(|(&id, _)| id)
            .collect();
        if threatening.is_empty() {
            return AHashMap::new();
        }
        let max_threat = threatening
            .iter()
            .map(|id| enemy_force[id])
            .fold(0.0f32, f32::max);

        let all_regions: Vec<RegionId> = graph.region_ids().collect();
        let mut scores: AHashMap<RegionId, f32> = AHashMap::new();

        for &defended in &all_regions {
            let our_reach = self
                .reach
                .reach(pathfinder, graph, defended, &all_regions, &[])
                .clone();
            if our_reach.is_empty() {
                continue;
            }

            let mut total = 0.0;
            for &threat in &threatening {
                let enemy_reach = self
                    .reach
                    .reach(pathfinder, graph, threat, &all_regions, &[defended])
                    .clone();
                let impact =
                    defense_impact(&all_regions, &our_reach, &enemy_reach, value, config);
                total += (enemy_force[&threat] / max_threat) * impact;
            }
            if total > 0.0 {
                scores.insert(defended, total);
            }
        }
        scores
    }
}

/// Summed per-region impact of one defended/threatening pairing. Each
/// impacted region contributes up to 3: a value term, a distance-advantage
/// term, and an obstruction bonus, each in [0, 1].
fn defense_impact(
    regions: &[RegionId],
    our_reach: &ReachMap,
    enemy_reach: &ReachMap,
    value: &ScoreStore,
    config: &TacticsConfig,
) -> f32 {
    let skew = config.reach_distance_skew;
    let our_max = our_reach.values().fold(0.0f32, |a, &b| a.max(b)) + skew;
    let enemy_max = enemy_reach.values().fold(0.0f32, |a, &b| a.max(b)) + skew;

    let mut impact = 0.0;
    for &region in regions {
        let Some(&our_distance) = our_reach.get(&region) else {
            continue;
        };
        if value.get(region, false) <= config.intriguing_value_threshold {
            continue;
        }
        let value_score = value.get(region, true);

        let (distance_score, obstruction_bonus) = match enemy_reach.get(&region) {
            Some(&enemy_distance) => {
                let ratio = (enemy_distance + skew) / (our_distance + skew);
                (normalize(ratio, 1.0 / our_max, enemy_max), 0.0)
            }
            // Blocking the defended region cut the enemy off entirely;
            // weigh the enemy's worst remaining reach against our distance
            None => {
                let ratio = enemy_max / (our_distance + skew);
                (normalize(ratio, 1.0 / our_max, enemy_max), 1.0)
            }
        };
        impact += value_score + distance_score + obstruction_bonus;
    }
    impact
}
