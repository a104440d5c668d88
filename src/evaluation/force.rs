//! Decaying per-region military force
//!
//! Units are attributed to the region nearest their position. Observations
//! are discounted for staleness: a unit seen this tick counts in full,
//! a memorized unit's contribution halves every `force_half_life_seconds`
//! of real time. Structures do not move, so their age is ignored.

use ahash::AHashMap;

use crate::core::config::TacticsConfig;
use crate::core::types::{Alliance, Frame, RegionId};
use crate::evaluation::units::{UnitSnapshot, UnitsView};
use crate::regions::RegionGraph;

/// Staleness discount in (0, 1]. Exactly 1 for structures and for units
/// observed on the current frame.
pub fn uncertainty_penalty(unit: &UnitSnapshot, frame: Frame, decay_constant: f64) -> f64 {
    if unit.is_structure || unit.last_seen >= frame {
        return 1.0;
    }
    (-decay_constant * unit.age(frame) as f64).exp()
}

#[derive(Debug)]
pub struct ForceEvaluator {
    alliance: Alliance,
}

impl ForceEvaluator {
    pub fn new(alliance: Alliance) -> Self {
        Self { alliance }
    }

    pub fn evaluate(
        &self,
        graph: &RegionGraph,
        units: &dyn UnitsView,
        config: &TacticsConfig,
        frame: Frame,
    ) -> AHashMap<RegionId, f32> {
        let decay_constant = config.force_decay_constant();
        let mut scores: AHashMap<RegionId, f32> = AHashMap::new();

        let mut add = |unit: &UnitSnapshot| {
            let Some(region) = graph.nearest_region(unit.position) else {
                return;
            };
            let penalty = uncertainty_penalty(unit, frame, decay_constant);
            *scores.entry(region).or_insert(0.0) += unit.combat_power * penalty as f32;
        };

        for unit in units.units(self.alliance) {
            add(&unit);
        }
        for ghost in units.ghost_units(self.alliance) {
            add(&ghost);
        }
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{CellCoord, Vec2};
    use crate::evaluation::units::SnapshotFeed;

    fn single_region() -> RegionGraph {
        let cells = (0..4)
            .flat_map(|x| (0..4).map(move |y| CellCoord::new(x, y)))
            .collect();
        RegionGraph::build(vec![cells])
    }

    fn enemy_at(position: Vec2) -> UnitSnapshot {
        UnitSnapshot::new(Alliance::Enemy, position).with_combat_power(10.0)
    }

    #[test]
    fn test_visible_units_count_in_full() {
        let graph = single_region();
        let config = TacticsConfig::new();
        let feed = SnapshotFeed {
            visible: vec![enemy_at(Vec2::new(1.0, 1.0)).with_last_seen(50)],
            ghosts: vec![],
        };
        let evaluator = ForceEvaluator::new(Alliance::Enemy);
        let scores = evaluator.evaluate(&graph, &feed, &config, 50);
        assert!((scores[&RegionId(0)] - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_ghost_force_decays_with_age() {
        let graph = single_region();
        let config = TacticsConfig::new();
        let evaluator = ForceEvaluator::new(Alliance::Enemy);

        let score_at_age = |age: Frame| {
            let feed = SnapshotFeed {
                visible: vec![],
                ghosts: vec![enemy_at(Vec2::new(1.0, 1.0)).with_last_seen(0)],
            };
            evaluator.evaluate(&graph, &feed, &config, age)[&RegionId(0)]
        };

        let fresh = score_at_age(1);
        let old = score_at_age(1000);
        let older = score_at_age(5000);
        assert!(fresh > old);
        assert!(old > older);
        assert!(older > 0.0);
    }

    #[test]
    fn test_half_life_halves_the_contribution() {
        let config = TacticsConfig::new();
        let half_life_frames =
            (config.force_half_life_seconds * config.frames_per_second) as Frame;
        let ghost = enemy_at(Vec2::default()).with_last_seen(0);
        let penalty = uncertainty_penalty(&ghost, half_life_frames, config.force_decay_constant());
        assert!((penalty - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_structures_never_decay() {
        let config = TacticsConfig::new();
        let depot = enemy_at(Vec2::default()).structure().with_last_seen(0);
        let early = uncertainty_penalty(&depot, 10, config.force_decay_constant());
        let late = uncertainty_penalty(&depot, 100_000, config.force_decay_constant());
        assert_eq!(early, 1.0);
        assert_eq!(late, 1.0);
    }
}
