//! Per-region economic and strategic value

use ahash::AHashMap;

use crate::core::types::{Alliance, RegionId};
use crate::evaluation::units::UnitsView;
use crate::regions::RegionGraph;

/// Sums the strategic value of an alliance's units per region. Driven
/// mostly by structures (expansions, production), so ghosts count in full:
/// a base does not stop being valuable because it left vision.
#[derive(Debug)]
pub struct ValueEvaluator {
    alliance: Alliance,
}

impl ValueEvaluator {
    pub fn new(alliance: Alliance) -> Self {
        Self { alliance }
    }

    pub fn evaluate(&self, graph: &RegionGraph, units: &dyn UnitsView) -> AHashMap<RegionId, f32> {
        let mut scores: AHashMap<RegionId, f32> = AHashMap::new();
        let all = units
            .units(self.alliance)
            .into_iter()
            .chain(units.ghost_units(self.alliance));
        for unit in all {
            if unit.strategic_value <= 0.0 {
                continue;
            }
            if let Some(region) = graph.nearest_region(unit.position) {
                *scores.entry(region).or_insert(0.0) += unit.strategic_value;
            }
        }
        scores
    }
}
