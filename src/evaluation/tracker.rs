//! Evaluation tick orchestration
//!
//! Owns one score store per (score kind, alliance) and recomputes them all
//! wholesale on a coarser cadence than the frame loop. Recomputing every
//! frame would be correct, just wasteful; the tick divisor is purely a
//! budget control.

use crate::core::config::TacticsConfig;
use crate::core::types::{Alliance, Frame, RegionId};
use crate::evaluation::defense::DefenseEvaluator;
use crate::evaluation::force::ForceEvaluator;
use crate::evaluation::scores::ScoreStore;
use crate::evaluation::threat::ThreatEvaluator;
use crate::evaluation::units::UnitsView;
use crate::evaluation::value::ValueEvaluator;
use crate::pathfinding::Pathfinder;
use crate::regions::RegionGraph;

pub struct RegionTracker {
    config: TacticsConfig,

    force_friendly: ScoreStore,
    force_enemy: ScoreStore,
    value_friendly: ScoreStore,
    value_enemy: ScoreStore,
    threat_friendly: ScoreStore,
    threat_enemy: ScoreStore,
    defense: ScoreStore,

    threat_evaluator: ThreatEvaluator,
    defense_evaluator: DefenseEvaluator,
    last_evaluated: Option<Frame>,
}

impl RegionTracker {
    pub fn new(config: &TacticsConfig, graph: &RegionGraph) -> Self {
        let store = || ScoreStore::new(graph.region_ids());
        Self {
            config: config.clone(),
            force_friendly: store(),
            force_enemy: store(),
            value_friendly: store(),
            value_enemy: store(),
            threat_friendly: store(),
            threat_enemy: store(),
            defense: store(),
            threat_evaluator: ThreatEvaluator::new(),
            defense_evaluator: DefenseEvaluator::new(),
            last_evaluated: None,
        }
    }

    fn due(&self, frame: Frame) -> bool {
        match self.last_evaluated {
            None => true,
            Some(last) if last == frame => false,
            Some(_) => frame % self.config.evaluation_tick_frames == 0,
        }
    }

    /// Recompute all scores if the evaluation tick is due. Call once per
    /// frame; off-tick calls are free.
    pub fn update(
        &mut self,
        graph: &RegionGraph,
        pathfinder: &mut Pathfinder,
        units: &dyn UnitsView,
        frame: Frame,
    ) {
        if !self.due(frame) {
            return;
        }
        self.last_evaluated = Some(frame);

        let friendly_force =
            ForceEvaluator::new(Alliance::Friendly).evaluate(graph, units, &self.config, frame);
        let enemy_force =
            ForceEvaluator::new(Alliance::Enemy).evaluate(graph, units, &self.config, frame);
        self.force_friendly.replace(&friendly_force);
        self.force_enemy.replace(&enemy_force);

        let friendly_value = ValueEvaluator::new(Alliance::Friendly).evaluate(graph, units);
        let enemy_value = ValueEvaluator::new(Alliance::Enemy).evaluate(graph, units);
        self.value_friendly.replace(&friendly_value);
        self.value_enemy.replace(&enemy_value);

        // Threat to one alliance diffuses from the other's force
        let threat_to_friendly =
            self.threat_evaluator
                .evaluate(graph, pathfinder, &enemy_force);
        let threat_to_enemy =
            self.threat_evaluator
                .evaluate(graph, pathfinder, &friendly_force);
        self.threat_friendly.replace(&threat_to_friendly);
        self.threat_enemy.replace(&threat_to_enemy);

        let defense = self.defense_evaluator.evaluate(
            graph,
            pathfinder,
            &enemy_force,
            &self.value_friendly,
            &self.config,
        );
        self.defense.replace(&defense);

        tracing::debug!(frame, regions = graph.len(), "region scores recomputed");
    }

    /// Drop reach sweeps derived from the previous topology. Call whenever
    /// region obstruction changes, alongside [`Pathfinder::invalidate`].
    pub fn on_terrain_changed(&mut self) {
        self.defense_evaluator.invalidate();
        // Force re-evaluation on the next update
        self.last_evaluated = None;
    }

    pub fn force(&self, region: RegionId, alliance: Alliance, normalized: bool) -> f32 {
        self.per_alliance(&self.force_friendly, &self.force_enemy, alliance)
            .map(|store| store.get(region, normalized))
            .unwrap_or(0.0)
    }

    pub fn value(&self, region: RegionId, alliance: Alliance, normalized: bool) -> f32 {
        self.per_alliance(&self.value_friendly, &self.value_enemy, alliance)
            .map(|store| store.get(region, normalized))
            .unwrap_or(0.0)
    }

    /// Pressure the opposing alliance projects onto a region
    pub fn threat(&self, region: RegionId, alliance: Alliance, normalized: bool) -> f32 {
        self.per_alliance(&self.threat_friendly, &self.threat_enemy, alliance)
            .map(|store| store.get(region, normalized))
            .unwrap_or(0.0)
    }

    /// How much defending this region would protect the rest of the map
    pub fn defense(&self, region: RegionId, normalized: bool) -> f32 {
        self.defense.get(region, normalized)
    }

    fn per_alliance<'a>(
        &self,
        friendly: &'a ScoreStore,
        enemy: &'a ScoreStore,
        alliance: Alliance,
    ) -> Option<&'a ScoreStore> {
        match alliance {
            Alliance::Friendly => Some(friendly),
            Alliance::Enemy => Some(enemy),
            Alliance::Neutral => {
                tracing::error!("score query for the neutral alliance");
                None
            }
        }
    }
}
