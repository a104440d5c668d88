//! Approach state: maneuver into striking position
//!
//! Moves the army toward its target while staying out of enemy weapon
//! range plus a safety margin. Re-acquires the concrete target every frame
//! unless a priority target was designated. Safety pre-empts tactics:
//! getting detected or getting stuck aborts the whole maneuver.

use ordered_float::OrderedFloat;

use crate::army::context::{ArmyContext, TacticalInputs};
use crate::army::engage::EngageState;
use crate::army::intent::UnitIntent;
use crate::army::states::TacticState;
use crate::army::stuck::StuckDetector;
use crate::army::terminal::TerminalState;
use crate::core::config::TacticsConfig;
use crate::core::types::{Alliance, Vec2};
use crate::evaluation::units::UnitSnapshot;
use crate::regions::clustering::{centroid, dbscan};

#[derive(Debug)]
pub struct ApproachState {
    stuck: StuckDetector,
    aborted: bool,
}

impl ApproachState {
    pub fn new(config: &TacticsConfig) -> Self {
        Self {
            stuck: StuckDetector::new(config.stuck_window_ticks, config.stuck_distance_threshold),
            aborted: false,
        }
    }

    /// Pick this frame's concrete target: a designated priority target
    /// wins, then the enemy cluster nearest the army within the operation
    /// radius, then the position the supervisor was given.
    fn acquire_target(&self, context: &mut ArmyContext, inputs: &mut TacticalInputs) {
        if context.is_target_priority {
            return;
        }
        let priority = inputs
            .detection
            .priority_targets(context.target_position, inputs.config.operation_radius);
        if let Some(best) = priority.first() {
            context.target_position = best.position;
            context.is_target_priority = true;
            return;
        }

        let nearby: Vec<UnitSnapshot> = inputs
            .units
            .units(Alliance::Enemy)
            .into_iter()
            .filter(|e| !e.is_structure)
            .filter(|e| {
                e.position.distance(&context.target_position) <= inputs.config.operation_radius
            })
            .collect();
        let clusters = dbscan(
            &nearby,
            inputs.config.enemy_cluster_epsilon,
            inputs.config.enemy_cluster_min_points,
        )
        .clusters;
        let army_center = context.army_center();
        if let Some(nearest) = clusters
            .iter()
            .min_by_key(|c| OrderedFloat(centroid(c).distance(&army_center)))
        {
            context.target_position = centroid(nearest);
        }
    }

    /// Next movement goal for one soldier: the center of the next region
    /// on its path to the target, or the target itself from the final
    /// region.
    fn waypoint(
        &self,
        soldier: &UnitSnapshot,
        context: &ArmyContext,
        inputs: &mut TacticalInputs,
    ) -> Vec2 {
        let Some(target_region) = context.target_region else {
            return context.target_position;
        };
        let Some(own_region) = inputs.graph.nearest_region(soldier.position) else {
            return context.target_position;
        };
        if own_region == target_region {
            return context.target_position;
        }
        match inputs
            .pathfinder
            .region_path(inputs.graph, own_region, target_region, &[])
        {
            Some(path) if path.len() >= 2 => inputs.graph.region(path[1]).center().center(),
            _ => context.target_position,
        }
    }
}

impl TacticState for ApproachState {
    fn name(&self) -> &'static str {
        "Approach"
    }

    /// The maneuver only makes sense while the target is reachable.
    fn is_viable(&self, context: &ArmyContext, inputs: &mut TacticalInputs) -> bool {
        if context.army.is_empty() {
            return false;
        }
        let Some(target_region) = context.target_region else {
            return false;
        };
        let Some(own_region) = inputs.graph.nearest_region(context.army_center()) else {
            return false;
        };
        inputs
            .pathfinder
            .region_path(inputs.graph, own_region, target_region, &[])
            .is_some()
    }

    fn execute(
        &mut self,
        context: &mut ArmyContext,
        inputs: &mut TacticalInputs,
        intents: &mut Vec<UnitIntent>,
    ) {
        self.stuck.observe(context.army_center());
        if self.stuck.is_stuck() {
            tracing::warn!(center = ?context.army_center(), "army stuck, aborting approach");
            self.aborted = true;
            return;
        }
        if inputs.detection.is_detected(&context.army) {
            tracing::warn!("army detected, aborting approach");
            self.aborted = true;
            return;
        }

        self.acquire_target(context, inputs);

        let enemies = inputs.units.units(Alliance::Enemy);
        let safety = inputs.config.safety_distance;
        let context = &*context;
        for soldier in &context.army {
            let pressing = enemies
                .iter()
                .filter(|e| {
                    soldier.position.distance(&e.position) < e.weapon_range + safety
                })
                .min_by_key(|e| OrderedFloat(soldier.position.distance(&e.position)));

            let position = match pressing {
                Some(enemy) => {
                    // Back off along the line away from the closest threat
                    let away = (soldier.position - enemy.position).normalize();
                    soldier.position + away * safety
                }
                None => self.waypoint(soldier, context, inputs),
            };
            intents.push(UnitIntent::Move {
                unit: soldier.id,
                position,
            });
        }
    }

    fn try_transitioning(
        &mut self,
        context: &ArmyContext,
        inputs: &mut TacticalInputs,
    ) -> Option<Box<dyn TacticState>> {
        if self.aborted {
            return Some(Box::new(TerminalState));
        }

        let healthy_enough = context.healthy_fraction(inputs.config.healthy_integrity_threshold)
            >= inputs.config.min_engagement_army_fraction;
        if !healthy_enough {
            return None;
        }
        let enemy_force = context
            .target_region
            .map(|region| inputs.tracker.force(region, Alliance::Enemy, false))
            .unwrap_or(0.0);
        let strong_enough = context.army_force() >= enemy_force * inputs.config.engage_force_ratio;
        let in_position = context.army_center().distance(&context.target_position)
            <= inputs.config.operation_radius;
        if strong_enough && in_position {
            return Some(Box::new(EngageState));
        }
        None
    }
}
