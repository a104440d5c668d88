//! Defend state: hold and intercept around a target point

use ordered_float::OrderedFloat;

use crate::army::context::{ArmyContext, TacticalInputs};
use crate::army::hunt::HuntState;
use crate::army::intent::UnitIntent;
use crate::army::states::TacticState;
use crate::core::types::Alliance;
use crate::evaluation::units::UnitSnapshot;

#[derive(Debug, Default)]
pub struct DefendState;

/// The most pressing enemies inside the defense radius: targetable only,
/// ordered by distance to the defended point, capped at the configured
/// target count.
fn defense_targets(context: &ArmyContext, inputs: &TacticalInputs) -> Vec<UnitSnapshot> {
    let mut enemies: Vec<UnitSnapshot> = inputs
        .units
        .units(Alliance::Enemy)
        .into_iter()
        .filter(|e| context.can_target(e))
        .filter(|e| e.position.distance(&context.target_position) <= context.engagement_radius)
        .collect();
    enemies.sort_by_key(|e| {
        (
            OrderedFloat(e.position.distance(&context.target_position)),
            e.id.0,
        )
    });
    enemies.truncate(inputs.config.max_defense_targets);
    enemies
}

impl TacticState for DefendState {
    fn name(&self) -> &'static str {
        "Defend"
    }

    fn is_viable(&self, context: &ArmyContext, _inputs: &mut TacticalInputs) -> bool {
        !context.army.is_empty()
    }

    fn execute(
        &mut self,
        context: &mut ArmyContext,
        inputs: &mut TacticalInputs,
        intents: &mut Vec<UnitIntent>,
    ) {
        let targets = defense_targets(context, inputs);
        if targets.is_empty() {
            // Rally: pull stragglers back to the defended point
            for soldier in &context.army {
                let distance = soldier.position.distance(&context.target_position);
                if distance > inputs.config.acceptable_distance_to_target {
                    intents.push(UnitIntent::Move {
                        unit: soldier.id,
                        position: context.target_position,
                    });
                }
            }
            return;
        }
        for soldier in &context.army {
            let target = targets
                .iter()
                .min_by_key(|e| OrderedFloat(e.position.distance(&soldier.position)));
            if let Some(target) = target {
                intents.push(UnitIntent::Attack {
                    unit: soldier.id,
                    target: target.id,
                });
            }
        }
    }

    fn try_transitioning(
        &mut self,
        context: &ArmyContext,
        inputs: &mut TacticalInputs,
    ) -> Option<Box<dyn TacticState>> {
        if context.can_hunt && defense_targets(context, inputs).is_empty() {
            return Some(Box::new(HuntState));
        }
        None
    }
}
