//! Engage state: commit to combat in the target region

use ordered_float::OrderedFloat;

use crate::army::context::{ArmyContext, TacticalInputs};
use crate::army::hunt::HuntState;
use crate::army::intent::UnitIntent;
use crate::army::states::TacticState;
use crate::army::terminal::TerminalState;
use crate::core::types::Alliance;
use crate::evaluation::units::UnitSnapshot;

#[derive(Debug, Default)]
pub struct EngageState;

fn enemies_in_radius(context: &ArmyContext, inputs: &TacticalInputs) -> Vec<UnitSnapshot> {
    inputs
        .units
        .units(Alliance::Enemy)
        .into_iter()
        .filter(|e| context.can_target(e))
        .filter(|e| e.position.distance(&context.target_position) <= context.engagement_radius)
        .collect()
}

impl TacticState for EngageState {
    fn name(&self) -> &'static str {
        "Engage"
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
        let enemies = enemies_in_radius(context, inputs);
        for soldier in &context.army {
            // Attack-move at the fight if it is visible, at the target
            // position otherwise; the engine resolves the micro.
            let position = enemies
                .iter()
                .min_by_key(|e| OrderedFloat(e.position.distance(&soldier.position)))
                .map(|e| e.position)
                .unwrap_or(context.target_position);
            intents.push(UnitIntent::AttackMove {
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
        if !enemies_in_radius(context, inputs).is_empty() {
            return None;
        }
        let region_cleared = context
            .target_region
            .map(|region| inputs.tracker.force(region, Alliance::Enemy, false) <= 0.0)
            .unwrap_or(true);
        if !region_cleared {
            return None;
        }
        if context.can_hunt {
            Some(Box::new(HuntState))
        } else {
            Some(Box::new(TerminalState))
        }
    }
}
