//! Hunt state: pursue scattered remaining threats

use ordered_float::OrderedFloat;

use crate::army::context::{ArmyContext, TacticalInputs};
use crate::army::intent::UnitIntent;
use crate::army::states::TacticState;
use crate::army::terminal::TerminalState;
use crate::core::types::Alliance;
use crate::evaluation::units::UnitSnapshot;

/// Chases whatever enemies are still known, visible or memorized. Ends
/// when nothing targetable remains.
#[derive(Debug, Default)]
pub struct HuntState;

fn known_enemies(context: &ArmyContext, inputs: &TacticalInputs) -> Vec<UnitSnapshot> {
    inputs
        .units
        .units(Alliance::Enemy)
        .into_iter()
        .chain(inputs.units.ghost_units(Alliance::Enemy))
        .filter(|enemy| context.can_target(enemy))
        .collect()
}

impl TacticState for HuntState {
    fn name(&self) -> &'static str {
        "Hunt"
    }

    fn is_viable(&self, context: &ArmyContext, _inputs: &mut TacticalInputs) -> bool {
        context.can_hunt && !context.army.is_empty()
    }

    fn execute(
        &mut self,
        context: &mut ArmyContext,
        inputs: &mut TacticalInputs,
        intents: &mut Vec<UnitIntent>,
    ) {
        let enemies = known_enemies(context, inputs);
        if enemies.is_empty() {
            return;
        }
        for soldier in &context.army {
            let quarry = enemies
                .iter()
                .min_by_key(|e| OrderedFloat(e.position.distance(&soldier.position)));
            if let Some(quarry) = quarry {
                intents.push(UnitIntent::AttackMove {
                    unit: soldier.id,
                    position: quarry.position,
                });
            }
        }
    }

    fn try_transitioning(
        &mut self,
        context: &ArmyContext,
        inputs: &mut TacticalInputs,
    ) -> Option<Box<dyn TacticState>> {
        if known_enemies(context, inputs).is_empty() {
            return Some(Box::new(TerminalState));
        }
        None
    }
}
