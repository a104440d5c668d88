//! The capability every tactic state implements

use crate::army::context::{ArmyContext, TacticalInputs};
use crate::army::intent::UnitIntent;

/// One tactic the army can be executing. The supervisor owns a single
/// current-state slot; a state signals a hand-over by returning its
/// successor from [`TacticState::try_transitioning`], evaluated once per
/// frame after execution.
pub trait TacticState {
    fn name(&self) -> &'static str;

    /// Precondition checked by the supervisor before the state runs. A
    /// non-viable state is replaced with the terminal state.
    fn is_viable(&self, context: &ArmyContext, inputs: &mut TacticalInputs) -> bool;

    /// Produce this frame's unit intents.
    fn execute(
        &mut self,
        context: &mut ArmyContext,
        inputs: &mut TacticalInputs,
        intents: &mut Vec<UnitIntent>,
    );

    /// Decide whether to hand control to another state this frame.
    fn try_transitioning(
        &mut self,
        context: &ArmyContext,
        inputs: &mut TacticalInputs,
    ) -> Option<Box<dyn TacticState>>;
}
