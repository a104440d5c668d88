//! Terminal state: the tactic is over

use crate::army::context::{ArmyContext, TacticalInputs};
use crate::army::intent::UnitIntent;
use crate::army::states::TacticState;

/// End state for an aborted or completed tactic. Issues no intents; the
/// embedding bot notices via [`crate::army::ArmySupervisor::is_done`] and
/// reassigns the army.
#[derive(Debug, Default)]
pub struct TerminalState;

impl TacticState for TerminalState {
    fn name(&self) -> &'static str {
        "Terminal"
    }

    fn is_viable(&self, _context: &ArmyContext, _inputs: &mut TacticalInputs) -> bool {
        true
    }

    fn execute(
        &mut self,
        _context: &mut ArmyContext,
        _inputs: &mut TacticalInputs,
        _intents: &mut Vec<UnitIntent>,
    ) {
    }

    fn try_transitioning(
        &mut self,
        _context: &ArmyContext,
        _inputs: &mut TacticalInputs,
    ) -> Option<Box<dyn TacticState>> {
        None
    }
}
