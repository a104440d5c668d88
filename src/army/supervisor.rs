//! Army supervisor: owns the current tactic state and the transition swap

use crate::army::approach::ApproachState;
use crate::army::context::{ArmyContext, TacticalInputs};
use crate::army::defend::DefendState;
use crate::army::intent::UnitIntent;
use crate::army::states::TacticState;
use crate::army::terminal::TerminalState;
use crate::core::config::TacticsConfig;
use crate::core::types::Vec2;
use crate::evaluation::units::UnitSnapshot;

pub struct ArmySupervisor {
    context: ArmyContext,
    state: Box<dyn TacticState>,
}

impl ArmySupervisor {
    /// Supervise an offensive: approach the target, then engage.
    pub fn attack(
        config: &TacticsConfig,
        target: Vec2,
        engagement_radius: f32,
        can_hunt: bool,
    ) -> Self {
        Self {
            context: ArmyContext::new(target, engagement_radius, can_hunt),
            state: Box::new(ApproachState::new(config)),
        }
    }

    /// Supervise a defense: intercept enemies around the target point.
    pub fn defend(target: Vec2, defense_radius: f32, can_hunt: bool) -> Self {
        Self {
            context: ArmyContext::new(target, defense_radius, can_hunt),
            state: Box::new(DefendState),
        }
    }

    /// Run one frame of decisions for the current army membership.
    pub fn tick(
        &mut self,
        army: Vec<UnitSnapshot>,
        inputs: &mut TacticalInputs,
    ) -> Vec<UnitIntent> {
        self.context.refresh(army, inputs.graph);
        let mut intents = Vec::new();
        if self.context.army.is_empty() {
            return intents;
        }

        if !self.state.is_viable(&self.context, inputs) {
            tracing::warn!(state = self.state.name(), "state no longer viable, aborting");
            self.state = Box::new(TerminalState);
        }

        self.state.execute(&mut self.context, inputs, &mut intents);

        if let Some(next) = self.state.try_transitioning(&self.context, inputs) {
            tracing::info!(
                from = self.state.name(),
                to = next.name(),
                "army state transition"
            );
            self.state = next;
        }
        intents
    }

    pub fn state_name(&self) -> &'static str {
        self.state.name()
    }

    /// The tactic ended; the army can be reassigned.
    pub fn is_done(&self) -> bool {
        self.state.name() == "Terminal"
    }

    pub fn context(&self) -> &ArmyContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ArmyContext {
        &mut self.context
    }
}
