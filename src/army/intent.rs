//! Abstract unit orders emitted toward the action dispatcher

use crate::core::types::{UnitId, Vec2};

/// Fire-and-forget order for one unit. There is no acknowledgment channel;
/// the next frame's observations show whether the order took effect.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitIntent {
    Move { unit: UnitId, position: Vec2 },
    AttackMove { unit: UnitId, position: Vec2 },
    Attack { unit: UnitId, target: UnitId },
}

impl UnitIntent {
    pub fn unit(&self) -> UnitId {
        match self {
            UnitIntent::Move { unit, .. }
            | UnitIntent::AttackMove { unit, .. }
            | UnitIntent::Attack { unit, .. } => *unit,
        }
    }

    pub fn is_aggressive(&self) -> bool {
        !matches!(self, UnitIntent::Move { .. })
    }
}
