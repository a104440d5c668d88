//! Unit snapshots and the observation feed interface
//!
//! The core never owns units. An external tracker feeds read-only
//! snapshots per frame; any unit not updated on the current frame is a
//! ghost, a memorized position whose confidence decays over time.

use crate::core::types::{Alliance, Frame, UnitId, Vec2};
use crate::regions::clustering::Positioned;

/// Read-only view of one unit at a point in time
#[derive(Debug, Clone)]
pub struct UnitSnapshot {
    pub id: UnitId,
    pub alliance: Alliance,
    pub position: Vec2,
    /// Combat power estimate of the unit type
    pub combat_power: f32,
    /// Economic and strategic worth of the unit type
    pub strategic_value: f32,
    /// Health plus shield ratio in [0, 1]
    pub integrity: f32,
    pub last_seen: Frame,
    pub is_structure: bool,
    pub is_flying: bool,
    pub is_cloaked: bool,
    pub is_burrowed: bool,
    pub weapon_range: f32,
}

impl UnitSnapshot {
    pub fn new(alliance: Alliance, position: Vec2) -> Self {
        Self {
            id: UnitId::new(),
            alliance,
            position,
            combat_power: 1.0,
            strategic_value: 0.0,
            integrity: 1.0,
            last_seen: 0,
            is_structure: false,
            is_flying: false,
            is_cloaked: false,
            is_burrowed: false,
            weapon_range: 5.0,
        }
    }

    pub fn with_combat_power(mut self, combat_power: f32) -> Self {
        self.combat_power = combat_power;
        self
    }

    pub fn with_strategic_value(mut self, strategic_value: f32) -> Self {
        self.strategic_value = strategic_value;
        self
    }

    pub fn with_integrity(mut self, integrity: f32) -> Self {
        self.integrity = integrity;
        self
    }

    pub fn with_last_seen(mut self, last_seen: Frame) -> Self {
        self.last_seen = last_seen;
        self
    }

    pub fn structure(mut self) -> Self {
        self.is_structure = true;
        self
    }

    pub fn flying(mut self) -> Self {
        self.is_flying = true;
        self
    }

    pub fn cloaked(mut self) -> Self {
        self.is_cloaked = true;
        self
    }

    /// Frames since the unit was last observed
    pub fn age(&self, frame: Frame) -> u64 {
        frame.saturating_sub(self.last_seen)
    }
}

impl Positioned for UnitSnapshot {
    fn position(&self) -> Vec2 {
        self.position
    }
}

/// Observation feed supplied by the embedding bot
pub trait UnitsView {
    /// Units of an alliance currently in vision
    fn units(&self, alliance: Alliance) -> Vec<UnitSnapshot>;

    /// Memorized units that left vision since they were last seen
    fn ghost_units(&self, alliance: Alliance) -> Vec<UnitSnapshot>;
}

/// Plain in-memory feed, useful for tests and replays
#[derive(Debug, Default)]
pub struct SnapshotFeed {
    pub visible: Vec<UnitSnapshot>,
    pub ghosts: Vec<UnitSnapshot>,
}

impl UnitsView for SnapshotFeed {
    fn units(&self, alliance: Alliance) -> Vec<UnitSnapshot> {
        self.visible
            .iter()
            .filter(|u| u.alliance == alliance)
            .cloned()
            .collect()
    }

    fn ghost_units(&self, alliance: Alliance) -> Vec<UnitSnapshot> {
        self.ghosts
            .iter()
            .filter(|u| u.alliance == alliance)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_filters_by_alliance() {
        let feed = SnapshotFeed {
            visible: vec![
                UnitSnapshot::new(Alliance::Friendly, Vec2::new(1.0, 1.0)),
                UnitSnapshot::new(Alliance::Enemy, Vec2::new(2.0, 2.0)),
            ],
            ghosts: vec![UnitSnapshot::new(Alliance::Enemy, Vec2::new(3.0, 3.0))],
        };
        assert_eq!(feed.units(Alliance::Friendly).len(), 1);
        assert_eq!(feed.units(Alliance::Enemy).len(), 1);
        assert_eq!(feed.ghost_units(Alliance::Enemy).len(), 1);
        assert!(feed.ghost_units(Alliance::Friendly).is_empty());
    }

    #[test]
    fn test_age_saturates() {
        let unit = UnitSnapshot::new(Alliance::Enemy, Vec2::default()).with_last_seen(100);
        assert_eq!(unit.age(160), 60);
        assert_eq!(unit.age(50), 0);
    }
}
