//! Shared per-army state and the per-frame decision inputs
//!
//! States never reference each other; everything they need to coordinate
//! lives in [`ArmyContext`]. External collaborators come in through
//! [`TacticalInputs`] each frame, constructor-injected by the embedding
//! bot rather than reached through globals.

use crate::core::config::TacticsConfig;
use crate::core::types::{Alliance, Frame, RegionId, Vec2};
use crate::evaluation::units::{UnitSnapshot, UnitsView};
use crate::evaluation::RegionTracker;
use crate::pathfinding::Pathfinder;
use crate::regions::RegionGraph;
use crate::terrain::TerrainMap;

/// Detection and priority-target intelligence from the embedding bot
pub trait DetectionView {
    /// Whether any of these units is currently revealed to the enemy
    fn is_detected(&self, units: &[UnitSnapshot]) -> bool;

    /// High-priority targets near a position, most important first
    fn priority_targets(&self, near: Vec2, radius: f32) -> Vec<UnitSnapshot> {
        let _ = (near, radius);
        Vec::new()
    }
}

/// Detection view that never detects anything
#[derive(Debug, Default)]
pub struct NoDetection;

impl DetectionView for NoDetection {
    fn is_detected(&self, _units: &[UnitSnapshot]) -> bool {
        false
    }
}

/// Everything a state needs for one frame of decisions
pub struct TacticalInputs<'a> {
    pub terrain: &'a TerrainMap,
    pub graph: &'a RegionGraph,
    pub pathfinder: &'a mut Pathfinder,
    pub tracker: &'a RegionTracker,
    pub units: &'a dyn UnitsView,
    pub detection: &'a dyn DetectionView,
    pub config: &'a TacticsConfig,
    pub frame: Frame,
}

/// Mutable state shared by all of an army's tactic states
#[derive(Debug)]
pub struct ArmyContext {
    pub army: Vec<UnitSnapshot>,
    pub target_position: Vec2,
    pub target_region: Option<RegionId>,
    /// A priority target was designated; do not re-acquire a different one
    pub is_target_priority: bool,
    pub engagement_radius: f32,
    pub can_hunt: bool,
    pub can_hit_air: bool,
    army_center: Vec2,
}

impl ArmyContext {
    pub fn new(target_position: Vec2, engagement_radius: f32, can_hunt: bool) -> Self {
        Self {
            army: Vec::new(),
            target_position,
            target_region: None,
            is_target_priority: false,
            engagement_radius,
            can_hunt,
            can_hit_air: true,
            army_center: target_position,
        }
    }

    /// Take this frame's army membership and refresh derived state.
    pub fn refresh(&mut self, army: Vec<UnitSnapshot>, graph: &RegionGraph) {
        self.army = army;
        if !self.army.is_empty() {
            let sum = self
                .army
                .iter()
                .fold(Vec2::default(), |acc, u| acc + u.position);
            self.army_center = sum * (1.0 / self.army.len() as f32);
        }
        self.target_region = graph.nearest_region(self.target_position);
    }

    pub fn army_center(&self) -> Vec2 {
        self.army_center
    }

    pub fn army_force(&self) -> f32 {
        self.army.iter().map(|u| u.combat_power).sum()
    }

    /// Fraction of the army at or above the healthy integrity threshold
    pub fn healthy_fraction(&self, threshold: f32) -> f32 {
        if self.army.is_empty() {
            return 0.0;
        }
        let healthy = self
            .army
            .iter()
            .filter(|u| u.integrity >= threshold)
            .count();
        healthy as f32 / self.army.len() as f32
    }

    /// Whether the army's weapons can reach a given enemy. Cloaked and
    /// burrowed units need detection the army does not provide; flyers need
    /// anti-air.
    pub fn can_target(&self, enemy: &UnitSnapshot) -> bool {
        debug_assert_eq!(enemy.alliance, Alliance::Enemy);
        if enemy.is_cloaked || enemy.is_burrowed {
            return false;
        }
        !enemy.is_flying || self.can_hit_air
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_recomputes_center() {
        let graph = RegionGraph::build(vec![vec![crate::core::types::CellCoord::new(0, 0)]]);
        let mut context = ArmyContext::new(Vec2::new(0.5, 0.5), 10.0, false);
        context.refresh(
            vec![
                UnitSnapshot::new(Alliance::Friendly, Vec2::new(0.0, 0.0)),
                UnitSnapshot::new(Alliance::Friendly, Vec2::new(4.0, 2.0)),
            ],
            &graph,
        );
        assert!((context.army_center().x - 2.0).abs() < 1e-6);
        assert!((context.army_center().y - 1.0).abs() < 1e-6);
        assert_eq!(context.target_region, Some(RegionId(0)));
    }

    #[test]
    fn test_healthy_fraction() {
        let graph = RegionGraph::build(vec![vec![crate::core::types::CellCoord::new(0, 0)]]);
        let mut context = ArmyContext::new(Vec2::default(), 10.0, false);
        context.refresh(
            vec![
                UnitSnapshot::new(Alliance::Friendly, Vec2::default()).with_integrity(1.0),
                UnitSnapshot::new(Alliance::Friendly, Vec2::default()).with_integrity(0.2),
            ],
            &graph,
        );
        assert!((context.healthy_fraction(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_targetable_filter() {
        let context = ArmyContext::new(Vec2::default(), 10.0, false);
        let walker = UnitSnapshot::new(Alliance::Enemy, Vec2::default());
        let ghost = UnitSnapshot::new(Alliance::Enemy, Vec2::default()).cloaked();
        let flyer = UnitSnapshot::new(Alliance::Enemy, Vec2::default()).flying();
        assert!(context.can_target(&walker));
        assert!(!context.can_target(&ghost));
        assert!(context.can_target(&flyer));

        let mut grounded_army = ArmyContext::new(Vec2::default(), 10.0, false);
        grounded_army.can_hit_air = false;
        assert!(!grounded_army.can_target(&flyer));
    }
}
