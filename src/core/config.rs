//! Tactical configuration with documented constants
//!
//! All policy constants are collected here with explanations of their purpose.
//! The defaults reproduce the behavior the engine was tuned with, but every
//! value is a policy knob, not a structural requirement.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, WarroomError};

/// Configuration for the tactical decision core
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TacticsConfig {
    // === REGION SEGMENTATION ===
    /// Angle step, in degrees, between ray-casting orientations.
    ///
    /// Scan lines are cast from 0° up to (but excluding) 180°, since a line
    /// and its reverse cover the same cells. At 5° this gives 36 orientations.
    pub scan_angle_increment: u32,

    /// Choke score above which a cell is considered a choke candidate.
    ///
    /// The score of a cell is the sum of 1/length over every walkable scan
    /// segment crossing it, so cells covered only by short segments score
    /// high. Raising this finds fewer, narrower chokes.
    pub choke_score_cutoff: f32,

    /// DBSCAN epsilon (in cells) when clustering choke candidate cells.
    pub choke_cluster_epsilon: f32,

    /// DBSCAN minimum neighborhood size when clustering choke candidate cells.
    pub choke_cluster_min_points: usize,

    /// Offset applied when amplifying a cluster's dispersion ratio.
    ///
    /// The ratio std / max(mean, median) is amplified as (ratio + offset)²
    /// − offset, which penalizes high-dispersion clusters more than
    /// low-dispersion ones.
    pub dispersion_offset: f32,

    /// Regions smaller than this many cells are merged into their largest
    /// neighbor. Prevents corner artifacts from becoming standalone regions.
    pub min_region_area: usize,

    /// Fraction of a region's cells that must be covered by obstacles for
    /// the region to be flagged as obstructed.
    pub region_obstruction_fraction: f32,

    // === EVALUATION ===
    /// Simulation frames per real-time second, used to convert the force
    /// half-life into frames.
    pub frames_per_second: f32,

    /// Half-life, in real-time seconds, of the force contribution of a unit
    /// that has left vision. After one half-life a memorized unit counts for
    /// half its combat power; structures never decay.
    pub force_half_life_seconds: f32,

    /// Evaluation ticks happen every this many frames.
    ///
    /// Purely a resource-budget control: evaluating every frame is always
    /// semantically valid, just more expensive.
    pub evaluation_tick_frames: u64,

    /// Enemy force at or above which a region counts as threatening for the
    /// defense evaluation.
    pub medium_force_threshold: f32,

    /// Regions whose own value is at or below this threshold contribute
    /// nothing to defense scores.
    pub intriguing_value_threshold: f32,

    /// Skew added to every reach distance to avoid division by zero in the
    /// defense distance ratio.
    pub reach_distance_skew: f32,

    // === ARMY SUPERVISION ===
    /// Distance to keep between approaching units and the enemy's weapon
    /// range while maneuvering into striking position.
    pub safety_distance: f32,

    /// Tolerance on the safety distance when deciding whether a unit already
    /// stands in striking position.
    pub safety_distance_tolerance: f32,

    /// Force ratio over the enemy army required to commit to an engagement.
    pub engage_force_ratio: f32,

    /// Fraction of the army that must be healthy before engaging.
    pub min_engagement_army_fraction: f32,

    /// Integrity below which a soldier no longer counts as healthy.
    pub healthy_integrity_threshold: f32,

    /// Radius around the army center in which the setup state looks for
    /// targets to strike.
    pub operation_radius: f32,

    /// DBSCAN epsilon when clustering enemy units into target groups.
    pub enemy_cluster_epsilon: f32,

    /// DBSCAN minimum neighborhood size when clustering enemy units.
    pub enemy_cluster_min_points: usize,

    /// A defending soldier considers at most this many of the
    /// highest-priority enemies when picking its target.
    pub max_defense_targets: usize,

    /// Distance to a rally point below which a soldier is considered
    /// in position.
    pub acceptable_distance_to_target: f32,

    /// Number of consecutive ticks the stuck detector looks back over.
    pub stuck_window_ticks: usize,

    /// Army-center displacement (in cells) below which the stuck detector
    /// flags the army as stuck over its window.
    pub stuck_distance_threshold: f32,
}

impl Default for TacticsConfig {
    fn default() -> Self {
        Self {
            // Segmentation
            scan_angle_increment: 5,
            choke_score_cutoff: 4.4,
            choke_cluster_epsilon: 1.5,
            choke_cluster_min_points: 4,
            dispersion_offset: 0.5,
            min_region_area: 6,
            region_obstruction_fraction: 0.25,

            // Evaluation
            frames_per_second: 22.4,
            force_half_life_seconds: 60.0,
            evaluation_tick_frames: 8,
            medium_force_threshold: 5.0,
            intriguing_value_threshold: 1.0,
            reach_distance_skew: 1.0,

            // Army supervision
            safety_distance: 5.0,
            safety_distance_tolerance: 2.5,
            engage_force_ratio: 1.25,
            min_engagement_army_fraction: 0.75,
            healthy_integrity_threshold: 0.5,
            operation_radius: 15.0,
            enemy_cluster_epsilon: 5.0,
            enemy_cluster_min_points: 2,
            max_defense_targets: 5,
            acceptable_distance_to_target: 3.0,
            stuck_window_ticks: 15,
            stuck_distance_threshold: 2.0,
        }
    }
}

impl TacticsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML, falling back to defaults for any
    /// field not present.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: TacticsConfig = toml::from_str(input)
            .map_err(|e| WarroomError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.scan_angle_increment == 0 || self.scan_angle_increment > 90 {
            return Err(WarroomError::InvalidConfig(format!(
                "scan_angle_increment ({}) must be in 1..=90",
                self.scan_angle_increment
            )));
        }
        if self.choke_score_cutoff <= 0.0 {
            return Err(WarroomError::InvalidConfig(
                "choke_score_cutoff must be positive".into(),
            ));
        }
        if self.frames_per_second <= 0.0 || self.force_half_life_seconds <= 0.0 {
            return Err(WarroomError::InvalidConfig(
                "frame rate and half-life must be positive".into(),
            ));
        }
        if self.evaluation_tick_frames == 0 {
            return Err(WarroomError::InvalidConfig(
                "evaluation_tick_frames must be at least 1".into(),
            ));
        }
        if self.engage_force_ratio <= 1.0 {
            return Err(WarroomError::InvalidConfig(format!(
                "engage_force_ratio ({}) must exceed 1.0",
                self.engage_force_ratio
            )));
        }
        if !(0.0..=1.0).contains(&self.min_engagement_army_fraction) {
            return Err(WarroomError::InvalidConfig(
                "min_engagement_army_fraction must be within [0, 1]".into(),
            ));
        }
        if self.stuck_window_ticks == 0 {
            return Err(WarroomError::InvalidConfig(
                "stuck_window_ticks must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Exponential decay constant ln(2) / half-life, in 1/frames.
    pub fn force_decay_constant(&self) -> f64 {
        let half_life_frames =
            crate::core::math::secs_to_frames(self.force_half_life_seconds, self.frames_per_second);
        std::f64::consts::LN_2 / half_life_frames as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(TacticsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_angle_increment() {
        let mut config = TacticsConfig::default();
        config.scan_angle_increment = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_engage_ratio() {
        let mut config = TacticsConfig::default();
        config.engage_force_ratio = 0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_toml_partial_override() {
        let config = TacticsConfig::from_toml_str("choke_score_cutoff = 3.0\n").unwrap();
        assert_eq!(config.choke_score_cutoff, 3.0);
        // Untouched fields keep their defaults
        assert_eq!(config.scan_angle_increment, 5);
    }

    #[test]
    fn test_decay_constant_halves_after_half_life() {
        let config = TacticsConfig::default();
        let half_life_frames = (60.0 * 22.4) as f64;
        let decayed = (-config.force_decay_constant() * half_life_frames).exp();
        assert!((decayed - 0.5).abs() < 1e-9);
    }
}
