//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Game frame counter (simulation time unit)
pub type Frame = u64;

/// Unique identifier for units, assigned by the observation feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(pub Uuid);

impl UnitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UnitId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier of a region in the region graph arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(pub u32);

impl RegionId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Which side a unit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alliance {
    Friendly,
    Enemy,
    Neutral,
}

impl Alliance {
    /// The opposing alliance. Neutral has no opponent and maps to itself.
    pub fn opponent(&self) -> Alliance {
        match self {
            Alliance::Friendly => Alliance::Enemy,
            Alliance::Enemy => Alliance::Friendly,
            Alliance::Neutral => Alliance::Neutral,
        }
    }
}

/// Integer grid coordinate on the terrain grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// World position of the cell center
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x as f32 + 0.5, self.y as f32 + 0.5)
    }

    /// Euclidean distance between cell centers
    pub fn distance_to(&self, other: &CellCoord) -> f32 {
        self.center().distance(&other.center())
    }

    /// The 4 orthogonally adjacent cells
    pub fn orthogonal_neighbors(&self) -> [CellCoord; 4] {
        [
            CellCoord::new(self.x + 1, self.y),
            CellCoord::new(self.x - 1, self.y),
            CellCoord::new(self.x, self.y + 1),
            CellCoord::new(self.x, self.y - 1),
        ]
    }

    /// All 8 adjacent cells, diagonals included
    pub fn neighbors(&self) -> [CellCoord; 8] {
        [
            CellCoord::new(self.x + 1, self.y),
            CellCoord::new(self.x - 1, self.y),
            CellCoord::new(self.x, self.y + 1),
            CellCoord::new(self.x, self.y - 1),
            CellCoord::new(self.x + 1, self.y + 1),
            CellCoord::new(self.x + 1, self.y - 1),
            CellCoord::new(self.x - 1, self.y + 1),
            CellCoord::new(self.x - 1, self.y - 1),
        ]
    }
}

/// 2D world position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The grid cell containing this position
    pub fn cell(&self) -> CellCoord {
        CellCoord::new(self.x.floor() as i32, self.y.floor() as i32)
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0001 {
            Self { x: self.x / len, y: self.y / len }
        } else {
            Self::default()
        }
    }

    /// Rotate this point around a pivot by the given angle in radians
    pub fn rotate_around(&self, pivot: Vec2, radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        let dx = self.x - pivot.x;
        let dy = self.y - pivot.y;
        Self {
            x: pivot.x + dx * cos - dy * sin,
            y: pivot.y + dx * sin + dy * cos,
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alliance_opponent() {
        assert_eq!(Alliance::Friendly.opponent(), Alliance::Enemy);
        assert_eq!(Alliance::Enemy.opponent(), Alliance::Friendly);
        assert_eq!(Alliance::Neutral.opponent(), Alliance::Neutral);
    }

    #[test]
    fn test_cell_center() {
        let cell = CellCoord::new(3, 7);
        let center = cell.center();
        assert_eq!(center, Vec2::new(3.5, 7.5));
        assert_eq!(center.cell(), cell);
    }

    #[test]
    fn test_cell_distance() {
        let a = CellCoord::new(0, 0);
        let b = CellCoord::new(3, 4);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_around_quarter_turn() {
        let pivot = Vec2::new(1.0, 1.0);
        let point = Vec2::new(2.0, 1.0);
        let rotated = point.rotate_around(pivot, std::f32::consts::FRAC_PI_2);
        assert!((rotated.x - 1.0).abs() < 1e-5);
        assert!((rotated.y - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_neighbors_are_adjacent() {
        let cell = CellCoord::new(5, 5);
        for n in cell.neighbors() {
            assert!((n.x - cell.x).abs() <= 1 && (n.y - cell.y).abs() <= 1);
            assert_ne!(n, cell);
        }
    }
}
