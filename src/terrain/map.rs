//! Terrain model: walkability and height over the map grid
//!
//! Walkability excluding obstacles is static per map. Including obstacles it
//! reflects the current destructible-rock/building occupancy and can change
//! over the game; callers that cache derived data must invalidate on change.

use crate::core::error::{Result, WarroomError};
use crate::core::types::{CellCoord, Vec2};
use crate::terrain::grid::Grid;

#[derive(Debug, Clone)]
pub struct TerrainMap {
    name: String,
    walkable: Grid<bool>,
    obstructed: Grid<bool>,
    heights: Grid<f32>,
}

impl TerrainMap {
    /// Build a terrain map from the static data delivered at match start.
    ///
    /// `walkability` and `heights` are row-major and must match the given
    /// dimensions.
    pub fn new(
        name: impl Into<String>,
        width: usize,
        height: usize,
        walkability: Vec<bool>,
        heights: Vec<f32>,
    ) -> Result<Self> {
        let walkable = Grid::from_data(width, height, walkability).ok_or_else(|| {
            WarroomError::InvalidTerrain(format!(
                "walkability bitmap does not match {width}x{height}"
            ))
        })?;
        let heights = Grid::from_data(width, height, heights).ok_or_else(|| {
            WarroomError::InvalidTerrain(format!("height map does not match {width}x{height}"))
        })?;
        Ok(Self {
            name: name.into(),
            walkable,
            obstructed: Grid::new(width, height, false),
            heights,
        })
    }

    /// Convenience constructor for a fully walkable, flat map.
    pub fn open(name: impl Into<String>, width: usize, height: usize) -> Self {
        Self {
            name: name.into(),
            walkable: Grid::new(width, height, true),
            obstructed: Grid::new(width, height, false),
            heights: Grid::new(width, height, 0.0),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> usize {
        self.walkable.width()
    }

    pub fn height(&self) -> usize {
        self.walkable.height()
    }

    pub fn in_bounds(&self, cell: CellCoord) -> bool {
        self.walkable.in_bounds(cell)
    }

    fn bounds_error(&self, cell: CellCoord) -> WarroomError {
        WarroomError::OutOfBounds {
            cell,
            width: self.width(),
            height: self.height(),
        }
    }

    /// Whether the cell is walkable. With `include_obstacles`, cells
    /// currently covered by destructible objects count as unwalkable.
    ///
    /// Out-of-bounds queries are a contract violation and fail; callers are
    /// expected to clamp beforehand.
    pub fn is_walkable(&self, cell: CellCoord, include_obstacles: bool) -> Result<bool> {
        if !self.in_bounds(cell) {
            return Err(self.bounds_error(cell));
        }
        Ok(self.walkable_unchecked(cell, include_obstacles))
    }

    /// Walkability lookup that treats out-of-bounds as unwalkable.
    /// Internal hot paths use this after their own bounds handling.
    pub(crate) fn walkable_unchecked(&self, cell: CellCoord, include_obstacles: bool) -> bool {
        let Some(&walkable) = self.walkable.get(cell) else {
            return false;
        };
        if !walkable {
            return false;
        }
        if include_obstacles {
            !*self.obstructed.get(cell).unwrap_or(&false)
        } else {
            true
        }
    }

    /// Terrain height at the cell.
    pub fn height_at(&self, cell: CellCoord) -> Result<f32> {
        self.heights
            .get(cell)
            .copied()
            .ok_or_else(|| self.bounds_error(cell))
    }

    /// Revise the static walkability of a cell once a previously-unseen
    /// permanent blocker is confirmed.
    pub fn confirm_unwalkable(&mut self, cell: CellCoord) -> Result<()> {
        if !self.walkable.set(cell, false) {
            return Err(self.bounds_error(cell));
        }
        Ok(())
    }

    /// Mark or clear obstacle occupancy on a cell. Returns whether the flag
    /// changed; on a change the caller must invalidate path caches.
    pub fn set_obstructed(&mut self, cell: CellCoord, obstructed: bool) -> Result<bool> {
        let Some(slot) = self.obstructed.get_mut(cell) else {
            return Err(self.bounds_error(cell));
        };
        let changed = *slot != obstructed;
        *slot = obstructed;
        Ok(changed)
    }

    pub fn is_obstructed(&self, cell: CellCoord) -> bool {
        *self.obstructed.get(cell).unwrap_or(&false)
    }

    /// The walkable cell closest to the given position, searching outward in
    /// rings. None when the map has no walkable cell in range.
    pub fn closest_walkable(&self, position: Vec2) -> Option<CellCoord> {
        let origin = position.cell();
        if self.walkable_unchecked(origin, true) {
            return Some(origin);
        }

        let max_radius = self.width().max(self.height()) as i32;
        for radius in 1..=max_radius {
            let mut best: Option<(CellCoord, f32)> = None;
            for dx in -radius..=radius {
                for dy in -radius..=radius {
                    if dx.abs() != radius && dy.abs() != radius {
                        continue; // only the ring perimeter
                    }
                    let cell = CellCoord::new(origin.x + dx, origin.y + dy);
                    if !self.walkable_unchecked(cell, true) {
                        continue;
                    }
                    let distance = cell.center().distance(&position);
                    if best.map(|(_, d)| distance < d).unwrap_or(true) {
                        best = Some((cell, distance));
                    }
                }
            }
            if let Some((cell, _)) = best {
                return Some(cell);
            }
        }
        None
    }

    /// Neighbors a ground unit can step to from `cell`: 8-way, optionally
    /// considering obstacles. Diagonal steps require both adjacent
    /// orthogonal cells to be free so units cannot cut corners through
    /// walls.
    pub fn reachable_neighbors(&self, cell: CellCoord, include_obstacles: bool) -> Vec<CellCoord> {
        let mut neighbors = Vec::with_capacity(8);
        for n in cell.neighbors() {
            if !self.walkable_unchecked(n, include_obstacles) {
                continue;
            }
            let dx = n.x - cell.x;
            let dy = n.y - cell.y;
            if dx != 0 && dy != 0 {
                let side_a = CellCoord::new(cell.x + dx, cell.y);
                let side_b = CellCoord::new(cell.x, cell.y + dy);
                if !self.walkable_unchecked(side_a, include_obstacles)
                    || !self.walkable_unchecked(side_b, include_obstacles)
                {
                    continue;
                }
            }
            neighbors.push(n);
        }
        neighbors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_with_wall() -> TerrainMap {
        // 5x5 open map with an unwalkable column at x=2, except y=4
        let mut walkability = vec![true; 25];
        for y in 0..4 {
            walkability[y * 5 + 2] = false;
        }
        TerrainMap::new("wall", 5, 5, walkability, vec![0.0; 25]).unwrap()
    }

    #[test]
    fn test_out_of_bounds_is_an_error() {
        let map = TerrainMap::open("open", 4, 4);
        assert!(map.is_walkable(CellCoord::new(4, 0), true).is_err());
        assert!(map.height_at(CellCoord::new(0, -1)).is_err());
    }

    #[test]
    fn test_obstacles_only_affect_inclusive_lookup() {
        let mut map = TerrainMap::open("open", 4, 4);
        let cell = CellCoord::new(1, 1);
        assert!(map.set_obstructed(cell, true).unwrap());
        assert!(!map.is_walkable(cell, true).unwrap());
        assert!(map.is_walkable(cell, false).unwrap());
        // Setting the same value again reports no change
        assert!(!map.set_obstructed(cell, true).unwrap());
    }

    #[test]
    fn test_closest_walkable_skips_wall() {
        let map = map_with_wall();
        let found = map.closest_walkable(Vec2::new(2.5, 1.5)).unwrap();
        assert!(map.walkable_unchecked(found, true));
        assert_ne!(found.x, 2);
    }

    #[test]
    fn test_closest_walkable_identity_on_walkable_cell() {
        let map = TerrainMap::open("open", 4, 4);
        assert_eq!(
            map.closest_walkable(Vec2::new(2.5, 3.5)),
            Some(CellCoord::new(2, 3))
        );
    }

    #[test]
    fn test_no_corner_cutting() {
        let map = map_with_wall();
        // (2,4) is the gap below the wall; stepping to it diagonally from
        // (1,3) would cut the corner of the wall cell (2,3)
        let neighbors = map.reachable_neighbors(CellCoord::new(1, 3), true);
        assert!(!neighbors.contains(&CellCoord::new(2, 4)));
        assert!(neighbors.contains(&CellCoord::new(1, 4)));
    }

    #[test]
    fn test_mismatched_data_rejected() {
        assert!(TerrainMap::new("bad", 3, 3, vec![true; 8], vec![0.0; 9]).is_err());
    }
}
