//! Regions and the region adjacency graph
//!
//! Regions live in an arena and reference their neighbors by id, built in a
//! second pass once all regions exist. The region set is immutable after
//! construction; only the obstruction flag is mutable metadata.

use ahash::AHashMap;
use ordered_float::OrderedFloat;

use crate::core::types::{CellCoord, RegionId, Vec2};
use crate::terrain::TerrainMap;

/// An adjacent region and the cells of this region that touch it
#[derive(Debug, Clone)]
pub struct NeighboringRegion {
    pub region: RegionId,
    pub frontier: Vec<CellCoord>,
}

/// A maximal set of mutually reachable walkable cells bounded by chokes
#[derive(Debug, Clone)]
pub struct Region {
    id: RegionId,
    cells: Vec<CellCoord>,
    center: CellCoord,
    neighbors: Vec<NeighboringRegion>,
    is_obstructed: bool,
}

impl Region {
    pub fn id(&self) -> RegionId {
        self.id
    }

    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    pub fn area(&self) -> usize {
        self.cells.len()
    }

    /// The cell closest to the centroid of the region
    pub fn center(&self) -> CellCoord {
        self.center
    }

    pub fn neighbors(&self) -> &[NeighboringRegion] {
        &self.neighbors
    }

    /// Whether the region's cells are currently blocked by destructible or
    /// neutral objects
    pub fn is_obstructed(&self) -> bool {
        self.is_obstructed
    }
}

#[derive(Debug, Clone)]
pub struct RegionGraph {
    regions: Vec<Region>,
    cell_to_region: AHashMap<CellCoord, RegionId>,
}

impl RegionGraph {
    /// Build the graph from raw cell memberships. Empty memberships are
    /// discarded; neighbor relations are derived from orthogonal adjacency
    /// (diagonals excluded) in a second pass.
    pub fn build(memberships: Vec<Vec<CellCoord>>) -> Self {
        let mut regions = Vec::new();
        let mut cell_to_region = AHashMap::new();

        for cells in memberships.into_iter().filter(|m| !m.is_empty()) {
            let id = RegionId(regions.len() as u32);
            let mut cells = cells;
            cells.sort_by_key(|c| (c.x, c.y));
            cells.dedup();

            let centroid = cells
                .iter()
                .fold(Vec2::default(), |acc, c| acc + c.center())
                * (1.0 / cells.len() as f32);
            let center = *cells
                .iter()
                .min_by_key(|c| (OrderedFloat(c.center().distance(&centroid)), c.x, c.y))
                .expect("memberships are non-empty");

            for &cell in &cells {
                cell_to_region.insert(cell, id);
            }
            regions.push(Region {
                id,
                cells,
                center,
                neighbors: Vec::new(),
                is_obstructed: false,
            });
        }

        let mut graph = Self { regions, cell_to_region };
        graph.link_neighbors();
        graph
    }

    /// Second pass: two regions are neighbors when any of their cells are
    /// orthogonally adjacent. The frontier stores this region's border cells
    /// per neighbor.
    fn link_neighbors(&mut self) {
        for index in 0..self.regions.len() {
            let id = self.regions[index].id;
            let mut frontiers: AHashMap<RegionId, Vec<CellCoord>> = AHashMap::new();
            for &cell in &self.regions[index].cells {
                for neighbor_cell in cell.orthogonal_neighbors() {
                    match self.cell_to_region.get(&neighbor_cell) {
                        Some(&other) if other != id => {
                            let frontier = frontiers.entry(other).or_default();
                            if frontier.last() != Some(&cell) {
                                frontier.push(cell);
                            }
                        }
                        _ => {}
                    }
                }
            }
            let mut neighbors: Vec<NeighboringRegion> = frontiers
                .into_iter()
                .map(|(region, mut frontier)| {
                    frontier.sort_by_key(|c| (c.x, c.y));
                    frontier.dedup();
                    NeighboringRegion { region, frontier }
                })
                .collect();
            neighbors.sort_by_key(|n| n.region);
            self.regions[index].neighbors = neighbors;
        }
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region_ids(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.regions.iter().map(|r| r.id)
    }

    pub fn region(&self, id: RegionId) -> &Region {
        &self.regions[id.index()]
    }

    /// The region owning this exact cell, if any
    pub fn region_at(&self, cell: CellCoord) -> Option<RegionId> {
        self.cell_to_region.get(&cell).copied()
    }

    /// The region a world position belongs to, falling back to the region
    /// with the closest center when the position is not on a region cell
    /// (e.g. a flying unit over unwalkable ground).
    pub fn nearest_region(&self, position: Vec2) -> Option<RegionId> {
        if let Some(id) = self.region_at(position.cell()) {
            return Some(id);
        }
        self.regions
            .iter()
            .min_by_key(|r| OrderedFloat(r.center.center().distance(&position)))
            .map(|r| r.id)
    }

    /// Neighbors of a region that are currently passable
    pub fn reachable_neighbors(&self, id: RegionId) -> Vec<RegionId> {
        self.region(id)
            .neighbors
            .iter()
            .map(|n| n.region)
            .filter(|&n| !self.region(n).is_obstructed)
            .collect()
    }

    /// Flip a region's obstruction flag. Returns whether it changed; on a
    /// change the caller must invalidate path and reach caches.
    pub fn set_obstructed(&mut self, id: RegionId, obstructed: bool) -> bool {
        let region = &mut self.regions[id.index()];
        let changed = region.is_obstructed != obstructed;
        region.is_obstructed = obstructed;
        changed
    }

    /// Derive obstruction flags from current obstacle occupancy: a region is
    /// obstructed when at least `fraction` of its cells are covered.
    /// Returns whether any flag changed.
    pub fn update_obstructions(&mut self, terrain: &TerrainMap, fraction: f32) -> bool {
        let mut any_changed = false;
        for index in 0..self.regions.len() {
            let region = &self.regions[index];
            let covered = region
                .cells
                .iter()
                .filter(|&&cell| terrain.is_obstructed(cell))
                .count();
            let obstructed = covered as f32 >= region.cells.len() as f32 * fraction;
            let id = region.id;
            if self.set_obstructed(id, obstructed) {
                tracing::info!(region = id.0, obstructed, "region obstruction changed");
                any_changed = true;
            }
        }
        any_changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Three 2x2 regions in a row: 0 | 1 | 2
    fn three_in_a_row() -> RegionGraph {
        let block = |x0: i32| {
            vec![
                CellCoord::new(x0, 0),
                CellCoord::new(x0 + 1, 0),
                CellCoord::new(x0, 1),
                CellCoord::new(x0 + 1, 1),
            ]
        };
        RegionGraph::build(vec![block(0), block(2), block(4)])
    }

    #[test]
    fn test_neighbors_are_orthogonal_only() {
        let graph = three_in_a_row();
        let middle = graph.region(RegionId(1));
        let neighbor_ids: Vec<RegionId> = middle.neighbors.iter().map(|n| n.region).collect();
        assert_eq!(neighbor_ids, vec![RegionId(0), RegionId(2)]);

        let left = graph.region(RegionId(0));
        assert_eq!(left.neighbors.len(), 1);
    }

    #[test]
    fn test_frontier_cells_belong_to_owner() {
        let graph = three_in_a_row();
        let left = graph.region(RegionId(0));
        let frontier = &left.neighbors[0].frontier;
        assert_eq!(frontier, &vec![CellCoord::new(1, 0), CellCoord::new(1, 1)]);
    }

    #[test]
    fn test_empty_memberships_discarded() {
        let graph = RegionGraph::build(vec![vec![], vec![CellCoord::new(0, 0)]]);
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_center_is_a_member_cell() {
        let graph = three_in_a_row();
        for region in graph.regions() {
            assert!(region.cells().contains(&region.center()));
        }
    }

    #[test]
    fn test_nearest_region_fallback() {
        let graph = three_in_a_row();
        // Far off any region cell, closest to the right block
        let id = graph.nearest_region(Vec2::new(40.0, 0.5)).unwrap();
        assert_eq!(id, RegionId(2));
    }

    #[test]
    fn test_obstruction_flag_changes_once() {
        let mut graph = three_in_a_row();
        assert!(graph.set_obstructed(RegionId(1), true));
        assert!(!graph.set_obstructed(RegionId(1), true));
        assert!(graph.region(RegionId(1)).is_obstructed());
        assert_eq!(graph.reachable_neighbors(RegionId(0)), vec![]);
    }
}
