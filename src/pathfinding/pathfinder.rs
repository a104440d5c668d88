//! Memoizing pathfinder over terrain cells and the region graph
//!
//! Every query result, including failures, is memoized. Paths are
//! symmetric, so a lookup for (a, b) is also served by a cached (b, a)
//! reversed. The caches must be invalidated whenever walkability or region
//! obstruction changes; stale entries would otherwise route units through
//! terrain that no longer exists.

use ahash::AHashMap;

use crate::core::types::{CellCoord, RegionId, Vec2};
use crate::pathfinding::astar::{astar, path_cost};
use crate::regions::RegionGraph;
use crate::terrain::TerrainMap;

type CellKey = (CellCoord, CellCoord, bool);
type RegionKey = (RegionId, RegionId, Vec<RegionId>);

fn cell_step_cost(from: CellCoord, to: CellCoord) -> f32 {
    if from.x != to.x && from.y != to.y {
        std::f32::consts::SQRT_2
    } else {
        1.0
    }
}

#[derive(Debug, Default)]
pub struct Pathfinder {
    cell_paths: AHashMap<CellKey, Option<(Vec<CellCoord>, f32)>>,
    region_paths: AHashMap<RegionKey, Option<(Vec<RegionId>, f32)>>,
    searches_run: u64,
}

impl Pathfinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of A* searches actually executed, as opposed to served from
    /// the cache.
    pub fn searches_run(&self) -> u64 {
        self.searches_run
    }

    /// Drop every memoized path. Call whenever walkability or region
    /// obstruction changes.
    pub fn invalidate(&mut self) {
        self.cell_paths.clear();
        self.region_paths.clear();
        tracing::debug!("path caches invalidated");
    }

    /// Shortest walkable cell path between two world positions. Both
    /// endpoints are normalized to their closest walkable cell before the
    /// cache lookup so nearby queries share entries. When the normalized
    /// endpoints coincide the path is empty: the unit is already there.
    ///
    /// `include_obstacles` treats destructible obstacles as walls; pass
    /// false to plan through them (e.g. when clearing rocks is an option).
    pub fn cell_path(
        &mut self,
        terrain: &TerrainMap,
        origin: Vec2,
        destination: Vec2,
        include_obstacles: bool,
    ) -> Option<Vec<CellCoord>> {
        let origin = terrain.closest_walkable(origin)?;
        let destination = terrain.closest_walkable(destination)?;
        if origin == destination {
            return Some(Vec::new());
        }
        self.cell_entry(terrain, origin, destination, include_obstacles)
            .map(|(path, _)| path)
    }

    /// Ground distance along the shortest cell path, in cells. Diagonal
    /// steps count sqrt(2). None when no path exists.
    pub fn cell_distance(
        &mut self,
        terrain: &TerrainMap,
        origin: Vec2,
        destination: Vec2,
        include_obstacles: bool,
    ) -> Option<f32> {
        let origin = terrain.closest_walkable(origin)?;
        let destination = terrain.closest_walkable(destination)?;
        if origin == destination {
            return Some(0.0);
        }
        self.cell_entry(terrain, origin, destination, include_obstacles)
            .map(|(_, distance)| distance)
    }

    fn cell_entry(
        &mut self,
        terrain: &TerrainMap,
        origin: CellCoord,
        destination: CellCoord,
        include_obstacles: bool,
    ) -> Option<(Vec<CellCoord>, f32)> {
        let key = (origin, destination, include_obstacles);
        if let Some(cached) = self.cell_paths.get(&key) {
            return cached.clone();
        }
        if let Some(cached) = self.cell_paths.get(&(destination, origin, include_obstacles)) {
            return cached.clone().map(|(mut path, distance)| {
                path.reverse();
                (path, distance)
            });
        }

        self.searches_run += 1;
        let found = astar(
            origin,
            destination,
            |cell| terrain.reachable_neighbors(cell, include_obstacles),
            cell_step_cost,
            |cell| cell.center().distance(&destination.center()),
        )
        .map(|path| {
            let distance = path_cost(&path, cell_step_cost);
            (path, distance)
        });

        if found.is_none() {
            tracing::info!(
                from = ?origin,
                to = ?destination,
                include_obstacles,
                "no cell path, memoizing the failure"
            );
        }
        self.cell_paths.insert(key, found.clone());
        found
    }

    /// Shortest path through the region graph, as a region sequence
    /// including both endpoints. Obstructed regions and the `blocked` set
    /// are never traversed. Every prefix of a found path is memoized, so
    /// repeated queries from one origin converge to cache hits.
    pub fn region_path(
        &mut self,
        graph: &RegionGraph,
        origin: RegionId,
        destination: RegionId,
        blocked: &[RegionId],
    ) -> Option<Vec<RegionId>> {
        self.region_entry(graph, origin, destination, blocked)
            .map(|(path, _)| path)
    }

    /// Distance along the shortest region path, summing region center
    /// distances. None when no path exists.
    pub fn region_distance(
        &mut self,
        graph: &RegionGraph,
        origin: RegionId,
        destination: RegionId,
        blocked: &[RegionId],
    ) -> Option<f32> {
        self.region_entry(graph, origin, destination, blocked)
            .map(|(_, distance)| distance)
    }

    fn region_entry(
        &mut self,
        graph: &RegionGraph,
        origin: RegionId,
        destination: RegionId,
        blocked: &[RegionId],
    ) -> Option<(Vec<RegionId>, f32)> {
        if origin == destination {
            return Some((vec![origin], 0.0));
        }

        let mut blocked: Vec<RegionId> = blocked.to_vec();
        blocked.sort_unstable();
        blocked.dedup();

        let key = (origin, destination, blocked.clone());
        if let Some(cached) = self.region_paths.get(&key) {
            return cached.clone();
        }
        let reversed = (destination, origin, blocked.clone());
        if let Some(cached) = self.region_paths.get(&reversed) {
            return cached.clone().map(|(mut path, distance)| {
                path.reverse();
                (path, distance)
            });
        }

        let center = |id: RegionId| graph.region(id).center().center();
        let edge = |a: RegionId, b: RegionId| center(a).distance(&center(b));

        self.searches_run += 1;
        let found = astar(
            origin,
            destination,
            |id| {
                graph
                    .reachable_neighbors(id)
                    .into_iter()
                    .filter(|n| blocked.binary_search(n).is_err())
                    .collect()
            },
            edge,
            |id| center(id).distance(&center(destination)),
        );

        let Some(path) = found else {
            tracing::info!(
                from = origin.0,
                to = destination.0,
                "no region path, memoizing the failure"
            );
            self.region_paths.insert(key, None);
            return None;
        };

        // Memoize every prefix: a shortest path's prefixes are shortest
        // paths to their own endpoints.
        let mut distance = 0.0;
        for end in 1..path.len() {
            distance += edge(path[end - 1], path[end]);
            let prefix = path[..=end].to_vec();
            self.region_paths
                .insert((origin, path[end], blocked.clone()), Some((prefix, distance)));
        }

        self.region_paths.get(&key).and_then(|entry| entry.clone())
    }
}
