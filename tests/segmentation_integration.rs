//! End-to-end region segmentation scenarios
//!
//! Runs the full analysis pipeline on small synthetic maps and checks the
//! resulting region topology, the persisted scan-line round trip, and the
//! interaction with the path caches.

use warroom::core::config::TacticsConfig;
use warroom::core::types::{CellCoord, RegionId, Vec2};
use warroom::pathfinding::Pathfinder;
use warroom::regions::{RegionAnalyzer, ScanLineStore};
use warroom::terrain::TerrainMap;

/// Two 8x8 rooms joined by a 2-wide corridor on a 20x8 map
fn corridor_map() -> TerrainMap {
    let (width, height) = (20usize, 8usize);
    let mut walkability = vec![false; width * height];
    for y in 0..height {
        for x in 0..width {
            let in_left_room = x < 8;
            let in_right_room = x >= 12;
            let in_corridor = (8..12).contains(&x) && (3..5).contains(&y);
            if in_left_room || in_right_room || in_corridor {
                walkability[y * width + x] = true;
            }
        }
    }
    TerrainMap::new("corridor", width, height, walkability, vec![0.0; width * height]).unwrap()
}

fn membership_sets(analyzer: &RegionAnalyzer) -> Vec<Vec<CellCoord>> {
    let mut sets: Vec<Vec<CellCoord>> = analyzer
        .graph()
        .unwrap()
        .regions()
        .iter()
        .map(|r| r.cells().to_vec())
        .collect();
    sets.sort();
    sets
}

#[test]
fn test_open_map_is_a_single_region() {
    let map = TerrainMap::open("open", 10, 10);
    let config = TacticsConfig::new();
    let mut analyzer = RegionAnalyzer::new(&config);
    analyzer.run_to_completion(&map);

    let graph = analyzer.graph().unwrap();
    assert_eq!(graph.len(), 1);
    assert_eq!(graph.region(RegionId(0)).area(), 100);
}

#[test]
fn test_corridor_map_separates_the_rooms() {
    let map = corridor_map();
    let config = TacticsConfig::new();
    let mut analyzer = RegionAnalyzer::new(&config);
    analyzer.run_to_completion(&map);

    let graph = analyzer.graph().unwrap();
    assert!(graph.len() >= 2);

    // The two room interiors land in different regions
    let left = graph.region_at(CellCoord::new(2, 4)).unwrap();
    let right = graph.region_at(CellCoord::new(17, 4)).unwrap();
    assert_ne!(left, right);
}

#[test]
fn test_store_roundtrip_yields_identical_regions() {
    let map = corridor_map();
    let config = TacticsConfig::new();

    let mut fresh = RegionAnalyzer::new(&config);
    fresh.run_to_completion(&map);

    let dir = tempfile::tempdir().unwrap();
    let store = ScanLineStore::new(dir.path());
    store.save(map.name(), fresh.lines()).unwrap();

    let restored_lines = store.load(map.name()).unwrap().unwrap();
    let mut restored = RegionAnalyzer::with_saved_lines(&config, restored_lines);
    restored.run_to_completion(&map);

    assert_eq!(membership_sets(&fresh), membership_sets(&restored));
}

#[test]
fn test_analysis_is_pipelined_across_steps() {
    let map = TerrainMap::open("open", 10, 10);
    let config = TacticsConfig::new();
    let mut analyzer = RegionAnalyzer::new(&config);

    let mut steps = 0;
    while !analyzer.step(&map) {
        steps += 1;
        assert!(!analyzer.is_initialized());
    }
    assert!(analyzer.is_initialized());
    // At least one step per scan angle
    assert!(steps >= 36);
}

#[test]
fn test_obstruction_change_requires_cache_invalidation() {
    let map = corridor_map();
    let config = TacticsConfig::new();
    let mut analyzer = RegionAnalyzer::new(&config);
    analyzer.run_to_completion(&map);

    let graph = analyzer.graph().unwrap();
    let left = graph.region_at(CellCoord::new(2, 4)).unwrap();
    let right = graph.region_at(CellCoord::new(17, 4)).unwrap();

    let mut pathfinder = Pathfinder::new();
    let path = pathfinder.region_path(graph, left, right, &[]).unwrap();
    assert!(path.len() >= 2);

    // Every route between the rooms runs through the regions between them;
    // blocking one of them in the call severs the rooms
    if path.len() >= 3 {
        let between = path[1];
        assert!(pathfinder
            .region_path(graph, left, right, &[between])
            .is_none());

        // Same topology change via the obstruction flag, after invalidation
        let graph = analyzer.graph_mut().unwrap();
        assert!(graph.set_obstructed(between, true));
        pathfinder.invalidate();
        let graph = analyzer.graph().unwrap();
        assert!(pathfinder.region_path(graph, left, right, &[]).is_none());
    }
}

#[test]
fn test_cell_paths_route_around_walls() {
    let map = corridor_map();
    let mut pathfinder = Pathfinder::new();

    let path = pathfinder
        .cell_path(&map, Vec2::new(2.5, 1.5), Vec2::new(17.5, 1.5), true)
        .unwrap();
    // The only route runs through the corridor rows
    assert!(path
        .iter()
        .any(|c| (8..12).contains(&c.x) && (3..5).contains(&c.y)));
}
