//! Region analyzer: pipelined map decomposition
//!
//! The full analysis (map-wide ray casting, choke election, flood fill) is
//! too expensive for one frame. [`RegionAnalyzer::step`] advances one slice
//! of work per call so the frame loop never stalls; callers poll
//! [`RegionAnalyzer::is_initialized`] and treat the analysis as
//! not-yet-complete until it flips.

use ahash::{AHashMap, AHashSet};

use crate::core::config::TacticsConfig;
use crate::core::types::CellCoord;
use crate::regions::chokes::{ChokeFinder, ChokePoint, VisionLine};
use crate::regions::region::RegionGraph;
use crate::terrain::TerrainMap;

#[derive(Debug, Clone, PartialEq, Eq)]
enum AnalysisPhase {
    Scanning { next_angle_index: usize },
    FindingChokes,
    BuildingRegions,
    Done,
}

pub struct RegionAnalyzer {
    config: TacticsConfig,
    phase: AnalysisPhase,
    lines: Vec<VisionLine>,
    choke_points: Vec<ChokePoint>,
    graph: Option<RegionGraph>,
}

impl RegionAnalyzer {
    pub fn new(config: &TacticsConfig) -> Self {
        Self {
            config: config.clone(),
            phase: AnalysisPhase::Scanning { next_angle_index: 0 },
            lines: Vec::new(),
            choke_points: Vec::new(),
            graph: None,
        }
    }

    /// Resume from persisted scan lines, skipping the ray-casting phase.
    pub fn with_saved_lines(config: &TacticsConfig, lines: Vec<VisionLine>) -> Self {
        tracing::info!(lines = lines.len(), "scan lines restored from store");
        Self {
            config: config.clone(),
            phase: AnalysisPhase::FindingChokes,
            lines,
            choke_points: Vec::new(),
            graph: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.phase == AnalysisPhase::Done
    }

    /// Scan-line segments accumulated so far; complete once the scanning
    /// phase is over, at which point they are worth persisting.
    pub fn lines(&self) -> &[VisionLine] {
        &self.lines
    }

    pub fn choke_points(&self) -> &[ChokePoint] {
        &self.choke_points
    }

    pub fn graph(&self) -> Option<&RegionGraph> {
        self.graph.as_ref()
    }

    pub fn graph_mut(&mut self) -> Option<&mut RegionGraph> {
        self.graph.as_mut()
    }

    /// Advance one slice of the analysis. Returns true once initialized.
    pub fn step(&mut self, terrain: &TerrainMap) -> bool {
        match self.phase.clone() {
            AnalysisPhase::Scanning { next_angle_index } => {
                let finder = ChokeFinder::new(terrain, &self.config);
                let angles = finder.scan_angles();
                if let Some(&angle) = angles.get(next_angle_index) {
                    let segments = finder.scan_angle(angle);
                    tracing::debug!(angle, segments = segments.len(), "scanned angle");
                    self.lines.extend(segments);
                    self.phase = AnalysisPhase::Scanning {
                        next_angle_index: next_angle_index + 1,
                    };
                } else {
                    tracing::info!(lines = self.lines.len(), "scan-line phase complete");
                    self.phase = AnalysisPhase::FindingChokes;
                }
            }
            AnalysisPhase::FindingChokes => {
                let finder = ChokeFinder::new(terrain, &self.config);
                self.choke_points = finder.find_choke_points(&self.lines);
                self.phase = AnalysisPhase::BuildingRegions;
            }
            AnalysisPhase::BuildingRegions => {
                let graph = self.build_regions(terrain);
                tracing::info!(regions = graph.len(), "region analysis complete");
                self.graph = Some(graph);
                self.phase = AnalysisPhase::Done;
            }
            AnalysisPhase::Done => {}
        }
        self.is_initialized()
    }

    /// Run the whole remaining analysis synchronously.
    pub fn run_to_completion(&mut self, terrain: &TerrainMap) {
        while !self.step(terrain) {}
    }

    /// Re-derive region obstruction flags from current obstacle occupancy.
    /// Returns true when any region changed, in which case the caller must
    /// invalidate path and reach caches.
    pub fn update_obstructions(&mut self, terrain: &TerrainMap) -> bool {
        let fraction = self.config.region_obstruction_fraction;
        match self.graph.as_mut() {
            Some(graph) => graph.update_obstructions(terrain, fraction),
            None => false,
        }
    }

    /// Flood-fill walkable cells into regions using the choke points as
    /// separators, then merge sub-minimum fragments into their largest
    /// neighbor.
    fn build_regions(&self, terrain: &TerrainMap) -> RegionGraph {
        let separators: AHashSet<CellCoord> = self
            .choke_points
            .iter()
            .flat_map(|choke| choke.cells.iter().copied())
            .collect();

        let mut assigned: AHashMap<CellCoord, usize> = AHashMap::new();
        let mut memberships: Vec<Vec<CellCoord>> = Vec::new();

        // Pass 1: regions grow over walkable non-separator cells
        for y in 0..terrain.height() as i32 {
            for x in 0..terrain.width() as i32 {
                let seed = CellCoord::new(x, y);
                if assigned.contains_key(&seed)
                    || separators.contains(&seed)
                    || !terrain.walkable_unchecked(seed, false)
                {
                    continue;
                }
                let region_index = memberships.len();
                let mut cells = Vec::new();
                let mut queue = vec![seed];
                assigned.insert(seed, region_index);
                while let Some(cell) = queue.pop() {
                    cells.push(cell);
                    for neighbor in cell.orthogonal_neighbors() {
                        if assigned.contains_key(&neighbor)
                            || separators.contains(&neighbor)
                            || !terrain.walkable_unchecked(neighbor, false)
                        {
                            continue;
                        }
                        assigned.insert(neighbor, region_index);
                        queue.push(neighbor);
                    }
                }
                memberships.push(cells);
            }
        }

        // Pass 2: choke cells stay walkable terrain but are assigned to one
        // side, cutting connectivity across the line. Attach each to the
        // adjacent region with the most bordering cells; repeat for chains
        // of separator cells.
        let mut pending: Vec<CellCoord> = separators
            .iter()
            .copied()
            .filter(|&cell| terrain.walkable_unchecked(cell, false))
            .collect();
        pending.sort_by_key(|c| (c.x, c.y));
        loop {
            let mut progressed = false;
            let mut still_pending = Vec::new();
            for cell in pending {
                let mut counts: AHashMap<usize, usize> = AHashMap::new();
                for neighbor in cell.orthogonal_neighbors() {
                    if let Some(&region_index) = assigned.get(&neighbor) {
                        *counts.entry(region_index).or_insert(0) += 1;
                    }
                }
                let best = counts
                    .into_iter()
                    .max_by_key(|&(region_index, count)| (count, std::cmp::Reverse(region_index)));
                match best {
                    Some((region_index, _)) => {
                        assigned.insert(cell, region_index);
                        memberships[region_index].push(cell);
                        progressed = true;
                    }
                    None => still_pending.push(cell),
                }
            }
            if still_pending.is_empty() {
                break;
            }
            if !progressed {
                // Separator cells with no adjacent region form their own
                // region (e.g. a choke that is the entire passage)
                memberships.push(still_pending);
                break;
            }
            pending = still_pending;
        }

        self.merge_small_regions(RegionGraph::build(memberships))
    }

    /// Merge regions smaller than the configured minimum area into their
    /// largest neighbor, so scan artifacts never become standalone regions.
    fn merge_small_regions(&self, graph: RegionGraph) -> RegionGraph {
        let min_area = self.config.min_region_area;
        let mut graph = graph;
        loop {
            let victim = graph
                .regions()
                .iter()
                .filter(|r| r.area() < min_area && !r.neighbors().is_empty())
                .min_by_key(|r| (r.area(), r.id()));
            let Some(victim) = victim else {
                return graph;
            };
            let victim_id = victim.id();
            let target = victim
                .neighbors()
                .iter()
                .map(|n| n.region)
                .max_by_key(|&n| (graph.region(n).area(), std::cmp::Reverse(n)))
                .expect("victim has neighbors");

            let mut memberships: Vec<Vec<CellCoord>> = Vec::new();
            for region in graph.regions() {
                if region.id() == victim_id {
                    continue;
                }
                let mut cells = region.cells().to_vec();
                if region.id() == target {
                    cells.extend_from_slice(graph.region(victim_id).cells());
                }
                memberships.push(cells);
            }
            graph = RegionGraph::build(memberships);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RegionId;

    /// Two 8x8 rooms joined by a 2-cell-wide corridor.
    fn corridor_map() -> TerrainMap {
        let width = 20;
        let height = 8;
        let mut walkability = vec![false; width * height];
        let mut set = |x: usize, y: usize| walkability[y * width + x] = true;
        for y in 0..8 {
            for x in 0..8 {
                set(x, y);
                set(x + 12, y);
            }
        }
        for x in 8..12 {
            set(x, 3);
            set(x, 4);
        }
        TerrainMap::new("corridor", width, height, walkability, vec![0.0; width * height])
            .unwrap()
    }

    fn memberships_by_cells(graph: &RegionGraph) -> Vec<AHashSet<CellCoord>> {
        let mut sets: Vec<AHashSet<CellCoord>> = graph
            .regions()
            .iter()
            .map(|r| r.cells().iter().copied().collect())
            .collect();
        sets.sort_by_key(|s| {
            s.iter()
                .map(|c| (c.x, c.y))
                .min()
                .expect("regions are non-empty")
        });
        sets
    }

    #[test]
    fn test_open_map_is_one_region() {
        let terrain = TerrainMap::open("open", 10, 10);
        let mut analyzer = RegionAnalyzer::new(&TacticsConfig::default());
        analyzer.run_to_completion(&terrain);
        let graph = analyzer.graph().unwrap();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.region(RegionId(0)).area(), 100);
    }

    #[test]
    fn test_corridor_map_splits_rooms() {
        let terrain = corridor_map();
        let mut analyzer = RegionAnalyzer::new(&TacticsConfig::default());
        analyzer.run_to_completion(&terrain);
        let graph = analyzer.graph().unwrap();
        assert!(graph.len() >= 2);

        let left = graph.region_at(CellCoord::new(2, 2)).unwrap();
        let right = graph.region_at(CellCoord::new(16, 2)).unwrap();
        assert_ne!(left, right);

        // Every walkable cell is assigned to exactly one region
        let total: usize = graph.regions().iter().map(|r| r.area()).sum();
        assert_eq!(total, 8 * 8 * 2 + 4 * 2);
    }

    #[test]
    fn test_segmentation_is_idempotent() {
        let terrain = corridor_map();
        let config = TacticsConfig::default();

        let mut first = RegionAnalyzer::new(&config);
        first.run_to_completion(&terrain);
        let mut second = RegionAnalyzer::new(&config);
        second.run_to_completion(&terrain);

        let memberships_a = memberships_by_cells(first.graph().unwrap());
        let memberships_b = memberships_by_cells(second.graph().unwrap());
        assert_eq!(memberships_a, memberships_b);
    }

    #[test]
    fn test_stepping_reaches_initialization() {
        let terrain = TerrainMap::open("open", 8, 8);
        let mut analyzer = RegionAnalyzer::new(&TacticsConfig::default());
        assert!(!analyzer.is_initialized());
        let mut steps = 0;
        while !analyzer.step(&terrain) {
            steps += 1;
            assert!(steps < 100, "analysis did not converge");
        }
        assert!(analyzer.is_initialized());
        // One step per scan angle plus the bookkeeping phases
        assert!(steps >= 36);
    }

    #[test]
    fn test_obstruction_update_flags_change() {
        let terrain = corridor_map();
        let mut analyzer = RegionAnalyzer::new(&TacticsConfig::default());
        let mut terrain = terrain;
        analyzer.run_to_completion(&terrain);

        // Cover a whole room with rubble
        let target = analyzer
            .graph()
            .unwrap()
            .region_at(CellCoord::new(2, 2))
            .unwrap();
        let cells: Vec<CellCoord> = analyzer
            .graph()
            .unwrap()
            .region(target)
            .cells()
            .to_vec();
        for cell in cells {
            terrain.set_obstructed(cell, true).unwrap();
        }

        assert!(analyzer.update_obstructions(&terrain));
        assert!(analyzer.graph().unwrap().region(target).is_obstructed());
        // Second derivation reports no change
        assert!(!analyzer.update_obstructions(&terrain));
    }
}
