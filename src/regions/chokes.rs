//! Ray-casting choke point finder
//!
//! Casts dense parallel scan lines across the walkable space at a fixed set
//! of angles, breaks them into maximal walkable segments, and scores each
//! cell by the inverse lengths of the segments crossing it. Cells covered
//! only by short segments are narrow passages; clustering them and electing
//! a representative perpendicular line per cluster yields the choke points.

use ahash::{AHashMap, AHashSet};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::config::TacticsConfig;
use crate::core::math::deg_to_rad;
use crate::core::types::{CellCoord, Vec2};
use crate::regions::clustering::{self, Positioned};
use crate::terrain::TerrainMap;

/// A maximal contiguous walkable segment of one scan line
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisionLine {
    /// Traversed walkable cells, ordered along the line
    pub cells: Vec<CellCoord>,
    /// Orientation of the parent scan line, in degrees
    pub angle: u32,
}

impl VisionLine {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn start(&self) -> Vec2 {
        self.cells.first().map(|c| c.center()).unwrap_or_default()
    }

    pub fn end(&self) -> Vec2 {
        self.cells.last().map(|c| c.center()).unwrap_or_default()
    }

    pub fn midpoint(&self) -> Vec2 {
        (self.start() + self.end()) * 0.5
    }
}

impl Positioned for VisionLine {
    fn position(&self) -> Vec2 {
        self.midpoint()
    }
}

/// A narrow passage elected as a segmentation boundary.
/// Used only during region construction, not retained afterward.
#[derive(Debug, Clone)]
pub struct ChokePoint {
    pub start: Vec2,
    pub end: Vec2,
    /// Cells the choke line passes through; these cut region connectivity
    pub cells: Vec<CellCoord>,
}

#[derive(Debug, Clone)]
struct ScoredCell {
    cell: CellCoord,
    score: f32,
}

impl Positioned for ScoredCell {
    fn position(&self) -> Vec2 {
        self.cell.center()
    }
}

pub struct ChokeFinder<'a> {
    terrain: &'a TerrainMap,
    config: &'a TacticsConfig,
}

impl<'a> ChokeFinder<'a> {
    pub fn new(terrain: &'a TerrainMap, config: &'a TacticsConfig) -> Self {
        Self { terrain, config }
    }

    /// Scan lines span a half-turn; an angle and its reverse cover the same
    /// cells.
    pub fn scan_angles(&self) -> Vec<u32> {
        (0..180u32)
            .step_by(self.config.scan_angle_increment as usize)
            .collect()
    }

    /// Cast all parallel scan lines at one angle and break them into
    /// maximal walkable segments.
    pub fn scan_angle(&self, angle: u32) -> Vec<VisionLine> {
        let width = self.terrain.width() as f32;
        let height = self.terrain.height() as f32;
        let pivot = Vec2::new(width / 2.0, height / 2.0);

        // Long enough to cover the map at any rotation
        let diagonal = (width * width + height * height).sqrt().ceil();
        let padding_x = diagonal / 2.0 - pivot.x;
        let padding_y = diagonal / 2.0 - pivot.y;
        let radians = deg_to_rad(angle as f32);

        let mut segments = Vec::new();
        let mut y = -padding_y;
        while y < height + padding_y {
            let row = y + 0.5;
            let start = Vec2::new(-padding_x, row).rotate_around(pivot, radians);
            let end = Vec2::new(width + padding_x, row).rotate_around(pivot, radians);
            let cells = self.trace_cells(start, end);
            self.split_walkable_segments(&cells, angle, &mut segments);
            y += 1.0;
        }
        segments
    }

    /// Ordered in-bounds cells traversed by the segment from `start` to
    /// `end`, sampled at sub-cell resolution so no crossed cell is skipped.
    fn trace_cells(&self, start: Vec2, end: Vec2) -> Vec<CellCoord> {
        let length = start.distance(&end);
        if length < f32::EPSILON {
            return Vec::new();
        }
        let direction = (end - start).normalize();
        let steps = (length / 0.4).ceil() as usize;

        let mut cells = Vec::new();
        let mut seen = AHashSet::new();
        for step in 0..=steps {
            let position = start + direction * (step as f32 * 0.4);
            let cell = position.cell();
            if !self.terrain.in_bounds(cell) {
                continue;
            }
            if seen.insert(cell) {
                cells.push(cell);
            }
        }
        cells
    }

    /// Break a traced cell sequence into maximal contiguous walkable runs,
    /// ignoring obstacles (segmentation works on the static map).
    fn split_walkable_segments(
        &self,
        cells: &[CellCoord],
        angle: u32,
        out: &mut Vec<VisionLine>,
    ) {
        let mut run: Vec<CellCoord> = Vec::new();
        for &cell in cells {
            if self.terrain.walkable_unchecked(cell, false) {
                run.push(cell);
            } else if !run.is_empty() {
                out.push(VisionLine { cells: std::mem::take(&mut run), angle });
            }
        }
        if !run.is_empty() {
            out.push(VisionLine { cells: run, angle });
        }
    }

    /// Identify choke points from the full set of walkable scan segments.
    pub fn find_choke_points(&self, lines: &[VisionLine]) -> Vec<ChokePoint> {
        let mut lines_through_cell: AHashMap<CellCoord, Vec<usize>> = AHashMap::new();
        for (index, line) in lines.iter().enumerate() {
            for &cell in &line.cells {
                lines_through_cell.entry(cell).or_default().push(index);
            }
        }

        // A cell crossed only by short segments is a narrow passage
        let mut scored: Vec<ScoredCell> = lines_through_cell
            .iter()
            .map(|(&cell, indices)| {
                let score = indices
                    .iter()
                    .map(|&i| 1.0 / lines[i].len().max(1) as f32)
                    .sum();
                ScoredCell { cell, score }
            })
            .collect();
        scored.sort_by_key(|s| (s.cell.x, s.cell.y));
        self.log_score_distribution(&scored);

        let candidates: Vec<ScoredCell> = scored
            .into_iter()
            .filter(|s| s.score > self.config.choke_score_cutoff)
            .collect();

        let clusters = clustering::dbscan(
            &candidates,
            self.config.choke_cluster_epsilon,
            self.config.choke_cluster_min_points,
        )
        .clusters;

        let mut choke_cells: Vec<ScoredCell> = Vec::new();
        for cluster in &clusters {
            let cut = self.dispersion_cut(cluster);
            choke_cells.extend(cluster.iter().filter(|c| c.score >= cut).cloned());
        }

        let choke_lines = self.elect_choke_lines(&choke_cells, lines, &lines_through_cell);
        self.cluster_choke_lines(choke_lines)
    }

    /// Dispersion-aware score cutoff for one cluster of candidate cells.
    ///
    /// Low-dispersion clusters are kept almost whole; high-dispersion
    /// clusters lose their weak tail.
    fn dispersion_cut(&self, cluster: &[ScoredCell]) -> f32 {
        let count = cluster.len() as f32;
        let mean = cluster.iter().map(|c| c.score).sum::<f32>() / count;

        let mut sorted: Vec<f32> = cluster.iter().map(|c| c.score).collect();
        sorted.sort_by_key(|&s| OrderedFloat(s));
        let median = sorted[sorted.len() / 2];

        let variance = cluster
            .iter()
            .map(|c| (c.score - mean).powi(2))
            .sum::<f32>()
            / count;
        let std = variance.sqrt();

        let ratio = std / mean.max(median);
        let offset = self.config.dispersion_offset;
        let amplified = (ratio + offset).powi(2) - offset;

        mean.min(median) - (1.0 - amplified) * std
    }

    /// Per surviving choke cell, elect its most likely choke lines: the
    /// shortest segments crossing it. Lines that recur for at least two
    /// cells and cover at least half their own length survive.
    fn elect_choke_lines(
        &self,
        choke_cells: &[ScoredCell],
        lines: &[VisionLine],
        lines_through_cell: &AHashMap<CellCoord, Vec<usize>>,
    ) -> Vec<VisionLine> {
        let mut elections: AHashMap<usize, usize> = AHashMap::new();
        for scored in choke_cells {
            let Some(indices) = lines_through_cell.get(&scored.cell) else {
                continue;
            };
            let Some(shortest) = indices.iter().map(|&i| lines[i].len()).min() else {
                continue;
            };
            for &index in indices {
                // Within one cell of the shortest crossing: effectively the
                // perpendicular candidates
                if lines[index].len() <= shortest + 1 {
                    *elections.entry(index).or_insert(0) += 1;
                }
            }
        }

        let mut elected: Vec<VisionLine> = elections
            .into_iter()
            .filter(|&(index, count)| count >= 2 && count as f32 >= lines[index].len() as f32 * 0.5)
            .map(|(index, _)| lines[index].clone())
            .collect();
        elected.sort_by_key(|line| line.cells.first().map(|c| (c.x, c.y)));
        elected
    }

    /// Spatially cluster the elected lines and emit one choke point per
    /// cluster: the shortest line weighted by proximity to the cluster's
    /// centroid.
    fn cluster_choke_lines(&self, choke_lines: Vec<VisionLine>) -> Vec<ChokePoint> {
        let clusters = clustering::dbscan(&choke_lines, self.config.choke_cluster_epsilon, 1).clusters;

        let mut choke_points = Vec::new();
        for cluster in clusters {
            let center = clustering::centroid(&cluster);
            let representative = cluster.iter().min_by_key(|line| {
                let weight = line.len() as f32 + line.midpoint().distance(&center) * 0.5;
                (
                    OrderedFloat(weight),
                    line.cells.first().map(|c| (c.x, c.y)),
                )
            });
            if let Some(line) = representative {
                choke_points.push(ChokePoint {
                    start: line.start(),
                    end: line.end(),
                    cells: line.cells.clone(),
                });
            }
        }
        tracing::info!(chokes = choke_points.len(), "choke point election complete");
        choke_points
    }

    fn log_score_distribution(&self, scored: &[ScoredCell]) {
        if scored.is_empty() {
            return;
        }
        let min = scored.iter().fold(f32::INFINITY, |a, s| a.min(s.score));
        let max = scored.iter().fold(f32::NEG_INFINITY, |a, s| a.max(s.score));
        let mean = scored.iter().map(|s| s.score).sum::<f32>() / scored.len() as f32;
        tracing::debug!(
            cells = scored.len(),
            min = format!("{min:.2}"),
            max = format!("{max:.2}"),
            mean = format!("{mean:.2}"),
            "choke score distribution"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::TerrainMap;

    /// Two 8x8 rooms joined by a 2-cell-wide corridor.
    fn corridor_map() -> TerrainMap {
        let width = 20;
        let height = 8;
        let mut walkability = vec![false; width * height];
        let mut set = |x: usize, y: usize| walkability[y * width + x] = true;
        for y in 0..8 {
            for x in 0..8 {
                set(x, y); // left room
                set(x + 12, y); // right room
            }
        }
        for x in 8..12 {
            set(x, 3);
            set(x, 4); // corridor rows
        }
        TerrainMap::new("corridor", width, height, walkability, vec![0.0; width * height])
            .unwrap()
    }

    fn all_lines(finder: &ChokeFinder) -> Vec<VisionLine> {
        let mut lines = Vec::new();
        for angle in finder.scan_angles() {
            lines.extend(finder.scan_angle(angle));
        }
        lines
    }

    #[test]
    fn test_scan_covers_walkable_cells() {
        let map = TerrainMap::open("open", 10, 10);
        let config = TacticsConfig::default();
        let finder = ChokeFinder::new(&map, &config);
        let lines = finder.scan_angle(0);
        let covered: AHashSet<CellCoord> =
            lines.iter().flat_map(|l| l.cells.iter().copied()).collect();
        assert_eq!(covered.len(), 100);
    }

    #[test]
    fn test_segments_break_at_walls() {
        let mut walkability = vec![true; 9 * 1];
        walkability[4] = false; // wall in the middle of a 9x1 strip
        let map = TerrainMap::new("strip", 9, 1, walkability, vec![0.0; 9]).unwrap();
        let config = TacticsConfig::default();
        let finder = ChokeFinder::new(&map, &config);
        let horizontal: Vec<VisionLine> = finder.scan_angle(0);
        assert_eq!(horizontal.len(), 2);
        assert!(horizontal.iter().all(|l| l.len() == 4));
    }

    #[test]
    fn test_corridor_produces_choke() {
        let map = corridor_map();
        let config = TacticsConfig::default();
        let finder = ChokeFinder::new(&map, &config);
        let lines = all_lines(&finder);
        let chokes = finder.find_choke_points(&lines);
        assert!(!chokes.is_empty());
        // At least one choke sits inside the corridor span
        assert!(chokes.iter().any(|choke| {
            choke.cells.iter().any(|cell| (7..=12).contains(&cell.x))
        }));
    }

    #[test]
    fn test_scan_angles_span_half_turn() {
        let map = TerrainMap::open("open", 4, 4);
        let config = TacticsConfig::default();
        let finder = ChokeFinder::new(&map, &config);
        let angles = finder.scan_angles();
        assert_eq!(angles.len(), 36);
        assert_eq!(angles.first(), Some(&0));
        assert_eq!(angles.last(), Some(&175));
    }
}
