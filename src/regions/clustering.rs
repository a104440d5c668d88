//! Density-based spatial clustering (DBSCAN) over positioned items

use crate::core::types::{CellCoord, Vec2};

/// Anything with a 2D position that can be clustered
pub trait Positioned {
    fn position(&self) -> Vec2;
}

impl Positioned for Vec2 {
    fn position(&self) -> Vec2 {
        *self
    }
}

impl Positioned for CellCoord {
    fn position(&self) -> Vec2 {
        self.center()
    }
}

#[derive(Debug, Clone)]
pub struct ClusteringResult<T> {
    pub clusters: Vec<Vec<T>>,
    pub noise: Vec<T>,
}

/// Classic DBSCAN. A point is a core point when at least `min_points` items
/// (itself included) lie within `epsilon` of it; clusters are grown from
/// core points, everything else is noise.
///
/// O(n²) neighborhood queries; fine for the few hundred candidates the
/// choke analysis produces.
pub fn dbscan<T: Positioned + Clone>(
    items: &[T],
    epsilon: f32,
    min_points: usize,
) -> ClusteringResult<T> {
    const UNVISITED: i32 = -2;
    const NOISE: i32 = -1;

    let positions: Vec<Vec2> = items.iter().map(|item| item.position()).collect();
    let mut labels = vec![UNVISITED; items.len()];
    let mut cluster_count = 0;

    let neighborhood = |index: usize, positions: &[Vec2]| -> Vec<usize> {
        positions
            .iter()
            .enumerate()
            .filter(|(_, p)| p.distance(&positions[index]) <= epsilon)
            .map(|(i, _)| i)
            .collect()
    };

    for start in 0..items.len() {
        if labels[start] != UNVISITED {
            continue;
        }
        let seeds = neighborhood(start, &positions);
        if seeds.len() < min_points {
            labels[start] = NOISE;
            continue;
        }

        let cluster = cluster_count;
        cluster_count += 1;
        labels[start] = cluster;

        let mut queue: Vec<usize> = seeds;
        while let Some(index) = queue.pop() {
            if labels[index] == NOISE {
                labels[index] = cluster; // border point
            }
            if labels[index] != UNVISITED {
                continue;
            }
            labels[index] = cluster;

            let reachable = neighborhood(index, &positions);
            if reachable.len() >= min_points {
                queue.extend(reachable);
            }
        }
    }

    let mut clusters: Vec<Vec<T>> = (0..cluster_count).map(|_| Vec::new()).collect();
    let mut noise = Vec::new();
    for (item, &label) in items.iter().zip(labels.iter()) {
        if label >= 0 {
            clusters[label as usize].push(item.clone());
        } else {
            noise.push(item.clone());
        }
    }

    ClusteringResult { clusters, noise }
}

/// Centroid of the items' positions. Zero for an empty slice.
pub fn centroid<T: Positioned>(items: &[T]) -> Vec2 {
    if items.is_empty() {
        return Vec2::default();
    }
    let mut sum = Vec2::default();
    for item in items {
        sum = sum + item.position();
    }
    sum * (1.0 / items.len() as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_blobs_two_clusters() {
        let mut points = Vec::new();
        for i in 0..5 {
            points.push(Vec2::new(i as f32 * 0.5, 0.0));
            points.push(Vec2::new(20.0 + i as f32 * 0.5, 0.0));
        }
        let result = dbscan(&points, 1.0, 3);
        assert_eq!(result.clusters.len(), 2);
        assert!(result.noise.is_empty());
        assert_eq!(result.clusters[0].len(), 5);
    }

    #[test]
    fn test_isolated_point_is_noise() {
        let points = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.5, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(50.0, 50.0),
        ];
        let result = dbscan(&points, 1.0, 3);
        assert_eq!(result.clusters.len(), 1);
        assert_eq!(result.noise.len(), 1);
    }

    #[test]
    fn test_min_points_one_groups_by_reachability() {
        let points = vec![Vec2::new(0.0, 0.0), Vec2::new(0.9, 0.0), Vec2::new(5.0, 0.0)];
        let result = dbscan(&points, 1.0, 1);
        assert_eq!(result.clusters.len(), 2);
        assert!(result.noise.is_empty());
    }

    #[test]
    fn test_centroid() {
        let points = vec![Vec2::new(0.0, 0.0), Vec2::new(2.0, 4.0)];
        let center = centroid(&points);
        assert!((center.x - 1.0).abs() < 1e-6);
        assert!((center.y - 2.0).abs() < 1e-6);
    }
}
