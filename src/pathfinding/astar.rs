//! Generic A* over an abstract graph
//!
//! The search is vertex-agnostic so the same routine serves both the cell
//! grid and the region graph. Ties on the estimated cost break on the
//! vertex ordering, which keeps returned paths deterministic.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ahash::{AHashMap, AHashSet};
use ordered_float::OrderedFloat;

/// A* from `origin` to `destination`. `neighbors` yields the vertices
/// adjacent to a vertex, `edge_cost` the cost of one edge, and `heuristic`
/// an admissible estimate of the remaining cost to the destination.
///
/// Returns the vertex sequence including both endpoints, or None when the
/// destination is unreachable.
pub fn astar<V, N, E, H>(
    origin: V,
    destination: V,
    mut neighbors: N,
    mut edge_cost: E,
    mut heuristic: H,
) -> Option<Vec<V>>
where
    V: Copy + Eq + Ord + std::hash::Hash,
    N: FnMut(V) -> Vec<V>,
    E: FnMut(V, V) -> f32,
    H: FnMut(V) -> f32,
{
    if origin == destination {
        return Some(vec![origin]);
    }

    let mut open = BinaryHeap::new();
    let mut came_from: AHashMap<V, V> = AHashMap::new();
    let mut g_score: AHashMap<V, f32> = AHashMap::new();
    let mut closed: AHashSet<V> = AHashSet::new();

    g_score.insert(origin, 0.0);
    open.push(Reverse((OrderedFloat(heuristic(origin)), origin)));

    while let Some(Reverse((_, current))) = open.pop() {
        if current == destination {
            let mut path = vec![destination];
            let mut cursor = destination;
            while let Some(&previous) = came_from.get(&cursor) {
                path.push(previous);
                cursor = previous;
            }
            path.reverse();
            return Some(path);
        }
        if !closed.insert(current) {
            continue;
        }

        let current_g = g_score[&current];
        for next in neighbors(current) {
            if closed.contains(&next) {
                continue;
            }
            let tentative = current_g + edge_cost(current, next);
            let known = g_score.get(&next).copied().unwrap_or(f32::INFINITY);
            if tentative < known {
                came_from.insert(next, current);
                g_score.insert(next, tentative);
                open.push(Reverse((OrderedFloat(tentative + heuristic(next)), next)));
            }
        }
    }

    None
}

/// Total cost of a path under `edge_cost`. Zero for paths shorter than two
/// vertices.
pub fn path_cost<V: Copy>(path: &[V], mut edge_cost: impl FnMut(V, V) -> f32) -> f32 {
    path.windows(2).map(|pair| edge_cost(pair[0], pair[1])).sum()
}
