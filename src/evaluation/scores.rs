//! Per-region score storage with relative normalization
//!
//! Scores default to zero. Normalization is relative to the current
//! maximum across all regions and is recomputed on every replacement, not
//! persisted as a fixed scale.

use ahash::AHashMap;

use crate::core::types::RegionId;

#[derive(Debug, Clone, Default)]
pub struct ScoreStore {
    scores: AHashMap<RegionId, f32>,
    max: f32,
}

impl ScoreStore {
    /// A store covering exactly the given regions, all at zero.
    pub fn new(regions: impl IntoIterator<Item = RegionId>) -> Self {
        Self {
            scores: regions.into_iter().map(|id| (id, 0.0)).collect(),
            max: 0.0,
        }
    }

    /// Replace all scores wholesale. Known regions missing from `values`
    /// reset to zero; values for regions the store was never initialized
    /// with are ignored.
    pub fn replace(&mut self, values: &AHashMap<RegionId, f32>) {
        let mut max = 0.0f32;
        for (id, score) in self.scores.iter_mut() {
            *score = values.get(id).copied().unwrap_or(0.0);
            max = max.max(*score);
        }
        self.max = max;
    }

    /// Score of a region, optionally normalized to [0, 1] against the
    /// current maximum. Querying a region the store never saw is a caller
    /// error: it is logged and answered with zero.
    pub fn get(&self, region: RegionId, normalized: bool) -> f32 {
        let Some(&score) = self.scores.get(&region) else {
            tracing::error!(region = region.0, "score query for unknown region");
            return 0.0;
        };
        if normalized {
            if self.max <= 0.0 {
                0.0
            } else {
                score / self.max
            }
        } else {
            score
        }
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn regions(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.scores.keys().copied()
    }
}
