//! Sliding-window stuck detection
//!
//! Tracks the army center over the last N observations; the army is stuck
//! when the window is full and the center never strayed more than the
//! threshold from where the window started.

use std::collections::VecDeque;

use crate::core::types::Vec2;

#[derive(Debug)]
pub struct StuckDetector {
    window: usize,
    threshold: f32,
    positions: VecDeque<Vec2>,
}

impl StuckDetector {
    pub fn new(window: usize, threshold: f32) -> Self {
        Self {
            window,
            threshold,
            positions: VecDeque::with_capacity(window),
        }
    }

    pub fn observe(&mut self, position: Vec2) {
        if self.positions.len() == self.window {
            self.positions.pop_front();
        }
        self.positions.push_back(position);
    }

    pub fn is_stuck(&self) -> bool {
        if self.positions.len() < self.window {
            return false;
        }
        let oldest = self.positions[0];
        self.positions
            .iter()
            .all(|p| p.distance(&oldest) < self.threshold)
    }

    pub fn reset(&mut self) {
        self.positions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_stuck_before_window_fills() {
        let mut detector = StuckDetector::new(5, 1.0);
        for _ in 0..4 {
            detector.observe(Vec2::new(3.0, 3.0));
        }
        assert!(!detector.is_stuck());
        detector.observe(Vec2::new(3.0, 3.0));
        assert!(detector.is_stuck());
    }

    #[test]
    fn test_movement_clears_the_flag() {
        let mut detector = StuckDetector::new(3, 1.0);
        for _ in 0..3 {
            detector.observe(Vec2::new(0.0, 0.0));
        }
        assert!(detector.is_stuck());
        detector.observe(Vec2::new(5.0, 0.0));
        // The window now spans the jump
        assert!(!detector.is_stuck());
    }

    #[test]
    fn test_reset_empties_the_window() {
        let mut detector = StuckDetector::new(2, 1.0);
        detector.observe(Vec2::default());
        detector.observe(Vec2::default());
        assert!(detector.is_stuck());
        detector.reset();
        assert!(!detector.is_stuck());
    }
}
