//! L3 Molecular Layer: Mutable physics state owned by the engine

use std::collections::VecDeque;

/// Bounded history of recent speed samples, oldest evicted first
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityHistory {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl VelocityHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, sample: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    /// Mean of the newest `window` samples, `None` when fewer than two exist
    pub fn recent_average(&self, window: usize) -> Option<f64> {
        if self.samples.len() < 2 || window == 0 {
            return None;
        }
        let take = window.min(self.samples.len());
        let sum: f64 = self.samples.iter().rev().take(take).sum();
        Some(sum / take as f64)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Continuous scroll state
///
/// `position` 0.0 is exactly the level-0 item. While `is_snapping` the
/// state animates toward `target_position` and `velocity` stays zero.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsState {
    pub position: f64,
    pub velocity: f64,
    pub velocity_history: VelocityHistory,
    pub is_snapping: bool,
    pub target_position: f64,
    /// Latched on first input; free motion never auto-snaps before it
    pub has_user_scrolled: bool,
}

impl PhysicsState {
    pub fn new(history_capacity: usize) -> Self {
        Self {
            position: 0.0,
            velocity: 0.0,
            velocity_history: VelocityHistory::new(history_capacity),
            is_snapping: false,
            target_position: 0.0,
            has_user_scrolled: false,
        }
    }

    /// Enter Snapping toward `target`, dropping any free velocity
    pub fn begin_snap(&mut self, target: f64) {
        self.velocity = 0.0;
        self.target_position = target;
        self.is_snapping = true;
    }

    /// Settled: no meaningful velocity and no snap in flight
    #[inline]
    pub fn is_at_rest(&self, min_velocity: f64) -> bool {
        self.velocity.abs() <= min_velocity && !self.is_snapping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = VelocityHistory::new(3);
        for sample in [1.0, 2.0, 3.0, 4.0] {
            history.push(sample);
        }
        assert_eq!(history.len(), 3);
        // Newest three: 2, 3, 4
        assert_eq!(history.recent_average(3), Some(3.0));
        assert_eq!(history.recent_average(2), Some(3.5));
    }

    #[test]
    fn test_history_needs_two_samples() {
        let mut history = VelocityHistory::new(5);
        assert_eq!(history.recent_average(3), None);
        history.push(1.0);
        assert_eq!(history.recent_average(3), None);
        history.push(3.0);
        assert_eq!(history.recent_average(3), Some(2.0));
    }

    #[test]
    fn test_zero_capacity_is_promoted() {
        let mut history = VelocityHistory::new(0);
        history.push(1.0);
        history.push(2.0);
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_fresh_state() {
        let state = PhysicsState::new(10);
        assert_eq!(state.position, 0.0);
        assert_eq!(state.velocity, 0.0);
        assert!(!state.is_snapping);
        assert!(!state.has_user_scrolled);
        assert!(state.velocity_history.is_empty());
        assert!(state.is_at_rest(0.004));
    }

    #[test]
    fn test_begin_snap_zeroes_velocity() {
        let mut state = PhysicsState::new(10);
        state.velocity = 0.2;
        state.begin_snap(2.0);
        assert!(state.is_snapping);
        assert_eq!(state.velocity, 0.0);
        assert_eq!(state.target_position, 2.0);
        assert!(!state.is_at_rest(0.004));
    }
}
