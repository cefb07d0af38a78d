//! L3 Molecular Layer: Adaptive input shaping
//!
//! Converts raw scroll deltas into velocity. Isolated or slow input gets a
//! higher "precision" gain; sustained fast scrolling gets a lower gain. On top
//! of that, small raw deltas are boosted so slow starts feel responsive while
//! large flicks pass through unamplified.

use super::config::InputConfig;
use super::state::PhysicsState;

#[derive(Debug, Clone)]
pub struct InputShaper {
    config: InputConfig,
}

impl InputShaper {
    pub fn new(config: InputConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// Whether recent speed samples indicate continuous scrolling
    pub fn is_continuous(&self, state: &PhysicsState) -> bool {
        state
            .velocity_history
            .recent_average(self.config.history_window)
            .is_some_and(|avg| avg > self.config.continuous_threshold)
    }

    /// Multiplier for a raw delta of this magnitude
    pub fn boost(&self, raw_delta: f64) -> f64 {
        let magnitude = raw_delta.abs();
        self.config
            .boost_tiers
            .iter()
            .find(|tier| magnitude < tier.below)
            .map(|tier| tier.multiplier)
            .unwrap_or(1.0)
    }

    /// Apply one input event to the state
    ///
    /// Records the current speed, adds the shaped delta to the velocity
    /// (clamped to `max_velocity`), latches `has_user_scrolled` and cancels
    /// any in-flight snap.
    ///
    /// # Returns
    /// The velocity delta that was added before clamping
    pub fn apply(&self, state: &mut PhysicsState, raw_delta: f64) -> f64 {
        state.is_snapping = false;
        state.has_user_scrolled = true;

        if !raw_delta.is_finite() {
            return 0.0;
        }

        state.velocity_history.push(state.velocity.abs());

        let continuous = self.is_continuous(state);
        let gain = if continuous {
            self.config.continuous_gain
        } else {
            self.config.precision_gain
        };
        let delta = raw_delta * gain * self.boost(raw_delta);

        let max = self.config.max_velocity;
        state.velocity = (state.velocity + delta).clamp(-max, max);

        tracing::trace!(
            raw_delta,
            continuous,
            delta,
            velocity = state.velocity,
            "Shaped scroll input"
        );

        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shaper() -> InputShaper {
        InputShaper::new(InputConfig::default())
    }

    #[test]
    fn test_boost_tiers() {
        let shaper = shaper();
        assert_eq!(shaper.boost(1.0), 3.0);
        assert_eq!(shaper.boost(-10.0), 2.0);
        assert_eq!(shaper.boost(30.0), 1.5);
        assert_eq!(shaper.boost(99.0), 1.2);
        assert_eq!(shaper.boost(100.0), 1.0);
        assert_eq!(shaper.boost(-5000.0), 1.0);
    }

    #[test]
    fn test_boost_decreases_with_magnitude() {
        let shaper = shaper();
        let mut prev = f64::INFINITY;
        for magnitude in [0.5, 3.0, 10.0, 20.0, 50.0, 150.0, 1000.0] {
            let boost = shaper.boost(magnitude);
            assert!(boost <= prev);
            prev = boost;
        }
    }

    #[test]
    fn test_first_input_uses_precision_gain() {
        let shaper = shaper();
        let mut state = PhysicsState::new(10);
        let delta = shaper.apply(&mut state, 50.0);
        // 50 * 0.0035 * 1.2
        assert!((delta - 0.21).abs() < 1e-12);
        assert!((state.velocity - 0.21).abs() < 1e-12);
        assert!(state.has_user_scrolled);
        assert_eq!(state.velocity_history.len(), 1);
    }

    #[test]
    fn test_continuous_scrolling_lowers_gain() {
        let shaper = shaper();
        let mut state = PhysicsState::new(10);
        state.velocity = 0.2;
        state.velocity_history.push(0.2);
        state.velocity_history.push(0.2);
        assert!(shaper.is_continuous(&state));

        let delta = shaper.apply(&mut state, 50.0);
        // 50 * 0.0018 * 1.2
        assert!((delta - 0.108).abs() < 1e-12);
    }

    #[test]
    fn test_slow_history_is_not_continuous() {
        let shaper = shaper();
        let mut state = PhysicsState::new(10);
        state.velocity_history.push(0.01);
        state.velocity_history.push(0.02);
        assert!(!shaper.is_continuous(&state));
    }

    #[test]
    fn test_velocity_is_clamped() {
        let shaper = shaper();
        let mut state = PhysicsState::new(10);
        for _ in 0..20 {
            shaper.apply(&mut state, 500.0);
        }
        assert_eq!(state.velocity, 0.35);
        for _ in 0..40 {
            shaper.apply(&mut state, -500.0);
        }
        assert_eq!(state.velocity, -0.35);
    }

    #[test]
    fn test_input_interrupts_snap() {
        let shaper = shaper();
        let mut state = PhysicsState::new(10);
        state.begin_snap(1.0);
        shaper.apply(&mut state, 3.0);
        assert!(!state.is_snapping);
        assert!(state.velocity > 0.0);
    }

    #[test]
    fn test_non_finite_delta_is_ignored() {
        let shaper = shaper();
        let mut state = PhysicsState::new(10);
        assert_eq!(shaper.apply(&mut state, f64::NAN), 0.0);
        assert_eq!(state.velocity, 0.0);
        assert!(state.has_user_scrolled);
    }
}
