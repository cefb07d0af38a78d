//! L3 Molecular Layer: Free/Snapping physics state machine
//!
//! Free motion integrates damped velocity. Once the user has scrolled and the
//! velocity decays below `min_velocity`, a snap target is chosen and the
//! state pulls toward it with a first-order spring until it lands exactly.

use super::bounds::Bounds;
use super::config::PhysicsConfig;
use super::snap::select_target;
use super::state::PhysicsState;

/// What a single physics step did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepEvent {
    /// Nothing to integrate
    Idle,
    /// Position advanced (free or snapping)
    Moved,
    /// Free motion settled and snapping toward `target` began
    SnapStarted { target: f64 },
    /// Snapping landed exactly on `target`
    Arrived { target: f64 },
}

#[derive(Debug, Clone)]
pub struct PhysicsStepper {
    config: PhysicsConfig,
}

impl PhysicsStepper {
    pub fn new(config: PhysicsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Advance the state by `multiplier` reference frames
    pub fn step(&self, state: &mut PhysicsState, bounds: &Bounds, multiplier: f64) -> StepEvent {
        let multiplier = if multiplier.is_finite() { multiplier.max(0.0) } else { 0.0 };
        if state.is_snapping {
            self.step_snapping(state, bounds, multiplier)
        } else {
            self.step_free(state, bounds, multiplier)
        }
    }

    fn step_free(&self, state: &mut PhysicsState, bounds: &Bounds, multiplier: f64) -> StepEvent {
        if state.velocity == 0.0 && !state.has_user_scrolled {
            state.position = bounds.clamp(state.position);
            return StepEvent::Idle;
        }

        state.velocity *= self.config.damping.powf(multiplier);

        let unclamped = state.position + state.velocity * multiplier;
        state.position = bounds.clamp(unclamped);
        if state.position != unclamped {
            // Pressing against an end of the chain; drop the outward push
            state.velocity = 0.0;
        }

        if state.velocity.abs() < self.config.min_velocity && state.has_user_scrolled {
            let target = bounds.clamp(select_target(state.position, state.velocity, &self.config));
            tracing::debug!(
                position = state.position,
                velocity = state.velocity,
                target,
                "Free motion settled, snapping"
            );
            state.begin_snap(target);
            return StepEvent::SnapStarted { target };
        }

        StepEvent::Moved
    }

    fn step_snapping(&self, state: &mut PhysicsState, bounds: &Bounds, multiplier: f64) -> StepEvent {
        let diff = state.target_position - state.position;
        if diff.abs() < self.config.arrive_epsilon {
            state.position = state.target_position;
            state.is_snapping = false;
            state.velocity = 0.0;
            tracing::debug!(target = state.target_position, "Snap arrived");
            return StepEvent::Arrived {
                target: state.target_position,
            };
        }

        // Cap at one so a long frame lands on target instead of overshooting
        let pull = (self.config.spring * multiplier).min(1.0);
        state.position = bounds.clamp(state.position + diff * pull);
        StepEvent::Moved
    }

    /// Start snapping toward an explicit level, bypassing velocity inference
    pub fn jump(&self, state: &mut PhysicsState, bounds: &Bounds, level: i32) -> f64 {
        let target = bounds.clamp(level as f64);
        state.has_user_scrolled = true;
        state.begin_snap(target);
        tracing::debug!(level, target, from = state.position, "Jump requested");
        target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIDE: Bounds = Bounds { min: -3.95, max: 3.95 };

    fn stepper() -> PhysicsStepper {
        PhysicsStepper::new(PhysicsConfig::default())
    }

    fn scrolled_state(position: f64, velocity: f64) -> PhysicsState {
        let mut state = PhysicsState::new(10);
        state.position = position;
        state.velocity = velocity;
        state.has_user_scrolled = true;
        state
    }

    /// Step until the state reports arrival, returning the step count
    fn run_until_arrived(stepper: &PhysicsStepper, state: &mut PhysicsState, bounds: &Bounds) -> usize {
        for n in 1..=500 {
            if let StepEvent::Arrived { .. } = stepper.step(state, bounds, 1.0) {
                return n;
            }
        }
        panic!("did not converge: {:?}", state);
    }

    #[test]
    fn test_pristine_state_never_snaps() {
        let stepper = stepper();
        let mut state = PhysicsState::new(10);
        state.position = 0.4;
        for _ in 0..100 {
            assert_eq!(stepper.step(&mut state, &WIDE, 1.0), StepEvent::Idle);
        }
        assert!(!state.is_snapping);
        assert_eq!(state.position, 0.4);
    }

    #[test]
    fn test_free_motion_damps_and_advances() {
        let stepper = stepper();
        let mut state = scrolled_state(0.0, 0.1);
        assert_eq!(stepper.step(&mut state, &WIDE, 1.0), StepEvent::Moved);
        assert!((state.velocity - 0.092).abs() < 1e-12);
        assert!((state.position - 0.092).abs() < 1e-12);
    }

    #[test]
    fn test_frame_rate_independent_damping() {
        let stepper = stepper();
        let mut a = scrolled_state(0.0, 0.2);
        let mut b = scrolled_state(0.0, 0.2);
        stepper.step(&mut a, &WIDE, 1.0);
        stepper.step(&mut a, &WIDE, 1.0);
        stepper.step(&mut b, &WIDE, 2.0);
        assert!((a.velocity - b.velocity).abs() < 1e-12);
    }

    #[test]
    fn test_snap_to_floor_scenario() {
        let stepper = stepper();
        let bounds = Bounds { min: -0.95, max: 0.95 };
        let mut state = scrolled_state(0.42, 0.003);
        let event = stepper.step(&mut state, &bounds, 1.0);
        assert_eq!(event, StepEvent::SnapStarted { target: 0.0 });
        assert!(state.is_snapping);
        assert_eq!(state.velocity, 0.0);
        run_until_arrived(&stepper, &mut state, &bounds);
        assert_eq!(state.position, 0.0);
    }

    #[test]
    fn test_velocity_tie_break_at_midpoint() {
        let stepper = stepper();
        let config = stepper.config().clone();
        // Residual velocity small enough to settle this frame without moving far
        for (velocity, expected) in [(1e-4, 1.0), (-1e-4, 0.0)] {
            let mut state = scrolled_state(0.5, velocity);
            stepper.step(&mut state, &WIDE, 0.0);
            assert!(state.is_snapping);
            assert_eq!(state.target_position, expected);
        }
        let mut state = scrolled_state(0.5, 0.0);
        stepper.step(&mut state, &WIDE, 1.0);
        assert_eq!(state.target_position, 0.5_f64.round());
        assert!(config.min_velocity > 1e-4);
    }

    /// Free motion until the state machine picks a target
    fn decay_until_snap(stepper: &PhysicsStepper, state: &mut PhysicsState) -> f64 {
        for _ in 0..500 {
            if let StepEvent::SnapStarted { target } = stepper.step(state, &WIDE, 1.0) {
                return target;
            }
        }
        panic!("free motion never settled: {:?}", state);
    }

    #[test]
    fn test_tie_break_after_real_decay() {
        let stepper = stepper();

        // 0.1 decays over 39 frames and travels about 1.1055, resting near 0.5055
        let mut forward = scrolled_state(-0.6, 0.1);
        let target = decay_until_snap(&stepper, &mut forward);
        let fraction = forward.position - forward.position.floor();
        assert!(fraction > 0.45 && fraction < 0.55, "rested at {}", forward.position);
        assert_eq!(target, 1.0);

        let mut backward = scrolled_state(1.6, -0.1);
        let target = decay_until_snap(&stepper, &mut backward);
        let fraction = backward.position - backward.position.floor();
        assert!(fraction > 0.45 && fraction < 0.55, "rested at {}", backward.position);
        assert_eq!(target, 0.0);

        run_until_arrived(&stepper, &mut forward, &WIDE);
        assert_eq!(forward.position, 1.0);
    }

    #[test]
    fn test_snap_target_is_clamped() {
        let stepper = stepper();
        let bounds = Bounds { min: -0.95, max: 0.95 };
        let mut state = scrolled_state(0.5, 1e-4);
        stepper.step(&mut state, &bounds, 0.0);
        assert_eq!(state.target_position, 0.95);
        run_until_arrived(&stepper, &mut state, &bounds);
        assert_eq!(state.position, 0.95);
    }

    #[test]
    fn test_hitting_bound_stops_velocity() {
        let stepper = stepper();
        let bounds = Bounds { min: -0.95, max: 0.95 };
        let mut state = scrolled_state(0.9, 0.3);
        let event = stepper.step(&mut state, &bounds, 1.0);
        assert_eq!(state.position, 0.95);
        assert!(matches!(event, StepEvent::SnapStarted { target } if target == 0.95));
    }

    #[test]
    fn test_convergence_is_exact_and_bounded() {
        let stepper = stepper();
        let mut state = scrolled_state(0.0, 0.0);
        stepper.jump(&mut state, &WIDE, 3);
        let steps = run_until_arrived(&stepper, &mut state, &WIDE);
        assert_eq!(state.position, 3.0);
        assert!(steps < 40, "took {} steps", steps);
        assert!(!state.is_snapping);
    }

    #[test]
    fn test_snapping_never_overshoots() {
        let stepper = stepper();
        let mut state = scrolled_state(-2.0, 0.0);
        stepper.jump(&mut state, &WIDE, 2);
        let mut prev_distance = f64::INFINITY;
        while state.is_snapping {
            stepper.step(&mut state, &WIDE, 1.0);
            let distance = (state.target_position - state.position).abs();
            assert!(state.position <= 2.0);
            assert!(distance <= prev_distance);
            prev_distance = distance;
        }
    }

    #[test]
    fn test_long_frame_lands_on_target() {
        let stepper = stepper();
        let mut state = scrolled_state(0.0, 0.0);
        stepper.jump(&mut state, &WIDE, 1);
        stepper.step(&mut state, &WIDE, 50.0);
        assert_eq!(state.position, 1.0);
        assert_eq!(stepper.step(&mut state, &WIDE, 1.0), StepEvent::Arrived { target: 1.0 });
    }

    #[test]
    fn test_jump_sets_snap_state() {
        let stepper = stepper();
        let mut state = PhysicsState::new(10);
        state.velocity = 0.2;
        let target = stepper.jump(&mut state, &WIDE, -2);
        assert_eq!(target, -2.0);
        assert_eq!(state.target_position, -2.0);
        assert!(state.is_snapping);
        assert_eq!(state.velocity, 0.0);
    }

    #[test]
    fn test_jump_outside_bounds_is_clamped() {
        let stepper = stepper();
        let mut state = PhysicsState::new(10);
        assert_eq!(stepper.jump(&mut state, &WIDE, 10), 3.95);
        assert_eq!(stepper.jump(&mut state, &WIDE, -10), -3.95);
    }
}
