//! L4 Atomic Layer: Snap target selection
//!
//! Picks the integer level a settling carousel should snap to. Nearby
//! neighbours win by distance in two tiers; only positions in the ambiguous
//! middle fall back to the direction of travel.

use super::config::PhysicsConfig;
use super::timing::nearest_level;

/// Choose the level to snap to from a continuous position
///
/// The result is not clamped; callers clamp it into the current bounds.
pub fn select_target(position: f64, velocity: f64, config: &PhysicsConfig) -> f64 {
    let floor = position.floor();
    let ceil = position.ceil();
    if floor == ceil {
        return position;
    }

    let to_floor = position - floor;
    let to_ceil = ceil - position;

    // Close enough that any motion toward the other side would overshoot
    if to_floor < config.stuck_threshold {
        return floor;
    }
    if to_ceil < config.stuck_threshold {
        return ceil;
    }

    if to_floor < config.snap_threshold && to_floor <= to_ceil {
        return floor;
    }
    if to_ceil < config.snap_threshold && to_ceil < to_floor {
        return ceil;
    }

    if velocity > 0.0 {
        ceil
    } else if velocity < 0.0 {
        floor
    } else {
        nearest_level(position) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PhysicsConfig {
        PhysicsConfig::default()
    }

    #[test]
    fn test_integer_position_targets_itself() {
        assert_eq!(select_target(2.0, 0.3, &config()), 2.0);
        assert_eq!(select_target(-1.0, -0.3, &config()), -1.0);
    }

    #[test]
    fn test_snap_to_floor() {
        // Closer to 0 than to 1, inside the snap threshold
        assert_eq!(select_target(0.42, 0.003, &config()), 0.0);
        assert_eq!(select_target(0.42, -0.003, &config()), 0.0);
    }

    #[test]
    fn test_stuck_neighbour_wins_regardless_of_velocity() {
        assert_eq!(select_target(0.03, 0.2, &config()), 0.0);
        assert_eq!(select_target(0.97, -0.2, &config()), 1.0);
        assert_eq!(select_target(-1.96, 0.2, &config()), -2.0);
    }

    #[test]
    fn test_midpoint_uses_velocity_direction() {
        assert_eq!(select_target(0.5, 0.001, &config()), 1.0);
        assert_eq!(select_target(0.5, -0.001, &config()), 0.0);
        assert_eq!(select_target(0.5, 0.0, &config()), 1.0);
        assert_eq!(select_target(-0.5, 0.0, &config()), -1.0);
    }

    #[test]
    fn test_negative_positions() {
        assert_eq!(select_target(-0.3, 0.1, &config()), 0.0);
        assert_eq!(select_target(-0.7, -0.1, &config()), -1.0);
    }

    #[test]
    fn test_target_is_monotonic_in_position() {
        // For a fixed velocity the chosen level never decreases as position grows
        for velocity in [-0.01, 0.0, 0.01] {
            let mut prev = f64::NEG_INFINITY;
            for i in 0..=400 {
                let position = -2.0 + i as f64 * 0.01;
                let target = select_target(position, velocity, &config());
                assert!(target >= prev, "non-monotonic at {} (v={})", position, velocity);
                assert!((target - position).abs() <= 1.0);
                prev = target;
            }
        }
    }
}
