//! Angular model for the pocket ring
//!
//! Pure geometry, no state:
//! - pocket index -> fixed wheel-local angle (evenly spaced around 2π)
//! - shortest-path angular differences, with the spin-direction bias the
//!   trajectory engine relies on
//!
//! World angle = wheel-local angle + current wheel rotation. Pockets are laid
//! out clockwise from the top marker, so with a positively rotating wheel the
//! pocket under the marker is `round(rotation / step)`.

use std::f32::consts::TAU;

use crate::consts::TOP_ANGLE;
use crate::normalize_angle;

/// Angular width of one pocket
#[inline]
pub fn pocket_step(pocket_count: usize) -> f32 {
    TAU / pocket_count as f32
}

/// Wheel-local angle of a pocket's center.
///
/// Pocket 0 sits under the top marker at zero wheel rotation; higher indices
/// step clockwise (negative angles).
#[inline]
pub fn pocket_angle(index: usize, pocket_count: usize) -> f32 {
    TOP_ANGLE - index as f32 * pocket_step(pocket_count)
}

/// Shortest-path difference `to - from`, wrapped into [-π, π)
#[inline]
pub fn shortest_delta(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Shortest delta forced non-positive.
///
/// The ball always travels against the wheel's (positive) rotation; when the
/// naive shortest path runs the other way, go the long way around instead so
/// the landing phase never reverses the visual spin direction.
#[inline]
pub fn forced_spin_delta(from: f32, to: f32) -> f32 {
    let delta = shortest_delta(from, to);
    if delta > 0.0 { delta - TAU } else { delta }
}

/// Pocket whose center is nearest to a wheel-local angle
pub fn pocket_for_local_angle(local: f32, pocket_count: usize) -> usize {
    let step = pocket_step(pocket_count);
    let turns = normalize_angle(TOP_ANGLE - local) / step;
    let index = turns.round() as i64;
    index.rem_euclid(pocket_count as i64) as usize
}

/// Pocket currently under the top marker for a given wheel rotation
pub fn winner_for_rotation(rotation: f32, pocket_count: usize) -> usize {
    // The marker sees the pocket whose local angle plus rotation lands on top.
    pocket_for_local_angle(TOP_ANGLE - rotation, pocket_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    const COUNT: usize = 37;

    #[test]
    fn test_pocket_zero_at_top() {
        assert!((pocket_angle(0, COUNT) - TOP_ANGLE).abs() < 1e-6);
    }

    #[test]
    fn test_pockets_evenly_spaced() {
        let step = pocket_step(COUNT);
        for i in 1..COUNT {
            let gap = pocket_angle(i - 1, COUNT) - pocket_angle(i, COUNT);
            assert!((gap - step).abs() < 1e-5, "gap at {i} was {gap}");
        }
    }

    #[test]
    fn test_shortest_delta_wraps() {
        assert!((shortest_delta(0.0, 0.5) - 0.5).abs() < 1e-6);
        assert!((shortest_delta(0.5, 0.0) + 0.5).abs() < 1e-6);
        // Crossing the ±π seam takes the short way
        let d = shortest_delta(PI - 0.1, -PI + 0.1);
        assert!((d - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_forced_delta_goes_the_long_way() {
        // Naive shortest path is +0.5; forced result must be 0.5 - TAU
        let d = forced_spin_delta(0.0, 0.5);
        assert!(d <= 0.0);
        assert!((d - (0.5 - TAU)).abs() < 1e-5);
        // Already-negative paths are untouched
        let d = forced_spin_delta(0.5, 0.0);
        assert!((d + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_pocket_for_local_angle_roundtrip() {
        for i in 0..COUNT {
            let local = pocket_angle(i, COUNT);
            assert_eq!(pocket_for_local_angle(local, COUNT), i);
            // Offsets inside half a pocket still resolve to the same index
            let jitter = pocket_step(COUNT) * 0.4;
            assert_eq!(pocket_for_local_angle(local + jitter, COUNT), i);
            assert_eq!(pocket_for_local_angle(local - jitter, COUNT), i);
        }
    }

    #[test]
    fn test_winner_advances_with_rotation() {
        let step = pocket_step(COUNT);
        assert_eq!(winner_for_rotation(0.0, COUNT), 0);
        assert_eq!(winner_for_rotation(step, COUNT), 1);
        assert_eq!(winner_for_rotation(step * 5.0, COUNT), 5);
        // Full turn wraps back to pocket 0
        assert_eq!(winner_for_rotation(TAU, COUNT), 0);
    }

    proptest! {
        #[test]
        fn prop_forced_delta_never_positive(from in -100.0f32..100.0, to in -100.0f32..100.0) {
            prop_assert!(forced_spin_delta(from, to) <= 0.0);
        }

        #[test]
        fn prop_forced_delta_reaches_target(from in -10.0f32..10.0, to in -10.0f32..10.0) {
            let d = forced_spin_delta(from, to);
            // Arriving at from + d must be the same physical angle as `to`
            let err = shortest_delta(from + d, to).abs();
            prop_assert!(err < 1e-3, "residual {err}");
        }

        #[test]
        fn prop_winner_matches_pocket_angle(index in 0usize..COUNT, turns in -4.0f32..4.0) {
            // If pocket `index` is under the marker, the rotation must name it
            let rotation = index as f32 * pocket_step(COUNT) + turns.round() * TAU;
            prop_assert_eq!(winner_for_rotation(rotation, COUNT), index);
        }
    }
}
