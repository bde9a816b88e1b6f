//! Wheel-ball post-landing synchronization
//!
//! After landing, the ball's angle is fixed in world space while the wheel
//! keeps rotating underneath it; left alone it would drift out of its pocket.
//! Two-step handoff, each cancellable by a new spin:
//! 1. Blending: an eased mix weight walks the rendered angle from the frozen
//!    world angle to `pocket_local + live rotation`. At weight 0 the two are
//!    the same physical point (the blend starts at the landing instant), so
//!    there is no visible jump at either end.
//! 2. Locked: the ball rigidly follows the wheel, recomputed every update,
//!    indefinitely.

use serde::{Deserialize, Serialize};

/// Synchronization regime for the rendered ball angle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SyncState {
    /// No landed ball; trajectory math owns the position
    Unsynced,
    /// Easing from world-fixed to wheel-relative
    Blending { elapsed: f32 },
    /// Rigidly attached to the pocket, rotating with the wheel
    Locked,
}

/// Post-land synchronizer for one landed ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PocketLock {
    state: SyncState,
    /// Ball world angle frozen at the landing instant
    frozen_angle: f32,
    /// Wheel-local angle of the landed pocket
    pocket_local: f32,
    blend_duration: f32,
}

impl PocketLock {
    pub fn new() -> Self {
        Self {
            state: SyncState::Unsynced,
            frozen_angle: 0.0,
            pocket_local: 0.0,
            blend_duration: 0.0,
        }
    }

    /// Start the blend at the landing instant. `frozen_angle` must equal
    /// `pocket_local + wheel rotation right now` for the handoff to be
    /// seamless; the trajectory engine's snap guarantees it.
    pub fn begin(&mut self, frozen_angle: f32, pocket_local: f32, blend_duration: f32) {
        self.state = SyncState::Blending { elapsed: 0.0 };
        self.frozen_angle = frozen_angle;
        self.pocket_local = pocket_local;
        self.blend_duration = blend_duration;
    }

    /// Cancel any in-flight blend or lock (new spin starting)
    pub fn cancel(&mut self) {
        self.state = SyncState::Unsynced;
    }

    #[inline]
    pub fn state(&self) -> SyncState {
        self.state
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.state != SyncState::Unsynced
    }

    /// Mix weight for a blend elapsed time (quadratic ease-out, clamped)
    fn weight(&self, elapsed: f32) -> f32 {
        let p = (elapsed / self.blend_duration).clamp(0.0, 1.0);
        p * (2.0 - p)
    }

    /// Rendered ball angle at a given blend weight and live wheel rotation
    fn blended_angle(&self, weight: f32, wheel_rotation: f32) -> f32 {
        (1.0 - weight) * self.frozen_angle + weight * (self.pocket_local + wheel_rotation)
    }

    /// Advance the handoff and return the ball's rendered world angle.
    /// Returns `None` while unsynced.
    pub fn advance(&mut self, dt: f32, wheel_rotation: f32) -> Option<f32> {
        match self.state {
            SyncState::Unsynced => None,
            SyncState::Blending { elapsed } => {
                let elapsed = elapsed + dt;
                if elapsed >= self.blend_duration {
                    self.state = SyncState::Locked;
                    Some(self.pocket_local + wheel_rotation)
                } else {
                    self.state = SyncState::Blending { elapsed };
                    Some(self.blended_angle(self.weight(elapsed), wheel_rotation))
                }
            }
            SyncState::Locked => Some(self.pocket_local + wheel_rotation),
        }
    }
}

impl Default for PocketLock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsynced_yields_nothing() {
        let mut lock = PocketLock::new();
        assert_eq!(lock.advance(0.1, 5.0), None);
    }

    #[test]
    fn test_blend_endpoints() {
        let mut lock = PocketLock::new();
        lock.begin(2.5, 0.75, 2.0);

        // Weight 0 equals the frozen landing angle
        assert!((lock.blended_angle(0.0, 123.0) - 2.5).abs() < 1e-6);
        // Weight 1 equals pocket_local + live rotation, whatever the rotation
        for rotation in [0.0, 3.7, -14.2, 400.0] {
            let blended = lock.blended_angle(1.0, rotation);
            assert!((blended - (0.75 + rotation)).abs() < 1e-3);
        }
        assert_eq!(lock.state(), SyncState::Blending { elapsed: 0.0 });
    }

    #[test]
    fn test_blend_reaches_lock() {
        let mut lock = PocketLock::new();
        lock.begin(1.0, 1.0, 0.5);
        let mut angle = 0.0;
        for i in 0..120 {
            let rotation = i as f32 * 0.01;
            if let Some(a) = lock.advance(1.0 / 120.0, rotation) {
                angle = a;
            }
        }
        assert_eq!(lock.state(), SyncState::Locked);
        // Locked: rigidly pocket_local + rotation
        assert!((angle - (1.0 + 119.0 * 0.01)).abs() < 1e-4);
    }

    #[test]
    fn test_locked_follows_wheel_forever() {
        let mut lock = PocketLock::new();
        lock.begin(0.0, 0.25, 0.1);
        lock.advance(1.0, 0.0); // past the blend
        for rotation in [1.0_f32, 50.0, 5000.0] {
            let angle = lock.advance(0.01, rotation).unwrap();
            assert!((angle - (0.25 + rotation)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_cancel_resets_to_unsynced() {
        let mut lock = PocketLock::new();
        lock.begin(1.0, 2.0, 2.0);
        assert!(lock.is_active());
        lock.cancel();
        assert!(!lock.is_active());
        assert_eq!(lock.advance(0.1, 1.0), None);
    }
}
