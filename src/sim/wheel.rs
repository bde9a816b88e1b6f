//! Constant wheel rotation
//!
//! The wheel spins at a fixed angular velocity from the moment the scene
//! starts and never stops during play; spins are layered on top of it. Its
//! accumulated rotation is the single source of truth every other component
//! reads - readers treat each query as an immutable snapshot.

use serde::{Deserialize, Serialize};

/// Wheel rotation driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WheelPhase {
    /// Initial state, rotation not yet started
    Stopped,
    /// Constant-velocity rotation, unbounded
    Rotating,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wheel {
    phase: WheelPhase,
    /// Accumulated rotation in radians (unbounded, positive direction)
    rotation: f32,
    /// Angular velocity in radians per second
    angular_velocity: f32,
}

impl Wheel {
    pub fn new(rotations_per_sec: f32) -> Self {
        Self {
            phase: WheelPhase::Stopped,
            rotation: 0.0,
            angular_velocity: rotations_per_sec * std::f32::consts::TAU,
        }
    }

    /// Begin the unbounded constant rotation. Idempotent.
    pub fn start_constant_rotation(&mut self) {
        if self.phase == WheelPhase::Stopped {
            log::debug!(
                "wheel rotation started at {:.3} rad/s",
                self.angular_velocity
            );
            self.phase = WheelPhase::Rotating;
        }
    }

    /// Advance the rotation by one timestep
    pub fn advance(&mut self, dt: f32) {
        if self.phase == WheelPhase::Rotating {
            self.rotation += self.angular_velocity * dt;
        }
    }

    /// Current accumulated rotation (radians, unbounded)
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Angular velocity in radians per second (0 while stopped)
    #[inline]
    pub fn angular_velocity(&self) -> f32 {
        match self.phase {
            WheelPhase::Stopped => 0.0,
            WheelPhase::Rotating => self.angular_velocity,
        }
    }

    #[inline]
    pub fn is_rotating(&self) -> bool {
        self.phase == WheelPhase::Rotating
    }

    /// Teardown only - the wheel never stops during normal operation
    pub fn stop(&mut self) {
        self.phase = WheelPhase::Stopped;
    }
}
