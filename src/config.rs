//! Engine configuration
//!
//! All tunables live in an immutable `SpinConfig` handed to the engine at
//! construction. Board-derived geometry (center, radii in pixels) is kept
//! separate in `Dimensions` so a resize only touches that half.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts;

/// Immutable spin tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinConfig {
    /// Number of pockets on the wheel
    pub pocket_count: usize,
    /// Wheel rotations per second (constant angular velocity)
    pub wheel_rps: f32,
    /// Total spin duration in seconds
    pub spin_duration: f32,
    /// Time fractions of the four trajectory phases (summed to 1)
    pub phase_fractions: [f32; 4],
    /// Full turns traveled in phases 1-3
    pub phase_rotations: [f32; 3],
    /// Per-update angular step cap during the landing phase (radians)
    pub max_landing_step: f32,
    /// Blend duration after landing (seconds)
    pub blend_duration: f32,
    /// Delay before the automatic countdown after a local spin lands (seconds)
    pub auto_countdown_delay: f32,
    /// Local countdown length (seconds)
    pub local_countdown_secs: u32,

    // === Geometry fractions (of the board's half-extent) ===
    pub start_radius_frac: f32,
    pub mid_radius_frac: f32,
    pub pocket_radius_frac: f32,

    // === Cosmetic amplitudes (of the board's half-extent) ===
    pub wobble_amplitude_frac: f32,
    pub bounce_amplitude_frac: f32,
    pub perturb_amplitude_frac: f32,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            pocket_count: consts::POCKET_COUNT,
            wheel_rps: consts::WHEEL_RPS,
            spin_duration: consts::SPIN_DURATION,
            phase_fractions: consts::PHASE_FRACTIONS,
            phase_rotations: consts::PHASE_ROTATIONS,
            max_landing_step: consts::MAX_LANDING_STEP,
            blend_duration: consts::BLEND_DURATION,
            auto_countdown_delay: consts::AUTO_COUNTDOWN_DELAY,
            local_countdown_secs: consts::LOCAL_COUNTDOWN_SECS,
            start_radius_frac: consts::START_RADIUS_FRAC,
            mid_radius_frac: consts::MID_RADIUS_FRAC,
            pocket_radius_frac: consts::POCKET_RADIUS_FRAC,
            wobble_amplitude_frac: consts::WOBBLE_AMPLITUDE_FRAC,
            bounce_amplitude_frac: consts::BOUNCE_AMPLITUDE_FRAC,
            perturb_amplitude_frac: consts::PERTURB_AMPLITUDE_FRAC,
        }
    }
}

impl SpinConfig {
    /// Sanitize a config: renormalize phase fractions that do not sum to 1 and
    /// floor non-positive durations back to their defaults. Logs what it fixed.
    pub fn sanitized(mut self) -> Self {
        let sum: f32 = self.phase_fractions.iter().sum();
        if (sum - 1.0).abs() > 1e-3 {
            if sum > 0.0 {
                log::warn!("phase fractions sum to {sum}, renormalizing");
                for f in &mut self.phase_fractions {
                    *f /= sum;
                }
            } else {
                log::warn!("phase fractions sum to {sum}, using defaults");
                self.phase_fractions = consts::PHASE_FRACTIONS;
            }
        }
        if self.spin_duration <= 0.0 {
            log::warn!("non-positive spin duration {}, using default", self.spin_duration);
            self.spin_duration = consts::SPIN_DURATION;
        }
        if self.blend_duration <= 0.0 {
            log::warn!("non-positive blend duration {}, using default", self.blend_duration);
            self.blend_duration = consts::BLEND_DURATION;
        }
        if self.pocket_count == 0 {
            log::warn!("zero pocket count, using default");
            self.pocket_count = consts::POCKET_COUNT;
        }
        self
    }

    /// Wheel angular velocity in radians per second
    #[inline]
    pub fn wheel_angular_velocity(&self) -> f32 {
        self.wheel_rps * std::f32::consts::TAU
    }

    /// Duration of one trajectory phase in seconds
    #[inline]
    pub fn phase_duration(&self, phase: usize) -> f32 {
        self.spin_duration * self.phase_fractions[phase]
    }
}

/// Board-derived geometry, recomputed on resize
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Dimensions {
    /// Board center in the host scene's coordinates
    pub center: Vec2,
    /// Ball radius at spin start (outer rim)
    pub start_radius: f32,
    /// Ball radius at the end of the descent phase
    pub mid_radius: f32,
    /// Ball radius at rest in a pocket
    pub pocket_radius: f32,
    /// Radius wobble amplitude (phase 1)
    pub wobble_amplitude: f32,
    /// Peak bounce amplitude (phases 2-4)
    pub bounce_amplitude: f32,
    /// Peak pseudo-random perturbation amplitude (phases 2-4)
    pub perturb_amplitude: f32,
}

impl Dimensions {
    /// Derive all radii from the board's current pixel size
    pub fn from_board(width: f32, height: f32, config: &SpinConfig) -> Self {
        let half = width.min(height) / 2.0;
        Self {
            center: Vec2::new(width / 2.0, height / 2.0),
            start_radius: half * config.start_radius_frac,
            mid_radius: half * config.mid_radius_frac,
            pocket_radius: half * config.pocket_radius_frac,
            wobble_amplitude: half * config.wobble_amplitude_frac,
            bounce_amplitude: half * config.bounce_amplitude_frac,
            perturb_amplitude: half * config.perturb_amplitude_frac,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fractions_sum_to_one() {
        let config = SpinConfig::default();
        let sum: f32 = config.phase_fractions.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sanitize_renormalizes_fractions() {
        let config = SpinConfig {
            phase_fractions: [2.0, 3.0, 3.0, 2.0],
            ..Default::default()
        }
        .sanitized();
        let sum: f32 = config.phase_fractions.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!((config.phase_fractions[0] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_sanitize_rejects_bad_durations() {
        let config = SpinConfig {
            spin_duration: -1.0,
            pocket_count: 0,
            ..Default::default()
        }
        .sanitized();
        assert!(config.spin_duration > 0.0);
        assert_eq!(config.pocket_count, crate::consts::POCKET_COUNT);
    }

    #[test]
    fn test_dimensions_scale_with_board() {
        let config = SpinConfig::default();
        let small = Dimensions::from_board(400.0, 400.0, &config);
        let large = Dimensions::from_board(800.0, 800.0, &config);
        assert!((large.start_radius - small.start_radius * 2.0).abs() < 1e-4);
        assert!((large.center.x - 400.0).abs() < 1e-6);
    }
}
