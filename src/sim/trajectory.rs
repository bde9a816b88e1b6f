//! Four-phase procedural ball trajectory
//!
//! Phases 1-3 look like decaying, bouncy, semi-random motion; phase 4 is the
//! only phase that knows the target pocket and converges on an exact
//! pre-computed angle and radius at the exact end of the spin.
//!
//! The phase math is pure (angle/radius as functions of progress and config)
//! and runs with no scheduler; `advance()` only picks the phase window for an
//! elapsed time and applies the per-update clamp of the landing phase.
//!
//! Convergence works by prediction, not sampling: the wheel keeps rotating
//! underneath the whole animation, so the landing target is a moving target.
//! At the instant phase 4 begins the engine predicts the wheel's rotation at
//! the end of the phase from its constant angular velocity and interpolates
//! toward that future pocket angle.

use std::f32::consts::TAU;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::{Dimensions, SpinConfig};
use crate::sim::angle;

/// Number of trajectory phases in one spin
pub const PHASE_COUNT: usize = 4;

/// Wobble cycles across the rim-spin phase (integer, so the phase ends clean)
const RIM_WOBBLE_CYCLES: f32 = 3.0;

/// Bounce oscillations per second
const BOUNCE_FREQ: f32 = 5.0;

/// Fraction of peak bounce amplitude still present when the landing phase starts
const LANDING_ENTRY_BOUNCE: f32 = 0.4;

/// One time-boxed phase window, pre-registered on the spin's timeline
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PhaseWindow {
    /// Offset from spin start (seconds)
    pub start: f32,
    pub duration: f32,
}

impl PhaseWindow {
    #[inline]
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }

    /// Progress through this window, clamped to [0, 1]
    #[inline]
    pub fn progress(&self, elapsed: f32) -> f32 {
        ((elapsed - self.start) / self.duration).clamp(0.0, 1.0)
    }
}

/// Cosmetic sine-noise, drawn once per session from the seeded RNG.
///
/// Never feeds the landing computation - purely visual, but deterministic per
/// seed so a session's exact trajectory replays in tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NoiseParams {
    phases: [f32; 3],
    freqs: [f32; 3],
}

impl NoiseParams {
    fn draw(rng: &mut Pcg32) -> Self {
        let mut phases = [0.0; 3];
        let mut freqs = [0.0; 3];
        for i in 0..3 {
            phases[i] = rng.random_range(0.0..TAU);
            freqs[i] = rng.random_range(5.0..13.0);
        }
        Self { phases, freqs }
    }

    /// Smooth pseudo-random offset in roughly [-1, 1] at normalized time t
    fn sample(&self, t: f32) -> f32 {
        let mut sum = 0.0;
        for i in 0..3 {
            sum += (t * self.freqs[i] * TAU + self.phases[i]).sin();
        }
        sum / 3.0
    }
}

/// Landing solution, computed once at the instant phase 4 begins
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LandingPlan {
    /// Ball world angle entering the phase: the deterministic phase 1-3
    /// rotation sum, never read back from the noisy samples
    pub entry_angle: f32,
    /// Wheel rotation predicted for the end of the phase
    pub predicted_rotation: f32,
    /// Target pocket world angle at that future rotation
    pub target_world_angle: f32,
    /// Non-positive angular delta from entry to target
    pub delta: f32,
}

/// Ball state produced by each update
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BallSample {
    /// World angle (radians)
    pub angle: f32,
    /// Distance from the board center
    pub radius: f32,
    /// Radial bounce offset, already cosmetic-only
    pub bounce: f32,
}

/// Per-spin trajectory state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrajectoryPlan {
    target: usize,
    start_angle: f32,
    windows: [PhaseWindow; PHASE_COUNT],
    rotations: [f32; 3],
    noise: NoiseParams,
    landing: Option<LandingPlan>,
    /// Rendered angle after the landing phase's per-update clamp
    current_angle: f32,
    complete: bool,
}

impl TrajectoryPlan {
    /// Build the plan for one spin. The phase schedule is fixed here, up
    /// front, so phase start times are exact regardless of update jitter.
    pub fn new(config: &SpinConfig, target: usize, start_angle: f32, rng: &mut Pcg32) -> Self {
        let mut windows = [PhaseWindow {
            start: 0.0,
            duration: 0.0,
        }; PHASE_COUNT];
        let mut offset = 0.0;
        for (i, window) in windows.iter_mut().enumerate() {
            let duration = config.phase_duration(i);
            *window = PhaseWindow {
                start: offset,
                duration,
            };
            offset += duration;
        }

        Self {
            target,
            start_angle,
            windows,
            rotations: config.phase_rotations,
            noise: NoiseParams::draw(rng),
            landing: None,
            current_angle: start_angle,
            complete: false,
        }
    }

    #[inline]
    pub fn target(&self) -> usize {
        self.target
    }

    /// Total spin duration in seconds
    #[inline]
    pub fn duration(&self) -> f32 {
        self.windows[PHASE_COUNT - 1].end()
    }

    /// Landing solution, present once phase 4 has begun
    #[inline]
    pub fn landing(&self) -> Option<&LandingPlan> {
        self.landing.as_ref()
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Index of the phase containing an elapsed time
    pub fn phase_at(&self, elapsed: f32) -> usize {
        for (i, window) in self.windows.iter().enumerate() {
            if elapsed < window.end() {
                return i;
            }
        }
        PHASE_COUNT - 1
    }

    /// Ball world angle entering phase 4: start angle minus the deterministic
    /// phase 1-3 displacement (all three eases end at exactly one).
    fn landing_entry_angle(&self) -> f32 {
        let turns: f32 = self.rotations.iter().sum();
        self.start_angle - turns * TAU
    }

    /// Advance to `elapsed` seconds into the spin and sample the ball.
    ///
    /// Returns the sample and whether the ball landed on this update. Once
    /// complete, repeated calls keep returning the exact snapped sample.
    pub fn advance(
        &mut self,
        elapsed: f32,
        wheel_rotation: f32,
        wheel_velocity: f32,
        config: &SpinConfig,
        dims: &Dimensions,
    ) -> (BallSample, bool) {
        let landing_window = self.windows[3];

        if elapsed >= landing_window.start && self.landing.is_none() {
            // Predict the wheel's rotation at the end of the phase from its
            // constant velocity; sampling it reactively could never converge
            // on the moving pocket.
            let predicted_rotation =
                wheel_rotation + wheel_velocity * (landing_window.end() - elapsed);
            let entry_angle = self.landing_entry_angle();
            let target_world_angle =
                angle::pocket_angle(self.target, config.pocket_count) + predicted_rotation;
            let delta = angle::forced_spin_delta(entry_angle, target_world_angle);
            log::debug!(
                "landing plan: entry {entry_angle:.4} target {target_world_angle:.4} delta {delta:.4}"
            );
            self.current_angle = entry_angle;
            self.landing = Some(LandingPlan {
                entry_angle,
                predicted_rotation,
                target_world_angle,
                delta,
            });
        }

        match self.landing {
            None => {
                let sample = self.freewheel_sample(elapsed, dims);
                (sample, false)
            }
            Some(plan) => {
                let p = landing_window.progress(elapsed);
                let sample = self.landing_sample(&plan, p, elapsed, config, dims);
                if p >= 1.0 && !self.complete {
                    self.complete = true;
                    return (sample, true);
                }
                (sample, false)
            }
        }
    }

    /// Phases 1-3: procedural motion with no knowledge of the target
    fn freewheel_sample(&self, elapsed: f32, dims: &Dimensions) -> BallSample {
        let t = elapsed / self.duration();
        match self.phase_at(elapsed) {
            0 => {
                // Outer-rim fast spin: full radius, small sinusoidal wobble
                let p = self.windows[0].progress(elapsed);
                let angle = self.start_angle - self.rotations[0] * TAU * ease_out_quad(p);
                let wobble = dims.wobble_amplitude * (p * RIM_WOBBLE_CYCLES * TAU).sin();
                BallSample {
                    angle,
                    radius: dims.start_radius + wobble,
                    bounce: 0.0,
                }
            }
            1 => {
                // Slower rate, radius variance and bounce grow with progress
                let p = self.windows[1].progress(elapsed);
                let angle = self.start_angle
                    - self.rotations[0] * TAU
                    - self.rotations[1] * TAU * ease_in_out_quad(p);
                let perturb = dims.perturb_amplitude * p * self.noise.sample(t);
                BallSample {
                    angle,
                    radius: dims.start_radius + perturb,
                    bounce: self.bounce_offset(elapsed, p, dims),
                }
            }
            _ => {
                // Gradual descent to the mid radius; bounce peaks then decays
                let p = self.windows[2].progress(elapsed);
                let angle = self.start_angle
                    - (self.rotations[0] + self.rotations[1]) * TAU
                    - self.rotations[2] * TAU * ease_out_cubic(p);
                let radius =
                    dims.start_radius + (dims.mid_radius - dims.start_radius) * ease_in_out_quad(p);
                let envelope = 1.0 - (1.0 - LANDING_ENTRY_BOUNCE) * p * p;
                let perturb = dims.perturb_amplitude * self.noise.sample(t);
                BallSample {
                    angle,
                    radius: radius + perturb,
                    bounce: self.bounce_offset(elapsed, envelope, dims),
                }
            }
        }
    }

    /// Phase 4: linear interpolation toward the pre-computed target, with the
    /// per-update step clamped so an unexpectedly large delta cannot snap.
    fn landing_sample(
        &mut self,
        plan: &LandingPlan,
        p: f32,
        elapsed: f32,
        config: &SpinConfig,
        dims: &Dimensions,
    ) -> BallSample {
        if p >= 1.0 {
            // Snap to the exact computed target, eliminating residual
            // floating-point and clamping drift
            self.current_angle = plan.target_world_angle;
            return BallSample {
                angle: plan.target_world_angle,
                radius: dims.pocket_radius,
                bounce: 0.0,
            };
        }

        let ideal = plan.entry_angle + plan.delta * p;
        let step = ideal - self.current_angle;
        self.current_angle += step.clamp(-config.max_landing_step, config.max_landing_step);

        let t = elapsed / self.duration();
        let radius =
            dims.mid_radius + (dims.pocket_radius - dims.mid_radius) * ease_in_out_cubic(p);
        let fade_q = (1.0 - p) * (1.0 - p);
        let fade_c = fade_q * (1.0 - p);
        let perturb = dims.perturb_amplitude * fade_c * self.noise.sample(t);
        let envelope = LANDING_ENTRY_BOUNCE * fade_q;
        BallSample {
            angle: self.current_angle,
            radius: radius + perturb,
            bounce: self.bounce_offset(elapsed, envelope, dims),
        }
    }

    /// Rectified-sine bounce scaled by an amplitude envelope
    fn bounce_offset(&self, elapsed: f32, envelope: f32, dims: &Dimensions) -> f32 {
        (elapsed * BOUNCE_FREQ * TAU).sin().abs() * envelope.max(0.0) * dims.bounce_amplitude
    }
}

#[inline]
fn ease_out_quad(p: f32) -> f32 {
    p * (2.0 - p)
}

#[inline]
fn ease_in_out_quad(p: f32) -> f32 {
    if p < 0.5 {
        2.0 * p * p
    } else {
        1.0 - (-2.0 * p + 2.0).powi(2) / 2.0
    }
}

#[inline]
fn ease_out_cubic(p: f32) -> f32 {
    1.0 - (1.0 - p).powi(3)
}

#[inline]
fn ease_in_out_cubic(p: f32) -> f32 {
    if p < 0.5 {
        4.0 * p * p * p
    } else {
        1.0 - (-2.0 * p + 2.0).powi(3) / 2.0
    }
}
