//! Deterministic spin simulation
//!
//! All orchestration logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (cosmetic noise, never the landing math)
//! - No rendering or platform dependencies
//!
//! The trajectory engine converges on its target by predicting the wheel's
//! future rotation analytically; nothing in this module samples wall-clock
//! time or an unseeded random source.

pub mod angle;
pub mod landing;
pub mod state;
pub mod tick;
pub mod trajectory;
pub mod wheel;

pub use angle::{
    forced_spin_delta, pocket_angle, pocket_for_local_angle, shortest_delta, winner_for_rotation,
};
pub use landing::{PocketLock, SyncState};
pub use state::{Countdown, SessionEvent, SessionPhase, SpinOutcome, SpinSession, SpinState};
pub use tick::tick;
pub use trajectory::{BallSample, LandingPlan, PhaseWindow, TrajectoryPlan};
pub use wheel::{Wheel, WheelPhase};
