//! Spin session state and event types
//!
//! Everything the orchestrator owns lives here: the wheel, the current spin
//! session (if any), the post-land synchronizer, the countdown, and the
//! control flags. Mutation happens only through `tick()`'s transition table;
//! the adapters read the flags to gate local commands.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::landing::PocketLock;
use super::trajectory::{BallSample, TrajectoryPlan};
use super::wheel::Wheel;
use crate::config::{Dimensions, SpinConfig};
use crate::consts::TOP_ANGLE;
use crate::polar_to_cartesian;

/// Orchestrator state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Nothing in flight; local spins allowed when not server-controlled
    Idle,
    /// A trajectory is running
    Spinning,
    /// A countdown (local or server-synced) is running
    CountdownRunning,
}

/// Inbound events, produced by the input and network adapters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Local request to spin to a specific pocket
    SpinRequested { target: usize },
    /// Local request to spin to a randomly chosen pocket
    RandomSpinRequested,
    /// Local request to start the manual countdown
    CountdownStartRequested,
    /// Local request to stop the manual countdown
    CountdownStopRequested,
    /// Server round start: replaces any countdown or spin in progress
    RemoteRoundStart { time_left_ms: u64 },
    /// Server-chosen spin: always accepted, overrides local timing
    RemoteSpin { index: usize },
    /// Server game-state sync: (re)starts or stops the countdown
    RemoteGameState { round_active: bool, time_left_ms: u64 },
    /// Network connection established; remote authority takes over
    Connected,
    /// Network connection lost; local control resumes
    Disconnected,
}

/// Outbound notifications, drained by the host scene each frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinOutcome {
    /// Ball came to rest on its target pocket
    BallLanded { pocket: usize },
    /// Spin session fully wound down (fires after `BallLanded`)
    SpinComplete { pocket: usize },
    /// Countdown crossed a whole second
    CountdownTick { seconds_left: u32 },
    CountdownFinished,
    ConnectionChanged { connected: bool },
}

/// One spin from request to landing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinSession {
    pub target: usize,
    /// Ball world angle when the session began
    pub start_world_angle: f32,
    /// Tick counter value at session start
    pub start_ticks: u64,
    /// Seconds since session start
    pub elapsed: f32,
    pub plan: TrajectoryPlan,
}

/// Countdown timer emitting whole-second ticks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    pub remaining: f32,
    /// Last whole second announced via `CountdownTick`
    pub last_announced: u32,
}

impl Countdown {
    pub fn from_secs(secs: u32) -> Self {
        Self {
            remaining: secs as f32,
            last_announced: secs + 1,
        }
    }

    /// Server countdowns are synced to a millisecond deadline
    pub fn from_millis(ms: u64) -> Self {
        Self::from_secs(ms.div_ceil(1000) as u32)
    }
}

/// RNG bookkeeping kept serializable; the live generator is derived per spin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Fresh generator for the next session; bumping the stream keeps each
    /// spin's cosmetic noise distinct while the whole run stays replayable
    pub fn next_session_rng(&mut self) -> Pcg32 {
        self.stream += 1;
        Pcg32::seed_from_u64(
            self.seed
                .wrapping_add(self.stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
        )
    }
}

/// Complete orchestrator state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpinState {
    pub config: SpinConfig,
    pub dims: Dimensions,
    pub wheel: Wheel,
    pub phase: SessionPhase,
    pub session: Option<SpinSession>,
    pub lock: PocketLock,
    pub countdown: Option<Countdown>,
    /// Seconds until the automatic post-land countdown (local control only)
    pub auto_countdown: Option<f32>,
    /// True while a server connection owns spin timing
    pub server_controlled: bool,
    /// Last ball sample (world angle, radius, bounce)
    pub ball: BallSample,
    pub time_ticks: u64,
    rng_state: RngState,
    #[serde(skip)]
    events: Vec<SpinOutcome>,
}

impl SpinState {
    /// Create the orchestrator and start the wheel's constant rotation
    pub fn new(config: SpinConfig, board_width: f32, board_height: f32, seed: u64) -> Self {
        let config = config.sanitized();
        let dims = Dimensions::from_board(board_width, board_height, &config);
        let mut wheel = Wheel::new(config.wheel_rps);
        wheel.start_constant_rotation();

        Self {
            ball: BallSample {
                angle: TOP_ANGLE,
                radius: dims.pocket_radius,
                bounce: 0.0,
            },
            config,
            dims,
            wheel,
            phase: SessionPhase::Idle,
            session: None,
            lock: PocketLock::new(),
            countdown: None,
            auto_countdown: None,
            server_controlled: false,
            time_ticks: 0,
            rng_state: RngState::new(seed),
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn is_spinning(&self) -> bool {
        self.phase == SessionPhase::Spinning
    }

    #[inline]
    pub fn is_countdown_running(&self) -> bool {
        self.phase == SessionPhase::CountdownRunning
    }

    #[inline]
    pub fn is_server_controlled(&self) -> bool {
        self.server_controlled
    }

    /// A new spin or countdown may start: nothing spinning, nothing counting
    #[inline]
    pub fn is_ready_to_spin(&self) -> bool {
        !self.is_spinning() && !self.is_countdown_running()
    }

    /// Current wheel rotation snapshot
    #[inline]
    pub fn wheel_rotation(&self) -> f32 {
        self.wheel.rotation()
    }

    /// Ball position in the host scene's coordinates
    pub fn ball_position(&self) -> Vec2 {
        self.dims.center + polar_to_cartesian(self.ball.radius + self.ball.bounce, self.ball.angle)
    }

    /// Begin a spin session toward `target`, cancelling any in-flight
    /// trajectory, blend, lock, or countdown. Re-entrant from any state;
    /// callers enforcing local gating check `is_ready_to_spin()` first.
    /// Returns false (and changes nothing) for an out-of-range pocket.
    pub fn start_spin(&mut self, target: usize) -> bool {
        if target >= self.config.pocket_count {
            log::info!(
                "rejected spin: pocket {target} out of range (count {})",
                self.config.pocket_count
            );
            return false;
        }

        self.session = None;
        self.lock.cancel();
        self.countdown = None;
        self.auto_countdown = None;

        let start_world_angle = self.ball.angle;
        let mut rng = self.rng_state.next_session_rng();
        let plan = TrajectoryPlan::new(&self.config, target, start_world_angle, &mut rng);
        log::info!("spin started: pocket {target}, ball angle {start_world_angle:.3}");
        self.session = Some(SpinSession {
            target,
            start_world_angle,
            start_ticks: self.time_ticks,
            elapsed: 0.0,
            plan,
        });
        self.phase = SessionPhase::Spinning;
        true
    }

    /// Pick a random valid pocket (cosmetic RNG stream, same replayability)
    pub fn random_pocket(&mut self) -> usize {
        use rand::Rng;
        let mut rng = self.rng_state.next_session_rng();
        rng.random_range(0..self.config.pocket_count)
    }

    /// Recompute center and radii after the board resizes
    pub fn recalculate_dimensions(&mut self, board_width: f32, board_height: f32) {
        self.dims = Dimensions::from_board(board_width, board_height, &self.config);
        log::debug!(
            "dimensions recalculated: center ({:.1}, {:.1})",
            self.dims.center.x,
            self.dims.center.y
        );
    }

    /// Cancel everything and stop the wheel. Scene teardown only.
    pub fn shutdown(&mut self) {
        self.session = None;
        self.lock.cancel();
        self.countdown = None;
        self.auto_countdown = None;
        self.phase = SessionPhase::Idle;
        self.wheel.stop();
        self.events.clear();
        log::info!("spin orchestrator shut down");
    }

    /// Take all notifications queued since the last drain
    pub fn drain_events(&mut self) -> Vec<SpinOutcome> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn push_event(&mut self, event: SpinOutcome) {
        self.events.push(event);
    }
}
