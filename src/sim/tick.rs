//! Fixed timestep orchestration tick
//!
//! One call applies the frame's session events through the transition table,
//! then advances everything that is time-driven: the wheel's constant
//! rotation, the active trajectory, the post-land blend/lock, and any
//! countdown. All cancellation happens synchronously inside the event pass,
//! so no stale per-tick work can ever write a dead session's ball position.

use super::angle;
use super::state::{Countdown, SessionEvent, SessionPhase, SpinOutcome, SpinState};
use crate::normalize_angle;

/// Advance the orchestrator by one timestep, applying queued events first
pub fn tick(state: &mut SpinState, events: &[SessionEvent], dt: f32) {
    for event in events {
        apply_event(state, event);
    }
    advance(state, dt);
}

/// The transition table. Local requests are gated by readiness and server
/// control; remote authority events are always honored.
fn apply_event(state: &mut SpinState, event: &SessionEvent) {
    match *event {
        SessionEvent::SpinRequested { target } => {
            if state.is_server_controlled() {
                log::info!("rejected local spin: server controls the table");
            } else if !state.is_ready_to_spin() {
                log::info!("rejected local spin: busy ({:?})", state.phase);
            } else {
                state.start_spin(target);
            }
        }
        SessionEvent::RandomSpinRequested => {
            if state.is_server_controlled() {
                log::info!("rejected random spin: server controls the table");
            } else if !state.is_ready_to_spin() {
                log::info!("rejected random spin: busy ({:?})", state.phase);
            } else {
                let target = state.random_pocket();
                state.start_spin(target);
            }
        }
        SessionEvent::CountdownStartRequested => {
            if state.is_server_controlled() {
                log::info!("rejected countdown start: server controls the table");
            } else if !state.is_ready_to_spin() {
                log::info!("rejected countdown start: busy ({:?})", state.phase);
            } else {
                begin_countdown(state, Countdown::from_secs(state.config.local_countdown_secs));
            }
        }
        SessionEvent::CountdownStopRequested => {
            if state.is_server_controlled() {
                log::info!("rejected countdown stop: server controls the table");
            } else {
                stop_countdown(state);
            }
        }
        SessionEvent::RemoteRoundStart { time_left_ms } => {
            cancel_for_remote(state, "round start");
            begin_countdown(state, Countdown::from_millis(time_left_ms));
        }
        SessionEvent::RemoteSpin { index } => {
            // Always accepted: the remote authority overrides local timing
            state.start_spin(index);
        }
        SessionEvent::RemoteGameState {
            round_active,
            time_left_ms,
        } => {
            if round_active {
                cancel_for_remote(state, "game state sync");
                begin_countdown(state, Countdown::from_millis(time_left_ms));
            } else {
                stop_countdown(state);
            }
        }
        SessionEvent::Connected => {
            if !state.server_controlled {
                state.server_controlled = true;
                state.push_event(SpinOutcome::ConnectionChanged { connected: true });
                log::info!("server connected, remote authority active");
            }
        }
        SessionEvent::Disconnected => {
            if state.server_controlled {
                state.server_controlled = false;
                state.push_event(SpinOutcome::ConnectionChanged { connected: false });
                log::info!("server disconnected, local control restored");
            }
        }
    }
}

/// Remote round/state messages supersede whatever is in flight locally
fn cancel_for_remote(state: &mut SpinState, reason: &str) {
    if state.session.take().is_some() {
        log::info!("active spin cancelled by remote {reason}");
    }
    state.lock.cancel();
    state.auto_countdown = None;
    if state.phase == SessionPhase::Spinning {
        state.phase = SessionPhase::Idle;
    }
}

fn begin_countdown(state: &mut SpinState, countdown: Countdown) {
    log::info!("countdown started: {:.0}s", countdown.remaining);
    state.countdown = Some(countdown);
    state.auto_countdown = None;
    state.phase = SessionPhase::CountdownRunning;
}

fn stop_countdown(state: &mut SpinState) {
    if state.countdown.take().is_some() {
        log::info!("countdown stopped");
        if state.phase == SessionPhase::CountdownRunning {
            state.phase = SessionPhase::Idle;
        }
    }
}

/// Time-driven advancement for one tick
fn advance(state: &mut SpinState, dt: f32) {
    state.time_ticks += 1;
    state.wheel.advance(dt);
    let rotation = state.wheel.rotation();

    // Active trajectory
    let mut landed_pocket = None;
    if let Some(session) = state.session.as_mut() {
        session.elapsed += dt;
        let velocity = state.wheel.angular_velocity();
        let (sample, landed) =
            session
                .plan
                .advance(session.elapsed, rotation, velocity, &state.config, &state.dims);
        state.ball = sample;
        if landed {
            landed_pocket = Some(session.target);
        }
    }
    if let Some(pocket) = landed_pocket {
        finish_landing(state, pocket, rotation);
    }

    // Post-land handoff: blend toward the wheel frame, then ride it
    if state.session.is_none() {
        if let Some(locked_angle) = state.lock.advance(dt, rotation) {
            state.ball.angle = locked_angle;
            state.ball.radius = state.dims.pocket_radius;
            state.ball.bounce = 0.0;
        }
    }

    // Delayed automatic countdown after a locally controlled landing
    if let Some(timer) = state.auto_countdown {
        let timer = timer - dt;
        if timer <= 0.0 {
            state.auto_countdown = None;
            if state.is_ready_to_spin() && !state.is_server_controlled() {
                begin_countdown(state, Countdown::from_secs(state.config.local_countdown_secs));
            }
        } else {
            state.auto_countdown = Some(timer);
        }
    }

    advance_countdown(state, dt);
}

/// Session teardown at the landing instant: diagnostics, notifications, and
/// the handoff to the post-land synchronizer
fn finish_landing(state: &mut SpinState, pocket: usize, rotation: f32) {
    let session = state.session.take();
    let predicted = session
        .as_ref()
        .and_then(|s| s.plan.landing())
        .map(|plan| plan.predicted_rotation)
        .unwrap_or(rotation);

    // Cross-check the intended target against the winner independently
    // recomputed from the live wheel rotation. A persistent mismatch means
    // the two angle-tracking paths have drifted apart.
    let local = normalize_angle(state.ball.angle - rotation);
    let winner = angle::pocket_for_local_angle(local, state.config.pocket_count);
    if winner != pocket {
        log::warn!(
            "alignment mismatch: intended pocket {pocket} but wheel shows {winner} \
             (ball angle {:.4}, local {:.4}, rotation {:.4}, predicted {:.4})",
            state.ball.angle,
            local,
            rotation,
            predicted,
        );
    }

    log::info!("ball landed on pocket {pocket}");
    state.push_event(SpinOutcome::BallLanded { pocket });

    state.lock.begin(
        state.ball.angle,
        angle::pocket_angle(pocket, state.config.pocket_count),
        state.config.blend_duration,
    );
    state.phase = SessionPhase::Idle;
    state.push_event(SpinOutcome::SpinComplete { pocket });

    if !state.is_server_controlled() {
        state.auto_countdown = Some(state.config.auto_countdown_delay);
    }
}

/// Tick the countdown, announcing whole seconds and finishing to idle
fn advance_countdown(state: &mut SpinState, dt: f32) {
    let Some(mut countdown) = state.countdown.take() else {
        return;
    };
    countdown.remaining -= dt;
    if countdown.remaining <= 0.0 {
        log::info!("countdown finished");
        state.push_event(SpinOutcome::CountdownFinished);
        state.phase = SessionPhase::Idle;
        return;
    }
    let whole = countdown.remaining.ceil() as u32;
    if whole < countdown.last_announced {
        countdown.last_announced = whole;
        state.push_event(SpinOutcome::CountdownTick { seconds_left: whole });
    }
    state.countdown = Some(countdown);
}
