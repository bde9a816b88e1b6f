//! Local keyboard adapter
//!
//! Keyboard capture is the host's job; it hands key names here. Commands are
//! gated against the control flags before an event is emitted, and the
//! transition table re-validates on its side as well.

use crate::sim::{SessionEvent, SpinState};

/// Commands a local player can issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalCommand {
    /// Spin to a specific pocket
    SpinTo(usize),
    /// Spin to a randomly chosen pocket
    RandomSpin,
    StartCountdown,
    StopCountdown,
}

/// Map a key name to a command. Digit keys spin to pockets 0-9; the demo
/// binary takes full pocket indices as arguments instead.
pub fn command_for_key(key: &str) -> Option<LocalCommand> {
    match key {
        "r" => Some(LocalCommand::RandomSpin),
        "c" => Some(LocalCommand::StartCountdown),
        "x" => Some(LocalCommand::StopCountdown),
        _ => key
            .parse::<usize>()
            .ok()
            .filter(|n| *n <= 9 && key.len() == 1)
            .map(LocalCommand::SpinTo),
    }
}

/// Convert a command into a session event, honoring the control flags.
/// Returns `None` for commands the current state does not permit.
pub fn command_event(command: LocalCommand, state: &SpinState) -> Option<SessionEvent> {
    if state.is_server_controlled() {
        log::info!("ignored local command {command:?}: server controls the table");
        return None;
    }
    match command {
        LocalCommand::SpinTo(target) => {
            if state.is_ready_to_spin() {
                Some(SessionEvent::SpinRequested { target })
            } else {
                log::info!("ignored spin command: busy");
                None
            }
        }
        LocalCommand::RandomSpin => {
            if state.is_ready_to_spin() {
                Some(SessionEvent::RandomSpinRequested)
            } else {
                log::info!("ignored random spin command: busy");
                None
            }
        }
        LocalCommand::StartCountdown => {
            if state.is_ready_to_spin() {
                Some(SessionEvent::CountdownStartRequested)
            } else {
                log::info!("ignored countdown start: busy");
                None
            }
        }
        LocalCommand::StopCountdown => Some(SessionEvent::CountdownStopRequested),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpinConfig;
    use crate::consts::SIM_DT;
    use crate::sim::tick;

    fn state() -> SpinState {
        SpinState::new(SpinConfig::default(), 640.0, 640.0, 1)
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(command_for_key("r"), Some(LocalCommand::RandomSpin));
        assert_eq!(command_for_key("c"), Some(LocalCommand::StartCountdown));
        assert_eq!(command_for_key("x"), Some(LocalCommand::StopCountdown));
        assert_eq!(command_for_key("0"), Some(LocalCommand::SpinTo(0)));
        assert_eq!(command_for_key("7"), Some(LocalCommand::SpinTo(7)));
        assert_eq!(command_for_key("12"), None);
        assert_eq!(command_for_key("q"), None);
    }

    #[test]
    fn test_commands_pass_when_idle_and_local() {
        let s = state();
        assert_eq!(
            command_event(LocalCommand::SpinTo(3), &s),
            Some(SessionEvent::SpinRequested { target: 3 })
        );
        assert_eq!(
            command_event(LocalCommand::RandomSpin, &s),
            Some(SessionEvent::RandomSpinRequested)
        );
    }

    #[test]
    fn test_commands_blocked_while_spinning() {
        let mut s = state();
        tick(&mut s, &[SessionEvent::SpinRequested { target: 1 }], SIM_DT);
        assert!(s.is_spinning());
        assert_eq!(command_event(LocalCommand::SpinTo(5), &s), None);
        assert_eq!(command_event(LocalCommand::StartCountdown, &s), None);
        // Stop is always allowed locally
        assert_eq!(
            command_event(LocalCommand::StopCountdown, &s),
            Some(SessionEvent::CountdownStopRequested)
        );
    }

    #[test]
    fn test_commands_blocked_under_server_control() {
        let mut s = state();
        tick(&mut s, &[SessionEvent::Connected], SIM_DT);
        assert_eq!(command_event(LocalCommand::SpinTo(5), &s), None);
        assert_eq!(command_event(LocalCommand::RandomSpin, &s), None);
        assert_eq!(command_event(LocalCommand::StopCountdown, &s), None);
    }
}
