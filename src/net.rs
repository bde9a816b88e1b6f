//! Network authority adapter
//!
//! The transport (a persistent duplex channel delivering JSON frames) lives
//! outside this crate; the host hands raw frames and connection lifecycle
//! changes to this adapter, which turns them into session events for the
//! transition table. Malformed frames are logged and dropped.

use serde::{Deserialize, Serialize};

use crate::sim::SessionEvent;

/// Wire messages from the game server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Round/countdown sync, sent on connect and on state changes
    #[serde(rename_all = "camelCase")]
    GameState { round_active: bool, time_left: u64 },
    /// A new betting round begins; any active spin is void
    #[serde(rename_all = "camelCase")]
    RoundStart { time_left: u64 },
    /// Server-chosen winning pocket; spin immediately
    Spin { index: usize },
}

/// Connection lifecycle reported by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionChange {
    Connected,
    Disconnected,
    Error(String),
}

/// Parse one raw frame. Malformed JSON logs at warn and yields nothing.
pub fn parse_message(raw: &str) -> Option<ServerMessage> {
    match serde_json::from_str(raw) {
        Ok(message) => Some(message),
        Err(err) => {
            log::warn!("dropping unparseable server frame: {err}");
            None
        }
    }
}

/// Session event for a parsed server message
pub fn message_event(message: ServerMessage) -> SessionEvent {
    match message {
        ServerMessage::GameState {
            round_active,
            time_left,
        } => SessionEvent::RemoteGameState {
            round_active,
            time_left_ms: time_left,
        },
        ServerMessage::RoundStart { time_left } => SessionEvent::RemoteRoundStart {
            time_left_ms: time_left,
        },
        ServerMessage::Spin { index } => SessionEvent::RemoteSpin { index },
    }
}

/// Raw frame straight to a session event
pub fn frame_event(raw: &str) -> Option<SessionEvent> {
    parse_message(raw).map(message_event)
}

/// Session event for a connection lifecycle change. Errors surface as a
/// disconnect after logging the reason; they never touch an in-flight spin.
pub fn connection_event(change: ConnectionChange) -> SessionEvent {
    match change {
        ConnectionChange::Connected => SessionEvent::Connected,
        ConnectionChange::Disconnected => SessionEvent::Disconnected,
        ConnectionChange::Error(reason) => {
            log::warn!("connection error: {reason}");
            SessionEvent::Disconnected
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_game_state() {
        let event = frame_event(r#"{"type":"gameState","roundActive":true,"timeLeft":5000}"#);
        assert_eq!(
            event,
            Some(SessionEvent::RemoteGameState {
                round_active: true,
                time_left_ms: 5000
            })
        );
    }

    #[test]
    fn test_parse_round_start() {
        let event = frame_event(r#"{"type":"roundStart","timeLeft":12500}"#);
        assert_eq!(
            event,
            Some(SessionEvent::RemoteRoundStart {
                time_left_ms: 12500
            })
        );
    }

    #[test]
    fn test_parse_spin() {
        let event = frame_event(r#"{"type":"spin","index":17}"#);
        assert_eq!(event, Some(SessionEvent::RemoteSpin { index: 17 }));
    }

    #[test]
    fn test_malformed_frames_are_dropped() {
        assert_eq!(frame_event("not json"), None);
        assert_eq!(frame_event(r#"{"type":"jackpot"}"#), None);
        assert_eq!(frame_event(r#"{"type":"spin"}"#), None);
    }

    #[test]
    fn test_connection_changes() {
        assert_eq!(
            connection_event(ConnectionChange::Connected),
            SessionEvent::Connected
        );
        assert_eq!(
            connection_event(ConnectionChange::Disconnected),
            SessionEvent::Disconnected
        );
        assert_eq!(
            connection_event(ConnectionChange::Error("socket closed".into())),
            SessionEvent::Disconnected
        );
    }
}
