use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::presence::{
    PresenceDecodeError, PresenceMessage, UserStatus, decode_presence_frame,
    decode_presence_message,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelState {
    #[default]
    Absent,
    Open,
}

/// Transport-level event delivered by a connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Message(String),
    Binary(Vec<u8>),
    TransportError(String),
    Closed { code: Option<u16>, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelFailureKind {
    MessageParse,
    Transport,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChannelError {
    #[error("presence url is invalid: {0}")]
    Url(#[from] ConfigError),
    #[error("failed to open presence socket: {0}")]
    Connect(String),
    #[error("presence message rejected: {0}")]
    Decode(#[from] PresenceDecodeError),
    #[error("presence transport failed: {0}")]
    Transport(String),
}

impl ChannelError {
    pub fn failure_kind(&self) -> ChannelFailureKind {
        match self {
            Self::Decode(_) => ChannelFailureKind::MessageParse,
            Self::Url(_) | Self::Connect(_) | Self::Transport(_) => ChannelFailureKind::Transport,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelOutcome {
    Snapshot(Vec<UserStatus>),
    Ignored,
    Failed(ChannelError),
    Closed,
}

#[derive(Debug, Clone, Default)]
pub struct PresenceChannel {
    state: ChannelState,
    connections_opened: u32,
}

impl PresenceChannel {
    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == ChannelState::Open
    }

    pub fn connections_opened(&self) -> u32 {
        self.connections_opened
    }

    /// Called once the connector has started the handshake. A socket that is
    /// still connecting counts as open, so loads during the handshake reuse it.
    pub fn mark_open(&mut self) {
        self.state = ChannelState::Open;
        self.connections_opened = self.connections_opened.saturating_add(1);
    }

    pub fn mark_absent(&mut self) {
        self.state = ChannelState::Absent;
    }

    /// Transport errors leave the state alone; only a close returns to absent.
    pub fn handle(&mut self, event: ChannelEvent) -> ChannelOutcome {
        match event {
            ChannelEvent::Message(raw) => message_outcome(decode_presence_message(&raw)),
            ChannelEvent::Binary(bytes) => message_outcome(decode_presence_frame(&bytes)),
            ChannelEvent::TransportError(message) => {
                ChannelOutcome::Failed(ChannelError::Transport(message))
            }
            ChannelEvent::Closed { .. } => {
                self.mark_absent();
                ChannelOutcome::Closed
            }
        }
    }
}

fn message_outcome(decoded: Result<PresenceMessage, PresenceDecodeError>) -> ChannelOutcome {
    match decoded {
        Ok(PresenceMessage::Snapshot(statuses)) => ChannelOutcome::Snapshot(statuses),
        Ok(PresenceMessage::Unrecognized) => ChannelOutcome::Ignored,
        Err(error) => ChannelOutcome::Failed(error.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_channel() -> PresenceChannel {
        let mut channel = PresenceChannel::default();
        channel.mark_open();
        channel
    }

    #[test]
    fn starts_absent() {
        let channel = PresenceChannel::default();
        assert_eq!(channel.state(), ChannelState::Absent);
        assert_eq!(channel.connections_opened(), 0);
    }

    #[test]
    fn snapshot_message_yields_statuses() {
        let mut channel = open_channel();
        let outcome = channel.handle(ChannelEvent::Message(
            r#"{"userStatuses":[{"userId":5,"isOnline":true}]}"#.to_string(),
        ));
        assert_eq!(
            outcome,
            ChannelOutcome::Snapshot(vec![UserStatus {
                user_id: 5,
                is_online: true
            }])
        );
        assert!(channel.is_open());
    }

    #[test]
    fn malformed_message_fails_as_parse_error_and_keeps_channel_open() {
        let mut channel = open_channel();
        let outcome = channel.handle(ChannelEvent::Message("not json".to_string()));
        let ChannelOutcome::Failed(error) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert_eq!(error.failure_kind(), ChannelFailureKind::MessageParse);
        assert!(channel.is_open());
    }

    #[test]
    fn binary_frame_that_is_not_utf8_fails_as_parse_error() {
        let mut channel = open_channel();
        let outcome = channel.handle(ChannelEvent::Binary(vec![b'{', 0xff, 0xfe, b'}']));
        let ChannelOutcome::Failed(error) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert_eq!(error.failure_kind(), ChannelFailureKind::MessageParse);
        assert!(matches!(
            error,
            ChannelError::Decode(PresenceDecodeError::InvalidEncoding(_))
        ));
        assert!(channel.is_open());
    }

    #[test]
    fn connecting_socket_counts_as_open_until_closed() {
        let mut channel = PresenceChannel::default();
        channel.mark_open();
        assert_eq!(channel.state(), ChannelState::Open);
        assert_eq!(channel.connections_opened(), 1);

        channel.handle(ChannelEvent::Closed {
            code: None,
            reason: "handshake failed".to_string(),
        });
        assert_eq!(channel.state(), ChannelState::Absent);
    }

    #[test]
    fn transport_error_does_not_change_state() {
        let mut channel = open_channel();
        let outcome = channel.handle(ChannelEvent::TransportError("reset".to_string()));
        let ChannelOutcome::Failed(error) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert_eq!(error.failure_kind(), ChannelFailureKind::Transport);
        assert!(channel.is_open());
    }

    #[test]
    fn close_returns_to_absent() {
        let mut channel = open_channel();
        let outcome = channel.handle(ChannelEvent::Closed {
            code: Some(1006),
            reason: String::new(),
        });
        assert_eq!(outcome, ChannelOutcome::Closed);
        assert_eq!(channel.state(), ChannelState::Absent);
        assert_eq!(channel.connections_opened(), 1);
    }

    #[test]
    fn unrecognized_message_is_ignored() {
        let mut channel = open_channel();
        let outcome = channel.handle(ChannelEvent::Message(r#"{"hello":"world"}"#.to_string()));
        assert_eq!(outcome, ChannelOutcome::Ignored);
    }
}
