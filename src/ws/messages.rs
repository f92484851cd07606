//! WebSocket wire protocol: inbound client events and outbound notifications.
//!
//! Both directions are JSON objects discriminated by a `type` field. The
//! enums are closed, so adding a message kind forces every dispatcher
//! `match` to handle it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ClientId, RoomId};

/// Events a client may send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ask to be matched with a partner.
    Ready {
        /// Declared interests; duplicates collapse.
        #[serde(default)]
        interests: Vec<String>,
    },
    /// WebRTC SDP offer for the peer.
    Offer {
        /// Opaque session description.
        #[serde(default)]
        sdp: serde_json::Value,
    },
    /// WebRTC SDP answer for the peer.
    Answer {
        /// Opaque session description.
        #[serde(default)]
        sdp: serde_json::Value,
    },
    /// Trickled ICE candidate for the peer.
    IceCandidate {
        /// Opaque candidate payload.
        #[serde(default)]
        candidate: serde_json::Value,
    },
    /// Chat text for the peer.
    ChatMessage {
        /// Message body.
        #[serde(default)]
        message: String,
    },
    /// Leave the current room or the waiting pool.
    Disconnect,
}

impl ClientMessage {
    /// Wire name of the message kind, for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Ready { .. } => "ready",
            Self::Offer { .. } => "offer",
            Self::Answer { .. } => "answer",
            Self::IceCandidate { .. } => "ice_candidate",
            Self::ChatMessage { .. } => "chat_message",
            Self::Disconnect => "disconnect",
        }
    }
}

/// Notifications and relayed payloads sent to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Enqueued; no partner yet.
    Waiting,
    /// Matched with a partner.
    Paired {
        /// Room shared with the partner.
        room_id: RoomId,
        /// The partner's identifier.
        peer_id: ClientId,
    },
    /// Relayed SDP offer.
    Offer {
        /// Opaque session description, unchanged.
        sdp: serde_json::Value,
        /// Sender.
        from: ClientId,
    },
    /// Relayed SDP answer.
    Answer {
        /// Opaque session description, unchanged.
        sdp: serde_json::Value,
        /// Sender.
        from: ClientId,
    },
    /// Relayed ICE candidate.
    IceCandidate {
        /// Opaque candidate payload, unchanged.
        candidate: serde_json::Value,
        /// Sender.
        from: ClientId,
    },
    /// Relayed chat text.
    ChatMessage {
        /// Message body.
        message: String,
        /// Sender.
        from: ClientId,
        /// Server receive time; matches the persisted record.
        timestamp: DateTime<Utc>,
    },
    /// The partner left or dropped.
    PeerDisconnected,
    /// Acknowledges an explicit `disconnect`.
    Disconnected,
}

impl ServerMessage {
    /// Wire name of the message kind, for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Paired { .. } => "paired",
            Self::Offer { .. } => "offer",
            Self::Answer { .. } => "answer",
            Self::IceCandidate { .. } => "ice_candidate",
            Self::ChatMessage { .. } => "chat_message",
            Self::PeerDisconnected => "peer_disconnected",
            Self::Disconnected => "disconnected",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(text: &str) -> ClientMessage {
        let Ok(msg) = serde_json::from_str::<ClientMessage>(text) else {
            panic!("failed to parse {text}");
        };
        msg
    }

    #[test]
    fn ready_defaults_to_no_interests() {
        assert_eq!(parse(r#"{"type":"ready"}"#), ClientMessage::Ready { interests: vec![] });
    }

    #[test]
    fn offer_keeps_sdp_opaque() {
        let msg = parse(r#"{"type":"offer","sdp":{"type":"offer","sdp":"v=0"}}"#);
        assert_eq!(
            msg,
            ClientMessage::Offer {
                sdp: json!({"type": "offer", "sdp": "v=0"})
            }
        );
    }

    #[test]
    fn missing_candidate_is_null() {
        assert_eq!(
            parse(r#"{"type":"ice_candidate"}"#),
            ClientMessage::IceCandidate {
                candidate: serde_json::Value::Null
            }
        );
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"type":"teleport"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>("not json").is_err());
    }

    #[test]
    fn disconnect_has_no_fields() {
        assert_eq!(parse(r#"{"type":"disconnect"}"#), ClientMessage::Disconnect);
    }

    #[test]
    fn paired_wire_shape() {
        let room_id = RoomId::new();
        let msg = ServerMessage::Paired {
            room_id,
            peer_id: ClientId::from("bob"),
        };
        let value = serde_json::to_value(&msg).unwrap_or_default();
        assert_eq!(
            value,
            json!({"type": "paired", "room_id": room_id.to_string(), "peer_id": "bob"})
        );
    }

    #[test]
    fn unit_notifications_carry_only_type() {
        let value = serde_json::to_value(ServerMessage::PeerDisconnected).unwrap_or_default();
        assert_eq!(value, json!({"type": "peer_disconnected"}));
        assert_eq!(ServerMessage::Disconnected.kind(), "disconnected");
    }

    #[test]
    fn relayed_offer_adds_sender() {
        let msg = ServerMessage::Offer {
            sdp: json!("X"),
            from: ClientId::from("c1"),
        };
        let value = serde_json::to_value(&msg).unwrap_or_default();
        assert_eq!(value, json!({"type": "offer", "sdp": "X", "from": "c1"}));
    }
}
