//! Message types for the chat room.
//!
//! Messages are either user-authored (broadcast or private) or
//! system-generated status notices announcing a join or departure.
//! The reserved recipient `"Todos"` addresses the whole room.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Reserved recipient name addressing every participant in the room.
pub const BROADCAST: &str = "Todos";

/// Status message text announcing a join.
pub const JOIN_NOTICE: &str = "entra na sala...";

/// Status message text announcing a departure.
pub const DEPARTURE_NOTICE: &str = "sai da sala...";

/// Kind of a chat message.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (kind IN ('broadcast-message', 'private-message', 'status'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    #[serde(rename = "broadcast-message")]
    Broadcast,
    #[serde(rename = "private-message")]
    Private,
    #[serde(rename = "status")]
    Status,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Broadcast => write!(f, "broadcast-message"),
            MessageKind::Private => write!(f, "private-message"),
            MessageKind::Status => write!(f, "status"),
        }
    }
}

impl FromStr for MessageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "broadcast-message" => Ok(MessageKind::Broadcast),
            "private-message" => Ok(MessageKind::Private),
            "status" => Ok(MessageKind::Status),
            other => Err(format!("invalid message kind: '{other}'")),
        }
    }
}

/// A chat message as stored and served.
///
/// `id` and `sent_at` are assigned by the store at creation; `sent_at` is
/// refreshed on edit. `from` is set at creation and never changes -- it is
/// the identity the authorization check runs against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Uuid,
    pub from: String,
    pub to: String,
    pub text: String,
    pub kind: MessageKind,
    pub sent_at: DateTime<Utc>,
}

impl Message {
    /// Whether `user` may see this message: author, addressee, room-wide
    /// recipient, or broadcast kind.
    pub fn is_visible_to(&self, user: &str) -> bool {
        self.from == user
            || self.to == user
            || self.to == BROADCAST
            || self.kind == MessageKind::Broadcast
    }
}

/// Caller-supplied fields for a new message. The store assigns the rest.
#[derive(Debug, Clone)]
pub struct MessageDraft {
    pub from: String,
    pub to: String,
    pub text: String,
    pub kind: MessageKind,
}

/// Caller-supplied fields for an edit. `from` and `id` are immutable.
#[derive(Debug, Clone)]
pub struct MessagePatch {
    pub to: String,
    pub text: String,
    pub kind: MessageKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_roundtrip() {
        for kind in [
            MessageKind::Broadcast,
            MessageKind::Private,
            MessageKind::Status,
        ] {
            let s = kind.to_string();
            let parsed: MessageKind = s.parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&MessageKind::Private).unwrap();
        assert_eq!(json, "\"private-message\"");
        let parsed: MessageKind = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MessageKind::Private);
    }

    #[test]
    fn test_kind_rejects_unknown() {
        assert!("shout".parse::<MessageKind>().is_err());
        assert!(serde_json::from_str::<MessageKind>("\"shout\"").is_err());
    }

    #[test]
    fn test_visibility_rule() {
        let msg = Message {
            id: Uuid::now_v7(),
            from: "Bob".to_string(),
            to: "Carol".to_string(),
            text: "secret".to_string(),
            kind: MessageKind::Private,
            sent_at: Utc::now(),
        };
        assert!(msg.is_visible_to("Bob"));
        assert!(msg.is_visible_to("Carol"));
        assert!(!msg.is_visible_to("Dan"));
    }

    #[test]
    fn test_broadcast_kind_visible_to_anyone() {
        let msg = Message {
            id: Uuid::now_v7(),
            from: "Bob".to_string(),
            to: "Carol".to_string(),
            text: "hi".to_string(),
            kind: MessageKind::Broadcast,
            sent_at: Utc::now(),
        };
        assert!(msg.is_visible_to("Dan"));
    }

    #[test]
    fn test_message_serializes_camel_case() {
        let msg = Message {
            id: Uuid::now_v7(),
            from: "Ana".to_string(),
            to: BROADCAST.to_string(),
            text: "entra na sala...".to_string(),
            kind: MessageKind::Status,
            sent_at: Utc::now(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"sentAt\""));
        assert!(json.contains("\"kind\":\"status\""));
        assert!(json.contains("\"to\":\"Todos\""));
    }
}
