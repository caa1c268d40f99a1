//! Participant type for presence tracking.
//!
//! A participant is a named session representing one connected user. There
//! is at most one participant per name at any time (UNIQUE constraint in
//! the SQLite schema). Presence is derived from `last_seen_at` recency:
//! heartbeats refresh it, and the eviction sweeper removes participants
//! whose last heartbeat is older than the staleness threshold.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered chat-room participant.
///
/// Created on join, touched by heartbeat, destroyed by the sweeper.
/// There is no explicit leave operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: Uuid,
    pub name: String,
    pub last_seen_at: DateTime<Utc>,
}

impl Participant {
    /// Build a new participant with a fresh v7 id and `last_seen_at = now`.
    pub fn new(name: String, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name,
            last_seen_at: now,
        }
    }

    /// Whether this participant's last heartbeat is older than `now - ttl`.
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        self.last_seen_at < now - ttl
    }
}
