//! Presence registry driving the participant lifecycle.

use chrono::{DateTime, Duration, Utc};
use plaza_types::error::{ChatError, RepositoryError};
use plaza_types::message::JOIN_NOTICE;
use plaza_types::participant::Participant;
use tracing::{error, info, warn};

use crate::message::repository::MessageRepository;
use crate::message::store::MessageStore;
use crate::presence::repository::ParticipantRepository;
use crate::sanitize::strip_markup;

/// Join / list / heartbeat / evict for participants.
///
/// Generic over the repository traits; the message store is held so join
/// and eviction flows can emit their status notices through the same path
/// client messages take.
pub struct PresenceRegistry<P: ParticipantRepository, M: MessageRepository> {
    participants: P,
    messages: MessageStore<M, P>,
}

impl<P: ParticipantRepository, M: MessageRepository> PresenceRegistry<P, M> {
    /// Create a new registry with the given repository and message store.
    pub fn new(participants: P, messages: MessageStore<M, P>) -> Self {
        Self {
            participants,
            messages,
        }
    }

    /// Register a participant under a unique name and announce the join.
    ///
    /// The name is stripped of markup and trimmed first; empty names are
    /// rejected. A duplicate name fails with `Conflict`, mapped from the
    /// store's unique constraint. If the participant insert succeeds but
    /// the join announcement fails, the announcement is retried once; a
    /// second failure surfaces as `Internal` so the caller can detect the
    /// partial write.
    pub async fn join(&self, name: &str) -> Result<Participant, ChatError> {
        let name = strip_markup(name);
        if name.is_empty() {
            return Err(ChatError::Validation(
                "'name' must not be empty".to_string(),
            ));
        }

        let participant = Participant::new(name.clone(), Utc::now());
        self.participants
            .insert(&participant)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    ChatError::Conflict(format!("name '{name}' is already taken"))
                }
                other => other.into(),
            })?;
        info!(participant = %name, "participant joined");

        if let Err(first) = self.messages.announce(&name, JOIN_NOTICE).await {
            warn!(participant = %name, error = %first, "join announcement failed, retrying");
            if let Err(second) = self.messages.announce(&name, JOIN_NOTICE).await {
                error!(participant = %name, error = %second, "join announcement lost");
                return Err(ChatError::Internal(format!(
                    "participant '{name}' joined but the announcement could not be written"
                )));
            }
        }

        Ok(participant)
    }

    /// All participants in store order. The order is for display only and
    /// is not guaranteed stable across calls.
    pub async fn list(&self) -> Result<Vec<Participant>, ChatError> {
        Ok(self.participants.list().await?)
    }

    /// Refresh `last_seen_at` for the named participant.
    pub async fn heartbeat(&self, name: &str) -> Result<(), ChatError> {
        self.participants
            .touch(name, Utc::now())
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => {
                    ChatError::NotFound(format!("participant '{name}' is not in the room"))
                }
                other => other.into(),
            })
    }

    /// Delete every participant whose `last_seen_at` is older than
    /// `now - ttl` and return exactly those actually deleted.
    ///
    /// A participant refreshed by a racing heartbeat between selection and
    /// deletion may still be evicted; one already removed by the time the
    /// delete runs is not reported. Eviction is a best-effort liveness
    /// check, not a safety property.
    pub async fn evict_expired(
        &self,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Vec<Participant>, ChatError> {
        let stale = self.participants.find_stale(now - ttl).await?;

        let mut evicted = Vec::with_capacity(stale.len());
        for participant in stale {
            if self.participants.delete(&participant.id).await? {
                evicted.push(participant);
            }
        }
        Ok(evicted)
    }
}
