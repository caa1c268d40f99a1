//! Message store orchestrating creation, listing, editing, and deletion.

use chrono::Utc;
use plaza_types::error::ChatError;
use plaza_types::message::{Message, MessageDraft, MessageKind, MessagePatch, BROADCAST};
use uuid::Uuid;

use crate::auth::is_owner;
use crate::message::repository::MessageRepository;
use crate::presence::repository::ParticipantRepository;
use crate::sanitize::strip_markup;

/// Create / list / update / delete for chat messages, with the visibility
/// filter applied on reads and the ownership check on mutations.
///
/// Generic over `MessageRepository` and `ParticipantRepository` to maintain
/// clean architecture (plaza-core never depends on plaza-infra). The
/// participant repository backs the sender-registration rule for non-status
/// messages.
pub struct MessageStore<M: MessageRepository, P: ParticipantRepository> {
    messages: M,
    participants: P,
}

impl<M: MessageRepository, P: ParticipantRepository> MessageStore<M, P> {
    /// Create a new message store with the given repositories.
    pub fn new(messages: M, participants: P) -> Self {
        Self {
            messages,
            participants,
        }
    }

    /// Create a message. The store assigns `id` and `sent_at`.
    ///
    /// Rules:
    /// - `to` and `text` (after markup stripping) must be non-empty.
    /// - A status message must be addressed to `"Todos"`.
    /// - A non-status message requires `from` to be a registered participant
    ///   at creation time; the rule is not re-checked when the participant
    ///   later expires.
    pub async fn create(&self, draft: MessageDraft) -> Result<Message, ChatError> {
        let to = draft.to.trim().to_string();
        let text = strip_markup(&draft.text);

        if to.is_empty() {
            return Err(ChatError::Validation("'to' must not be empty".to_string()));
        }
        if text.is_empty() {
            return Err(ChatError::Validation("'text' must not be empty".to_string()));
        }
        if draft.kind == MessageKind::Status && to != BROADCAST {
            return Err(ChatError::Validation(
                "status messages must be addressed to 'Todos'".to_string(),
            ));
        }
        if draft.kind != MessageKind::Status {
            self.participants
                .find_by_name(&draft.from)
                .await
                .map_err(ChatError::from)?
                .ok_or_else(|| {
                    ChatError::NotFound(format!("sender '{}' is not in the room", draft.from))
                })?;
        }

        let message = Message {
            id: Uuid::now_v7(),
            from: draft.from,
            to,
            text,
            kind: draft.kind,
            sent_at: Utc::now(),
        };
        self.messages.insert(&message).await?;
        Ok(message)
    }

    /// Create a status message addressed to the room on behalf of `from`.
    ///
    /// This is the only path that produces status messages; client requests
    /// are rejected before reaching it. No sender-registration check: the
    /// departure notice is written after its participant is already gone.
    pub async fn announce(&self, from: &str, text: &str) -> Result<Message, ChatError> {
        self.create(MessageDraft {
            from: from.to_string(),
            to: BROADCAST.to_string(),
            text: text.to_string(),
            kind: MessageKind::Status,
        })
        .await
    }

    /// Messages visible to `user` in chronological order.
    ///
    /// A positive `limit` returns only the most recent `limit` messages of
    /// the visible set; absent or non-positive returns the full set.
    pub async fn list_visible_to(
        &self,
        user: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, ChatError> {
        let limit = limit.filter(|n| *n > 0);
        Ok(self.messages.list_visible_to(user, limit).await?)
    }

    /// Replace `to`, `text`, and `kind` of an existing message and refresh
    /// `sent_at`. Only the author may edit, and an edit can never turn a
    /// message into a status notice.
    pub async fn update(
        &self,
        id: &Uuid,
        requester: &str,
        patch: MessagePatch,
    ) -> Result<Message, ChatError> {
        if patch.kind == MessageKind::Status {
            return Err(ChatError::Validation(
                "'kind' must be broadcast-message or private-message".to_string(),
            ));
        }
        let to = patch.to.trim().to_string();
        let text = strip_markup(&patch.text);
        if to.is_empty() {
            return Err(ChatError::Validation("'to' must not be empty".to_string()));
        }
        if text.is_empty() {
            return Err(ChatError::Validation("'text' must not be empty".to_string()));
        }

        self.participants
            .find_by_name(requester)
            .await
            .map_err(ChatError::from)?
            .ok_or_else(|| {
                ChatError::NotFound(format!("participant '{requester}' is not in the room"))
            })?;

        let existing = self
            .messages
            .find_by_id(id)
            .await
            .map_err(ChatError::from)?
            .ok_or_else(|| ChatError::NotFound(format!("message '{id}' not found")))?;

        if !is_owner(&existing, requester) {
            return Err(ChatError::Unauthorized(format!(
                "'{requester}' is not the author of message '{id}'"
            )));
        }

        let updated = Message {
            id: existing.id,
            from: existing.from,
            to,
            text,
            kind: patch.kind,
            sent_at: Utc::now(),
        };
        self.messages.update(&updated).await.map_err(|e| match e {
            plaza_types::error::RepositoryError::NotFound => {
                ChatError::NotFound(format!("message '{id}' not found"))
            }
            other => other.into(),
        })?;
        Ok(updated)
    }

    /// Permanently remove a message. Only the author may delete.
    pub async fn delete(&self, id: &Uuid, requester: &str) -> Result<(), ChatError> {
        let existing = self
            .messages
            .find_by_id(id)
            .await
            .map_err(ChatError::from)?
            .ok_or_else(|| ChatError::NotFound(format!("message '{id}' not found")))?;

        if !is_owner(&existing, requester) {
            return Err(ChatError::Unauthorized(format!(
                "'{requester}' is not the author of message '{id}'"
            )));
        }

        self.messages.delete(id).await.map_err(|e| match e {
            plaza_types::error::RepositoryError::NotFound => {
                ChatError::NotFound(format!("message '{id}' not found"))
            }
            other => other.into(),
        })
    }
}
