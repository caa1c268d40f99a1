//! MessageRepository trait definition.
//!
//! Implementations live in plaza-infra (e.g., `SqliteMessageRepository`).
//! Follows the same RPITIT pattern as `ParticipantRepository`.

use plaza_types::error::RepositoryError;
use plaza_types::message::Message;
use uuid::Uuid;

/// Repository trait for message persistence.
pub trait MessageRepository: Send + Sync {
    /// Insert a new message.
    fn insert(
        &self,
        message: &Message,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Look up a message by id.
    fn find_by_id(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Message>, RepositoryError>> + Send;

    /// Messages visible to `user`, in chronological order.
    ///
    /// Visible means: authored by `user`, addressed to `user`, addressed to
    /// the room (`"Todos"`), or of broadcast kind. When `limit` is given it
    /// selects the most recent `limit` messages of the visible set, still
    /// returned oldest first.
    fn list_visible_to(
        &self,
        user: &str,
        limit: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// Replace an existing message's mutable fields (`to`, `text`, `kind`,
    /// `sent_at`) by id.
    ///
    /// Fails with `RepositoryError::NotFound` if no row was updated.
    fn update(
        &self,
        message: &Message,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a message by id.
    ///
    /// Fails with `RepositoryError::NotFound` if no row was removed.
    fn delete(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
