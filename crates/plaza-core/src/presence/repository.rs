//! ParticipantRepository trait definition.
//!
//! Implementations live in plaza-infra (e.g., `SqliteParticipantRepository`).
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use chrono::{DateTime, Utc};
use plaza_types::error::RepositoryError;
use plaza_types::participant::Participant;
use uuid::Uuid;

/// Repository trait for participant persistence.
pub trait ParticipantRepository: Send + Sync {
    /// Insert a new participant.
    ///
    /// Name uniqueness is a store-level constraint; a duplicate name fails
    /// with `RepositoryError::Conflict` rather than a prior existence check,
    /// keeping the check-then-insert race window inside the store.
    fn insert(
        &self,
        participant: &Participant,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Look up a participant by name.
    fn find_by_name(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Option<Participant>, RepositoryError>> + Send;

    /// List all participants in store order.
    fn list(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Participant>, RepositoryError>> + Send;

    /// Set `last_seen_at` for the named participant.
    ///
    /// Fails with `RepositoryError::NotFound` if no row was updated.
    fn touch(
        &self,
        name: &str,
        now: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Participants whose `last_seen_at` is strictly before `cutoff`.
    fn find_stale(
        &self,
        cutoff: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<Vec<Participant>, RepositoryError>> + Send;

    /// Delete a participant by id. Returns whether a row was removed.
    fn delete(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;
}
