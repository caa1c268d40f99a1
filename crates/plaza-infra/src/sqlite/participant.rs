//! SQLite participant repository implementation.
//!
//! Implements `ParticipantRepository` from `plaza-core` using sqlx with the
//! split read/write pools: raw queries, a private Row struct, reads on the
//! reader pool and mutations on the writer.

use chrono::{DateTime, Utc};
use plaza_core::presence::repository::ParticipantRepository;
use plaza_types::error::RepositoryError;
use plaza_types::participant::Participant;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `ParticipantRepository`.
pub struct SqliteParticipantRepository {
    pool: DatabasePool,
}

impl SqliteParticipantRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Participant.
struct ParticipantRow {
    id: String,
    name: String,
    last_seen_at: String,
}

impl ParticipantRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            last_seen_at: row.try_get("last_seen_at")?,
        })
    }

    fn into_participant(self) -> Result<Participant, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid participant id: {e}")))?;
        let last_seen_at = parse_datetime(&self.last_seen_at)?;

        Ok(Participant {
            id,
            name: self.name,
            last_seen_at,
        })
    }
}

fn rows_to_participants(
    rows: &[sqlx::sqlite::SqliteRow],
) -> Result<Vec<Participant>, RepositoryError> {
    let mut participants = Vec::with_capacity(rows.len());
    for row in rows {
        let participant_row =
            ParticipantRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
        participants.push(participant_row.into_participant()?);
    }
    Ok(participants)
}

impl ParticipantRepository for SqliteParticipantRepository {
    async fn insert(&self, participant: &Participant) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO participants (id, name, last_seen_at) VALUES (?, ?, ?)",
        )
        .bind(participant.id.to_string())
        .bind(&participant.name)
        .bind(format_datetime(&participant.last_seen_at))
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => {
                Err(RepositoryError::Conflict(format!(
                    "name '{}' already exists",
                    participant.name
                )))
            }
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Participant>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM participants WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let participant_row = ParticipantRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(participant_row.into_participant()?))
            }
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<Participant>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM participants ORDER BY id ASC")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows_to_participants(&rows)
    }

    async fn touch(&self, name: &str, now: DateTime<Utc>) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE participants SET last_seen_at = ? WHERE name = ?")
            .bind(format_datetime(&now))
            .bind(name)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn find_stale(&self, cutoff: DateTime<Utc>) -> Result<Vec<Participant>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM participants WHERE last_seen_at < ?")
            .bind(format_datetime(&cutoff))
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows_to_participants(&rows)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM participants WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
