//! SQLite message repository implementation.
//!
//! Implements `MessageRepository` from `plaza-core`. Follows the same
//! patterns as `SqliteParticipantRepository`: raw queries, a private Row
//! struct, split reader/writer pool usage. The visibility filter runs in
//! SQL so a polling client never pulls the whole table.

use plaza_core::message::repository::MessageRepository;
use plaza_types::error::RepositoryError;
use plaza_types::message::{Message, MessageKind, BROADCAST};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `MessageRepository`.
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Internal row type for mapping SQLite rows to domain Message.
struct MessageRow {
    id: String,
    sender: String,
    recipient: String,
    text: String,
    kind: String,
    sent_at: String,
}

impl MessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            sender: row.try_get("sender")?,
            recipient: row.try_get("recipient")?,
            text: row.try_get("text")?,
            kind: row.try_get("kind")?,
            sent_at: row.try_get("sent_at")?,
        })
    }

    fn into_message(self) -> Result<Message, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let kind: MessageKind = self
            .kind
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let sent_at = parse_datetime(&self.sent_at)?;

        Ok(Message {
            id,
            from: self.sender,
            to: self.recipient,
            text: self.text,
            kind,
            sent_at,
        })
    }
}

const VISIBLE_WHERE: &str =
    "sender = ?1 OR recipient = ?1 OR recipient = ?2 OR kind = 'broadcast-message'";

impl MessageRepository for SqliteMessageRepository {
    async fn insert(&self, message: &Message) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO messages (id, sender, recipient, text, kind, sent_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(message.id.to_string())
        .bind(&message.from)
        .bind(&message.to)
        .bind(&message.text)
        .bind(message.kind.to_string())
        .bind(format_datetime(&message.sent_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Message>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM messages WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let message_row = MessageRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(message_row.into_message()?))
            }
            None => Ok(None),
        }
    }

    async fn list_visible_to(
        &self,
        user: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, RepositoryError> {
        // With a limit, take the most recent rows first and flip them back
        // into chronological order; v7 ids break ties within one timestamp.
        let sql = match limit {
            Some(_) => format!(
                "SELECT * FROM (
                     SELECT * FROM messages WHERE {VISIBLE_WHERE}
                     ORDER BY sent_at DESC, id DESC LIMIT ?3
                 ) ORDER BY sent_at ASC, id ASC"
            ),
            None => format!(
                "SELECT * FROM messages WHERE {VISIBLE_WHERE} ORDER BY sent_at ASC, id ASC"
            ),
        };

        let mut query = sqlx::query(&sql).bind(user).bind(BROADCAST);
        if let Some(limit) = limit {
            query = query.bind(limit);
        }

        let rows = query
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let message_row =
                MessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(message_row.into_message()?);
        }

        Ok(messages)
    }

    async fn update(&self, message: &Message) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE messages SET recipient = ?, text = ?, kind = ?, sent_at = ? WHERE id = ?",
        )
        .bind(&message.to)
        .bind(&message.text)
        .bind(message.kind.to_string())
        .bind(format_datetime(&message.sent_at))
        .bind(message.id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    async fn repo() -> (SqliteMessageRepository, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        let pool = DatabasePool::new(&url).await.unwrap();
        (SqliteMessageRepository::new(pool), dir)
    }

    fn msg(from: &str, to: &str, text: &str, kind: MessageKind) -> Message {
        Message {
            id: Uuid::now_v7(),
            from: from.to_string(),
            to: to.to_string(),
            text: text.to_string(),
            kind,
            sent_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_roundtrip() {
        let (repo, _dir) = repo().await;
        let m = msg("Bob", BROADCAST, "hi", MessageKind::Broadcast);
        repo.insert(&m).await.unwrap();

        let found = repo.find_by_id(&m.id).await.unwrap().unwrap();
        assert_eq!(found.from, "Bob");
        assert_eq!(found.kind, MessageKind::Broadcast);

        assert!(repo.find_by_id(&Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_visibility_filter_in_sql() {
        let (repo, _dir) = repo().await;
        repo.insert(&msg("Bob", "Carol", "secret", MessageKind::Private))
            .await
            .unwrap();
        repo.insert(&msg("Bob", BROADCAST, "for all", MessageKind::Broadcast))
            .await
            .unwrap();
        repo.insert(&msg("Carol", "Dan", "other", MessageKind::Private))
            .await
            .unwrap();

        let dan_sees = repo.list_visible_to("Dan", None).await.unwrap();
        let texts: Vec<&str> = dan_sees.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["for all", "other"]);

        let carol_sees = repo.list_visible_to("Carol", None).await.unwrap();
        assert!(carol_sees.iter().any(|m| m.text == "secret"));
    }

    #[tokio::test]
    async fn test_limit_most_recent_chronological() {
        let (repo, _dir) = repo().await;
        for text in ["one", "two", "three", "four"] {
            repo.insert(&msg("Bob", BROADCAST, text, MessageKind::Broadcast))
                .await
                .unwrap();
        }

        let last_two = repo.list_visible_to("Bob", Some(2)).await.unwrap();
        let texts: Vec<&str> = last_two.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["three", "four"]);
    }

    #[tokio::test]
    async fn test_update_replaces_mutable_fields() {
        let (repo, _dir) = repo().await;
        let m = msg("Bob", BROADCAST, "hi", MessageKind::Broadcast);
        repo.insert(&m).await.unwrap();

        let mut edited = m.clone();
        edited.to = "Carol".to_string();
        edited.text = "edited".to_string();
        edited.kind = MessageKind::Private;
        edited.sent_at = Utc::now();
        repo.update(&edited).await.unwrap();

        let found = repo.find_by_id(&m.id).await.unwrap().unwrap();
        assert_eq!(found.to, "Carol");
        assert_eq!(found.text, "edited");
        assert_eq!(found.kind, MessageKind::Private);
        // The author column never changes.
        assert_eq!(found.from, "Bob");
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_row() {
        let (repo, _dir) = repo().await;
        let ghost = msg("Bob", BROADCAST, "hi", MessageKind::Broadcast);

        let err = repo.update(&ghost).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));

        let err = repo.delete(&ghost.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let (repo, _dir) = repo().await;
        let m = msg("Bob", BROADCAST, "hi", MessageKind::Broadcast);
        repo.insert(&m).await.unwrap();

        repo.delete(&m.id).await.unwrap();
        assert!(repo.find_by_id(&m.id).await.unwrap().is_none());
    }
}
