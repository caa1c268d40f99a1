//! In-memory repository fakes shared by the service tests.
//!
//! Cheap `Arc<Mutex<..>>` clones stand in for the cloned pool handles the
//! real wiring uses, so several services can share one backing store.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use plaza_types::error::RepositoryError;
use plaza_types::message::Message;
use plaza_types::participant::Participant;
use uuid::Uuid;

use crate::message::repository::MessageRepository;
use crate::presence::repository::ParticipantRepository;

#[derive(Clone)]
pub(crate) struct MemoryParticipants {
    rows: Arc<Mutex<Vec<Participant>>>,
}

impl MemoryParticipants {
    pub(crate) fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shift a participant's `last_seen_at` into the past.
    pub(crate) fn backdate(&self, name: &str, by: Duration) {
        let mut rows = self.rows.lock().unwrap();
        if let Some(p) = rows.iter_mut().find(|p| p.name == name) {
            p.last_seen_at -= by;
        }
    }
}

impl ParticipantRepository for MemoryParticipants {
    async fn insert(&self, participant: &Participant) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|p| p.name == participant.name) {
            return Err(RepositoryError::Conflict(format!(
                "name '{}' already exists",
                participant.name
            )));
        }
        rows.push(participant.clone());
        Ok(())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Participant>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.name == name)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Participant>, RepositoryError> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn touch(&self, name: &str, now: DateTime<Utc>) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|p| p.name == name) {
            Some(p) => {
                p.last_seen_at = now;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn find_stale(&self, cutoff: DateTime<Utc>) -> Result<Vec<Participant>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.last_seen_at < cutoff)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| p.id != *id);
        Ok(rows.len() < before)
    }
}

#[derive(Clone)]
pub(crate) struct MemoryMessages {
    rows: Arc<Mutex<Vec<Message>>>,
    failing_inserts: Arc<AtomicU32>,
}

impl MemoryMessages {
    pub(crate) fn new() -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
            failing_inserts: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Make the next `n` inserts fail with a query error.
    pub(crate) fn fail_next_inserts(&self, n: u32) {
        self.failing_inserts.store(n, Ordering::SeqCst);
    }

    /// Every stored message in insertion order.
    pub(crate) fn all(&self) -> Vec<Message> {
        self.rows.lock().unwrap().clone()
    }
}

impl MessageRepository for MemoryMessages {
    async fn insert(&self, message: &Message) -> Result<(), RepositoryError> {
        if self.failing_inserts.load(Ordering::SeqCst) > 0 {
            self.failing_inserts.fetch_sub(1, Ordering::SeqCst);
            return Err(RepositoryError::Query("insert refused".to_string()));
        }
        self.rows.lock().unwrap().push(message.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Message>, RepositoryError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == *id)
            .cloned())
    }

    async fn list_visible_to(
        &self,
        user: &str,
        limit: Option<i64>,
    ) -> Result<Vec<Message>, RepositoryError> {
        let mut visible: Vec<Message> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.is_visible_to(user))
            .cloned()
            .collect();
        visible.sort_by(|a, b| (a.sent_at, a.id).cmp(&(b.sent_at, b.id)));
        if let Some(limit) = limit {
            let skip = visible.len().saturating_sub(limit as usize);
            visible.drain(..skip);
        }
        Ok(visible)
    }

    async fn update(&self, message: &Message) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|m| m.id == message.id) {
            Some(existing) => {
                *existing = message.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    async fn delete(&self, id: &Uuid) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|m| m.id != *id);
        if rows.len() == before {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
