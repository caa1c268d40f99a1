//! Background eviction sweeper.
//!
//! Periodically evicts participants whose last heartbeat is older than the
//! staleness threshold and announces each departure to the room. The whole
//! loop runs on one spawned task: a sweep finishes before the next tick is
//! honored, so sweeps never overlap, and a missed tick is skipped rather
//! than replayed.

use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use plaza_types::message::DEPARTURE_NOTICE;

use crate::message::repository::MessageRepository;
use crate::message::store::MessageStore;
use crate::presence::registry::PresenceRegistry;
use crate::presence::repository::ParticipantRepository;

/// Timing knobs for the sweeper. Interval and TTL are independent; the TTL
/// is normally smaller than or comparable to the interval.
#[derive(Debug, Clone, Copy)]
pub struct SweepConfig {
    /// Time between sweeps.
    pub interval: Duration,
    /// Heartbeat silence after which a participant is considered stale.
    pub ttl: chrono::Duration,
}

impl SweepConfig {
    pub fn from_secs(interval_secs: u64, ttl_secs: u64) -> Self {
        Self {
            interval: Duration::from_secs(interval_secs),
            ttl: chrono::Duration::seconds(ttl_secs as i64),
        }
    }
}

/// Periodic evict-and-announce task.
///
/// Owns its own registry and store instances (cloned repository handles),
/// independent of the ones serving requests. Failures are logged and end
/// the current cycle only; the task itself runs until its cancellation
/// token fires.
pub struct EvictionSweeper<P: ParticipantRepository, M: MessageRepository> {
    registry: PresenceRegistry<P, M>,
    messages: MessageStore<M, P>,
    config: SweepConfig,
}

impl<P, M> EvictionSweeper<P, M>
where
    P: ParticipantRepository + 'static,
    M: MessageRepository + 'static,
{
    pub fn new(
        registry: PresenceRegistry<P, M>,
        messages: MessageStore<M, P>,
        config: SweepConfig,
    ) -> Self {
        Self {
            registry,
            messages,
            config,
        }
    }

    /// Spawn the sweep loop. Cancelling `shutdown` stops it; the caller
    /// awaits the returned handle before releasing the database pool.
    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    async fn run(self, shutdown: CancellationToken) {
        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(
            interval_secs = self.config.interval.as_secs(),
            ttl_secs = self.config.ttl.num_seconds(),
            "eviction sweeper started"
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => self.sweep().await,
            }
        }
        info!("eviction sweeper stopped");
    }

    /// One evict-and-announce cycle.
    ///
    /// Errors end the cycle early and are logged; they never propagate to
    /// a client and never stop the loop. A failed departure announcement
    /// is retried once before the cycle gives up.
    pub async fn sweep(&self) {
        let evicted = match self.registry.evict_expired(Utc::now(), self.config.ttl).await {
            Ok(evicted) => evicted,
            Err(e) => {
                warn!(error = %e, "eviction sweep failed");
                return;
            }
        };

        for participant in evicted {
            debug!(participant = %participant.name, "participant evicted");
            if let Err(first) = self.messages.announce(&participant.name, DEPARTURE_NOTICE).await {
                warn!(
                    participant = %participant.name,
                    error = %first,
                    "departure announcement failed, retrying"
                );
                if let Err(second) = self
                    .messages
                    .announce(&participant.name, DEPARTURE_NOTICE)
                    .await
                {
                    error!(
                        participant = %participant.name,
                        error = %second,
                        "departure announcement lost, ending sweep cycle"
                    );
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryMessages, MemoryParticipants};
    use plaza_types::message::{MessageKind, BROADCAST};

    fn sweeper(
        config: SweepConfig,
    ) -> (
        EvictionSweeper<MemoryParticipants, MemoryMessages>,
        PresenceRegistry<MemoryParticipants, MemoryMessages>,
        MemoryParticipants,
        MemoryMessages,
    ) {
        let participants = MemoryParticipants::new();
        let messages = MemoryMessages::new();
        let registry = PresenceRegistry::new(
            participants.clone(),
            MessageStore::new(messages.clone(), participants.clone()),
        );
        let sweeper = EvictionSweeper::new(
            PresenceRegistry::new(
                participants.clone(),
                MessageStore::new(messages.clone(), participants.clone()),
            ),
            MessageStore::new(messages.clone(), participants.clone()),
            config,
        );
        (sweeper, registry, participants, messages)
    }

    #[tokio::test]
    async fn test_sweep_announces_each_departure_once() {
        let config = SweepConfig::from_secs(15, 10);
        let (sweeper, registry, participants, messages) = sweeper(config);

        registry.join("Bob").await.unwrap();
        registry.join("Carol").await.unwrap();
        participants.backdate("Bob", chrono::Duration::seconds(60));

        sweeper.sweep().await;

        let departures: Vec<_> = messages
            .all()
            .into_iter()
            .filter(|m| m.kind == MessageKind::Status && m.text == DEPARTURE_NOTICE)
            .collect();
        assert_eq!(departures.len(), 1);
        assert_eq!(departures[0].from, "Bob");
        assert_eq!(departures[0].to, BROADCAST);

        let remaining = registry.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].name, "Carol");

        // A second sweep finds nothing new.
        sweeper.sweep().await;
        let departures = messages
            .all()
            .into_iter()
            .filter(|m| m.text == DEPARTURE_NOTICE)
            .count();
        assert_eq!(departures, 1);
    }

    #[tokio::test]
    async fn test_sweep_survives_announcement_failure() {
        let config = SweepConfig::from_secs(15, 10);
        let (sweeper, registry, participants, messages) = sweeper(config);

        registry.join("Bob").await.unwrap();
        participants.backdate("Bob", chrono::Duration::seconds(60));

        // Both the announcement and its retry fail; the cycle ends early
        // without panicking.
        messages.fail_next_inserts(2);
        sweeper.sweep().await;
        assert!(!messages.all().iter().any(|m| m.text == DEPARTURE_NOTICE));
    }

    #[tokio::test]
    async fn test_spawn_stops_on_cancellation() {
        let config = SweepConfig::from_secs(3600, 10);
        let (sweeper, _registry, _participants, _messages) = sweeper(config);

        let shutdown = CancellationToken::new();
        let handle = sweeper.spawn(shutdown.clone());
        shutdown.cancel();
        handle.await.unwrap();
    }
}
