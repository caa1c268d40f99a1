//! Application state wiring all services together.
//!
//! Services are generic over the repository traits, but AppState pins them
//! to the concrete SQLite implementations. Every component gets its own
//! cheap clone of the pool handle at construction; nothing holds a global
//! connection.

use std::sync::Arc;

use plaza_core::message::MessageStore;
use plaza_core::presence::PresenceRegistry;
use plaza_core::sweeper::{EvictionSweeper, SweepConfig};
use plaza_infra::sqlite::message::SqliteMessageRepository;
use plaza_infra::sqlite::participant::SqliteParticipantRepository;
use plaza_infra::sqlite::pool::DatabasePool;
use plaza_types::config::ServerConfig;

/// Concrete type aliases for the service generics pinned to the SQLite
/// implementations.
pub type ConcretePresenceRegistry =
    PresenceRegistry<SqliteParticipantRepository, SqliteMessageRepository>;
pub type ConcreteMessageStore =
    MessageStore<SqliteMessageRepository, SqliteParticipantRepository>;
pub type ConcreteEvictionSweeper =
    EvictionSweeper<SqliteParticipantRepository, SqliteMessageRepository>;

/// Shared application state holding the services behind the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub presence: Arc<ConcretePresenceRegistry>,
    pub messages: Arc<ConcreteMessageStore>,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to the database and wire
    /// the services. Also builds the sweeper, which owns its own service
    /// instances over the same pool.
    pub async fn init(
        config: &ServerConfig,
    ) -> anyhow::Result<(Self, ConcreteEvictionSweeper)> {
        let db_url = match &config.database_url {
            Some(url) => url.clone(),
            None => {
                let data_dir = plaza_infra::sqlite::pool::data_dir();
                tokio::fs::create_dir_all(&data_dir).await?;
                plaza_infra::sqlite::pool::default_database_url()
            }
        };
        let db_pool = DatabasePool::new(&db_url).await?;

        let presence = PresenceRegistry::new(
            SqliteParticipantRepository::new(db_pool.clone()),
            MessageStore::new(
                SqliteMessageRepository::new(db_pool.clone()),
                SqliteParticipantRepository::new(db_pool.clone()),
            ),
        );
        let messages = MessageStore::new(
            SqliteMessageRepository::new(db_pool.clone()),
            SqliteParticipantRepository::new(db_pool.clone()),
        );

        let sweeper = EvictionSweeper::new(
            PresenceRegistry::new(
                SqliteParticipantRepository::new(db_pool.clone()),
                MessageStore::new(
                    SqliteMessageRepository::new(db_pool.clone()),
                    SqliteParticipantRepository::new(db_pool.clone()),
                ),
            ),
            MessageStore::new(
                SqliteMessageRepository::new(db_pool.clone()),
                SqliteParticipantRepository::new(db_pool.clone()),
            ),
            SweepConfig::from_secs(config.sweep_interval_secs, config.presence_ttl_secs),
        );

        let state = Self {
            presence: Arc::new(presence),
            messages: Arc::new(messages),
            db_pool,
        };
        Ok((state, sweeper))
    }
}
