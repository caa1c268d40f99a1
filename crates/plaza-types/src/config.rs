//! Server configuration.
//!
//! `ServerConfig` represents the optional `config.toml` in the data
//! directory. All fields have defaults; CLI flags override file values.

use serde::{Deserialize, Serialize};

/// Top-level configuration for the Plaza server.
///
/// Loaded from `$PLAZA_DATA_DIR/config.toml` when the file exists.
/// The sweep interval and presence TTL are independent knobs; the TTL is
/// normally smaller than or comparable to the interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// TCP port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Seconds between eviction sweeps.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Seconds of heartbeat silence after which a participant is stale.
    #[serde(default = "default_presence_ttl_secs")]
    pub presence_ttl_secs: u64,

    /// Override for the SQLite database URL.
    #[serde(default)]
    pub database_url: Option<String>,
}

fn default_port() -> u16 {
    5000
}

fn default_sweep_interval_secs() -> u64 {
    15
}

fn default_presence_ttl_secs() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            sweep_interval_secs: default_sweep_interval_secs(),
            presence_ttl_secs: default_presence_ttl_secs(),
            database_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 5000);
        assert_eq!(config.sweep_interval_secs, 15);
        assert_eq!(config.presence_ttl_secs, 10);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn test_config_deserialize_with_defaults() {
        let config: ServerConfig = toml::from_str("").unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.presence_ttl_secs, 10);
    }

    #[test]
    fn test_config_deserialize_with_values() {
        let config: ServerConfig = toml::from_str(
            r#"
            port = 8080
            sweep_interval_secs = 30
            database_url = "sqlite::memory:"
            "#,
        )
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.sweep_interval_secs, 30);
        // Unset field keeps its default.
        assert_eq!(config.presence_ttl_secs, 10);
        assert_eq!(config.database_url.as_deref(), Some("sqlite::memory:"));
    }
}
