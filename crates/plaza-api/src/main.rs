//! Plaza REST API entry point.
//!
//! Binary name: `plaza`
//!
//! Parses CLI arguments, loads configuration, initializes the database and
//! services, spawns the eviction sweeper, and serves the HTTP API until
//! interrupted. Shutdown stops the sweeper before the pool closes.

mod http;
mod state;

use std::path::PathBuf;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use plaza_types::config::ServerConfig;
use state::AppState;

#[derive(Debug, Parser)]
#[command(name = "plaza", about = "Shared chat-room backend", version)]
struct Cli {
    /// Port to listen on (overrides config).
    #[arg(long)]
    port: Option<u16>,

    /// SQLite database URL (overrides config).
    #[arg(long, env = "PLAZA_DATABASE_URL")]
    database_url: Option<String>,

    /// Path to a config.toml (default: $PLAZA_DATA_DIR/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,plaza=debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let mut config = load_config(cli.config.as_deref()).await?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if cli.database_url.is_some() {
        config.database_url = cli.database_url;
    }

    let (state, sweeper) = AppState::init(&config).await?;
    let db_pool = state.db_pool.clone();

    let shutdown = CancellationToken::new();
    let sweeper_handle = sweeper.spawn(shutdown.clone());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "plaza listening");

    let router = http::router::build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop the sweeper before releasing the pool so no sweep fires against
    // a closed handle.
    shutdown.cancel();
    if let Err(e) = sweeper_handle.await {
        tracing::warn!(error = %e, "sweeper task did not stop cleanly");
    }
    db_pool.close().await;
    tracing::info!("server stopped");

    Ok(())
}

/// Load `ServerConfig` from the given path, or `$PLAZA_DATA_DIR/config.toml`
/// when it exists; defaults otherwise.
async fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<ServerConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(plaza_infra::sqlite::pool::data_dir()).join("config.toml"),
    };

    match tokio::fs::read_to_string(&path).await {
        Ok(raw) => {
            let config = toml::from_str(&raw)
                .map_err(|e| anyhow::anyhow!("invalid config at {}: {e}", path.display()))?;
            tracing::debug!(path = %path.display(), "config loaded");
            Ok(config)
        }
        Err(_) => Ok(ServerConfig::default()),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
