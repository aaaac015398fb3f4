//! interviewer server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, serves the JSON API under `/api` and the sign-in route on a
//! separate listener.

use std::sync::Arc;

use anyhow::Context as _;
use axum::Router;
use clap::Parser;
use interviewer_api::{AppState, api_router, login_router};
use interviewer_server::{ServerConfig, expand_tilde};
use interviewer_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Interviewer API server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: std::path::PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg =
    ServerConfig::load(&cli.config).context("failed to load configuration")?;
  let identity_header = server_cfg.identity_header()?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  tracing::info!(
    stage = ?server_cfg.policies.stage,
    document_reference = ?server_cfg.policies.document_reference,
    storage_failures = ?server_cfg.policies.storage_failures,
    identity_header = %identity_header,
    "policies loaded"
  );

  let state = AppState::new(Arc::new(store), identity_header, server_cfg.policies);
  let app = Router::new().nest("/api", api_router(state.clone()));
  let login = login_router(state);

  let address = server_cfg.address();
  let login_address = server_cfg.login_address();

  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  let login_listener = TcpListener::bind(&login_address)
    .await
    .with_context(|| format!("failed to bind {login_address}"))?;

  tracing::info!("Listening on http://{address}");
  tracing::info!("Sign-in listening on http://{login_address}");

  tokio::try_join!(
    async { axum::serve(listener, app).await.context("server error") },
    async { axum::serve(login_listener, login).await.context("login server error") },
  )?;

  Ok(())
}
