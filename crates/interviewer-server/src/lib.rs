//! Configuration for the interviewer server binary.

use std::path::{Path, PathBuf};

use axum::http::HeaderName;
use interviewer_api::DEFAULT_IDENTITY_HEADER;
use interviewer_core::service::Policies;
use serde::Deserialize;

/// Runtime server configuration, deserialised from `config.toml` and
/// `INTERVIEWER_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:            String,
  #[serde(default = "default_port")]
  pub port:            u16,
  /// Listener for `POST /auth/sign-in`; keep it off the public interface.
  #[serde(default = "default_host")]
  pub login_host:      String,
  #[serde(default = "default_login_port")]
  pub login_port:      u16,
  pub store_path:      PathBuf,
  /// Header the upstream auth layer uses to forward the signed-in user's id.
  #[serde(default = "default_identity_header")]
  pub identity_header: String,
  #[serde(default)]
  pub policies:        Policies,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_login_port() -> u16 { 8081 }

fn default_identity_header() -> String { DEFAULT_IDENTITY_HEADER.to_string() }

impl ServerConfig {
  /// Layer an optional TOML file under `INTERVIEWER_*` environment
  /// variables. Nested keys use `__`, e.g. `INTERVIEWER_POLICIES__STAGE`.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("INTERVIEWER")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()?
      .try_deserialize()
  }

  pub fn identity_header(&self) -> anyhow::Result<HeaderName> {
    HeaderName::from_bytes(self.identity_header.to_ascii_lowercase().as_bytes())
      .map_err(|e| anyhow::anyhow!("invalid identity_header {:?}: {e}", self.identity_header))
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  pub fn login_address(&self) -> String {
    format!("{}:{}", self.login_host, self.login_port)
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
