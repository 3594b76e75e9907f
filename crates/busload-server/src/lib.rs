//! HTTP layer for the busload occupancy logger.
//!
//! Exposes an axum [`Router`] with the ingestion endpoint, the dashboard and
//! its JSON feed,
//! backed by any [`ReadingStore`]. Readings accepted by the ingestion
//! endpoint are also relayed to an external telemetry service through a
//! [`Forwarder`].

pub mod dashboard;
pub mod error;
pub mod forward;
pub mod handlers;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use busload_core::store::ReadingStore;
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use forward::{Forwarder, TelemetryConfig};
use handlers::{dashboard as dashboard_handler, ingest};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `BUSLOAD_*` environment variables. Every key has a default.
#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  pub store_path:      PathBuf,
  pub dashboard_title: String,
  pub telemetry:       TelemetryConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:            "0.0.0.0".to_string(),
      port:            5000,
      store_path:      PathBuf::from("bus_attendance.db"),
      dashboard_title: dashboard::DEFAULT_TITLE.to_string(),
      telemetry:       TelemetryConfig::default(),
    }
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: ReadingStore> {
  pub store:     Arc<S>,
  pub forwarder: Forwarder,
  pub config:    Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the axum [`Router`] for the service.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: ReadingStore + Clone + Send + Sync + 'static,
{
  Router::new()
    .route("/update_count", post(ingest::update_count::<S>))
    .route("/dashboard", get(dashboard_handler::show::<S>))
    .route("/dashboard_data", get(dashboard_handler::data::<S>))
    .layer(CorsLayer::permissive())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[cfg(test)]
mod test_support;
