//! Best-effort relay of readings to an external telemetry service.
//!
//! The ingestion handler hands each reading to [`Forwarder::forward`], which
//! never blocks and never fails. Readings go onto a bounded queue drained by
//! a single dispatcher task; the dispatcher spawns one detached request per
//! reading while holding a semaphore permit, so queue depth and in-flight
//! requests are both capped. Anything past those caps is dropped and logged.
//!
//! Delivery is at-most-once. Failures are logged and never retried.

use std::{sync::Arc, time::Duration};

use busload_core::NewReading;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::{
  Semaphore,
  mpsc::{self, error::TrySendError},
};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Whether a forward is attempted when the local write fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForwardPolicy {
  /// Forward every well-formed reading, even if persisting it failed.
  #[default]
  Always,
  /// Forward only readings that were durably stored.
  AfterCommit,
}

/// The `[telemetry]` section of the server configuration.
#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct TelemetryConfig {
  /// Write key for the telemetry service. Empty disables forwarding.
  pub api_key:        String,
  pub url:            String,
  /// Query parameter carrying the count.
  pub count_field:    String,
  /// Query parameter carrying the capacity.
  pub capacity_field: String,
  pub timeout_secs:   u64,
  pub queue_capacity: usize,
  pub max_in_flight:  usize,
  pub forward_policy: ForwardPolicy,
}

impl Default for TelemetryConfig {
  fn default() -> Self {
    Self {
      api_key:        String::new(),
      url:            "https://api.thingspeak.com/update".to_string(),
      count_field:    "field1".to_string(),
      capacity_field: "field2".to_string(),
      timeout_secs:   5,
      queue_capacity: 64,
      max_in_flight:  4,
      forward_policy: ForwardPolicy::Always,
    }
  }
}

// ─── Errors ───────────────────────────────────────────────────────────────────

/// A failed forward. Only ever logged.
#[derive(Debug, Error)]
pub enum ForwardError {
  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  #[error("telemetry request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("telemetry endpoint returned {0}")]
  Status(StatusCode),
}

// ─── HTTP client ──────────────────────────────────────────────────────────────

/// Sends a single reading to the telemetry endpoint.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct TelemetryClient {
  http:           reqwest::Client,
  url:            String,
  api_key:        String,
  count_field:    String,
  capacity_field: String,
}

impl TelemetryClient {
  pub fn new(config: &TelemetryConfig) -> Result<Self, ForwardError> {
    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()
      .map_err(ForwardError::Client)?;
    Ok(Self {
      http,
      url: config.url.clone(),
      api_key: config.api_key.clone(),
      count_field: config.count_field.clone(),
      capacity_field: config.capacity_field.clone(),
    })
  }

  /// `POST <url>?api_key=..&<count_field>=..&<capacity_field>=..`
  pub async fn push(&self, reading: NewReading) -> Result<(), ForwardError> {
    let count = reading.count.to_string();
    let capacity = reading.capacity.to_string();

    let resp = self
      .http
      .post(&self.url)
      .query(&[
        ("api_key", self.api_key.as_str()),
        (self.count_field.as_str(), count.as_str()),
        (self.capacity_field.as_str(), capacity.as_str()),
      ])
      .send()
      .await?;

    if !resp.status().is_success() {
      return Err(ForwardError::Status(resp.status()));
    }
    Ok(())
  }
}

// ─── Forwarder ────────────────────────────────────────────────────────────────

/// What happened to a reading handed to [`Forwarder::forward`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
  Queued,
  /// The queue was full or the dispatcher has stopped.
  Dropped,
  /// No API key is configured.
  Disabled,
}

/// Handle to the background dispatcher. Cloning shares the same queue.
#[derive(Clone)]
pub struct Forwarder {
  tx: Option<mpsc::Sender<NewReading>>,
}

impl Forwarder {
  /// A forwarder that ignores every reading.
  pub fn disabled() -> Self { Self { tx: None } }

  /// Start the dispatcher task. Must be called inside a tokio runtime.
  ///
  /// Returns a disabled forwarder if `config.api_key` is empty.
  pub fn spawn(config: &TelemetryConfig) -> Result<Self, ForwardError> {
    if config.api_key.is_empty() {
      tracing::info!("telemetry api key not set; forwarding disabled");
      return Ok(Self::disabled());
    }

    let client = TelemetryClient::new(config)?;
    let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
    let permits = Arc::new(Semaphore::new(config.max_in_flight.max(1)));
    tokio::spawn(dispatch(rx, client, permits));

    tracing::info!(
      url = %config.url,
      queue = config.queue_capacity,
      in_flight = config.max_in_flight,
      "telemetry forwarding enabled"
    );
    Ok(Self { tx: Some(tx) })
  }

  #[cfg(test)]
  pub(crate) fn from_sender(tx: mpsc::Sender<NewReading>) -> Self {
    Self { tx: Some(tx) }
  }

  /// Queue `reading` for delivery without waiting.
  pub fn forward(&self, reading: NewReading) -> Dispatch {
    let Some(tx) = &self.tx else {
      return Dispatch::Disabled;
    };

    match tx.try_send(reading) {
      Ok(()) => Dispatch::Queued,
      Err(TrySendError::Full(r)) => {
        tracing::warn!(
          count = r.count,
          capacity = r.capacity,
          "telemetry queue full; dropping forward"
        );
        Dispatch::Dropped
      }
      Err(TrySendError::Closed(_)) => {
        tracing::warn!("telemetry dispatcher stopped; dropping forward");
        Dispatch::Dropped
      }
    }
  }
}

/// Drain the queue until every sender is gone.
async fn dispatch(
  mut rx: mpsc::Receiver<NewReading>,
  client: TelemetryClient,
  permits: Arc<Semaphore>,
) {
  while let Some(reading) = rx.recv().await {
    let Ok(permit) = Arc::clone(&permits).acquire_owned().await else {
      break;
    };
    let client = client.clone();

    tokio::spawn(async move {
      let _permit = permit;
      match client.push(reading).await {
        Ok(()) => tracing::debug!(
          count = reading.count,
          capacity = reading.capacity,
          "telemetry forwarded"
        ),
        Err(e) => tracing::warn!(error = %e, "telemetry forward failed"),
      }
    });
  }
  tracing::debug!("telemetry dispatcher stopped");
}
