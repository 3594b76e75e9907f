//! HTTP client for the busload ingestion endpoint.

use std::time::Duration;

use anyhow::{Context, Result};
use busload_core::NewReading;
use reqwest::{Client, StatusCode};

/// Posts readings to `<server>/update_count`.
#[derive(Clone)]
pub struct IngestClient {
  client:   Client,
  endpoint: String,
}

impl IngestClient {
  pub fn new(server: &str) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(5))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self {
      client,
      endpoint: format!("{}/update_count", server.trim_end_matches('/')),
    })
  }

  pub fn endpoint(&self) -> &str { &self.endpoint }

  /// `POST /update_count` with `{"count":..,"capacity":..}`.
  pub async fn post(&self, reading: NewReading) -> Result<StatusCode> {
    let resp = self
      .client
      .post(&self.endpoint)
      .json(&reading)
      .send()
      .await
      .with_context(|| format!("POST {} failed", self.endpoint))?;
    Ok(resp.status())
  }
}
