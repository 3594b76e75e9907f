//! `GET /dashboard` — the last readings as an HTML table, newest first.
//! `GET /dashboard_data` — the same rows as JSON, for pages that poll.

use axum::{Json, extract::State, response::Html};
use busload_core::{Reading, store::ReadingStore};
use serde::Serialize;

use crate::{
  AppState,
  dashboard::{DASHBOARD_ROWS, format_local, render},
  error::Error,
};

/// One row of the JSON feed. `time` uses the dashboard's local format.
#[derive(Debug, Serialize)]
pub struct DashboardRow {
  pub time:     String,
  pub count:    u32,
  pub capacity: u32,
}

impl From<&Reading> for DashboardRow {
  fn from(r: &Reading) -> Self {
    Self { time: format_local(r.timestamp), count: r.count, capacity: r.capacity }
  }
}

async fn latest<S: ReadingStore>(state: &AppState<S>) -> Result<Vec<Reading>, Error> {
  state
    .store
    .recent(Some(DASHBOARD_ROWS))
    .await
    .map_err(|e| {
      tracing::error!(error = %e, "failed to read recent readings");
      Error::Persistence(Box::new(e))
    })
}

pub async fn show<S>(State(state): State<AppState<S>>) -> Result<Html<String>, Error>
where
  S: ReadingStore + Clone + Send + Sync + 'static,
{
  let readings = latest(&state).await?;
  Ok(Html(render(&state.config.dashboard_title, &readings)?))
}

pub async fn data<S>(State(state): State<AppState<S>>) -> Result<Json<Vec<DashboardRow>>, Error>
where
  S: ReadingStore + Clone + Send + Sync + 'static,
{
  let readings = latest(&state).await?;
  Ok(Json(readings.iter().map(DashboardRow::from).collect()))
}
