//! `POST /update_count` — the single write path for readings.
//!
//! Body: `{"count": <int>, "capacity": <int>}`, either field optional.
//!
//! | Outcome | Status | Body |
//! |---------|--------|------|
//! | stored | 200 | `{"status":"ok"}` |
//! | empty, malformed, or not integer-coercible | 400 | `{"status":"error","message":"bad payload"}` |
//! | store failure | 500 | `{"status":"error","message":"storage failure"}` |

use axum::{Json, extract::State};
use bytes::Bytes;
use busload_core::{NewReading, store::ReadingStore};
use serde_json::{Value, json};

use crate::{AppState, error::Error, forward::ForwardPolicy};

pub async fn update_count<S>(
  State(state): State<AppState<S>>,
  body: Bytes,
) -> Result<Json<Value>, Error>
where
  S: ReadingStore + Clone + Send + Sync + 'static,
{
  let input = NewReading::from_json(&body)
    .inspect_err(|e| tracing::debug!(error = %e, "rejected payload"))?;

  let stored = state.store.append(input).await;

  if stored.is_ok() || state.config.telemetry.forward_policy == ForwardPolicy::Always {
    state.forwarder.forward(input);
  }

  let reading = stored.map_err(|e| {
    tracing::error!(error = %e, "failed to persist reading");
    Error::Persistence(Box::new(e))
  })?;

  tracing::debug!(
    id = reading.id,
    ts = reading.timestamp,
    count = reading.count,
    capacity = reading.capacity,
    "reading stored"
  );
  Ok(Json(json!({ "status": "ok" })))
}
