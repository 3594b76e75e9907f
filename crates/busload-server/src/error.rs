//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The request body could not be read as a reading.
  #[error("bad payload: {0}")]
  BadPayload(#[from] busload_core::Error),

  /// The store failed to write or read.
  #[error("store error: {0}")]
  Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// The dashboard writer failed. It writes into memory, so this only
  /// surfaces a quick-xml or UTF-8 fault; it is kept as a 500 so the
  /// renderer has no panicking path.
  #[error("render error: {0}")]
  Render(String),
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      Error::BadPayload(_) => (StatusCode::BAD_REQUEST, "bad payload"),
      Error::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage failure"),
      Error::Render(_) => (StatusCode::INTERNAL_SERVER_ERROR, "render failure"),
    };
    (status, Json(json!({ "status": "error", "message": message }))).into_response()
  }
}
