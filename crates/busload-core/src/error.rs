//! Error types for `busload-core`.

use thiserror::Error;

/// Reasons an ingestion payload is rejected.
#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed json: {0}")]
  MalformedJson(#[from] serde_json::Error),

  #[error("payload must be a json object")]
  NotAnObject,

  #[error("field {field:?} is not a non-negative integer")]
  NotAnInteger { field: &'static str },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
