//! Occupancy readings and the ingestion payload.
//!
//! A [`NewReading`] is what a reporter sends: a count and a capacity. The
//! store turns it into a [`Reading`] by assigning an id and the server-side
//! receipt time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

// ─── Stored record ───────────────────────────────────────────────────────────

/// One persisted occupancy sample. Immutable once written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
  /// Surrogate key, strictly increasing in insertion order.
  pub id:        i64,
  /// Unix seconds, assigned by the server at receipt time.
  pub timestamp: i64,
  pub count:     u32,
  pub capacity:  u32,
}

impl Reading {
  /// The receipt time as a UTC date-time, or `None` if out of range.
  pub fn recorded_at(&self) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(self.timestamp, 0)
  }
}

// ─── Ingestion payload ───────────────────────────────────────────────────────

/// A validated ingestion payload, before the store assigns id and timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReading {
  pub count:    u32,
  pub capacity: u32,
}

impl NewReading {
  pub fn new(count: u32, capacity: u32) -> Self { Self { count, capacity } }

  /// Parse a raw request body.
  ///
  /// A JSON `null` is treated as `{}`; an empty body is not JSON and is
  /// rejected. Missing fields default to 0; present fields go through
  /// [`coerce_u32`].
  pub fn from_json(body: &[u8]) -> Result<Self> {
    let value: Value = serde_json::from_slice(body)?;
    let map = match value {
      Value::Object(map) => map,
      Value::Null => return Ok(Self::default()),
      _ => return Err(Error::NotAnObject),
    };

    let field = |name: &'static str| -> Result<u32> {
      match map.get(name) {
        None => Ok(0),
        Some(v) => coerce_u32(v).ok_or(Error::NotAnInteger { field: name }),
      }
    };

    Ok(Self { count: field("count")?, capacity: field("capacity")? })
  }
}

/// Interpret a JSON value as a non-negative integer.
///
/// Accepts integers, finite floats (truncated toward zero), strings holding
/// a base-10 integer (surrounding whitespace allowed), and booleans.
pub fn coerce_u32(value: &Value) -> Option<u32> {
  match value {
    Value::Number(n) => {
      if let Some(u) = n.as_u64() {
        u32::try_from(u).ok()
      } else if n.is_i64() {
        None
      } else {
        n.as_f64().and_then(truncate_f64)
      }
    }
    Value::String(s) => s
      .trim()
      .parse::<i64>()
      .ok()
      .and_then(|i| u32::try_from(i).ok()),
    Value::Bool(b) => Some(u32::from(*b)),
    Value::Null | Value::Array(_) | Value::Object(_) => None,
  }
}

fn truncate_f64(f: f64) -> Option<u32> {
  if !f.is_finite() {
    return None;
  }
  let t = f.trunc();
  if t < 0.0 || t > f64::from(u32::MAX) {
    return None;
  }
  Some(t as u32)
}
