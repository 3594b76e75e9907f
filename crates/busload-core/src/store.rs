//! The `ReadingStore` trait.
//!
//! Implemented by storage backends (e.g. `busload-store-sqlite`). The server
//! depends on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::reading::{NewReading, Reading};

/// Number of readings returned by [`ReadingStore::recent`] when no limit is
/// given.
pub const DEFAULT_RECENT_LIMIT: usize = 100;

/// Abstraction over a durable, append-only log of readings.
///
/// Implementations must serialise appends so that every committed reading
/// has a strictly greater `id` and a greater-or-equal `timestamp` than any
/// reading committed before it. Each insert is atomic.
pub trait ReadingStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a reading. The `timestamp` is assigned by the store from the
  /// server clock and the `id` from the backing log.
  fn append(
    &self,
    input: NewReading,
  ) -> impl Future<Output = Result<Reading, Self::Error>> + Send + '_;

  /// Up to `limit` (default [`DEFAULT_RECENT_LIMIT`]) most recent readings,
  /// newest first: `timestamp` descending, ties broken by `id` descending.
  fn recent(
    &self,
    limit: Option<usize>,
  ) -> impl Future<Output = Result<Vec<Reading>, Self::Error>> + Send + '_;
}
