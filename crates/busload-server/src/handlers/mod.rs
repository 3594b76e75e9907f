//! Axum handlers, one module per route group.

pub mod dashboard;
pub mod ingest;
