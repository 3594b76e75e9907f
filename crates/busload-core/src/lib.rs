//! Core types and trait definitions for the busload occupancy logger.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The store backend and the server both depend on it.

pub mod error;
pub mod reading;
pub mod store;

pub use error::{Error, Result};
pub use reading::{NewReading, Reading};
