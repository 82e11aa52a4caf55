//! Structured logging setup for Folio binaries.
//!
//! Libraries only emit `tracing` events; binaries call [`init_logger`] once.

pub mod logger;

pub use logger::{init_logger, LogGuard, LogOptions};
