//! Observability wiring for orderflow processes.
//!
//! Currently logging initialization; metrics/correlation IDs can layer in
//! here later without touching the engine crates.

pub mod tracing;

pub use crate::tracing::{init, init_with, LogFormat};
