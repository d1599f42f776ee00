//! # Runtime
//!
//! Process initialization: crypto provider, tracing, configuration,
//! credential broker wiring and server startup.

pub mod initialization;

pub use initialization::{initialize, InitializationResult};
