//! Cycle-driven testbench harness for compiled circuit models.
//!
//! This crate drives a pre-compiled, opaque circuit model through its lifecycle with the following:
//! 1. **Arguments:** Resolution of the memory-image path and cycle budget into a `RunConfig`.
//! 2. **Environment bridge:** Temporary publication of the memory-image path in the process environment.
//! 3. **Model:** The `CircuitModel` capability trait and a shared-library backend.
//! 4. **Lifecycle:** Reset sequencing, the clock-generation loop, and finalization.
//! 5. **Reporting:** Configuration loading and the end-of-run summary.

/// Common types and constants (errors, input lines, completion state).
pub mod common;
/// Harness configuration (defaults, JSON loading).
pub mod config;
/// Circuit model capability trait and backends.
pub mod model;
/// Argument resolution, environment bridge, and lifecycle state machine.
pub mod sim;
/// End-of-run summary.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Capability interface implemented by every circuit model backend.
pub use crate::model::CircuitModel;
/// Immutable run configuration resolved from process arguments.
pub use crate::sim::args::RunConfig;
/// Lifecycle driver owning one circuit model.
pub use crate::sim::harness::Harness;
/// Summary returned by a completed run.
pub use crate::stats::RunSummary;
