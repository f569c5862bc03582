//! Common utilities and types used throughout the harness.
//!
//! This module provides the building blocks shared by the argument resolver, the
//! environment bridge, the model backends, and the lifecycle driver. It includes:
//! 1. **Constants:** The default environment key and the shared-library ABI symbol names.
//! 2. **Signals:** The model's input lines and the completion state reported by evaluation.
//! 3. **Error Handling:** Usage, configuration, model, and lifecycle errors.

/// Common constants used throughout the harness.
pub mod constants;

/// Error types for argument resolution, configuration, models, and lifecycle.
pub mod error;

/// Input line and completion state definitions.
pub mod signal;

pub use constants::DEFAULT_ENV_KEY;
pub use error::{ArgError, ConfigError, HarnessError, ModelError};
pub use signal::{CompletionState, InputLine};
