//! Circuit model capability interface.
//!
//! The simulated circuit is an external collaborator. The harness only needs to drive
//! two input lines, evaluate, and finalize; this module defines that contract. It provides:
//! 1. **Capability:** The `CircuitModel` trait every backend implements.
//! 2. **Construction:** `ModelConfig` and the `ModelFactory` trait, which receive the
//!    run configuration explicitly instead of reading it from the environment.
//! 3. **Backends:** A shared-library backend for models compiled to native code.

/// Shared-library model backend.
pub mod shared_lib;

use std::path::{Path, PathBuf};

use crate::common::error::ModelError;
use crate::common::signal::{CompletionState, InputLine};
use crate::config::Config;
use crate::sim::args::RunConfig;

pub use shared_lib::{SharedLibraryFactory, SharedLibraryModel};

/// Capability interface of a simulated circuit.
///
/// One call to `evaluate` settles the model after its inputs changed, i.e. one
/// half-cycle when the clock was toggled. The returned state is sticky: once a model
/// reports `Finished` it keeps reporting it.
pub trait CircuitModel {
    /// Drives a single-bit input line.
    fn set_input(&mut self, line: InputLine, value: bool);
    /// Evaluates the model and reports whether its logic requested termination.
    fn evaluate(&mut self) -> CompletionState;
    /// Runs end-of-simulation hooks and releases simulation resources.
    fn finalize(&mut self);
}

impl<M: CircuitModel + ?Sized> CircuitModel for Box<M> {
    fn set_input(&mut self, line: InputLine, value: bool) {
        (**self).set_input(line, value);
    }

    fn evaluate(&mut self) -> CompletionState {
        (**self).evaluate()
    }

    fn finalize(&mut self) {
        (**self).finalize();
    }
}

/// Configuration handed to a model at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelConfig {
    memory_image_path: PathBuf,
    env_key: String,
}

impl ModelConfig {
    /// Builds the model configuration for one run.
    pub fn new(run: &RunConfig, config: &Config) -> Self {
        Self {
            memory_image_path: run.memory_image_path().to_path_buf(),
            env_key: config.env_key.clone(),
        }
    }

    /// Absolute path of the initial-memory image.
    pub fn memory_image_path(&self) -> &Path {
        &self.memory_image_path
    }

    /// Environment key that carries the same path during construction.
    pub fn env_key(&self) -> &str {
        &self.env_key
    }
}

/// Constructs a circuit model of type `M` from its configuration.
///
/// Implemented for every `FnOnce(&ModelConfig) -> Result<M, ModelError>`, so a closure
/// is enough to plug a test double into the harness.
pub trait ModelFactory<M: CircuitModel> {
    /// Constructs the model. Runs while the environment bridge is active.
    ///
    /// # Errors
    ///
    /// Returns a `ModelError` if the backend cannot be loaded or refuses the configuration.
    fn build(self, config: &ModelConfig) -> Result<M, ModelError>;
}

impl<M, F> ModelFactory<M> for F
where
    M: CircuitModel,
    F: FnOnce(&ModelConfig) -> Result<M, ModelError>,
{
    fn build(self, config: &ModelConfig) -> Result<M, ModelError> {
        self(config)
    }
}
