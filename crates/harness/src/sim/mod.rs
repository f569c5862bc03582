//! Simulation harness.
//!
//! Ties argument resolution, the environment bridge, and the lifecycle state machine
//! into one run. It performs, strictly in order:
//! 1. **Bridge:** Publishes the memory-image path under the configured environment key.
//! 2. **Construction:** Builds the model through its factory and applies the reset sequence.
//! 3. **Restore:** Puts the environment key back before the clock starts.
//! 4. **Run:** Drives the clock loop and finalizes the model.

/// Positional argument resolution.
pub mod args;
/// Environment channel bridge and the C-ABI configuration accessor.
pub mod env;
/// Lifecycle state machine and clock loop.
pub mod harness;

use tracing::debug;

use crate::common::error::HarnessError;
use crate::config::Config;
use crate::model::{CircuitModel, ModelConfig, ModelFactory};
use crate::stats::RunSummary;
use args::RunConfig;
use env::EnvGuard;
use harness::Harness;

/// Constructs and resets a model with the environment bridge active.
///
/// The environment key is restored before this returns, whether construction
/// succeeded or not.
///
/// # Errors
///
/// Returns `HarnessError::Model` if the factory fails.
pub fn bring_up<M, F>(
    run: &RunConfig,
    config: &Config,
    factory: F,
) -> Result<Harness<M>, HarnessError>
where
    M: CircuitModel,
    F: ModelFactory<M>,
{
    let model_config = ModelConfig::new(run, config);
    let guard = EnvGuard::set(&config.env_key, run.memory_image_path().as_os_str());
    let model = factory.build(&model_config)?;
    let mut harness = Harness::new(model).with_progress_interval(config.progress_interval);
    harness.reset()?;
    guard.restore();
    debug!(key = %config.env_key, "configuration bridge closed");
    Ok(harness)
}

/// Runs one complete simulation: bring-up, clock loop, and finalization.
///
/// # Arguments
///
/// * `run` - Resolved memory-image path and cycle budget.
/// * `config` - Harness configuration (environment key, progress interval).
/// * `factory` - Constructs the circuit model.
///
/// # Returns
///
/// The run summary. Reaching the cycle budget is a successful outcome.
///
/// # Errors
///
/// Returns `HarnessError::Model` if the model cannot be constructed.
pub fn simulate<M, F>(
    run: &RunConfig,
    config: &Config,
    factory: F,
) -> Result<RunSummary, HarnessError>
where
    M: CircuitModel,
    F: ModelFactory<M>,
{
    let mut harness = bring_up(run, config, factory)?;
    harness.run(run.cycle_budget())
}
