//! Model lifecycle state machine and clock generation loop.
//!
//! A `Harness` owns one circuit model and moves it through four phases:
//! 1. **Constructed:** The model exists and its clock is driven low.
//! 2. **Reset:** Reset is pulsed high for one evaluation, then released for one.
//! 3. **Running:** Reset is asserted again and the clock is toggled once per half-cycle
//!    until the model finishes or the cycle budget runs out.
//! 4. **Finished:** The model has been finalized; no further operations are allowed.
//!
//! The harness stops evaluating as soon as the model reports completion, including
//! during the reset sequence.

use std::fmt;
use std::time::Instant;

use tracing::{debug, info, trace};

use crate::common::error::HarnessError;
use crate::common::signal::{CompletionState, InputLine};
use crate::model::CircuitModel;
use crate::stats::{RunSummary, StopReason};

/// Lifecycle phase of a harnessed model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Model instantiated with the clock low.
    Constructed,
    /// Reset sequence applied.
    Reset,
    /// Clock loop in progress.
    Running,
    /// Model finalized.
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constructed => write!(f, "Constructed"),
            Self::Reset => write!(f, "Reset"),
            Self::Running => write!(f, "Running"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

/// Lifecycle driver owning one circuit model.
///
/// Dropping a harness that was never finalized finalizes its model, so `finalize`
/// runs exactly once per model.
#[derive(Debug)]
pub struct Harness<M: CircuitModel> {
    model: M,
    phase: Phase,
    clock: bool,
    reset: bool,
    completion: CompletionState,
    evaluations: u64,
    progress_interval: u64,
}

impl<M: CircuitModel> Harness<M> {
    /// Takes ownership of a freshly constructed model and drives its clock low.
    pub fn new(mut model: M) -> Self {
        model.set_input(InputLine::Clock, false);
        debug!(phase = %Phase::Constructed, "model constructed");
        Self {
            model,
            phase: Phase::Constructed,
            clock: false,
            reset: false,
            completion: CompletionState::Running,
            evaluations: 0,
            progress_interval: 0,
        }
    }

    /// Logs a progress event every `interval` full cycles (0 disables).
    #[must_use]
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Current lifecycle phase.
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Completion state observed so far.
    pub const fn completion(&self) -> CompletionState {
        self.completion
    }

    /// Last value driven on the clock line.
    pub const fn clock(&self) -> bool {
        self.clock
    }

    /// Last value driven on the reset line.
    pub const fn reset_line(&self) -> bool {
        self.reset
    }

    /// Number of `evaluate` calls issued to the model.
    pub const fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// Shared access to the model.
    pub const fn model(&self) -> &M {
        &self.model
    }

    /// Applies the reset sequence: `rst=1`, evaluate, `rst=0`, evaluate.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::InvalidTransition` unless the harness is `Constructed`.
    pub fn reset(&mut self) -> Result<(), HarnessError> {
        self.transition(Phase::Constructed, Phase::Reset)?;
        self.drive(InputLine::Reset, true);
        let _ = self.evaluate();
        self.drive(InputLine::Reset, false);
        let _ = self.evaluate();
        debug!(completion = ?self.completion, "reset sequence applied");
        Ok(())
    }

    /// Runs the clock loop, then finalizes the model.
    ///
    /// Each pass toggles the clock and evaluates once. Before every pass the loop stops
    /// if the model finished or, for a non-zero `cycle_budget`, once `pass / 2` reaches
    /// the budget. Both outcomes are successful.
    ///
    /// # Arguments
    ///
    /// * `cycle_budget` - Maximum number of full cycles; 0 means unbounded.
    ///
    /// # Returns
    ///
    /// A summary of the run.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::InvalidTransition` unless the reset sequence was applied.
    pub fn run(&mut self, cycle_budget: u64) -> Result<RunSummary, HarnessError> {
        self.transition(Phase::Reset, Phase::Running)?;

        // Reset is asserted again right after the reset sequence released it and stays
        // asserted for the whole loop. Whether models rely on this is unresolved; keep
        // the ordering as is.
        self.drive(InputLine::Reset, true);

        let start = Instant::now();
        let progress_every = self.progress_interval.saturating_mul(2);
        let mut i: u64 = 0;
        while !self.completion.is_finished() && (cycle_budget == 0 || i / 2 < cycle_budget) {
            self.drive(InputLine::Clock, !self.clock);
            let state = self.evaluate();
            trace!(half_cycle = i, clk = self.clock, ?state, "edge");
            i += 1;
            if progress_every != 0 && i % progress_every == 0 {
                info!(cycles = i / 2, "progress");
            }
        }

        let stop_reason = if self.completion.is_finished() {
            StopReason::ModelFinished
        } else {
            StopReason::BudgetExhausted
        };
        let summary = RunSummary {
            half_cycles: i,
            cycle_budget,
            stop_reason,
            elapsed: start.elapsed(),
        };
        info!(
            cycles = summary.cycles(),
            half_cycles = summary.half_cycles,
            reason = %stop_reason,
            "clock loop stopped"
        );

        self.finalize()?;
        Ok(summary)
    }

    /// Finalizes the model.
    ///
    /// Allowed from any phase except `Finished`; afterwards the model is not touched again.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::InvalidTransition` if the model was already finalized.
    pub fn finalize(&mut self) -> Result<(), HarnessError> {
        if self.phase == Phase::Finished {
            return Err(HarnessError::InvalidTransition {
                from: Phase::Finished,
                to: Phase::Finished,
            });
        }
        self.model.finalize();
        self.phase = Phase::Finished;
        debug!(evaluations = self.evaluations, "model finalized");
        Ok(())
    }

    fn transition(&mut self, from: Phase, to: Phase) -> Result<(), HarnessError> {
        if self.phase != from {
            return Err(HarnessError::InvalidTransition {
                from: self.phase,
                to,
            });
        }
        self.phase = to;
        Ok(())
    }

    fn drive(&mut self, line: InputLine, value: bool) {
        match line {
            InputLine::Clock => self.clock = value,
            InputLine::Reset => self.reset = value,
        }
        self.model.set_input(line, value);
    }

    /// Evaluates the model unless it already reported completion.
    fn evaluate(&mut self) -> CompletionState {
        if self.completion.is_finished() {
            return self.completion;
        }
        self.evaluations += 1;
        if self.model.evaluate().is_finished() {
            self.completion = CompletionState::Finished;
        }
        self.completion
    }
}

impl<M: CircuitModel> Drop for Harness<M> {
    fn drop(&mut self) {
        if self.phase != Phase::Finished {
            debug!(phase = %self.phase, "finalizing model on drop");
            self.model.finalize();
            self.phase = Phase::Finished;
        }
    }
}
