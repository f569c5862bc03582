//! Run summary.
//!
//! Collects the outcome of one clock loop: how many half-cycles were driven, why the
//! loop stopped, and how long it took. Both stop reasons are successful outcomes.

use std::fmt;
use std::time::Duration;

/// Reason the clock loop stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The model's completion flag was observed.
    ModelFinished,
    /// The cycle budget was reached.
    BudgetExhausted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModelFinished => write!(f, "model finished"),
            Self::BudgetExhausted => write!(f, "cycle budget exhausted"),
        }
    }
}

/// Outcome of a completed run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Half-cycle passes executed by the clock loop.
    pub half_cycles: u64,
    /// Cycle budget the run was started with (0 = unbounded).
    pub cycle_budget: u64,
    /// Why the loop stopped.
    pub stop_reason: StopReason,
    /// Wall-clock time spent in the clock loop.
    pub elapsed: Duration,
}

impl RunSummary {
    /// Full cycles executed (`half_cycles / 2`).
    #[inline]
    pub const fn cycles(&self) -> u64 {
        self.half_cycles / 2
    }

    /// Simulated full cycles per wall-clock second, or 0 if no time elapsed.
    pub fn cycles_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.cycles() as f64 / secs
        } else {
            0.0
        }
    }

    /// Prints the summary to stdout.
    pub fn print(&self) {
        println!("\n==========================================================");
        println!("RUN SUMMARY");
        println!("==========================================================");
        println!("stop_reason              {}", self.stop_reason);
        println!("cycles                   {}", self.cycles());
        println!("half_cycles              {}", self.half_cycles);
        if self.cycle_budget == 0 {
            println!("cycle_budget             unbounded");
        } else {
            println!("cycle_budget             {}", self.cycle_budget);
        }
        println!("host_seconds             {:.4}", self.elapsed.as_secs_f64());
        println!("sim_speed                {:.2} kHz", self.cycles_per_second() / 1000.0);
    }
}
