//! Model input lines and completion state.

use std::fmt;

/// Single-bit input lines driven by the harness.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputLine {
    /// Clock line, toggled once per half-cycle.
    Clock,
    /// Synchronous reset line.
    Reset,
}

impl InputLine {
    /// Line index used by the shared-library model ABI (0 = clock, 1 = reset).
    #[inline]
    pub const fn abi_index(self) -> u32 {
        match self {
            Self::Clock => 0,
            Self::Reset => 1,
        }
    }
}

impl fmt::Display for InputLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clock => write!(f, "clk"),
            Self::Reset => write!(f, "rst"),
        }
    }
}

/// Completion state reported by each model evaluation.
///
/// Once a model reports `Finished` it must keep doing so; the harness stops
/// evaluating as soon as it observes it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompletionState {
    /// The model's logic has not requested termination.
    #[default]
    Running,
    /// The model's logic requested termination.
    Finished,
}

impl CompletionState {
    /// Returns `true` if the model requested termination.
    #[inline]
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Finished)
    }

    /// Builds a state from a raw completion flag.
    #[inline]
    pub const fn from_flag(finished: bool) -> Self {
        if finished { Self::Finished } else { Self::Running }
    }
}
