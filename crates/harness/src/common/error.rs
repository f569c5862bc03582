//! Error definitions.
//!
//! This module defines the failure modes of the harness. It provides:
//! 1. **Argument Errors:** Usage errors and unresolvable or unparsable positional arguments.
//! 2. **Configuration Errors:** Unreadable or malformed configuration files.
//! 3. **Model Errors:** Failures to load or construct a circuit model backend.
//! 4. **Lifecycle Errors:** Model operations requested in the wrong lifecycle phase.
//!
//! Every error is fatal for the run and maps to the same non-zero exit status.

use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

use super::constants::EXIT_FAILURE;
use crate::sim::harness::Phase;

/// Errors produced while resolving positional arguments into a `RunConfig`.
#[derive(Debug, Error)]
pub enum ArgError {
    /// A required argument was not supplied.
    #[error("missing required argument {missing}")]
    Usage {
        /// Name of the missing argument as shown in the usage line.
        missing: &'static str,
    },

    /// The memory-image path could not be made absolute.
    #[error("invalid memory file path '{}': {source}", path.display())]
    InvalidPath {
        /// The path as given on the command line.
        path: PathBuf,
        /// Underlying path-system error.
        #[source]
        source: io::Error,
    },

    /// The cycle count is not a non-negative 64-bit integer.
    #[error("invalid number: {token}")]
    InvalidCycleCount {
        /// The offending token.
        token: String,
        /// Underlying integer parse error.
        #[source]
        source: ParseIntError,
    },
}

/// Errors produced while loading a harness configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config file '{}': {source}", path.display())]
    Io {
        /// Path of the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The configuration is not valid JSON or has unknown or mistyped fields.
    #[error("invalid harness config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured environment key cannot be used as a variable name.
    #[error("invalid environment key '{key}': must be non-empty and contain no '=' or NUL")]
    InvalidEnvKey {
        /// The rejected key.
        key: String,
    },
}

/// Errors produced while loading or constructing a circuit model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The shared library could not be opened.
    #[error("cannot load model library '{}': {source}", path.display())]
    Load {
        /// Path of the shared library.
        path: PathBuf,
        /// Underlying loader error.
        #[source]
        source: libloading::Error,
    },

    /// A required symbol is not exported by the shared library.
    #[error("model library does not export '{symbol}': {source}")]
    MissingSymbol {
        /// Name of the missing symbol.
        symbol: String,
        /// Underlying loader error.
        #[source]
        source: libloading::Error,
    },

    /// The model constructor returned a null handle.
    #[error("model constructor in '{}' returned a null handle", path.display())]
    NullHandle {
        /// Path of the shared library.
        path: PathBuf,
    },

    /// A model factory rejected its configuration.
    #[error("model construction failed: {0}")]
    Construction(String),
}

/// Top-level harness error.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Argument resolution failed.
    #[error(transparent)]
    Args(#[from] ArgError),

    /// Configuration loading failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Model loading or construction failed.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A lifecycle operation was requested in the wrong phase.
    #[error("invalid lifecycle transition from {from} to {to}")]
    InvalidTransition {
        /// Phase the harness was in.
        from: Phase,
        /// Phase the operation would have entered.
        to: Phase,
    },
}

impl ArgError {
    /// Returns `true` for errors that should be followed by the usage line.
    pub const fn is_usage(&self) -> bool {
        matches!(self, Self::Usage { .. })
    }
}

impl HarnessError {
    /// Process exit status for this error.
    ///
    /// Usage and configuration failures are terminal and share a single status.
    pub const fn exit_code(&self) -> i32 {
        EXIT_FAILURE
    }

    /// Returns `true` for errors that should be followed by the usage line.
    pub const fn is_usage(&self) -> bool {
        match self {
            Self::Args(e) => e.is_usage(),
            _ => false,
        }
    }
}
