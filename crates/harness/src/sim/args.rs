//! Argument resolution.
//!
//! Turns the positional arguments `MEMORY_IMAGE_PATH [CYCLE_COUNT]` into an immutable
//! `RunConfig`. It performs:
//! 1. **Path resolution:** The memory-image path is made absolute and normalized
//!    lexically. The file is not opened or required to exist.
//! 2. **Budget parsing:** The optional cycle count is a non-negative 64-bit integer;
//!    absence means unbounded.

use std::path::{Component, Path, PathBuf};

use crate::common::error::ArgError;

/// Name of the memory-image argument in usage messages.
pub const MEMORY_ARG: &str = "MEMORY_IMAGE_PATH";

/// Run configuration resolved from the process arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    memory_image_path: PathBuf,
    cycle_budget: u64,
}

impl RunConfig {
    /// Resolves the memory-image path and optional cycle count.
    ///
    /// # Arguments
    ///
    /// * `memory` - The memory-image path argument, if supplied.
    /// * `cycles` - The cycle-count argument, if supplied.
    ///
    /// # Returns
    ///
    /// The resolved configuration, or an `ArgError` describing the first bad argument.
    pub fn resolve(memory: Option<&Path>, cycles: Option<&str>) -> Result<Self, ArgError> {
        let memory = memory.ok_or(ArgError::Usage {
            missing: MEMORY_ARG,
        })?;
        let memory_image_path = resolve_memory_path(memory)?;
        let cycle_budget = cycles.map_or(Ok(0), parse_cycle_budget)?;
        Ok(Self {
            memory_image_path,
            cycle_budget,
        })
    }

    /// Absolute, normalized path of the initial-memory image.
    pub fn memory_image_path(&self) -> &Path {
        &self.memory_image_path
    }

    /// Maximum number of full clock cycles; 0 means unbounded.
    pub const fn cycle_budget(&self) -> u64 {
        self.cycle_budget
    }

    /// Returns `true` if only the model's completion flag can end the run.
    pub const fn is_unbounded(&self) -> bool {
        self.cycle_budget == 0
    }
}

/// Makes `raw` absolute against the current directory and normalizes it.
///
/// The path is taken as raw OS bytes; it need not be valid UTF-8.
///
/// # Errors
///
/// Returns `ArgError::InvalidPath` if the path is empty or the current directory
/// cannot be determined.
pub fn resolve_memory_path(raw: &Path) -> Result<PathBuf, ArgError> {
    let absolute = std::path::absolute(raw).map_err(|source| ArgError::InvalidPath {
        path: raw.to_path_buf(),
        source,
    })?;
    Ok(normalize(&absolute))
}

/// Parses a cycle budget token.
///
/// # Errors
///
/// Returns `ArgError::InvalidCycleCount` carrying the token if it is not a
/// non-negative integer that fits in 64 bits.
pub fn parse_cycle_budget(token: &str) -> Result<u64, ArgError> {
    token
        .parse::<u64>()
        .map_err(|source| ArgError::InvalidCycleCount {
            token: token.to_string(),
            source,
        })
}

/// Removes `.` and `..` components of an absolute path without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                out.push(component.as_os_str());
            }
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root.
                let _ = out.pop();
            }
        }
    }
    out
}
