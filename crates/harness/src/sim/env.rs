//! Environment channel bridge.
//!
//! Circuit models compiled from RTL cannot take constructor arguments, so the
//! memory-image path reaches them through one process environment variable. This
//! module provides:
//! 1. **Scope guard:** `EnvGuard` publishes a value under a key and restores the
//!    previous value (or removes the key) when restored or dropped.
//! 2. **Accessor:** `get_env_value`, the C-ABI lookup handed to model code, which
//!    yields an empty string for unset keys.
//!
//! The process environment is global. A guard must only be held by the single thread
//! that drives the harness, and never by two harnesses at once.

use std::env;
use std::ffi::{CStr, OsStr, OsString, c_char};

use tracing::debug;

/// Configuration accessor signature handed to shared-library models.
pub type EnvAccessor = unsafe extern "C" fn(*const c_char) -> *const c_char;

static EMPTY: &CStr = c"";

/// Looks up `key` in the process environment for model code.
///
/// Returns a pointer to the value, or to an empty string if the key is unset or null.
/// The returned pointer is valid until the environment is next modified.
///
/// # Safety
///
/// `key` must be null or point to a NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn get_env_value(key: *const c_char) -> *const c_char {
    if key.is_null() {
        return EMPTY.as_ptr();
    }
    // SAFETY: `key` is a valid C string per the caller contract; the environment is
    // only mutated by the harness thread that is also calling into the model.
    let value = unsafe { libc::getenv(key) };
    if value.is_null() {
        EMPTY.as_ptr()
    } else {
        value.cast_const()
    }
}

/// Reads `key` the way model code sees it: the value, or an empty string if unset.
pub fn env_value(key: &str) -> String {
    env::var_os(key)
        .map(|v| v.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Temporarily overrides one environment variable.
#[derive(Debug)]
#[must_use = "the previous value is restored when the guard is dropped"]
pub struct EnvGuard {
    key: String,
    saved: Option<OsString>,
    active: bool,
}

impl EnvGuard {
    /// Saves the current value of `key` and replaces it with `value`.
    ///
    /// `key` must be non-empty and contain neither `=` nor NUL; `Config::validate`
    /// checks this for configured keys.
    pub fn set(key: &str, value: &OsStr) -> Self {
        let saved = env::var_os(key);
        debug!(key, previous = ?saved, value = ?value, "publishing environment value");
        // SAFETY: the harness is single-threaded; no other thread reads or writes the
        // environment while the guard is alive.
        unsafe { env::set_var(key, value) };
        Self {
            key: key.to_string(),
            saved,
            active: true,
        }
    }

    /// The key this guard overrides.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The value the key had before the guard was created.
    pub fn saved(&self) -> Option<&OsStr> {
        self.saved.as_deref()
    }

    /// Restores the previous value now.
    pub fn restore(mut self) {
        self.restore_inner();
    }

    fn restore_inner(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        match &self.saved {
            // SAFETY: see `EnvGuard::set`.
            Some(previous) => unsafe { env::set_var(&self.key, previous) },
            // SAFETY: see `EnvGuard::set`.
            None => unsafe { env::remove_var(&self.key) },
        }
        debug!(key = %self.key, restored = ?self.saved, "environment value restored");
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        self.restore_inner();
    }
}
