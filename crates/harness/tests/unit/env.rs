//! # Environment Bridge Tests
//!
//! Save/set/restore behaviour of `EnvGuard` and the C-ABI accessor. Every test holds
//! the environment lock and uses its own key.

use crate::common::harness::{env_lock, remove_env, set_env};
use std::ffi::{CStr, OsStr};
use vtb_core::sim::env::{EnvGuard, env_value, get_env_value};

fn accessor(key: &CStr) -> String {
    // SAFETY: `key` is NUL-terminated and the environment lock is held.
    let ptr = unsafe { get_env_value(key.as_ptr()) };
    // SAFETY: the accessor never returns null.
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

#[test]
fn test_guard_restores_previous_value() {
    let _lock = env_lock();
    set_env("VTB_TEST_ENV_RESTORE", "X");

    let guard = EnvGuard::set("VTB_TEST_ENV_RESTORE", OsStr::new("/tmp/mem.hex"));
    assert_eq!(env_value("VTB_TEST_ENV_RESTORE"), "/tmp/mem.hex");
    assert_eq!(guard.saved(), Some(OsStr::new("X")));
    guard.restore();

    assert_eq!(env_value("VTB_TEST_ENV_RESTORE"), "X");
    remove_env("VTB_TEST_ENV_RESTORE");
}

#[test]
fn test_guard_removes_previously_absent_key() {
    let _lock = env_lock();
    remove_env("VTB_TEST_ENV_ABSENT");

    let guard = EnvGuard::set("VTB_TEST_ENV_ABSENT", OsStr::new("/tmp/mem.hex"));
    assert_eq!(guard.saved(), None);
    assert!(std::env::var_os("VTB_TEST_ENV_ABSENT").is_some());
    drop(guard);

    assert!(std::env::var_os("VTB_TEST_ENV_ABSENT").is_none());
}

#[test]
fn test_guard_restores_on_drop() {
    let _lock = env_lock();
    set_env("VTB_TEST_ENV_DROP", "before");
    {
        let guard = EnvGuard::set("VTB_TEST_ENV_DROP", OsStr::new("during"));
        assert_eq!(guard.key(), "VTB_TEST_ENV_DROP");
        assert_eq!(env_value("VTB_TEST_ENV_DROP"), "during");
    }
    assert_eq!(env_value("VTB_TEST_ENV_DROP"), "before");
    remove_env("VTB_TEST_ENV_DROP");
}

#[test]
fn test_env_value_unset_is_empty() {
    let _lock = env_lock();
    remove_env("VTB_TEST_ENV_UNSET");
    assert_eq!(env_value("VTB_TEST_ENV_UNSET"), "");
}

#[test]
fn test_accessor_reads_published_value() {
    let _lock = env_lock();
    let guard = EnvGuard::set("VTB_TEST_ENV_ACCESSOR", OsStr::new("/abs/mem.hex"));
    assert_eq!(accessor(c"VTB_TEST_ENV_ACCESSOR"), "/abs/mem.hex");
    guard.restore();
}

#[test]
fn test_accessor_unset_key_is_empty_string() {
    let _lock = env_lock();
    remove_env("VTB_TEST_ENV_ACCESSOR_UNSET");
    assert_eq!(accessor(c"VTB_TEST_ENV_ACCESSOR_UNSET"), "");
}

#[test]
fn test_accessor_null_key_is_empty_string() {
    // SAFETY: null is explicitly allowed.
    let ptr = unsafe { get_env_value(std::ptr::null()) };
    assert!(!ptr.is_null());
    // SAFETY: non-null, NUL-terminated.
    assert!(unsafe { CStr::from_ptr(ptr) }.is_empty());
}
