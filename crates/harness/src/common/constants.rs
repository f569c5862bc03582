//! Harness-wide constants.
//!
//! Names shared between the harness, the environment bridge, and the C ABI
//! exported by shared-library circuit models.

/// Environment key through which the memory-image path reaches the model.
pub const DEFAULT_ENV_KEY: &str = "MEMORY_FILE_PATH";

/// Process exit status for a run that reached completion or its cycle budget.
pub const EXIT_SUCCESS: i32 = 0;

/// Process exit status for usage and configuration errors.
pub const EXIT_FAILURE: i32 = 1;

/// Symbol names exported by a shared-library circuit model.
pub mod symbols {
    /// `fn(accessor) -> *mut c_void`: constructs the model.
    pub const MODEL_NEW: &[u8] = b"vtb_model_new\0";
    /// `fn(handle, line: u32, value: u8)`: drives one input line.
    pub const MODEL_SET_INPUT: &[u8] = b"vtb_model_set_input\0";
    /// `fn(handle)`: evaluates the model once.
    pub const MODEL_EVAL: &[u8] = b"vtb_model_eval\0";
    /// `fn() -> u8`: framework-global completion flag.
    pub const MODEL_GOT_FINISH: &[u8] = b"vtb_model_got_finish\0";
    /// `fn(handle)`: runs end-of-simulation hooks.
    pub const MODEL_FINAL: &[u8] = b"vtb_model_final\0";
    /// `fn(handle)`: frees the model.
    pub const MODEL_DELETE: &[u8] = b"vtb_model_delete\0";
}
