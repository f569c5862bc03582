//! Shared-library circuit model backend.
//!
//! Loads a circuit model compiled into a native shared library, typically a
//! Verilator-generated model wrapped in a small C shim. The library exports the
//! `vtb_model_*` functions listed in `common::constants::symbols`.
//!
//! The library's completion flag is framework-global; this adapter samples it after
//! every evaluation and converts it into a sticky per-call `CompletionState`.

use std::ffi::c_void;
use std::path::{Path, PathBuf};

use libloading::Library;
use tracing::debug;

use super::{CircuitModel, ModelConfig, ModelFactory};
use crate::common::constants::symbols;
use crate::common::error::ModelError;
use crate::common::signal::{CompletionState, InputLine};
use crate::sim::env::{EnvAccessor, get_env_value};

type NewFn = unsafe extern "C" fn(EnvAccessor) -> *mut c_void;
type SetInputFn = unsafe extern "C" fn(*mut c_void, u32, u8);
type HandleFn = unsafe extern "C" fn(*mut c_void);
type GotFinishFn = unsafe extern "C" fn() -> u8;

/// Entry points resolved from the model library.
#[derive(Clone, Copy, Debug)]
struct ModelVTable {
    new: NewFn,
    set_input: SetInputFn,
    eval: HandleFn,
    got_finish: GotFinishFn,
    finalize: HandleFn,
    delete: HandleFn,
}

impl ModelVTable {
    /// Resolves every required symbol from `lib`.
    ///
    /// # Safety
    ///
    /// The library must export the symbols with the signatures documented in
    /// `common::constants::symbols`.
    unsafe fn resolve(lib: &Library) -> Result<Self, ModelError> {
        // SAFETY: signatures are part of the model ABI contract upheld by the caller.
        unsafe {
            Ok(Self {
                new: lookup::<NewFn>(lib, symbols::MODEL_NEW)?,
                set_input: lookup::<SetInputFn>(lib, symbols::MODEL_SET_INPUT)?,
                eval: lookup::<HandleFn>(lib, symbols::MODEL_EVAL)?,
                got_finish: lookup::<GotFinishFn>(lib, symbols::MODEL_GOT_FINISH)?,
                finalize: lookup::<HandleFn>(lib, symbols::MODEL_FINAL)?,
                delete: lookup::<HandleFn>(lib, symbols::MODEL_DELETE)?,
            })
        }
    }
}

/// Looks up one function symbol and copies the function pointer out.
///
/// # Safety
///
/// `T` must match the exported symbol's real type.
unsafe fn lookup<T: Copy>(lib: &Library, name: &[u8]) -> Result<T, ModelError> {
    // SAFETY: forwarded to the caller.
    let symbol = unsafe { lib.get::<T>(name) }.map_err(|source| ModelError::MissingSymbol {
        symbol: String::from_utf8_lossy(name.strip_suffix(b"\0").unwrap_or(name)).into_owned(),
        source,
    })?;
    Ok(*symbol)
}

/// A circuit model living in a dynamically loaded shared library.
///
/// The model handle is deleted on drop; the library stays loaded until after that.
#[derive(Debug)]
pub struct SharedLibraryModel {
    handle: *mut c_void,
    vtable: ModelVTable,
    completion: CompletionState,
    // Declared last so it is unloaded after the handle is deleted.
    _lib: Library,
}

impl SharedLibraryModel {
    /// Loads the library at `path` and constructs one model instance.
    ///
    /// The constructor receives `get_env_value` as its configuration accessor, so it can
    /// read the memory-image path published by the environment bridge.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::Load` if the library cannot be opened, `MissingSymbol` if an
    /// entry point is absent, and `NullHandle` if construction fails.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        // SAFETY: loading runs the library's initializers; the model library is trusted
        // native code supplied by the user.
        let lib = unsafe { Library::new(path) }.map_err(|source| ModelError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        // SAFETY: the library implements the vtb model ABI.
        let vtable = unsafe { ModelVTable::resolve(&lib)? };
        // SAFETY: `get_env_value` matches `EnvAccessor` and lives for the whole process.
        let handle = unsafe { (vtable.new)(get_env_value) };
        if handle.is_null() {
            return Err(ModelError::NullHandle {
                path: path.to_path_buf(),
            });
        }
        debug!(library = %path.display(), "model constructed");
        Ok(Self {
            handle,
            vtable,
            completion: CompletionState::Running,
            _lib: lib,
        })
    }
}

impl CircuitModel for SharedLibraryModel {
    fn set_input(&mut self, line: InputLine, value: bool) {
        // SAFETY: `handle` is a live model created by `vtable.new`.
        unsafe { (self.vtable.set_input)(self.handle, line.abi_index(), u8::from(value)) };
    }

    fn evaluate(&mut self) -> CompletionState {
        // SAFETY: `handle` is a live model created by `vtable.new`.
        unsafe { (self.vtable.eval)(self.handle) };
        if !self.completion.is_finished() {
            // SAFETY: takes no arguments; reads the library's global flag.
            let flag = unsafe { (self.vtable.got_finish)() };
            self.completion = CompletionState::from_flag(flag != 0);
        }
        self.completion
    }

    fn finalize(&mut self) {
        // SAFETY: `handle` is a live model created by `vtable.new`.
        unsafe { (self.vtable.finalize)(self.handle) };
    }
}

impl Drop for SharedLibraryModel {
    fn drop(&mut self) {
        // SAFETY: `handle` is live and deleted exactly once; `_lib` is still loaded.
        unsafe { (self.vtable.delete)(self.handle) };
    }
}

/// Factory that loads a `SharedLibraryModel` from a fixed path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SharedLibraryFactory {
    path: PathBuf,
}

impl SharedLibraryFactory {
    /// Creates a factory for the library at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ModelFactory<SharedLibraryModel> for SharedLibraryFactory {
    fn build(self, config: &ModelConfig) -> Result<SharedLibraryModel, ModelError> {
        debug!(
            library = %self.path.display(),
            memory = %config.memory_image_path().display(),
            env_key = config.env_key(),
            "loading model library"
        );
        SharedLibraryModel::load(&self.path)
    }
}
