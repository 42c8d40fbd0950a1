//! Errors raised by the environment and the extension loader.

use std::path::PathBuf;

use numera_core::AtomHandle;
use numera_numbers::NumeralError;
use thiserror::Error;

/// Errors from changing the built-in table.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EnvError {
    /// The name is already bound.
    #[error("built-in `{name}` is already registered by `{owner}`")]
    NameCollision {
        /// The contested name.
        name: String,
        /// The owner of the existing binding.
        owner: String,
    },

    /// No built-in has this name.
    #[error("no built-in named `{0}`")]
    UnknownFunction(String),
}

/// Errors from calling a built-in.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CallError {
    /// The numeric operation failed.
    #[error(transparent)]
    Numeral(#[from] NumeralError),

    /// Wrong number of arguments.
    #[error("`{name}` expects {expected} argument(s), got {found}")]
    Arity {
        /// The built-in called.
        name: String,
        /// Arguments it takes.
        expected: usize,
        /// Arguments it was given.
        found: usize,
    },

    /// No built-in has this name.
    #[error("no built-in named `{0}`")]
    UnknownFunction(String),

    /// An argument handle is not in the atom table.
    #[error("unknown atom {0}")]
    UnknownAtom(AtomHandle),
}

/// Errors from loading, opening and unloading extension modules.
///
/// Every failure leaves the environment as it was before the call.
#[derive(Debug, Error)]
pub enum ExtensionError {
    /// No file exists at the module path.
    #[error("extension module not found: {}", path.display())]
    ModuleNotFound {
        /// The path searched.
        path: PathBuf,
    },

    /// The dynamic loader rejected the file.
    #[error("failed to load extension module {}: {reason}", path.display())]
    LoadFailed {
        /// The module path.
        path: PathBuf,
        /// The loader's message.
        reason: String,
    },

    /// The module does not export its factory.
    #[error("extension module `{module}` does not export `{symbol}`")]
    MissingFactory {
        /// Module name.
        module: String,
        /// The factory symbol looked up.
        symbol: String,
    },

    /// The factory returned no plugin.
    #[error("factory of extension module `{module}` returned no plugin")]
    NullPlugin {
        /// Module name.
        module: String,
    },

    /// The plugin could not register its built-ins.
    #[error("extension module `{module}` failed to register")]
    Registration {
        /// Module name.
        module: String,
        /// The rejected registration.
        #[source]
        source: EnvError,
    },

    /// The module already has a registered plugin.
    #[error("extension module `{module}` is already loaded")]
    AlreadyLoaded {
        /// Module name.
        module: String,
    },

    /// No module with this name is loaded.
    #[error("extension module `{module}` is not loaded")]
    NotLoaded {
        /// Module name.
        module: String,
    },

    /// The module cannot be unloaded while its plugin is registered.
    #[error("extension module `{module}` still has a registered plugin; close it first")]
    StillRegistered {
        /// Module name.
        module: String,
    },

    /// The file name does not yield a usable module name.
    #[error("cannot derive a module name from {}", path.display())]
    InvalidModuleName {
        /// The module path.
        path: PathBuf,
    },

    /// The module name is the owner of the core built-ins.
    #[error("`{module}` owns the core built-ins and cannot name an extension module")]
    ReservedModuleName {
        /// Module name.
        module: String,
    },

    /// A module of the same name is already loaded from another file.
    #[error(
        "extension module `{module}` is loaded from {}, not {}",
        loaded.display(),
        requested.display()
    )]
    PathMismatch {
        /// Module name.
        module: String,
        /// The file the loaded module came from.
        loaded: PathBuf,
        /// The file asked for.
        requested: PathBuf,
    },
}
