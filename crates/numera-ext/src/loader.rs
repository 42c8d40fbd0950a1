//! Native extension modules.
//!
//! A [`NativeModule`] moves through three states:
//!
//! ```text
//! unloaded --load--> loaded, no plugin --open--> loaded, plugin registered
//!    ^                     |     ^                        |
//!    +------unload---------+     +---------close----------+
//! ```
//!
//! The library mapping is released only in the "no plugin" state, so no
//! registered built-in can point into unmapped code.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use libloading::Library;

use crate::builtins::CORE_OWNER;
use crate::config::LoaderConfig;
use crate::environment::Environment;
use crate::error::ExtensionError;
use crate::plugin::{PluginBox, PluginFactory, Registrar};

/// Symbol lookup in a loaded module.
pub trait ModuleLibrary {
    /// Returns the plugin factory exported as `symbol`, if any.
    fn factory(&self, symbol: &str) -> Option<PluginFactory>;
}

impl ModuleLibrary for Library {
    fn factory(&self, symbol: &str) -> Option<PluginFactory> {
        let mut name = Vec::with_capacity(symbol.len() + 1);
        name.extend_from_slice(symbol.as_bytes());
        name.push(0);
        // SAFETY: `make_*` symbols are emitted by `export_plugin!` with the
        // `PluginFactory` signature.
        unsafe { self.get::<PluginFactory>(&name) }.ok().map(|sym| *sym)
    }
}

/// Returns the module name of `path`: the file stem without the platform
/// library prefix.
///
/// # Errors
///
/// Returns [`ExtensionError::InvalidModuleName`] unless the name is a
/// non-empty run of ASCII letters, digits and underscores, and
/// [`ExtensionError::ReservedModuleName`] for the core owner's name.
pub fn module_name(path: &Path) -> Result<String, ExtensionError> {
    let stem = path.file_stem().and_then(OsStr::to_str).unwrap_or_default();
    let name = stem.strip_prefix(std::env::consts::DLL_PREFIX).unwrap_or(stem);
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ExtensionError::InvalidModuleName {
            path: path.to_path_buf(),
        });
    }
    check_not_reserved(name)?;
    Ok(name.to_string())
}

fn check_not_reserved(name: &str) -> Result<(), ExtensionError> {
    if name == CORE_OWNER {
        log::warn!("refusing extension module named `{name}`");
        return Err(ExtensionError::ReservedModuleName {
            module: name.to_string(),
        });
    }
    Ok(())
}

fn same_file(a: &Path, b: &Path) -> bool {
    a == b || matches!((a.canonicalize(), b.canonicalize()), (Ok(a), Ok(b)) if a == b)
}

/// A loaded extension module and the plugin it produced, if open.
pub struct NativeModule<L = Library> {
    name: String,
    path: PathBuf,
    plugin: Option<PluginBox>,
    library: Option<L>,
}

impl NativeModule {
    /// Maps the module at `path` without opening it.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::ModuleNotFound`] for a missing file,
    /// [`ExtensionError::InvalidModuleName`] for an unusable file name, and
    /// [`ExtensionError::LoadFailed`] if the dynamic loader rejects the file.
    pub fn load(path: &Path) -> Result<Self, ExtensionError> {
        let name = module_name(path)?;
        if !path.exists() {
            log::warn!("extension module {} does not exist", path.display());
            return Err(ExtensionError::ModuleNotFound {
                path: path.to_path_buf(),
            });
        }

        // SAFETY: loading runs the module's initializers. Modules are trusted
        // code built against this crate.
        let library = unsafe { Library::new(path) }.map_err(|e| {
            log::warn!("failed to load {}: {e}", path.display());
            ExtensionError::LoadFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;

        log::info!("loaded extension module `{name}` from {}", path.display());
        Ok(Self::from_library(name, path, library))
    }
}

impl<L: ModuleLibrary> NativeModule<L> {
    /// Wraps an already loaded library.
    pub fn from_library(name: impl Into<String>, path: impl Into<PathBuf>, library: L) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            plugin: None,
            library: Some(library),
        }
    }

    /// The module name; also the owner of its built-ins.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file the module was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns true while a plugin is registered.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.plugin.is_some()
    }

    /// The registered plugin's own name.
    #[must_use]
    pub fn plugin_name(&self) -> Option<&str> {
        self.plugin.as_deref().map(|plugin| plugin.name())
    }

    /// Creates the plugin and registers its built-ins. Returns the number of
    /// built-ins bound.
    ///
    /// On error the environment is unchanged and no plugin is held.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::AlreadyLoaded`] if a plugin is registered,
    /// [`ExtensionError::ReservedModuleName`] for a module named after the
    /// core owner, [`ExtensionError::MissingFactory`] or
    /// [`ExtensionError::NullPlugin`] if the module yields no plugin, and
    /// [`ExtensionError::Registration`] if the plugin's built-ins cannot be
    /// bound.
    pub fn open(&mut self, env: &mut Environment) -> Result<usize, ExtensionError> {
        check_not_reserved(&self.name)?;
        if self.plugin.is_some() {
            return Err(ExtensionError::AlreadyLoaded {
                module: self.name.clone(),
            });
        }
        let library = self.library.as_ref().ok_or_else(|| ExtensionError::NotLoaded {
            module: self.name.clone(),
        })?;

        let symbol = format!("make_{}", self.name);
        let Some(factory) = library.factory(&symbol) else {
            log::warn!("extension module `{}` does not export `{symbol}`", self.name);
            return Err(ExtensionError::MissingFactory {
                module: self.name.clone(),
                symbol,
            });
        };
        log::debug!("resolved `{symbol}` in {}", self.path.display());

        // SAFETY: the factory has the `export_plugin!` signature and takes no
        // arguments.
        let raw = unsafe { factory() };
        if raw.is_null() {
            log::warn!("`{symbol}` returned no plugin");
            return Err(ExtensionError::NullPlugin {
                module: self.name.clone(),
            });
        }
        // SAFETY: non-null factory results come from `Box::into_raw` and are
        // handed over exactly once.
        let plugin = *unsafe { Box::from_raw(raw) };

        let mut registrar = Registrar::new(env, &self.name);
        let bound = match plugin.add(&mut registrar) {
            Ok(()) => registrar.commit(),
            Err(err) => Err(err),
        };
        match bound {
            Ok(count) => {
                log::info!(
                    "opened extension module `{}` (plugin `{}`, {count} built-in(s))",
                    self.name,
                    plugin.name()
                );
                self.plugin = Some(plugin);
                Ok(count)
            }
            Err(source) => {
                log::warn!("extension module `{}` failed to register: {source}", self.name);
                Err(ExtensionError::Registration {
                    module: self.name.clone(),
                    source,
                })
            }
        }
    }

    /// Unregisters and destroys the plugin. Returns whether one was present.
    pub fn close(&mut self, env: &mut Environment) -> bool {
        let Some(plugin) = self.plugin.take() else {
            return false;
        };
        plugin.remove(&mut Registrar::new(env, &self.name));
        let swept = env.unregister_owner(&self.name);
        if swept > 0 {
            log::debug!("swept {swept} built-in(s) left behind by `{}`", self.name);
        }
        drop(plugin);
        log::info!("closed extension module `{}`", self.name);
        true
    }
}

impl<L> Drop for NativeModule<L> {
    fn drop(&mut self) {
        if let Some(plugin) = self.plugin.take() {
            log::error!(
                "extension module `{}` dropped while its plugin is registered; leaking {}",
                self.name,
                self.path.display()
            );
            drop(plugin);
            std::mem::forget(self.library.take());
        }
    }
}

impl<L> std::fmt::Debug for NativeModule<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeModule")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("open", &self.plugin.is_some())
            .finish_non_exhaustive()
    }
}

/// Loaded extension modules, by module name.
pub struct ExtensionRegistry<L = Library> {
    modules: HashMap<String, NativeModule<L>>,
    config: LoaderConfig,
}

impl<L: ModuleLibrary> ExtensionRegistry<L> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            modules: HashMap::new(),
            config,
        }
    }

    /// The search configuration.
    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Opens `module` and takes it over. Returns the module name.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::AlreadyLoaded`] if a module of the same name
    /// is loaded, or the error of [`NativeModule::open`]. The module is
    /// dropped on error.
    pub fn adopt(&mut self, mut module: NativeModule<L>, env: &mut Environment) -> Result<String, ExtensionError> {
        if self.modules.contains_key(module.name()) {
            return Err(ExtensionError::AlreadyLoaded {
                module: module.name().to_string(),
            });
        }
        module.open(env)?;
        let name = module.name().to_string();
        self.modules.insert(name.clone(), module);
        Ok(name)
    }

    /// Opens a loaded module whose plugin was closed.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::NotLoaded`] for unknown modules, or the
    /// error of [`NativeModule::open`].
    pub fn reopen(&mut self, name: &str, env: &mut Environment) -> Result<usize, ExtensionError> {
        self.module_mut(name)?.open(env)
    }

    /// Closes the plugin of module `name`. Returns whether one was present.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::NotLoaded`] for unknown modules.
    pub fn close(&mut self, name: &str, env: &mut Environment) -> Result<bool, ExtensionError> {
        Ok(self.module_mut(name)?.close(env))
    }

    /// Releases module `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::StillRegistered`] while its plugin is open,
    /// and [`ExtensionError::NotLoaded`] for unknown modules.
    pub fn unload(&mut self, name: &str) -> Result<(), ExtensionError> {
        if self.module_mut(name)?.is_open() {
            return Err(ExtensionError::StillRegistered {
                module: name.to_string(),
            });
        }
        if let Some(module) = self.modules.remove(name) {
            log::info!("unloaded extension module `{name}` from {}", module.path().display());
        }
        Ok(())
    }

    /// Closes every open plugin. Returns the number closed.
    pub fn close_all(&mut self, env: &mut Environment) -> usize {
        self.modules.values_mut().map(|module| module.close(env)).filter(|&closed| closed).count()
    }

    /// Names of loaded modules, sorted.
    #[must_use]
    pub fn loaded_modules(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.modules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns true if module `name` is loaded with a registered plugin.
    #[must_use]
    pub fn is_open(&self, name: &str) -> bool {
        self.modules.get(name).is_some_and(NativeModule::is_open)
    }

    /// Returns module `name`.
    #[must_use]
    pub fn module(&self, name: &str) -> Option<&NativeModule<L>> {
        self.modules.get(name)
    }

    fn module_mut(&mut self, name: &str) -> Result<&mut NativeModule<L>, ExtensionError> {
        self.modules.get_mut(name).ok_or_else(|| ExtensionError::NotLoaded {
            module: name.to_string(),
        })
    }
}

impl ExtensionRegistry {
    /// Creates an empty registry searching `NUMERA_PLUGIN_PATH`.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(LoaderConfig::from_env())
    }

    /// Loads and opens the module at `path`. Returns the module name.
    ///
    /// A module that is loaded from the same file but closed is reopened
    /// instead of mapped again. On error the registry and environment are
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::PathMismatch`] if a module of the same name
    /// came from another file, or the errors of [`NativeModule::load`] and
    /// [`NativeModule::open`].
    pub fn open(&mut self, path: &Path, env: &mut Environment) -> Result<String, ExtensionError> {
        let name = module_name(path)?;
        if let Some(loaded) = self.modules.get(&name) {
            if !same_file(loaded.path(), path) {
                log::warn!(
                    "extension module `{name}` is already loaded from {}",
                    loaded.path().display()
                );
                return Err(ExtensionError::PathMismatch {
                    module: name,
                    loaded: loaded.path().to_path_buf(),
                    requested: path.to_path_buf(),
                });
            }
            self.reopen(&name, env)?;
            return Ok(name);
        }
        let module = NativeModule::load(path)?;
        self.adopt(module, env)
    }

    /// Finds module `name` on the search paths and opens it.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::ModuleNotFound`] if no search path holds
    /// the module, or the errors of [`open`](Self::open).
    pub fn open_named(&mut self, name: &str, env: &mut Environment) -> Result<String, ExtensionError> {
        let path = self.config.resolve(name).ok_or_else(|| {
            log::warn!("extension module `{name}` not found on the search path");
            ExtensionError::ModuleNotFound {
                path: PathBuf::from(LoaderConfig::file_name(name)),
            }
        })?;
        self.open(&path, env)
    }
}

impl<L> std::fmt::Debug for ExtensionRegistry<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("modules", &self.modules.values().collect::<Vec<_>>())
            .field("config", &self.config)
            .finish()
    }
}
