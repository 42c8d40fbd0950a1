//! The extension plugin contract.
//!
//! An extension module exports one factory, `make_<module name>`, that returns
//! a heap-allocated [`PluginBox`]. The loader calls [`Plugin::add`] once after
//! loading and [`Plugin::remove`] once before unloading. Both receive a
//! [`Registrar`] scoped to the module, so a plugin can only touch its own
//! bindings.
//!
//! ```ignore
//! use numera_ext::{export_plugin, EnvError, Plugin, Registrar};
//!
//! struct Doubler;
//!
//! impl Plugin for Doubler {
//!     fn name(&self) -> &str {
//!         "doubler"
//!     }
//!
//!     fn add(&self, registrar: &mut Registrar<'_>) -> Result<(), EnvError> {
//!         registrar.register("Double", double)
//!     }
//! }
//!
//! export_plugin!(make_doubler, Doubler);
//! ```
//!
//! The factory crosses the module boundary as a Rust trait object, so modules
//! must be built by the same compiler as the host.

use crate::environment::{BuiltinFn, Environment};
use crate::error::EnvError;

/// A native extension.
pub trait Plugin {
    /// Human-readable plugin name.
    fn name(&self) -> &str;

    /// Registers the plugin's built-ins.
    ///
    /// Registrations are staged and only bound once `add` returns `Ok`, so a
    /// failing `add` leaves the environment unchanged.
    ///
    /// # Errors
    ///
    /// Returns the first rejected registration.
    fn add(&self, registrar: &mut Registrar<'_>) -> Result<(), EnvError>;

    /// Unregisters the plugin's built-ins. Removes everything the module owns
    /// by default.
    fn remove(&self, registrar: &mut Registrar<'_>) {
        registrar.unregister_all();
    }
}

/// A boxed plugin, as produced by a module factory.
pub type PluginBox = Box<dyn Plugin>;

/// The factory every extension module exports. Null means "no plugin".
pub type PluginFactory = unsafe extern "C" fn() -> *mut PluginBox;

/// Exports `$factory` as the module's plugin factory.
///
/// The factory name must be `make_` followed by the module's file name
/// without platform prefix or extension.
#[macro_export]
macro_rules! export_plugin {
    ($factory:ident, $plugin:expr) => {
        #[no_mangle]
        #[allow(improper_ctypes_definitions)]
        pub extern "C" fn $factory() -> *mut $crate::PluginBox {
            let plugin: $crate::PluginBox = ::std::boxed::Box::new($plugin);
            ::std::boxed::Box::into_raw(::std::boxed::Box::new(plugin))
        }
    };
}

/// A plugin's view of the environment, scoped to one owner.
pub struct Registrar<'a> {
    env: &'a mut Environment,
    owner: &'a str,
    staged: Vec<(String, BuiltinFn)>,
}

impl<'a> Registrar<'a> {
    /// Creates a registrar acting for `owner`.
    pub fn new(env: &'a mut Environment, owner: &'a str) -> Self {
        Self {
            env,
            owner,
            staged: Vec::new(),
        }
    }

    /// The owner this registrar acts for.
    #[must_use]
    pub fn owner(&self) -> &str {
        self.owner
    }

    /// The environment, read-only.
    #[must_use]
    pub fn environment(&self) -> &Environment {
        self.env
    }

    /// Stages a built-in for binding.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::NameCollision`] if the name is bound or already
    /// staged.
    pub fn register(&mut self, name: &str, func: BuiltinFn) -> Result<(), EnvError> {
        if let Some(owner) = self.env.owner_of(name) {
            return Err(EnvError::NameCollision {
                name: name.to_string(),
                owner: owner.to_string(),
            });
        }
        if self.staged.iter().any(|(staged, _)| staged == name) {
            return Err(EnvError::NameCollision {
                name: name.to_string(),
                owner: self.owner.to_string(),
            });
        }
        self.staged.push((name.to_string(), func));
        Ok(())
    }

    /// Removes one of this owner's built-ins.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.staged.retain(|(staged, _)| staged != name);
        self.env.unregister(self.owner, name)
    }

    /// Removes all of this owner's built-ins.
    pub fn unregister_all(&mut self) -> usize {
        self.staged.clear();
        self.env.unregister_owner(self.owner)
    }

    /// Binds everything staged. Returns the number bound.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::NameCollision`] if a staged name was bound in the
    /// meantime; nothing is bound then.
    pub fn commit(self) -> Result<usize, EnvError> {
        self.env.register_all(self.owner, self.staged)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use numera_core::{AtomHandle, AtomTable};

    use super::*;
    use crate::config::EnvironmentConfig;
    use crate::error::CallError;

    fn zero(env: &Environment, _: &[AtomHandle]) -> Result<AtomHandle, CallError> {
        Ok(env.atoms().lookup("0"))
    }

    struct Pair;

    impl Plugin for Pair {
        fn name(&self) -> &str {
            "pair"
        }

        fn add(&self, registrar: &mut Registrar<'_>) -> Result<(), EnvError> {
            registrar.register("First", zero)?;
            registrar.register("Second", zero)
        }
    }

    fn env() -> Environment {
        Environment::new(Arc::new(AtomTable::new()), EnvironmentConfig::default())
    }

    #[test]
    fn test_staged_until_commit() {
        let mut env = env();
        let mut registrar = Registrar::new(&mut env, "pair");
        Pair.add(&mut registrar).unwrap();
        assert!(!registrar.environment().contains("First"));
        assert_eq!(registrar.commit(), Ok(2));
        assert_eq!(env.names_owned_by("pair"), vec!["First", "Second"]);
    }

    #[test]
    fn test_collision_with_other_owner() {
        let mut env = env();
        env.register("core", "Second", zero).unwrap();
        let mut registrar = Registrar::new(&mut env, "pair");
        let err = Pair.add(&mut registrar).unwrap_err();
        assert_eq!(
            err,
            EnvError::NameCollision {
                name: "Second".to_string(),
                owner: "core".to_string(),
            }
        );
        drop(registrar);
        assert!(!env.contains("First"));
    }

    #[test]
    fn test_default_remove() {
        let mut env = env();
        let mut registrar = Registrar::new(&mut env, "pair");
        Pair.add(&mut registrar).unwrap();
        registrar.commit().unwrap();
        env.register("other", "Third", zero).unwrap();

        Pair.remove(&mut Registrar::new(&mut env, "pair"));
        assert!(env.names_owned_by("pair").is_empty());
        assert!(env.contains("Third"));
    }
}
