//! The evaluation environment's table of built-in functions.
//!
//! Every binding records its owner: `"core"` for the numeric built-ins, or
//! the module name for functions added by an extension. Owners can only
//! remove their own bindings, and a batch of registrations either binds every
//! name or none.

use std::sync::Arc;

use hashbrown::HashMap;
use numera_core::{AtomHandle, AtomTable};
use numera_numbers::Precision;

use crate::config::EnvironmentConfig;
use crate::error::{CallError, EnvError};

/// A built-in function: evaluates interned arguments to an interned result.
pub type BuiltinFn = fn(&Environment, &[AtomHandle]) -> Result<AtomHandle, CallError>;

#[derive(Clone)]
struct Builtin {
    func: BuiltinFn,
    owner: String,
}

/// Built-in functions plus the atom table and precision they evaluate with.
pub struct Environment {
    builtins: HashMap<String, Builtin>,
    atoms: Arc<AtomTable>,
    precision: Precision,
}

impl Environment {
    /// Creates an environment with no built-ins.
    #[must_use]
    pub fn new(atoms: Arc<AtomTable>, config: EnvironmentConfig) -> Self {
        Self {
            builtins: HashMap::new(),
            atoms,
            precision: config.precision,
        }
    }

    /// Creates an environment with the core numeric built-ins bound.
    #[must_use]
    pub fn with_core_builtins(atoms: Arc<AtomTable>, config: EnvironmentConfig) -> Self {
        let mut env = Self::new(atoms, config);
        for &(name, func) in crate::builtins::CORE_BUILTINS {
            env.builtins.insert(
                name.to_string(),
                Builtin {
                    func,
                    owner: crate::builtins::CORE_OWNER.to_string(),
                },
            );
        }
        env
    }

    /// Returns the shared atom table.
    #[must_use]
    pub fn atoms(&self) -> &AtomTable {
        &self.atoms
    }

    /// Returns the precision passed to numeric built-ins.
    #[must_use]
    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Changes the precision passed to numeric built-ins.
    pub fn set_precision(&mut self, precision: Precision) {
        self.precision = precision;
    }

    /// Returns the number of bound built-ins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.builtins.len()
    }

    /// Returns true if no built-ins are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.builtins.is_empty()
    }

    /// Returns true if `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.builtins.contains_key(name)
    }

    /// Returns the owner of the binding for `name`.
    #[must_use]
    pub fn owner_of(&self, name: &str) -> Option<&str> {
        self.builtins.get(name).map(|b| b.owner.as_str())
    }

    /// Returns the names bound by `owner`, sorted.
    #[must_use]
    pub fn names_owned_by(&self, owner: &str) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .builtins
            .iter()
            .filter(|(_, b)| b.owner == owner)
            .map(|(name, _)| name.as_str())
            .collect();
        names.sort_unstable();
        names
    }

    /// Binds every entry to `owner`, or none of them.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::NameCollision`] if any name is already bound or
    /// appears twice in the batch. The environment is then unchanged.
    pub fn register_all<I, N>(&mut self, owner: &str, entries: I) -> Result<usize, EnvError>
    where
        I: IntoIterator<Item = (N, BuiltinFn)>,
        N: Into<String>,
    {
        let mut batch: Vec<(String, BuiltinFn)> = Vec::new();
        for (name, func) in entries {
            let name = name.into();
            if let Some(existing) = self.builtins.get(&name) {
                log::warn!("`{owner}` cannot bind `{name}`: already bound by `{}`", existing.owner);
                return Err(EnvError::NameCollision {
                    name,
                    owner: existing.owner.clone(),
                });
            }
            if batch.iter().any(|(staged, _)| *staged == name) {
                return Err(EnvError::NameCollision {
                    name,
                    owner: owner.to_string(),
                });
            }
            batch.push((name, func));
        }

        let count = batch.len();
        for (name, func) in batch {
            self.builtins.insert(
                name,
                Builtin {
                    func,
                    owner: owner.to_string(),
                },
            );
        }
        log::debug!("`{owner}` bound {count} built-in(s)");
        Ok(count)
    }

    /// Binds a single built-in to `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::NameCollision`] if the name is already bound.
    pub fn register(&mut self, owner: &str, name: &str, func: BuiltinFn) -> Result<(), EnvError> {
        self.register_all(owner, [(name, func)]).map(|_| ())
    }

    /// Removes `name` if `owner` bound it. Returns whether it was removed.
    pub fn unregister(&mut self, owner: &str, name: &str) -> bool {
        match self.builtins.get(name) {
            Some(b) if b.owner == owner => {
                self.builtins.remove(name);
                true
            }
            _ => false,
        }
    }

    /// Removes everything `owner` bound. Returns the number removed.
    pub fn unregister_owner(&mut self, owner: &str) -> usize {
        let before = self.builtins.len();
        self.builtins.retain(|_, b| b.owner != owner);
        let removed = before - self.builtins.len();
        if removed > 0 {
            log::debug!("`{owner}` unbound {removed} built-in(s)");
        }
        removed
    }

    /// Calls the built-in bound to `name`.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::UnknownFunction`] for unbound names, or the
    /// built-in's own error.
    pub fn call(&self, name: &str, args: &[AtomHandle]) -> Result<AtomHandle, CallError> {
        let func = self
            .builtins
            .get(name)
            .map(|b| b.func)
            .ok_or_else(|| CallError::UnknownFunction(name.to_string()))?;
        func(self, args)
    }

    /// Interns `args`, calls `name` and returns the result text.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`call`](Self::call).
    pub fn call_text(&self, name: &str, args: &[&str]) -> Result<Arc<str>, CallError> {
        let handles: Vec<AtomHandle> = args.iter().map(|text| self.atoms.lookup(text)).collect();
        let result = self.call(name, &handles)?;
        self.atoms.text(result).ok_or(CallError::UnknownAtom(result))
    }

    /// Returns the text of exactly `N` arguments.
    ///
    /// # Errors
    ///
    /// Returns [`CallError::Arity`] for the wrong number of arguments and
    /// [`CallError::UnknownAtom`] for handles missing from the table.
    pub fn operands<const N: usize>(&self, name: &str, args: &[AtomHandle]) -> Result<[Arc<str>; N], CallError> {
        let arity = || CallError::Arity {
            name: name.to_string(),
            expected: N,
            found: args.len(),
        };
        if args.len() != N {
            return Err(arity());
        }
        let texts = args
            .iter()
            .map(|&h| self.atoms.text(h).ok_or(CallError::UnknownAtom(h)))
            .collect::<Result<Vec<_>, _>>()?;
        texts.try_into().map_err(|_| arity())
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("builtins", &self.builtins.len())
            .field("atoms", &self.atoms.len())
            .field("precision", &self.precision)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo(env: &Environment, args: &[AtomHandle]) -> Result<AtomHandle, CallError> {
        let [x] = env.operands::<1>("Echo", args)?;
        Ok(env.atoms().lookup(&x))
    }

    fn env() -> Environment {
        Environment::new(Arc::new(AtomTable::new()), EnvironmentConfig::default())
    }

    #[test]
    fn test_register_and_call() {
        let mut env = env();
        env.register("test", "Echo", echo).unwrap();
        assert_eq!(env.owner_of("Echo"), Some("test"));
        assert_eq!(&*env.call_text("Echo", &["42"]).unwrap(), "42");
    }

    #[test]
    fn test_arity_and_unknown() {
        let mut env = env();
        env.register("test", "Echo", echo).unwrap();
        assert!(matches!(
            env.call_text("Echo", &["1", "2"]),
            Err(CallError::Arity { expected: 1, found: 2, .. })
        ));
        assert_eq!(
            env.call_text("Missing", &[]),
            Err(CallError::UnknownFunction("Missing".to_string()))
        );
    }

    #[test]
    fn test_batch_is_atomic() {
        let mut env = env();
        env.register("first", "Taken", echo).unwrap();
        let result = env.register_all("second", [("Fresh", echo as BuiltinFn), ("Taken", echo)]);
        assert_eq!(
            result,
            Err(EnvError::NameCollision {
                name: "Taken".to_string(),
                owner: "first".to_string(),
            })
        );
        assert!(!env.contains("Fresh"));
        assert_eq!(env.owner_of("Taken"), Some("first"));

        let duplicate = env.register_all("second", [("Twice", echo as BuiltinFn), ("Twice", echo)]);
        assert!(duplicate.is_err());
        assert!(!env.contains("Twice"));
    }

    #[test]
    fn test_owners_are_isolated() {
        let mut env = env();
        env.register("a", "One", echo).unwrap();
        env.register("b", "Two", echo).unwrap();
        assert!(!env.unregister("b", "One"));
        assert_eq!(env.unregister_owner("a"), 1);
        assert_eq!(env.unregister_owner("a"), 0);
        assert_eq!(env.names_owned_by("b"), vec!["Two"]);
    }
}
