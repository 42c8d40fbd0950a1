//! The atom interning table.
//!
//! Every piece of numeral text the evaluator sees is interned here exactly once.
//! The table only grows: there is no way to remove an atom, so a handle stays
//! valid for the lifetime of the table.
//!
//! Lookups of text that is already present take a shared lock; inserting new
//! text takes the exclusive lock, so insertions are serialized while concurrent
//! readers proceed.

use hashbrown::HashMap;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::handle::AtomHandle;

#[derive(Debug, Default)]
struct Atoms {
    /// Maps text to its handle.
    map: HashMap<Arc<str>, AtomHandle>,
    /// Stores text by handle index for reverse lookup.
    texts: Vec<Arc<str>>,
}

/// A deduplicating, append-only table mapping text to canonical handles.
#[derive(Debug, Default)]
pub struct AtomTable {
    atoms: RwLock<Atoms>,
}

impl AtomTable {
    /// Creates a new empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            atoms: RwLock::new(Atoms {
                map: HashMap::with_capacity(capacity),
                texts: Vec::with_capacity(capacity),
            }),
        }
    }

    /// Interns `text`, returning its canonical handle.
    ///
    /// Equal text always yields the identical handle.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` distinct atoms are interned.
    pub fn lookup(&self, text: &str) -> AtomHandle {
        if let Some(&handle) = self.atoms.read().map.get(text) {
            return handle;
        }

        let mut atoms = self.atoms.write();
        // Another writer may have inserted the text between the two locks.
        if let Some(&handle) = atoms.map.get(text) {
            return handle;
        }

        let index = atoms.texts.len();
        assert!(index < u32::MAX as usize, "atom table capacity exceeded");

        let handle = AtomHandle::new(index as u32);
        let text: Arc<str> = Arc::from(text);
        atoms.texts.push(Arc::clone(&text));
        atoms.map.insert(text, handle);
        handle
    }

    /// Returns the handle of `text` if it has already been interned.
    #[must_use]
    pub fn get(&self, text: &str) -> Option<AtomHandle> {
        self.atoms.read().map.get(text).copied()
    }

    /// Returns the text of an atom.
    #[must_use]
    pub fn text(&self, handle: AtomHandle) -> Option<Arc<str>> {
        self.atoms.read().texts.get(handle.index() as usize).cloned()
    }

    /// Returns the number of interned atoms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.atoms.read().texts.len()
    }

    /// Returns true if nothing has been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.atoms.read().texts.is_empty()
    }

    /// Returns a snapshot of all interned atoms in handle order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(AtomHandle, Arc<str>)> {
        self.atoms
            .read()
            .texts
            .iter()
            .enumerate()
            .map(|(i, t)| (AtomHandle::new(i as u32), Arc::clone(t)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atom_table() {
        let table = AtomTable::new();

        let id1 = table.lookup("123");
        let id2 = table.lookup("0.5");
        let id3 = table.lookup("123");

        assert_eq!(id1.index(), 0);
        assert_eq!(id2.index(), 1);
        assert_eq!(id1, id3);

        assert_eq!(table.text(id1).as_deref(), Some("123"));
        assert_eq!(table.text(id2).as_deref(), Some("0.5"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_get_does_not_insert() {
        let table = AtomTable::new();
        assert_eq!(table.get("x"), None);
        assert!(table.is_empty());

        let x = table.lookup("x");
        assert_eq!(table.get("x"), Some(x));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_unknown_handle() {
        let table = AtomTable::with_capacity(4);
        assert_eq!(table.text(AtomHandle::new(99)), None);
    }

    #[test]
    fn test_concurrent_lookup() {
        let table = Arc::new(AtomTable::new());
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let table = Arc::clone(&table);
                std::thread::spawn(move || {
                    (0..100)
                        .map(|i| table.lookup(&i.to_string()))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let results: Vec<_> = workers.into_iter().map(|w| w.join().unwrap()).collect();
        for other in &results[1..] {
            assert_eq!(&results[0], other);
        }
        assert_eq!(table.len(), 100);
    }

    #[test]
    fn test_snapshot_order() {
        let table = AtomTable::new();
        table.lookup("b");
        table.lookup("a");
        let snapshot = table.snapshot();
        assert_eq!(snapshot[0].1.as_ref(), "b");
        assert_eq!(snapshot[1].1.as_ref(), "a");
    }
}
