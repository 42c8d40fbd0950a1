//! Atom handles.
//!
//! Handles are 32-bit indices into an [`AtomTable`](crate::AtomTable). Because the
//! table deduplicates its text, two handles are equal if and only if their text is.

use std::fmt;

/// A handle to an interned atom.
///
/// This is a lightweight 32-bit index that can be copied freely.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomHandle(u32);

impl AtomHandle {
    /// Creates a new handle from an index.
    ///
    /// This is primarily for internal use by the table.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this handle.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for AtomHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Atom({})", self.0)
    }
}

impl fmt::Display for AtomHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_equality() {
        let h1 = AtomHandle::new(7);
        let h2 = AtomHandle::new(7);
        let h3 = AtomHandle::new(8);

        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
        assert!(h1 < h3);
    }

    #[test]
    fn test_handle_size() {
        assert_eq!(std::mem::size_of::<AtomHandle>(), 4);
    }

    #[test]
    fn test_display() {
        assert_eq!(AtomHandle::new(3).to_string(), "@3");
        assert_eq!(format!("{:?}", AtomHandle::new(3)), "Atom(3)");
    }
}
