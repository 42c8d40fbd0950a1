//! # numera-core
//!
//! Atom interning shared by the Numera numeric core and its callers.
//!
//! This crate provides:
//! - An append-only, deduplicating table of atom text
//! - Copyable 32-bit atom handles
//!
//! ## Design Principles
//!
//! - **Canonical text**: equal text always maps to the identical handle
//! - **Monotonic growth**: atoms are never removed, so handles never dangle
//! - **Shared reads**: lookups of existing text only take a shared lock

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod handle;
pub mod intern;

#[cfg(test)]
mod proptests;

pub use handle::AtomHandle;
pub use intern::AtomTable;
