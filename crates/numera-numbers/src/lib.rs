//! # numera-numbers
//!
//! Backend-swappable numerals for the Numera core.
//!
//! This crate provides:
//! - The [`Backend`] contract every arithmetic library implements
//! - An arbitrary precision backend over `dashu` (feature `backend-dashu`)
//! - A hardware backend over `i128`/`f64` (feature `backend-native`)
//! - Reference-counted [`Numeral`] values enforcing one edge-case policy
//! - A string-addressed mirror of every operation in [`api`]
//!
//! ## Exactness
//!
//! - Integer arithmetic is exact; precision is ignored
//! - Integer division is exact when the quotient terminates in base 10
//! - Any float operand yields a float rounded to the requested precision

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod api;
pub mod backend;
pub mod error;
pub mod numeral;
pub mod precision;
pub mod registry;
pub mod text;

#[cfg(test)]
mod proptests;

pub use backend::{ActiveBackend, Backend};
pub use error::{NumeralError, NumeralResult};
pub use numeral::Numeral;
pub use precision::{Precision, Radix};
pub use registry::{backend_name, supports_mantissa, BackendInfo};
