//! # Numera
//!
//! The numeric core of a symbolic evaluator: exact and arbitrary precision
//! numerals behind one backend contract, and a loader that extends the
//! evaluator's built-ins with native modules at runtime.
//!
//! ## Features
//!
//! - **Swappable backends**: `backend-dashu` (default) or `backend-native`, chosen at build time
//! - **Exact where possible**: integer results never round, whatever the precision
//! - **Two call surfaces**: [`Numeral`](numbers::Numeral) values and string-addressed [`api`](numbers::api)
//! - **Native extensions**: all-or-nothing registration, unload refused while registered
//!
//! ## Quick Start
//!
//! ```rust
//! use numera::prelude::*;
//!
//! let p = Precision::new(10);
//! let two: Numeral = Numeral::parse("2", Radix::DECIMAL, p).unwrap();
//! let three = Numeral::from_i64(3);
//! assert_eq!(two.divide(&three, p).unwrap().to_string(), "0.6666666667");
//! assert_eq!(two.power(&three, p).unwrap().to_string(), "8");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use numera_core as core;
pub use numera_ext as ext;
pub use numera_numbers as numbers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use numera_core::{AtomHandle, AtomTable};
    pub use numera_ext::{
        export_plugin, CallError, EnvError, Environment, EnvironmentConfig, ExtensionError, ExtensionRegistry,
        LoaderConfig, Plugin, Registrar,
    };
    pub use numera_numbers::{api, BackendInfo, Numeral, NumeralError, Precision, Radix};
}
