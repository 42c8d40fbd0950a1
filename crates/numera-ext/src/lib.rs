//! # numera-ext
//!
//! The evaluation environment and the native extension loader.
//!
//! This crate provides:
//! - An [`Environment`] binding built-in names to functions, each with an owner
//! - The core numeric built-ins over [`numera_numbers::api`]
//! - The [`Plugin`] contract and the [`export_plugin!`] factory macro
//! - [`NativeModule`] and [`ExtensionRegistry`] for loading modules at runtime
//!
//! ## Lifecycle
//!
//! - Opening a module binds all of its built-ins or none of them
//! - Closing removes the plugin's bindings before the plugin is destroyed
//! - A module's library is never unmapped while its plugin is registered

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod builtins;
pub mod config;
pub mod environment;
pub mod error;
pub mod loader;
pub mod plugin;

#[cfg(test)]
mod proptests;

pub use builtins::{CORE_BUILTINS, CORE_OWNER, FALSE_ATOM, TRUE_ATOM};
pub use config::{EnvironmentConfig, LoaderConfig};
pub use environment::{BuiltinFn, Environment};
pub use error::{CallError, EnvError, ExtensionError};
pub use loader::{module_name, ExtensionRegistry, ModuleLibrary, NativeModule};
pub use plugin::{Plugin, PluginBox, PluginFactory, Registrar};
