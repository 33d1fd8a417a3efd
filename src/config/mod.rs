//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions (Config, CommandDeclaration, MiddlewareSpec)
//! - [`validation`]: Checks run after loading, reporting every problem at once
//! - [`defaults`]: Serde default functions

mod defaults;
mod types;
mod validation;

pub use types::{
    BuiltinCommands, CommandDeclaration, Config, ConfigError, MiddlewareSpec, PluginAliases,
    StringList,
};
pub use validation::{ValidationError, validate};
