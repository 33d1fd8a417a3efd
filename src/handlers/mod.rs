//! Command handlers.
//!
//! [`core`] holds the machinery every command runs through; [`builtin`]
//! holds the commands shipped with the engine.

pub mod builtin;
pub mod core;
pub mod helpers;

pub use helpers::{command_signature, parameter_signature, type_display_name};
