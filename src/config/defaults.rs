//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

use chatcmd_syntax::{DEFAULT_DELIMITER, DEFAULT_PREFIX};

pub fn default_prefixes() -> Vec<String> {
    vec![DEFAULT_PREFIX.to_string()]
}

pub fn default_plugin_delimiters() -> Vec<String> {
    vec![DEFAULT_DELIMITER.to_string()]
}
